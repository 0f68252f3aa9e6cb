//! Process-wide animation defaults, registered once at startup.

use crate::constants::{ANTICIPATE_PX, DURATION_MEDIUM};
use crate::ease::Ease;
use crate::error::{ChoreoError, Result};
use std::sync::OnceLock;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Defaults {
    pub duration_sec: f64,
    pub ease: Ease,
    /// Lag of smoothed scrubs, in seconds.
    pub scrub_lag_sec: f64,
    pub anticipate_px: f64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            duration_sec: DURATION_MEDIUM,
            ease: Ease::PowerOut(3),
            scrub_lag_sec: 1.0,
            anticipate_px: ANTICIPATE_PX,
        }
    }
}

static DEFAULTS: OnceLock<Defaults> = OnceLock::new();

/// Register the defaults. Only the first call takes effect.
pub fn init(defaults: Defaults) -> Result<()> {
    DEFAULTS
        .set(defaults)
        .map_err(|_| ChoreoError::AlreadyInitialized)?;
    log::debug!("[runtime] defaults registered: {:?}", defaults);
    Ok(())
}

pub fn is_initialized() -> bool {
    DEFAULTS.get().is_some()
}

/// Registered defaults, or the built-in ones before `init`.
pub fn defaults() -> Defaults {
    DEFAULTS.get().copied().unwrap_or_default()
}
