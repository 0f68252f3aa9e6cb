// Timing and geometry defaults shared by the presets and front-ends.

// Tween duration when a section does not set one (seconds)
pub const DURATION_MEDIUM: f64 = 0.8;

// Stagger between siblings in one-shot reveals (seconds)
pub const STAGGER_FAST: f64 = 0.1;

// Pin applied this far (px) before the exact trigger, about one wheel notch
pub const ANTICIPATE_PX: f64 = 16.0;

// Smoothed scrub settles once within this distance of the target progress
pub const SCRUB_SETTLE_EPSILON: f64 = 1e-4;

// Hero reveal accumulator (units of a 0..100 accumulator)
pub const HERO_STEP: f64 = 8.0;
pub const HERO_STEP_INTERVAL_MS: f64 = 50.0;
pub const HERO_COMPLETE_DELAY_MS: f64 = 500.0;
pub const SERVICES_HERO_STEP: f64 = 4.0;
pub const REENGAGE_SCROLL_Y: f64 = 10.0;
// Wheel and touch are only taken over while the hero's bottom is below this
// fraction of the viewport height
pub const HERO_HOLD_FRACTION: f64 = 0.5;

// Navigation hides after scrolling down past this offset (px)
pub const NAV_HIDE_THRESHOLD: f64 = 100.0;

// One-shot reveal travel (px)
pub const REVEAL_OFFSET_PX: f64 = 70.0;

// Viewport widths below this use the compact scroll distances
pub const MOBILE_BREAKPOINT: f64 = 768.0;
