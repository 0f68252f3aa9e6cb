//! Child windows: sub-intervals of a section's progress used for stagger.

use crate::error::{ChoreoError, Result};

/// Remap `global` into the window `[start, end]`, clamped to `[0, 1]`.
///
/// `end <= start` is a configuration error rather than a division by zero.
pub fn local_progress(global: f64, start: f64, end: f64) -> Result<f64> {
    if !(end > start) {
        return Err(ChoreoError::DegenerateWindow { start, end });
    }
    Ok(remap(global, start, end))
}

#[inline]
fn remap(global: f64, start: f64, end: f64) -> f64 {
    ((global - start) / (end - start)).clamp(0.0, 1.0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChildWindow {
    start: f64,
    end: f64,
}

impl ChildWindow {
    pub const FULL: Self = Self {
        start: 0.0,
        end: 1.0,
    };

    pub fn new(start: f64, end: f64) -> Result<Self> {
        if !(end > start) || start < 0.0 || end > 1.0 {
            return Err(ChoreoError::DegenerateWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Local progress of this window for the parent progress `global`.
    pub fn local(&self, global: f64) -> f64 {
        remap(global, self.start, self.end)
    }

    fn contains_half_open(&self, p: f64) -> bool {
        self.start <= p && p < self.end
    }
}

/// An ordered run of windows belonging to one section.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WindowSeq {
    windows: Vec<ChildWindow>,
}

impl WindowSeq {
    pub fn new(windows: Vec<ChildWindow>) -> Self {
        Self { windows }
    }

    /// `n` back-to-back windows of equal width: `i/n .. (i+1)/n`.
    pub fn even(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(ChoreoError::DegenerateWindow {
                start: 0.0,
                end: 0.0,
            });
        }
        let windows = (0..n)
            .map(|i| ChildWindow::new(i as f64 / n as f64, (i + 1) as f64 / n as f64))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { windows })
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&ChildWindow> {
        self.windows.get(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChildWindow> {
        self.windows.iter()
    }

    /// The window that owns progress `p`.
    ///
    /// Windows are half-open `[start, end)`, so a shared boundary goes to the
    /// window that starts there. The last window is closed at its end.
    pub fn owner_of(&self, p: f64) -> Option<usize> {
        if let Some(i) = self.windows.iter().position(|w| w.contains_half_open(p)) {
            return Some(i);
        }
        match self.windows.last() {
            Some(last) if p == last.end => Some(self.windows.len() - 1),
            _ => None,
        }
    }

    pub fn into_vec(self) -> Vec<ChildWindow> {
        self.windows
    }
}

/// Builds overlapping windows from positions on a relative time axis.
///
/// Entries are `(at, duration)` in arbitrary timeline units; windows are
/// normalized by the timeline's total length.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    entries: Vec<(f64, f64)>,
    total: Option<f64>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, at: f64, duration: f64) -> Self {
        self.entries.push((at, duration));
        self
    }

    /// Stretch the timeline to `total` units instead of the last entry's end.
    pub fn with_total(mut self, total: f64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn total(&self) -> f64 {
        self.total.unwrap_or_else(|| {
            self.entries
                .iter()
                .map(|(at, d)| at + d)
                .fold(0.0, f64::max)
        })
    }

    pub fn build(&self) -> Result<WindowSeq> {
        let total = self.total();
        let windows = self
            .entries
            .iter()
            .map(|&(at, d)| {
                if !(d > 0.0) || !(total > 0.0) {
                    return Err(ChoreoError::DegenerateWindow {
                        start: at,
                        end: at + d,
                    });
                }
                ChildWindow::new(at / total, (at + d) / total)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(WindowSeq::new(windows))
    }
}
