/// Hides a header while the page scrolls down and shows it on any upward
/// scroll or near the top.
#[derive(Clone, Debug)]
pub struct ScrollHide {
    threshold: f64,
    last_y: f64,
    hidden: bool,
}

impl ScrollHide {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            last_y: 0.0,
            hidden: false,
        }
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }

    /// Returns the new visibility only when it changed.
    pub fn update(&mut self, scroll_y: f64) -> Option<bool> {
        let hidden = scroll_y > self.last_y && scroll_y > self.threshold;
        self.last_y = scroll_y;
        if hidden == self.hidden {
            return None;
        }
        self.hidden = hidden;
        Some(hidden)
    }
}
