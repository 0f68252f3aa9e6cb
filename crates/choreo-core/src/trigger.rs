//! Declarative trigger positions and their resolution against a layout.
//!
//! A start point reads `"<element edge> <viewport edge>"`: the region starts
//! at the scroll offset where that edge of the section meets that line of the
//! viewport (`"top top"`, `"top 80%"`, `"center center"`). An end is either
//! another point or a distance past the start (`"+=150%"` of the viewport
//! height, `"+=1200"` pixels).

use crate::error::{ChoreoError, Result};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Edge {
    Top,
    Center,
    Bottom,
    Percent(f64),
    Px(f64),
}

impl Edge {
    /// Distance of this edge from the top of a box of height `extent`.
    pub fn offset_in(self, extent: f64) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Center => extent / 2.0,
            Self::Bottom => extent,
            Self::Percent(p) => extent * p / 100.0,
            Self::Px(px) => px,
        }
    }
}

impl FromStr for Edge {
    type Err = ChoreoError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "top" => Ok(Self::Top),
            "center" => Ok(Self::Center),
            "bottom" => Ok(Self::Bottom),
            _ => {
                if let Some(p) = s.strip_suffix('%') {
                    p.parse()
                        .map(Self::Percent)
                        .map_err(|_| ChoreoError::invalid_trigger(s, "bad percentage"))
                } else {
                    s.strip_suffix("px")
                        .unwrap_or(s)
                        .parse()
                        .map(Self::Px)
                        .map_err(|_| ChoreoError::invalid_trigger(s, "unknown edge"))
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerPoint {
    pub element: Edge,
    pub viewport: Edge,
}

impl TriggerPoint {
    pub const TOP_TOP: Self = Self {
        element: Edge::Top,
        viewport: Edge::Top,
    };

    pub fn new(element: Edge, viewport: Edge) -> Self {
        Self { element, viewport }
    }

    /// Document scroll offset at which this point is reached.
    pub fn resolve(&self, layout: &Layout) -> f64 {
        layout.element_top + self.element.offset_in(layout.element_height)
            - self.viewport.offset_in(layout.viewport_height)
    }
}

impl FromStr for TriggerPoint {
    type Err = ChoreoError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        let (Some(el), Some(vp), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ChoreoError::invalid_trigger(s, "expected `<element> <viewport>`"));
        };
        Ok(Self {
            element: el.parse()?,
            viewport: vp.parse()?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Distance {
    Px(f64),
    ViewportPercent(f64),
    /// Percent of the viewport height, `narrow` when the viewport is narrower
    /// than `breakpoint` px and `wide` otherwise. Chosen per layout, so a
    /// resize across the breakpoint switches distance.
    Responsive { narrow: f64, wide: f64, breakpoint: f64 },
}

impl Distance {
    pub fn resolve(self, layout: &Layout) -> f64 {
        let percent = match self {
            Self::Px(px) => return px,
            Self::ViewportPercent(p) => p,
            Self::Responsive { narrow, wide, breakpoint } => {
                if layout.viewport_width < breakpoint {
                    narrow
                } else {
                    wide
                }
            }
        };
        layout.viewport_height * percent / 100.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EndSpec {
    Point(TriggerPoint),
    After(Distance),
}

impl EndSpec {
    pub fn resolve(&self, start: f64, layout: &Layout) -> f64 {
        match self {
            Self::Point(p) => p.resolve(layout),
            Self::After(d) => start + d.resolve(layout),
        }
    }
}

impl FromStr for EndSpec {
    type Err = ChoreoError;

    fn from_str(s: &str) -> Result<Self> {
        let Some(rest) = s.trim().strip_prefix("+=") else {
            return s.parse().map(Self::Point);
        };
        let distance = if let Some(p) = rest.strip_suffix('%') {
            p.parse().map(Distance::ViewportPercent)
        } else {
            rest.strip_suffix("px").unwrap_or(rest).parse().map(Distance::Px)
        };
        distance
            .map(Self::After)
            .map_err(|_| ChoreoError::invalid_trigger(s, "bad relative distance"))
    }
}

/// Measured geometry of a section and the viewport, in CSS pixels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    /// Section top in document coordinates.
    pub element_top: f64,
    pub element_height: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Document tops of the section's index items, in DOM order.
    pub item_tops: Vec<f64>,
}

impl Layout {
    pub fn new(element_top: f64, element_height: f64, viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            element_top,
            element_height,
            viewport_width,
            viewport_height,
            item_tops: Vec::new(),
        }
    }

    pub fn with_items(mut self, item_tops: Vec<f64>) -> Self {
        self.item_tops = item_tops;
        self
    }

    /// The section's top has reached the viewport top and its bottom is still
    /// below `fraction` of the viewport height.
    pub fn holds_viewport(&self, scroll_y: f64, fraction: f64) -> bool {
        let top = self.element_top - scroll_y;
        top <= 0.0 && top + self.element_height > self.viewport_height * fraction
    }
}
