// Parsing of the section attribute and other markup-derived decisions.
// Kept free of `web_sys` so it can be tested on the host.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionMarkup {
    pub preset: String,
    /// Explicit item count; otherwise counted from the section's items.
    pub items: Option<usize>,
}

impl SectionMarkup {
    /// `"services"`, `"text-reveal:12"`. Whitespace around parts is ignored.
    pub fn parse(attr: &str) -> Option<Self> {
        let mut parts = attr.splitn(2, ':');
        let preset = parts.next()?.trim();
        if preset.is_empty() {
            return None;
        }
        let items = match parts.next().map(str::trim) {
            Some(n) => Some(n.parse().ok()?),
            None => None,
        };
        Some(Self {
            preset: preset.to_string(),
            items,
        })
    }

    /// Item count handed to the preset: explicit, else index items, else
    /// animated children.
    pub fn item_count(&self, items_found: usize, children_found: usize) -> usize {
        match self.items {
            Some(n) => n,
            None if items_found > 0 => items_found,
            None => children_found,
        }
    }
}

/// Transform that keeps a pinned section in place inside its spacer.
pub fn pin_transform(translate_px: f64) -> String {
    format!("translate3d(0, {}px, 0)", (translate_px * 100.0).round() / 100.0)
}
