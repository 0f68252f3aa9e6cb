//! Turn sampled property values into CSS declarations.

use crate::interp::{round3, Property, Value};
use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleDecl {
    pub name: &'static str,
    pub value: String,
}

impl StyleDecl {
    fn new(name: &'static str, value: String) -> Self {
        Self { name, value }
    }
}

pub type Declarations = SmallVec<[StyleDecl; 6]>;

/// Compose one element's values. Translate and scale properties fold into a
/// single `transform` (translate first, then scale).
pub fn compose(values: &[(Property, Value)]) -> Declarations {
    let mut out = Declarations::new();
    let mut transform: SmallVec<[String; 4]> = SmallVec::new();

    for (property, value) in values {
        match (property, value) {
            (Property::Transform, Value::Transform(t)) => transform.insert(0, t.to_css()),
            (Property::Color, Value::Color(c)) => out.push(StyleDecl::new("color", c.to_css())),
            (Property::BackgroundColor, Value::Color(c)) => {
                out.push(StyleDecl::new("background-color", c.to_css()))
            }
            (p, Value::Number(n)) => {
                let n = round3(*n);
                match p {
                    Property::Opacity => out.push(StyleDecl::new("opacity", n.to_string())),
                    Property::BlurPx => out.push(StyleDecl::new("filter", format!("blur({n}px)"))),
                    Property::TranslateXPercent => transform.push(format!("translateX({n}%)")),
                    Property::TranslateYPercent => transform.push(format!("translateY({n}%)")),
                    Property::TranslateYPx => transform.push(format!("translateY({n}px)")),
                    Property::Scale => transform.push(format!("scale({n})")),
                    Property::BorderRadiusPx => {
                        out.push(StyleDecl::new("border-radius", format!("{n}px")))
                    }
                    Property::WidthPercent => out.push(StyleDecl::new("width", format!("{n}%"))),
                    Property::HeightVh => out.push(StyleDecl::new("height", format!("{n}vh"))),
                    Property::ClipRightPercent => {
                        out.push(StyleDecl::new("clip-path", format!("inset(0 {n}% 0 0)")))
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    if !transform.is_empty() {
        // Scale after translation regardless of track order.
        transform.sort_by_key(|t| t.starts_with("scale"));
        out.push(StyleDecl::new("transform", transform.join(" ")));
    }
    out
}
