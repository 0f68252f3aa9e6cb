//! Value interpolation: numbers, colours and transforms, plus keyframe tracks.

use crate::ease::Ease;
use crate::error::{ChoreoError, Result};
use glam::Vec4;
use std::str::FromStr;

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

/// Interpolate `from -> to` at `local` progress shaped by `ease`.
///
/// Exact at both endpoints for every value type.
pub fn interpolate<T: Lerp + Clone>(local: f64, from: &T, to: &T, ease: Ease) -> T {
    let e = ease.apply(local);
    if e <= 0.0 {
        from.clone()
    } else if e >= 1.0 {
        to.clone()
    } else {
        T::lerp(from, to, e)
    }
}

/// Straight (non-premultiplied) colour, every channel in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba(pub Vec4);

impl Rgba {
    pub const BLACK: Self = Self(Vec4::new(0.0, 0.0, 0.0, 1.0));
    pub const WHITE: Self = Self(Vec4::ONE);

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self(Vec4::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            1.0,
        ))
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self(Vec4::new(self.0.x, self.0.y, self.0.z, a.clamp(0.0, 1.0)))
    }

    pub fn to_css(self) -> String {
        let c = self.0.clamp(Vec4::ZERO, Vec4::ONE);
        let ch = |v: f32| (v * 255.0).round() as u8;
        format!("rgba({}, {}, {}, {})", ch(c.x), ch(c.y), ch(c.z), round3(c.w as f64))
    }
}

impl Lerp for Rgba {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self(a.0.lerp(b.0, t as f32))
    }
}

impl FromStr for Rgba {
    type Err = ChoreoError;

    /// `#rgb`, `#rrggbb` or `#rrggbbaa`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let bad = || ChoreoError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(bad)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        match hex.len() {
            3 => {
                let nib = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| bad())
                };
                Ok(Self::from_rgb8(nib(0)?, nib(1)?, nib(2)?))
            }
            6 => Ok(Self::from_rgb8(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::from_rgb8(byte(0)?, byte(2)?, byte(4)?)
                .with_alpha(f32::from(byte(6)?) / 255.0)),
            _ => Err(bad()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LengthUnit {
    #[default]
    Percent,
    Px,
}

impl LengthUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Percent => "%",
            Self::Px => "px",
        }
    }
}

/// 2D translate + uniform scale. Interpolated component-wise; the unit of
/// the starting transform wins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub unit: LengthUnit,
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            unit: LengthUnit::Percent,
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn translate_y(y: f64, unit: LengthUnit) -> Self {
        Self {
            y,
            unit,
            ..Self::default()
        }
    }

    pub fn to_css(&self) -> String {
        let u = self.unit.suffix();
        format!(
            "translate({}{u}, {}{u}) scale({})",
            round3(self.x),
            round3(self.y),
            round3(self.scale)
        )
    }
}

impl Lerp for Transform {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            x: f64::lerp(&a.x, &b.x, t),
            y: f64::lerp(&a.y, &b.y, t),
            unit: a.unit,
            scale: f64::lerp(&a.scale, &b.scale, t),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Color(Rgba),
    Transform(Transform),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Color,
    Transform,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Color => "colour",
            Self::Transform => "transform",
        }
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Number(_) => ValueKind::Number,
            Self::Color(_) => ValueKind::Color,
            Self::Transform(_) => ValueKind::Transform,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl Lerp for Value {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        match (a, b) {
            (Self::Number(x), Self::Number(y)) => Self::Number(f64::lerp(x, y, t)),
            (Self::Color(x), Self::Color(y)) => Self::Color(Rgba::lerp(x, y, t)),
            (Self::Transform(x), Self::Transform(y)) => {
                Self::Transform(Transform::lerp(x, y, t))
            }
            // Tracks are validated so kinds never mix; hold the start value.
            _ => *a,
        }
    }
}

/// The style target an animated value is written to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    Opacity,
    BlurPx,
    Scale,
    TranslateXPercent,
    TranslateYPercent,
    TranslateYPx,
    BorderRadiusPx,
    WidthPercent,
    HeightVh,
    ClipRightPercent,
    Transform,
    Color,
    BackgroundColor,
}

impl Property {
    pub fn name(self) -> &'static str {
        match self {
            Self::Opacity => "opacity",
            Self::BlurPx => "blur",
            Self::Scale => "scale",
            Self::TranslateXPercent => "translate-x",
            Self::TranslateYPercent => "translate-y",
            Self::TranslateYPx => "translate-y-px",
            Self::BorderRadiusPx => "border-radius",
            Self::WidthPercent => "width",
            Self::HeightVh => "height",
            Self::ClipRightPercent => "clip-right",
            Self::Transform => "transform",
            Self::Color => "color",
            Self::BackgroundColor => "background-color",
        }
    }

    pub fn kind(self) -> ValueKind {
        match self {
            Self::Transform => ValueKind::Transform,
            Self::Color | Self::BackgroundColor => ValueKind::Color,
            _ => ValueKind::Number,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe<T> {
    pub at: f64,
    pub value: T,
    /// Curve for the segment that starts at this key.
    pub ease: Ease,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Keyframes<T> {
    pub keys: Vec<Keyframe<T>>, // sorted by `at`
}

impl<T> Keyframes<T>
where
    T: Lerp + Clone,
{
    pub fn from_to(from: T, to: T, ease: Ease) -> Self {
        Self {
            keys: vec![
                Keyframe {
                    at: 0.0,
                    value: from,
                    ease,
                },
                Keyframe {
                    at: 1.0,
                    value: to,
                    ease: Ease::Linear,
                },
            ],
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (i, w) in self.keys.windows(2).enumerate() {
            if w[1].at < w[0].at {
                return Err(ChoreoError::UnsortedKeyframes {
                    index: i + 1,
                    at: w[1].at,
                    prev: w[0].at,
                });
            }
        }
        Ok(())
    }

    /// Sample at local progress. Outside the key range the nearest key holds;
    /// an empty track yields `None`.
    pub fn sample(&self, t: f64) -> Option<T> {
        let first = self.keys.first()?;
        let last = self.keys.last()?;
        if t <= first.at {
            return Some(first.value.clone());
        }
        if t >= last.at {
            return Some(last.value.clone());
        }
        let idx = self.keys.partition_point(|k| k.at <= t);
        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let span = b.at - a.at;
        if span <= 0.0 {
            return Some(b.value.clone());
        }
        Some(interpolate((t - a.at) / span, &a.value, &b.value, a.ease))
    }
}

/// One animated property of one child.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub property: Property,
    pub keys: Keyframes<Value>,
}

impl Track {
    pub fn new(property: Property, keys: Keyframes<Value>) -> Self {
        Self { property, keys }
    }

    pub fn number(property: Property, from: f64, to: f64, ease: Ease) -> Self {
        Self::new(
            property,
            Keyframes::from_to(Value::Number(from), Value::Number(to), ease),
        )
    }

    pub fn color(property: Property, from: Rgba, to: Rgba, ease: Ease) -> Self {
        Self::new(
            property,
            Keyframes::from_to(Value::Color(from), Value::Color(to), ease),
        )
    }

    pub fn transform(from: Transform, to: Transform, ease: Ease) -> Self {
        Self::new(
            Property::Transform,
            Keyframes::from_to(Value::Transform(from), Value::Transform(to), ease),
        )
    }

    pub fn validate(&self) -> Result<()> {
        self.keys.validate()?;
        let want = self.property.kind();
        if let Some(bad) = self.keys.keys.iter().find(|k| k.value.kind() != want) {
            return Err(ChoreoError::MixedValueKinds {
                property: self.property.name(),
                found: bad.value.kind().name(),
            });
        }
        Ok(())
    }

    pub fn sample(&self, local: f64) -> Option<Value> {
        self.keys.sample(local)
    }
}

#[inline]
pub(crate) fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact_for_every_kind() {
        let pairs = [
            (Value::Number(0.1), Value::Number(0.7)),
            (
                Value::Color("#112233".parse().unwrap()),
                Value::Color("#ffeedd".parse().unwrap()),
            ),
            (
                Value::Transform(Transform::translate_y(100.0, LengthUnit::Percent)),
                Value::Transform(Transform {
                    scale: 0.95,
                    ..Transform::default()
                }),
            ),
        ];
        for (a, b) in pairs {
            for ease in [Ease::Linear, Ease::PowerOut(2), Ease::ExpoOut] {
                assert_eq!(interpolate(0.0, &a, &b, ease), a);
                assert_eq!(interpolate(1.0, &a, &b, ease), b);
            }
        }
    }

    #[test]
    fn numeric_midpoint_is_linear() {
        assert_eq!(interpolate(0.5, &8.0, &0.0, Ease::Linear), 4.0);
    }

    #[test]
    fn colour_channels_interpolate_independently() {
        let a = Rgba::from_rgb8(0, 100, 200);
        let b = Rgba::from_rgb8(200, 100, 0);
        let mid = interpolate(0.5, &a, &b, Ease::Linear);
        assert_eq!(mid.to_css(), "rgba(100, 100, 100, 1)");
    }

    #[test]
    fn parses_hex_colours() {
        assert_eq!("#fff".parse::<Rgba>().unwrap(), Rgba::WHITE);
        assert_eq!("#000000".parse::<Rgba>().unwrap(), Rgba::BLACK);
        let c: Rgba = "#00000080".parse().unwrap();
        assert!((c.0.w - 128.0 / 255.0).abs() < 1e-6);
        assert!("ff0000".parse::<Rgba>().is_err());
        assert!("#ff00".parse::<Rgba>().is_err());
    }

    #[test]
    fn same_input_drives_different_properties() {
        let opacity = Track::number(Property::Opacity, 0.15, 1.0, Ease::Linear);
        let blur = Track::number(Property::BlurPx, 8.0, 0.0, Ease::PowerOut(2));
        let local = 0.5;
        let o = opacity.sample(local).and_then(|v| v.as_number()).unwrap();
        assert!((o - 0.575).abs() < 1e-9);
        let b = blur.sample(local).and_then(|v| v.as_number()).unwrap();
        assert!(b < 4.0, "eased blur clears faster than linear: {b}");
    }

    #[test]
    fn multi_key_track_holds_outside_range() {
        let keys = Keyframes {
            keys: vec![
                Keyframe { at: 0.2, value: 0.0, ease: Ease::Linear },
                Keyframe { at: 0.6, value: 1.0, ease: Ease::Linear },
                Keyframe { at: 1.0, value: 0.4, ease: Ease::Linear },
            ],
        };
        assert_eq!(keys.sample(0.0), Some(0.0));
        assert!((keys.sample(0.4).unwrap() - 0.5).abs() < 1e-9);
        assert_eq!(keys.sample(0.6), Some(1.0));
        assert!((keys.sample(0.8).unwrap() - 0.7).abs() < 1e-9);
        assert_eq!(keys.sample(2.0), Some(0.4));
    }

    #[test]
    fn validation_rejects_unsorted_and_mixed_tracks() {
        let unsorted = Keyframes {
            keys: vec![
                Keyframe { at: 0.5, value: 1.0, ease: Ease::Linear },
                Keyframe { at: 0.1, value: 0.0, ease: Ease::Linear },
            ],
        };
        assert!(matches!(
            unsorted.validate(),
            Err(ChoreoError::UnsortedKeyframes { index: 1, .. })
        ));

        let mixed = Track::new(
            Property::Opacity,
            Keyframes::from_to(Value::Number(0.0), Value::Color(Rgba::WHITE), Ease::Linear),
        );
        assert!(matches!(
            mixed.validate(),
            Err(ChoreoError::MixedValueKinds { property: "opacity", .. })
        ));
    }
}
