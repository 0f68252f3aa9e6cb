use crate::error::ChoreoError;
use std::f64::consts::FRAC_PI_2;
use std::str::FromStr;

/// Easing curves, named after the `powerN.in|out|inOut` family.
///
/// `powerN` raises progress to the `N + 1` power, so `power1` is quadratic
/// and `power4` quintic.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Ease {
    #[default]
    Linear,
    PowerIn(u8),
    PowerOut(u8),
    PowerInOut(u8),
    SineOut,
    ExpoOut,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::PowerIn(n) => t.powi(exponent(n)),
            Self::PowerOut(n) => 1.0 - (1.0 - t).powi(exponent(n)),
            Self::PowerInOut(n) => {
                let e = exponent(n);
                if t < 0.5 {
                    0.5 * (2.0 * t).powi(e)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(e) / 2.0
                }
            }
            Self::SineOut => (t * FRAC_PI_2).sin(),
            Self::ExpoOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
        }
    }
}

#[inline]
fn exponent(n: u8) -> i32 {
    i32::from(n.clamp(1, 4)) + 1
}

impl FromStr for Ease {
    type Err = ChoreoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ChoreoError::UnknownEase(s.to_string());
        let (family, mode) = s.trim().split_once('.').unwrap_or((s.trim(), "out"));
        match family {
            "none" | "linear" => return Ok(Self::Linear),
            "sine" if mode == "out" => return Ok(Self::SineOut),
            "expo" if mode == "out" => return Ok(Self::ExpoOut),
            _ => {}
        }
        let degree: u8 = family
            .strip_prefix("power")
            .and_then(|d| d.parse().ok())
            .filter(|d| (1..=4).contains(d))
            .ok_or_else(unknown)?;
        match mode {
            "in" => Ok(Self::PowerIn(degree)),
            "out" => Ok(Self::PowerOut(degree)),
            "inOut" => Ok(Self::PowerInOut(degree)),
            _ => Err(unknown()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 9] = [
        Ease::Linear,
        Ease::PowerIn(1),
        Ease::PowerOut(2),
        Ease::PowerInOut(2),
        Ease::PowerOut(3),
        Ease::PowerOut(4),
        Ease::PowerInOut(4),
        Ease::SineOut,
        Ease::ExpoOut,
    ];

    #[test]
    fn endpoints_are_stable() {
        for ease in ALL {
            assert!(ease.apply(0.0).abs() < 1e-12, "{ease:?} at 0");
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-12, "{ease:?} at 1");
        }
    }

    #[test]
    fn monotonic_spot_check() {
        for ease in ALL {
            let a = ease.apply(0.25);
            let b = ease.apply(0.5);
            let c = ease.apply(0.75);
            assert!(a < b && b < c, "{ease:?}");
        }
    }

    #[test]
    fn parses_named_curves() {
        assert_eq!("none".parse::<Ease>().unwrap(), Ease::Linear);
        assert_eq!("power3.out".parse::<Ease>().unwrap(), Ease::PowerOut(3));
        assert_eq!("power2".parse::<Ease>().unwrap(), Ease::PowerOut(2));
        assert_eq!("power1.inOut".parse::<Ease>().unwrap(), Ease::PowerInOut(1));
        assert_eq!("sine.out".parse::<Ease>().unwrap(), Ease::SineOut);
        assert!("elastic.out".parse::<Ease>().is_err());
        assert!("power9.out".parse::<Ease>().is_err());
    }

    #[test]
    fn out_curves_lead_linear() {
        assert!(Ease::PowerOut(3).apply(0.3) > 0.3);
        assert!(Ease::PowerIn(3).apply(0.3) < 0.3);
    }
}
