use serde::Deserialize;
use std::f64::consts::PI;

/// Easing curves addressable by their tween-library names (`"sine.inOut"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum Easing {
    Linear,
    SineIn,
    SineOut,
    #[default]
    SineInOut,
    Power1In,
    Power1Out,
    Power1InOut,
    Power2In,
    Power2Out,
    Power2InOut,
}

impl Easing {
    pub fn from_name(name: &str) -> Option<Self> {
        let e = match name {
            "none" | "linear" => Easing::Linear,
            "sine.in" => Easing::SineIn,
            "sine.out" => Easing::SineOut,
            "sine.inOut" => Easing::SineInOut,
            "power1.in" => Easing::Power1In,
            "power1.out" | "power1" => Easing::Power1Out,
            "power1.inOut" => Easing::Power1InOut,
            "power2.in" => Easing::Power2In,
            "power2.out" | "power2" => Easing::Power2Out,
            "power2.inOut" => Easing::Power2InOut,
            _ => return None,
        };
        Some(e)
    }

    /// Map linear time `t` in \[0, 1\] onto the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Easing::SineOut => (t * PI / 2.0).sin(),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Easing::Power1In => t * t,
            Easing::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::Power1InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::Power2In => t * t * t,
            Easing::Power2Out => 1.0 - (1.0 - t).powi(3),
            Easing::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

impl From<String> for Easing {
    fn from(name: String) -> Self {
        Easing::from_name(&name).unwrap_or_else(|| {
            log::warn!("[pulse] unknown easing {name:?}; using sine.inOut");
            Easing::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 10] = [
        Easing::Linear,
        Easing::SineIn,
        Easing::SineOut,
        Easing::SineInOut,
        Easing::Power1In,
        Easing::Power1Out,
        Easing::Power1InOut,
        Easing::Power2In,
        Easing::Power2Out,
        Easing::Power2InOut,
    ];

    #[test]
    fn curves_hit_both_endpoints() {
        for e in ALL {
            assert!(e.apply(0.0).abs() < 1e-9, "{e:?} at 0");
            assert!((e.apply(1.0) - 1.0).abs() < 1e-9, "{e:?} at 1");
        }
    }

    #[test]
    fn in_out_curves_are_symmetric() {
        for e in [Easing::SineInOut, Easing::Power1InOut, Easing::Power2InOut] {
            assert!((e.apply(0.5) - 0.5).abs() < 1e-9);
            let a = e.apply(0.2);
            let b = e.apply(0.8);
            assert!((a + b - 1.0).abs() < 1e-9, "{e:?}");
        }
    }

    #[test]
    fn unknown_name_falls_back_to_sine_in_out() {
        assert_eq!(Easing::from("bounce.out".to_string()), Easing::SineInOut);
        assert_eq!(Easing::from("power1.in".to_string()), Easing::Power1In);
    }
}
