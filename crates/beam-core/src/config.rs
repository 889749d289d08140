//! Beam configuration as supplied by the host page.
//!
//! Field names follow the JS options object (camelCase) so a host can pass it
//! straight through serde. Every field has a default; `validate` reports
//! values outside their documented domain and `sanitized` repairs them so the
//! engine never feeds NaN into a style string.

use crate::ambient::easing::Easing;
use crate::range::ScrollRange;
use crate::scheduler::{Appearance, BindingKey};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("fullWidth must be in (0, 1], got {0}")]
    FullWidthOutOfRange(f64),
    #[error("invalid scroll anchor {0:?}; expected \"<element-edge> <viewport-edge>\"")]
    InvalidAnchor(String),
    #[error("{name} range is inverted or non-finite: [{min}, {max}]")]
    InvalidRange { name: &'static str, min: f64, max: f64 },
    #[error("{name} must be positive and finite, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },
}

/// Identity of the element whose scrolling drives the beam.
///
/// Container ids are assigned by the host; two configs with the same id refer
/// to the same scroll container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ScrollSource {
    #[default]
    Viewport,
    Container(u32),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BeamConfig {
    /// Fraction of the achievable width travel; raises the progress floor to `1 - full_width`.
    pub full_width: f64,
    pub invert: bool,
    #[serde(alias = "maskLightByProgress")]
    pub mask_by_progress: bool,
    #[serde(alias = "colorLightmode")]
    pub color_light: String,
    #[serde(alias = "colorDarkmode")]
    pub color_dark: String,
    pub scroll_start: String,
    pub scroll_end: String,
    #[serde(skip)]
    pub source: ScrollSource,
    pub dust: DustConfig,
    pub mist: MistConfig,
    pub pulse: PulseConfig,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            full_width: 1.0,
            invert: false,
            mask_by_progress: false,
            color_light: "rgba(0,0,0, 0.5)".to_string(),
            color_dark: "rgba(255, 255, 255, 0.5)".to_string(),
            scroll_start: "top bottom".to_string(),
            scroll_end: "top top".to_string(),
            source: ScrollSource::Viewport,
            dust: DustConfig::default(),
            mist: MistConfig::default(),
            pulse: PulseConfig::default(),
        }
    }
}

impl BeamConfig {
    pub fn scroll_range(&self) -> Result<ScrollRange, ConfigError> {
        ScrollRange::parse(&self.scroll_start, &self.scroll_end)
    }

    pub fn chosen_color(&self, dark: bool) -> &str {
        if dark {
            &self.color_dark
        } else {
            &self.color_light
        }
    }

    /// Fields whose change requires re-attaching the scroll listener.
    pub fn binding_key(&self) -> BindingKey {
        BindingKey {
            source: self.source,
            range: self.scroll_range().unwrap_or_default(),
            full_width: self.full_width,
        }
    }

    /// Fields applied through the scheduler's latest-value cell.
    pub fn appearance(&self, dark: bool) -> Appearance {
        Appearance {
            color_light: self.color_light.clone(),
            color_dark: self.color_dark.clone(),
            dark,
            invert: self.invert,
            mask_by_progress: self.mask_by_progress,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.full_width > 0.0 && self.full_width <= 1.0) {
            return Err(ConfigError::FullWidthOutOfRange(self.full_width));
        }
        self.scroll_range()?;
        self.dust.validate()?;
        self.mist.validate()?;
        self.pulse.validate()
    }

    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let full_width = if self.full_width.is_finite() {
            self.full_width.clamp(f64::EPSILON, 1.0)
        } else {
            defaults.full_width
        };
        let (scroll_start, scroll_end) = match self.scroll_range() {
            Ok(_) => (self.scroll_start.clone(), self.scroll_end.clone()),
            Err(_) => (defaults.scroll_start, defaults.scroll_end),
        };
        Self {
            full_width,
            scroll_start,
            scroll_end,
            dust: self.dust.sanitized(),
            mist: self.mist.sanitized(),
            pulse: self.pulse.sanitized(),
            ..self.clone()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DustConfig {
    pub enabled: bool,
    pub count: usize,
    pub speed: f64,
    pub size_range: [f64; 2],
    pub opacity_range: [f64; 2],
    /// Overrides the beam color for particles.
    pub color: Option<String>,
    /// Fixed seed for reproducible particle layouts; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for DustConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            count: 30,
            speed: 1.0,
            size_range: [1.0, 3.0],
            opacity_range: [0.2, 0.6],
            color: None,
            seed: None,
        }
    }
}

fn check_range(name: &'static str, [min, max]: [f64; 2]) -> Result<(), ConfigError> {
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange { name, min, max })
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

fn sorted_range([a, b]: [f64; 2], lo: f64, hi: f64, fallback: [f64; 2]) -> [f64; 2] {
    if !(a.is_finite() && b.is_finite()) {
        return fallback;
    }
    let (min, max) = if a <= b { (a, b) } else { (b, a) };
    [min.clamp(lo, hi), max.clamp(lo, hi)]
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

fn non_negative_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        fallback
    }
}

impl DustConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("dust.speed", self.speed)?;
        check_range("dust.sizeRange", self.size_range)?;
        check_range("dust.opacityRange", self.opacity_range)?;
        check_non_negative("dust.sizeRange", self.size_range[0])?;
        check_non_negative("dust.opacityRange", self.opacity_range[0])
    }

    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        Self {
            speed: positive_or(self.speed, defaults.speed),
            size_range: sorted_range(self.size_range, 0.0, f64::MAX, defaults.size_range),
            opacity_range: sorted_range(self.opacity_range, 0.0, 1.0, defaults.opacity_range),
            ..self.clone()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MistConfig {
    pub enabled: bool,
    pub intensity: f64,
    pub speed: f64,
    pub layers: usize,
}

impl Default for MistConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            intensity: 0.3,
            speed: 1.0,
            layers: 2,
        }
    }
}

impl MistConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("mist.intensity", self.intensity)?;
        check_positive("mist.speed", self.speed)
    }

    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        Self {
            intensity: non_negative_or(self.intensity, defaults.intensity).min(1.0),
            speed: positive_or(self.speed, defaults.speed),
            ..self.clone()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PulseConfig {
    pub enabled: bool,
    /// Seconds for one half-cycle (rest to peak).
    pub duration: f64,
    pub intensity: f64,
    pub easing: Easing,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            duration: 2.0,
            intensity: 0.2,
            easing: Easing::SineInOut,
        }
    }
}

impl PulseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("pulse.duration", self.duration)?;
        check_non_negative("pulse.intensity", self.intensity)
    }

    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        Self {
            duration: positive_or(self.duration, defaults.duration),
            intensity: non_negative_or(self.intensity, defaults.intensity),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(BeamConfig::default().validate(), Ok(()));
    }

    #[test]
    fn sanitize_repairs_out_of_range_values() {
        let config = BeamConfig {
            full_width: f64::NAN,
            scroll_start: "nowhere".into(),
            dust: DustConfig {
                speed: 0.0,
                opacity_range: [0.9, -0.5],
                ..DustConfig::default()
            },
            pulse: PulseConfig {
                duration: -1.0,
                ..PulseConfig::default()
            },
            ..BeamConfig::default()
        };
        assert!(config.validate().is_err());
        let fixed = config.sanitized();
        assert_eq!(fixed.validate(), Ok(()));
        assert_eq!(fixed.full_width, 1.0);
        assert_eq!(fixed.scroll_start, "top bottom");
        assert_eq!(fixed.dust.speed, 1.0);
        assert_eq!(fixed.dust.opacity_range, [0.0, 0.9]);
        assert_eq!(fixed.pulse.duration, 2.0);
    }

    #[test]
    fn full_width_outside_unit_interval_is_rejected() {
        for bad in [0.0, -0.2, 1.5] {
            let config = BeamConfig {
                full_width: bad,
                ..BeamConfig::default()
            };
            assert_eq!(
                config.validate(),
                Err(ConfigError::FullWidthOutOfRange(bad))
            );
        }
    }
}
