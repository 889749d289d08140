use super::easing::Easing;
use super::tween::lerp;
use super::EffectChange;
use crate::config::MistConfig;
use crate::constants::{
    MIST_BASE_DURATION_SEC, MIST_DELAY_STEP_SEC, MIST_DURATION_STEP_SEC, MIST_FADE_OUT_FRACTION,
    MIST_OPACITY_FACTOR, MIST_SCALE_STEP, MIST_TRAVEL_PCT,
};
use smallvec::SmallVec;

pub type MistLayers = SmallVec<[MistLayer; 4]>;

#[derive(Clone, Debug, PartialEq)]
pub struct MistLayer {
    pub id: String,
    pub opacity: f64,
    pub duration_sec: f64,
    pub delay_sec: f64,
    pub scale: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MistFrame {
    /// Horizontal translation as a percentage of the layer width.
    pub x_pct: f64,
    pub opacity: f64,
}

impl MistLayer {
    /// Deeper layers (higher index) are fainter, slower, later and larger.
    pub fn new(index: usize, intensity: f64, speed: f64) -> Self {
        let depth = index as f64;
        Self {
            id: format!("mist-layer-{index}"),
            opacity: intensity * MIST_OPACITY_FACTOR / (depth + 1.0),
            duration_sec: (MIST_BASE_DURATION_SEC + depth * MIST_DURATION_STEP_SEC) / speed,
            delay_sec: depth * MIST_DELAY_STEP_SEC / speed,
            scale: 1.0 + depth * MIST_SCALE_STEP,
        }
    }

    fn fade_out_sec(&self) -> f64 {
        self.duration_sec * MIST_FADE_OUT_FRACTION
    }

    /// Length of one loop: wait, drift across while fading in, fade out.
    pub fn cycle_sec(&self) -> f64 {
        self.delay_sec + self.duration_sec + self.fade_out_sec()
    }

    pub fn frame_at(&self, elapsed: f64) -> MistFrame {
        let hidden = MistFrame {
            x_pct: -MIST_TRAVEL_PCT,
            opacity: 0.0,
        };
        if !(self.duration_sec > 0.0 && elapsed.is_finite() && elapsed >= 0.0) {
            return hidden;
        }
        let t = elapsed % self.cycle_sec() - self.delay_sec;
        if t < 0.0 {
            return hidden;
        }
        if t < self.duration_sec {
            let f = t / self.duration_sec;
            return MistFrame {
                x_pct: lerp(-MIST_TRAVEL_PCT, MIST_TRAVEL_PCT, f),
                opacity: self.opacity * f,
            };
        }
        let f = (t - self.duration_sec) / self.fade_out_sec();
        MistFrame {
            x_pct: MIST_TRAVEL_PCT,
            opacity: self.opacity * (1.0 - Easing::Power1In.apply(f)),
        }
    }
}

/// One layer per index; empty when mist is disabled.
pub fn mist_layers(config: &MistConfig) -> MistLayers {
    if !config.enabled {
        return MistLayers::new();
    }
    (0..config.layers)
        .map(|i| MistLayer::new(i, config.intensity, config.speed))
        .collect()
}

#[derive(Debug, Default)]
pub struct MistField {
    config: Option<MistConfig>,
    layers: MistLayers,
}

impl MistField {
    pub fn layers(&self) -> &[MistLayer] {
        &self.layers
    }

    pub fn is_active(&self) -> bool {
        self.config.is_some()
    }

    pub fn intensity(&self) -> Option<f64> {
        self.config.as_ref().map(|c| c.intensity)
    }

    pub fn sync(&mut self, config: &MistConfig) -> EffectChange {
        if !config.enabled {
            if self.config.take().is_some() {
                self.layers.clear();
                log::debug!("[mist] stopped");
                return EffectChange::Stopped;
            }
            return EffectChange::Unchanged;
        }
        if self.config.as_ref() == Some(config) {
            return EffectChange::Unchanged;
        }
        self.layers = mist_layers(config);
        self.config = Some(config.clone());
        log::debug!("[mist] {} layers", self.layers.len());
        EffectChange::Restarted
    }
}
