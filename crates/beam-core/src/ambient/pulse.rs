use super::tween::{lerp, LoopTween};
use super::EffectChange;
use crate::config::PulseConfig;
use crate::constants::PULSE_MAX_MULTIPLIER;
use crate::scheduler::BaseOpacity;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PulseFrame {
    pub multiplier: f64,
    /// Opacity to display: the freshest base opacity scaled by `multiplier`.
    pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PulseModulator {
    tween: LoopTween,
    peak: f64,
}

impl PulseModulator {
    pub fn new(config: &PulseConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        Some(Self {
            tween: LoopTween {
                duration: config.duration,
                delay: 0.0,
                yoyo: true,
                easing: config.easing,
            },
            peak: (1.0 + config.intensity).min(PULSE_MAX_MULTIPLIER),
        })
    }

    pub fn peak(&self) -> f64 {
        self.peak
    }

    pub fn multiplier_at(&self, elapsed: f64) -> f64 {
        lerp(1.0, self.peak, self.tween.sample(elapsed))
    }

    /// Reads `base` on every call so a scroll write in the same frame is never lost.
    pub fn frame_at(&self, elapsed: f64, base: &BaseOpacity) -> PulseFrame {
        let multiplier = self.multiplier_at(elapsed);
        PulseFrame {
            multiplier,
            opacity: pulsed_opacity(base.get(), multiplier),
        }
    }
}

#[inline]
pub fn pulsed_opacity(base: f64, multiplier: f64) -> f64 {
    (base * multiplier).clamp(0.0, 1.0)
}

#[derive(Debug, Default)]
pub struct PulseField {
    config: Option<PulseConfig>,
    modulator: Option<PulseModulator>,
}

impl PulseField {
    pub fn modulator(&self) -> Option<&PulseModulator> {
        self.modulator.as_ref()
    }

    pub fn sync(&mut self, config: &PulseConfig) -> EffectChange {
        if !config.enabled {
            self.config = None;
            return match self.modulator.take() {
                Some(_) => EffectChange::Stopped,
                None => EffectChange::Unchanged,
            };
        }
        if self.config.as_ref() == Some(config) {
            return EffectChange::Unchanged;
        }
        self.modulator = PulseModulator::new(config);
        self.config = Some(config.clone());
        EffectChange::Restarted
    }
}
