//! Optional decorative loops layered over the beam: dust, mist and pulse.
//!
//! Each effect is gated by its own `enabled` flag and owns its loop clock.
//! `AmbientEffects::sync` reports per-effect transitions so a host can create
//! or tear down the matching elements; `tick` samples every running loop.

pub mod dust;
pub mod easing;
pub mod mist;
pub mod pulse;
pub mod tween;

use crate::config::{BeamConfig, DustConfig, MistConfig, PulseConfig};
use crate::scheduler::{BaseOpacity, PulseMultiplier};
use dust::{DustField, ParticleFrame};
use mist::{MistField, MistFrame};
use pulse::{PulseField, PulseFrame};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectChange {
    Unchanged,
    /// New elements were generated; previous loops are discarded.
    Restarted,
    /// The effect was disabled; every loop is cancelled.
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AmbientChange {
    pub dust: EffectChange,
    pub mist: EffectChange,
    pub pulse: EffectChange,
}

impl AmbientChange {
    pub fn any(&self) -> bool {
        [self.dust, self.mist, self.pulse]
            .iter()
            .any(|c| *c != EffectChange::Unchanged)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AmbientFrame {
    pub dust: Vec<ParticleFrame>,
    pub mist: SmallVec<[MistFrame; 4]>,
    pub pulse: Option<PulseFrame>,
}

pub struct AmbientEffects {
    dust: DustField,
    mist: MistField,
    pulse: PulseField,
    dust_started: f64,
    mist_started: f64,
    pulse_started: f64,
    base_opacity: BaseOpacity,
    pulse_multiplier: PulseMultiplier,
}

impl AmbientEffects {
    /// `base_opacity` and `pulse_multiplier` are the cells shared with the
    /// update scheduler, so scroll writes and pulse ticks agree on opacity.
    pub fn new(base_opacity: BaseOpacity, pulse_multiplier: PulseMultiplier) -> Self {
        Self {
            dust: DustField::default(),
            mist: MistField::default(),
            pulse: PulseField::default(),
            dust_started: 0.0,
            mist_started: 0.0,
            pulse_started: 0.0,
            base_opacity,
            pulse_multiplier,
        }
    }

    pub fn dust(&self) -> &DustField {
        &self.dust
    }

    pub fn mist(&self) -> &MistField {
        &self.mist
    }

    pub fn pulse(&self) -> &PulseField {
        &self.pulse
    }

    /// Bring every effect in line with `config`; restarted loops start at `now_sec`.
    pub fn sync(&mut self, config: &BeamConfig, now_sec: f64) -> AmbientChange {
        self.sync_parts(&config.dust, &config.mist, &config.pulse, now_sec)
    }

    fn sync_parts(
        &mut self,
        dust: &DustConfig,
        mist: &MistConfig,
        pulse: &PulseConfig,
        now_sec: f64,
    ) -> AmbientChange {
        let change = AmbientChange {
            dust: self.dust.sync(dust),
            mist: self.mist.sync(mist),
            pulse: self.pulse.sync(pulse),
        };
        if change.dust == EffectChange::Restarted {
            self.dust_started = now_sec;
        }
        if change.mist == EffectChange::Restarted {
            self.mist_started = now_sec;
        }
        match change.pulse {
            EffectChange::Restarted => self.pulse_started = now_sec,
            EffectChange::Stopped => self.pulse_multiplier.set(1.0),
            EffectChange::Unchanged => {}
        }
        change
    }

    /// Cancel every running loop.
    pub fn stop_all(&mut self) -> AmbientChange {
        let off = BeamConfig::default();
        self.sync_parts(&off.dust, &off.mist, &off.pulse, 0.0)
    }

    pub fn is_running(&self) -> bool {
        self.dust.is_active() || self.mist.is_active() || self.pulse.modulator().is_some()
    }

    /// Sample every running loop. The pulse multiplier is published to the
    /// shared cell for the next scroll write.
    pub fn tick(&self, now_sec: f64) -> AmbientFrame {
        let dust_t = now_sec - self.dust_started;
        let mist_t = now_sec - self.mist_started;
        let pulse = self
            .pulse
            .modulator()
            .map(|m| m.frame_at(now_sec - self.pulse_started, &self.base_opacity));
        if let Some(frame) = &pulse {
            self.pulse_multiplier.set(frame.multiplier);
        }
        AmbientFrame {
            dust: self
                .dust
                .particles()
                .iter()
                .map(|p| p.frame_at(dust_t))
                .collect(),
            mist: self
                .mist
                .layers()
                .iter()
                .map(|l| l.frame_at(mist_t))
                .collect(),
            pulse,
        }
    }
}
