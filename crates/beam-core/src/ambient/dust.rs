use super::easing::Easing;
use super::tween::{lerp, LoopTween};
use super::EffectChange;
use crate::config::DustConfig;
use crate::constants::{
    DUST_BASE_DURATION_SEC, DUST_DRIFT_MAX_PX, DUST_DURATION_SPREAD_SEC, DUST_FADE_FACTOR,
    DUST_RISE_MIN_PX, DUST_RISE_SPREAD_PX,
};
use rand::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub id: String,
    pub x_pct: f64,
    pub y_pct: f64,
    pub size_px: f64,
    pub opacity: f64,
    pub duration_sec: f64,
    pub delay_sec: f64,
    /// Upward travel at the top of the float.
    pub rise_px: f64,
    /// Signed horizontal travel at the top of the float.
    pub drift_px: f64,
}

/// Offset and opacity of one particle relative to its resting position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleFrame {
    pub dx_px: f64,
    pub dy_px: f64,
    pub opacity: f64,
}

impl Particle {
    fn tween(&self) -> LoopTween {
        LoopTween {
            duration: self.duration_sec,
            delay: self.delay_sec,
            yoyo: true,
            easing: Easing::SineInOut,
        }
    }

    pub fn frame_at(&self, elapsed: f64) -> ParticleFrame {
        let p = self.tween().sample(elapsed);
        ParticleFrame {
            dx_px: self.drift_px * p,
            dy_px: -self.rise_px * p,
            opacity: lerp(self.opacity, self.opacity * DUST_FADE_FACTOR, p),
        }
    }
}

#[inline]
fn uniform<R: Rng>(rng: &mut R, [min, max]: [f64; 2]) -> f64 {
    min + rng.gen::<f64>() * (max - min)
}

/// Draw `config.count` particles; an empty set when dust is disabled.
pub fn generate_particles<R: Rng>(config: &DustConfig, rng: &mut R) -> Vec<Particle> {
    if !config.enabled {
        return Vec::new();
    }
    (0..config.count)
        .map(|i| {
            let x_pct = rng.gen::<f64>() * 100.0;
            let y_pct = rng.gen::<f64>() * 100.0;
            let size_px = uniform(rng, config.size_range);
            let opacity = uniform(rng, config.opacity_range);
            let duration_sec =
                (DUST_BASE_DURATION_SEC + rng.gen::<f64>() * DUST_DURATION_SPREAD_SEC) / config.speed;
            let delay_sec = rng.gen::<f64>() * duration_sec;
            let rise_px = DUST_RISE_MIN_PX + rng.gen::<f64>() * DUST_RISE_SPREAD_PX;
            let drift_px = rng.gen::<f64>() * 2.0 * DUST_DRIFT_MAX_PX - DUST_DRIFT_MAX_PX;
            Particle {
                id: format!("dust-{i}"),
                x_pct,
                y_pct,
                size_px,
                opacity,
                duration_sec,
                delay_sec,
                rise_px,
                drift_px,
            }
        })
        .collect()
}

/// Parameters whose change regenerates the whole particle set.
#[derive(Clone, Debug, PartialEq)]
struct DustKey {
    count: usize,
    speed: f64,
    size_range: [f64; 2],
    opacity_range: [f64; 2],
    seed: Option<u64>,
}

impl From<&DustConfig> for DustKey {
    fn from(c: &DustConfig) -> Self {
        Self {
            count: c.count,
            speed: c.speed,
            size_range: c.size_range,
            opacity_range: c.opacity_range,
            seed: c.seed,
        }
    }
}

#[derive(Debug, Default)]
pub struct DustField {
    key: Option<DustKey>,
    particles: Vec<Particle>,
}

impl DustField {
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_active(&self) -> bool {
        self.key.is_some()
    }

    /// Regenerate the particle set when its generating parameters changed.
    pub fn sync(&mut self, config: &DustConfig) -> EffectChange {
        if !config.enabled {
            if self.key.take().is_some() {
                self.particles.clear();
                log::debug!("[dust] stopped");
                return EffectChange::Stopped;
            }
            return EffectChange::Unchanged;
        }
        let key = DustKey::from(config);
        if self.key.as_ref() == Some(&key) {
            return EffectChange::Unchanged;
        }
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.particles = generate_particles(config, &mut rng);
        self.key = Some(key);
        log::debug!("[dust] generated {} particles", self.particles.len());
        EffectChange::Restarted
    }
}
