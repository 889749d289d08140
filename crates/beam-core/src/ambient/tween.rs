use super::easing::Easing;

/// Infinitely repeating tween sampled by elapsed time.
///
/// The start delay is applied once; after it the tween loops forever, either
/// restarting from the beginning or, with `yoyo`, playing every other cycle
/// backwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopTween {
    pub duration: f64,
    pub delay: f64,
    pub yoyo: bool,
    pub easing: Easing,
}

impl LoopTween {
    /// Eased position in \[0, 1\] at `elapsed` seconds after the loop was started.
    pub fn sample(&self, elapsed: f64) -> f64 {
        let t = elapsed - self.delay;
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if self.duration <= 0.0 {
            return 1.0;
        }
        let cycles = t / self.duration;
        let cycle = cycles.floor();
        let frac = cycles - cycle;
        let reversed = self.yoyo && (cycle as u64) % 2 == 1;
        let local = if reversed { 1.0 - frac } else { frac };
        self.easing.apply(local)
    }
}

#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}
