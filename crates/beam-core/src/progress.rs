//! Scroll fraction to beam progress.

/// Lowest value the clamped scroll fraction may take for a given width ratio.
///
/// `full_width = 1` leaves the whole \[0, 1\] range reachable; smaller ratios
/// raise the floor and narrow the beam's width excursion.
#[inline]
pub fn progress_floor(full_width: f64) -> f64 {
    (1.0 - full_width).clamp(0.0, 1.0)
}

/// Clamp a canonically oriented scroll fraction into \[floor, 1\] and apply
/// the invert flag. The result is always in \[0, 1\].
pub fn normalize(raw: f64, full_width: f64, invert: bool) -> f64 {
    let floor = progress_floor(full_width);
    let clamped = if raw.is_nan() {
        floor
    } else {
        floor.max(raw.min(1.0))
    };
    if invert {
        clamped
    } else {
        1.0 - clamped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_follows_width_ratio() {
        assert_eq!(progress_floor(1.0), 0.0);
        assert_eq!(progress_floor(0.5), 0.5);
        assert_eq!(progress_floor(1.7), 0.0);
    }

    #[test]
    fn nan_input_settles_on_floor() {
        assert_eq!(normalize(f64::NAN, 0.5, true), 0.5);
        assert_eq!(normalize(f64::NAN, 1.0, false), 1.0);
    }
}
