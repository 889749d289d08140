// Host-side tests for progress normalization and the visual mapper.

use beam_core::*;

fn steps(n: usize) -> impl Iterator<Item = f64> {
    (0..=n).map(move |i| i as f64 / n as f64)
}

#[test]
fn mapped_values_stay_within_documented_ranges() {
    for p in steps(1000) {
        for mask in [false, true] {
            let v = map_to_visual(p, mask);
            assert!((0.0..=90.0).contains(&v.left_anchor_pct), "left at {p}");
            assert!((10.0..=100.0).contains(&v.right_anchor_pct), "right at {p}");
            assert!((100.0..=150.0).contains(&v.left_size_pct), "size at {p}");
            assert!((OPACITY_MIN..=1.0).contains(&v.base_opacity), "opacity at {p}");
            if let Some(stop) = v.mask_stop_pct {
                assert!((50.0..=95.0).contains(&stop));
            }
        }
    }
}

#[test]
fn boundaries_match_reference_values() {
    let start = map_to_visual(0.0, false);
    assert_eq!(start.left_anchor_pct, 90.0);
    assert_eq!(start.right_anchor_pct, 10.0);
    assert_eq!(start.left_size_pct, 150.0);
    assert!((start.base_opacity - 0.839322).abs() < 1e-12);
    assert_eq!(start.mask_stop_pct, None);

    let end = map_to_visual(1.0, true);
    assert_eq!(end.left_anchor_pct, 0.0);
    assert_eq!(end.right_anchor_pct, 100.0);
    assert_eq!(end.left_size_pct, 100.0);
    assert!((end.base_opacity - 1.0).abs() < 1e-12);
    assert_eq!(end.mask_stop_pct, Some(95.0));
}

#[test]
fn out_of_range_progress_is_clamped_before_mapping() {
    assert_eq!(map_to_visual(-3.0, false), map_to_visual(0.0, false));
    assert_eq!(map_to_visual(7.5, true), map_to_visual(1.0, true));
}

#[test]
fn opacity_is_non_decreasing_in_progress() {
    let mut prev = map_to_visual(0.0, false).base_opacity;
    for p in steps(200).skip(1) {
        let o = map_to_visual(p, false).base_opacity;
        assert!(o >= prev, "opacity decreased at {p}");
        prev = o;
    }
}

#[test]
fn normalize_output_is_always_in_unit_interval() {
    for raw in [-10.0, -0.1, 0.0, 0.3, 0.5, 0.99, 1.0, 1.2, 42.0] {
        for fw in [1.0, 0.75, 0.5, 0.2] {
            for invert in [false, true] {
                let p = normalize(raw, fw, invert);
                assert!((0.0..=1.0).contains(&p), "raw={raw} fw={fw} invert={invert}");
            }
        }
    }
}

#[test]
fn normalize_is_stable_under_re_clamping() {
    for raw in [-2.0, 0.0, 0.1, 0.4, 0.6, 0.9, 1.0, 3.0] {
        for fw in [1.0, 0.5, 0.3] {
            // With invert, the output is the clamped value itself and re-normalizing is a no-op.
            let once = normalize(raw, fw, true);
            let twice = normalize(once, fw, true);
            assert!((once - twice).abs() < 1e-12, "raw={raw} fw={fw}");
            // Without invert, the clamp step sees an already clamped value.
            let out = normalize(raw, fw, false);
            assert_eq!(out, out.clamp(0.0, 1.0));
        }
    }
}

#[test]
fn full_width_ratio_sets_the_floor() {
    assert_eq!(progress_floor(1.0), 0.0);
    assert_eq!(progress_floor(0.5), 0.5);
    for raw in [-1.0, 0.0, 0.25, 0.5] {
        // Inverted output exposes the clamped value directly.
        assert_eq!(normalize(raw, 0.5, true), 0.5);
        assert_eq!(normalize(raw, 0.5, false), 0.5);
    }
    assert_eq!(normalize(0.0, 1.0, true), 0.0);
    assert!((normalize(0.8, 0.5, true) - 0.8).abs() < 1e-12);
}

#[test]
fn scroll_sequence_maps_to_expected_opacities() {
    let raws = [0.0, 0.25, 0.5, 0.75, 1.0];
    let expected_progress = [1.0, 0.75, 0.5, 0.25, 0.0];
    let expected_opacity = [1.0, 0.9598, 0.9197, 0.8795, 0.8393];
    for ((raw, want_p), want_o) in raws.iter().zip(expected_progress).zip(expected_opacity) {
        let p = normalize(*raw, 1.0, false);
        assert!((p - want_p).abs() < 1e-12);
        let o = map_to_visual(p, false).base_opacity;
        let rounded = (o * 10_000.0).round() / 10_000.0;
        assert!((rounded - want_o).abs() < 1e-9, "raw={raw}: {rounded} != {want_o}");
    }
}

#[test]
fn invert_reverses_the_observed_opacity_trend() {
    let forward: Vec<f64> = steps(10)
        .map(|raw| map_to_visual(normalize(raw, 1.0, true), false).base_opacity)
        .collect();
    let reversed: Vec<f64> = steps(10)
        .map(|raw| map_to_visual(normalize(raw, 1.0, false), false).base_opacity)
        .collect();
    assert!(forward.windows(2).all(|w| w[1] >= w[0]));
    assert!(reversed.windows(2).all(|w| w[1] <= w[0]));
}

#[test]
fn viewport_and_fraction_samples_share_one_orientation() {
    let range = ScrollRange::default();
    // Element top at the viewport bottom: about to enter.
    let entering = ScrollSample::Viewport {
        top: 800.0,
        viewport_height: 800.0,
    };
    assert_eq!(entering.oriented_fraction(&range), Some(0.0));
    // Element top at the viewport top: fully progressed.
    let through = ScrollSample::Viewport {
        top: 0.0,
        viewport_height: 800.0,
    };
    assert_eq!(through.oriented_fraction(&range), Some(1.0));
    assert_eq!(
        ScrollSample::from_reversed_fraction(0.25).oriented_fraction(&range),
        ScrollSample::Fraction(0.75).oriented_fraction(&range)
    );
}

#[test]
fn custom_anchors_rescale_the_trigger_region() {
    let range = ScrollRange::parse("top 80%", "bottom top").unwrap();
    let geometry = |top: f64| TriggerGeometry {
        top,
        height: 200.0,
        viewport_height: 1000.0,
    };
    // Start when the top reaches 800px, end when the bottom reaches 0 (top at -200px).
    assert!((range.fraction(&geometry(800.0)) - 0.0).abs() < 1e-12);
    assert!((range.fraction(&geometry(300.0)) - 0.5).abs() < 1e-12);
    assert!((range.fraction(&geometry(-200.0)) - 1.0).abs() < 1e-12);
}
