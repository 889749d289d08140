// Host-side tests for the dust, mist and pulse modulators.

use beam_core::ambient::dust::{generate_particles, DustField};
use beam_core::ambient::easing::Easing;
use beam_core::ambient::mist::{mist_layers, MistField, MistLayer};
use beam_core::ambient::pulse::{pulsed_opacity, PulseModulator};
use beam_core::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn dust(count: usize) -> DustConfig {
    DustConfig {
        enabled: true,
        count,
        seed: Some(7),
        ..DustConfig::default()
    }
}

#[test]
fn dust_generates_exact_count_within_ranges() {
    let config = DustConfig {
        size_range: [2.0, 4.0],
        opacity_range: [0.1, 0.3],
        ..dust(5)
    };
    let mut rng = StdRng::seed_from_u64(1);
    let particles = generate_particles(&config, &mut rng);
    assert_eq!(particles.len(), 5);
    for p in &particles {
        assert!((2.0..=4.0).contains(&p.size_px));
        assert!((0.1..=0.3).contains(&p.opacity));
        assert!((0.0..=100.0).contains(&p.x_pct));
        assert!((0.0..=100.0).contains(&p.y_pct));
        assert!((3.0..=7.0).contains(&p.duration_sec));
        assert!(p.delay_sec >= 0.0 && p.delay_sec <= p.duration_sec);
        assert!((20.0..=50.0).contains(&p.rise_px));
        assert!((-10.0..=10.0).contains(&p.drift_px));
    }
    let ids: Vec<&str> = particles.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["dust-0", "dust-1", "dust-2", "dust-3", "dust-4"]);
}

#[test]
fn dust_speed_shortens_durations() {
    let mut rng = StdRng::seed_from_u64(3);
    let fast = DustConfig {
        speed: 2.0,
        ..dust(20)
    };
    for p in generate_particles(&fast, &mut rng) {
        assert!((1.5..=3.5).contains(&p.duration_sec));
    }
}

#[test]
fn disabled_dust_yields_nothing_and_stops_loops() {
    let mut rng = StdRng::seed_from_u64(1);
    let off = DustConfig {
        enabled: false,
        ..dust(5)
    };
    assert!(generate_particles(&off, &mut rng).is_empty());

    let mut field = DustField::default();
    assert_eq!(field.sync(&dust(5)), EffectChange::Restarted);
    assert_eq!(field.particles().len(), 5);
    assert_eq!(field.sync(&off), EffectChange::Stopped);
    assert!(field.particles().is_empty());
    assert!(!field.is_active());
    assert_eq!(field.sync(&off), EffectChange::Unchanged);
}

#[test]
fn dust_regenerates_only_when_generating_parameters_change() {
    let mut field = DustField::default();
    field.sync(&dust(5));
    let before = field.particles().to_vec();

    let recolored = DustConfig {
        color: Some("gold".into()),
        ..dust(5)
    };
    assert_eq!(field.sync(&recolored), EffectChange::Unchanged);
    assert_eq!(field.particles(), before.as_slice());

    assert_eq!(field.sync(&dust(8)), EffectChange::Restarted);
    assert_eq!(field.particles().len(), 8);
}

#[test]
fn seeded_dust_is_reproducible() {
    let mut a = DustField::default();
    let mut b = DustField::default();
    a.sync(&dust(12));
    b.sync(&dust(12));
    assert_eq!(a.particles(), b.particles());
}

#[test]
fn particles_float_up_and_fade_then_return() {
    let mut field = DustField::default();
    field.sync(&dust(3));
    for p in field.particles() {
        let rest = p.frame_at(0.0);
        assert_eq!(rest.dy_px, 0.0);
        assert_eq!(rest.opacity, p.opacity);

        let peak = p.frame_at(p.delay_sec + p.duration_sec);
        assert!((peak.dy_px + p.rise_px).abs() < 1e-9);
        assert!((peak.dx_px - p.drift_px).abs() < 1e-9);
        assert!((peak.opacity - p.opacity * 0.5).abs() < 1e-9);

        let back = p.frame_at(p.delay_sec + 2.0 * p.duration_sec - 1e-9);
        assert!(back.dy_px.abs() < 1e-6);
    }
}

#[test]
fn mist_layers_deepen_with_index() {
    let config = MistConfig {
        enabled: true,
        intensity: 0.5,
        speed: 1.0,
        layers: 3,
    };
    let layers = mist_layers(&config);
    assert_eq!(layers.len(), 3);
    assert!((layers[0].opacity - 0.3).abs() < 1e-12);
    assert!((layers[1].opacity - 0.15).abs() < 1e-12);
    for w in layers.windows(2) {
        assert!(w[1].opacity < w[0].opacity);
        assert!(w[1].duration_sec > w[0].duration_sec);
        assert!(w[1].delay_sec > w[0].delay_sec);
        assert!(w[1].scale > w[0].scale);
    }
    assert_eq!(layers[2].id, "mist-layer-2");
    assert!(mist_layers(&MistConfig::default()).is_empty());
}

#[test]
fn mist_drifts_across_then_fades_out_and_loops() {
    let layer = MistLayer::new(1, 0.5, 1.0);
    // delay 1.5s, drift 11s, fade 2.2s
    let hidden = layer.frame_at(1.0);
    assert_eq!(hidden.opacity, 0.0);
    assert_eq!(hidden.x_pct, -100.0);

    let mid = layer.frame_at(1.5 + 5.5);
    assert!(mid.x_pct.abs() < 1e-9);
    assert!((mid.opacity - layer.opacity / 2.0).abs() < 1e-9);

    let fading = layer.frame_at(1.5 + 11.0 + 1.1);
    assert_eq!(fading.x_pct, 100.0);
    assert!(fading.opacity < layer.opacity && fading.opacity > 0.0);

    let next_loop = layer.frame_at(layer.cycle_sec() + 1.0);
    assert_eq!(next_loop, hidden);
}

#[test]
fn mist_field_tracks_config_changes() {
    let mut field = MistField::default();
    let on = MistConfig {
        enabled: true,
        ..MistConfig::default()
    };
    assert_eq!(field.sync(&on), EffectChange::Restarted);
    assert_eq!(field.sync(&on), EffectChange::Unchanged);
    assert_eq!(field.intensity(), Some(0.3));
    let more = MistConfig { layers: 4, ..on };
    assert_eq!(field.sync(&more), EffectChange::Restarted);
    assert_eq!(field.layers().len(), 4);
    assert_eq!(field.sync(&MistConfig::default()), EffectChange::Stopped);
    assert!(field.layers().is_empty());
}

#[test]
fn mist_color_takes_intensity_as_alpha() {
    assert_eq!(
        with_alpha("rgba(255, 255, 255, 0.5)", 0.3),
        "rgba(255, 255, 255, 0.3)"
    );
}

#[test]
fn pulse_multiplier_oscillates_between_one_and_peak() {
    let config = PulseConfig {
        enabled: true,
        duration: 2.0,
        intensity: 0.4,
        easing: Easing::Linear,
    };
    let pulse = PulseModulator::new(&config).unwrap();
    assert!((pulse.peak() - 1.4).abs() < 1e-12);
    assert_eq!(pulse.multiplier_at(0.0), 1.0);
    assert!((pulse.multiplier_at(1.0) - 1.2).abs() < 1e-12);
    assert!((pulse.multiplier_at(2.0) - 1.4).abs() < 1e-9);
    assert!((pulse.multiplier_at(3.0) - 1.2).abs() < 1e-9);
    for i in 0..200 {
        let m = pulse.multiplier_at(i as f64 * 0.037);
        assert!((1.0..=1.4 + 1e-12).contains(&m));
    }
}

#[test]
fn pulse_peak_is_capped_at_two() {
    let config = PulseConfig {
        enabled: true,
        intensity: 3.0,
        ..PulseConfig::default()
    };
    assert_eq!(PulseModulator::new(&config).unwrap().peak(), 2.0);
    assert!(PulseModulator::new(&PulseConfig::default()).is_none());
}

#[test]
fn pulse_reads_the_freshest_base_opacity() {
    let config = BeamConfig {
        pulse: PulseConfig {
            enabled: true,
            duration: 1.0,
            intensity: 0.1,
            easing: Easing::Linear,
        },
        ..BeamConfig::default()
    };

    struct Host(f64);
    impl BeamHost for Host {
        type Listener = ();
        fn environment_ready(&self) -> bool {
            true
        }
        fn attach(&mut self, _: &BindingKey) -> Option<()> {
            Some(())
        }
        fn detach(&mut self, _: ()) {}
        fn refresh_geometry(&mut self, _: &BindingKey) {}
        fn measure(&mut self, _: &BindingKey) -> Option<ScrollSample> {
            Some(ScrollSample::Fraction(self.0))
        }
        fn request_frame(&mut self) -> bool {
            true
        }
        fn cancel_frame(&mut self) {}
        fn schedule_settle(&mut self, _: std::time::Duration) -> bool {
            true
        }
        fn cancel_settle(&mut self) {}
        fn apply(&mut self, _: &BeamStyle) -> bool {
            true
        }
    }

    let mut host = Host(1.0);
    let mut scheduler = UpdateScheduler::new();
    scheduler.bind(&mut host, &config, false);
    let mut effects = AmbientEffects::new(scheduler.base_opacity(), scheduler.pulse_multiplier());
    let change = effects.sync(&config, 10.0);
    assert_eq!(change.pulse, EffectChange::Restarted);
    assert!(change.any());

    // Fully scrolled: base opacity is at its minimum.
    let frame = effects.tick(10.5).pulse.unwrap();
    assert!((frame.multiplier - 1.05).abs() < 1e-9);
    assert!((frame.opacity - OPACITY_MIN * 1.05).abs() < 1e-9);

    // A scroll write between ticks is picked up without resyncing.
    host.0 = 0.0;
    scheduler.on_scroll(&mut host);
    scheduler.on_frame(&mut host);
    let frame = effects.tick(10.5).pulse.unwrap();
    assert_eq!(frame.opacity, pulsed_opacity(1.0, 1.05));
    assert_eq!(frame.opacity, 1.0);
}

#[test]
fn stopping_all_effects_cancels_every_loop() {
    let config = BeamConfig {
        dust: dust(4),
        mist: MistConfig {
            enabled: true,
            ..MistConfig::default()
        },
        pulse: PulseConfig {
            enabled: true,
            ..PulseConfig::default()
        },
        ..BeamConfig::default()
    };
    let mut effects = AmbientEffects::new(BaseOpacity::default(), PulseMultiplier::default());
    effects.sync(&config, 0.0);
    assert!(effects.is_running());
    let frame = effects.tick(1.0);
    assert_eq!(frame.dust.len(), 4);
    assert_eq!(frame.mist.len(), 2);
    assert!(frame.pulse.is_some());

    let change = effects.stop_all();
    assert_eq!(change.dust, EffectChange::Stopped);
    assert_eq!(change.mist, EffectChange::Stopped);
    assert_eq!(change.pulse, EffectChange::Stopped);
    assert!(!effects.is_running());
    assert_eq!(effects.tick(2.0), AmbientFrame::default());
}
