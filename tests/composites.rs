use termfuse::anim::composite::{self, CompositeAnimation};
use termfuse::anim::mapper::{map, MappingMode};
use termfuse::anim::registry::{Registry, RegistryOptions};
use termfuse::frame::Frame;
use termfuse::viz::{lissajous, spiral, GeneratorKind};
use termfuse::Error;

const DT: f64 = 1.0 / 30.0;

fn registry() -> Registry {
    Registry::standard(&RegistryOptions {
        seed: Some(17),
        ..RegistryOptions::default()
    })
    .unwrap()
}

#[test]
fn mapper_pins_endpoints_for_every_mode() {
    for mode in MappingMode::ALL {
        assert_eq!(map(-1.0, 2.0, 6.0, mode), 2.0, "{mode}");
        assert_eq!(map(1.0, 2.0, 6.0, mode), 6.0, "{mode}");
        assert_eq!(map(-7.0, 2.0, 6.0, mode), 2.0, "{mode}");
        assert_eq!(map(7.0, 2.0, 6.0, mode), 6.0, "{mode}");
        assert!((map(0.0, 2.0, 6.0, mode) - 4.0).abs() < 1e-12, "{mode}");
    }
    assert!((map(0.5, 0.0, 10.0, MappingMode::Linear) - 7.5).abs() < 1e-12);
}

#[test]
fn mapper_is_monotonic() {
    for mode in MappingMode::ALL {
        let mut last = f64::NEG_INFINITY;
        for i in 0..=200 {
            let v = -1.0 + i as f64 * 0.01;
            let out = map(v, -3.0, 5.0, mode);
            assert!(out >= last, "{mode} at {v}");
            last = out;
        }
    }
}

#[test]
fn plasma_lissajous_tracks_source_monotonically() {
    let mut registry = registry();
    let entry = registry.find("plasma-lissajous").unwrap();
    let mut frame = Frame::new(40, 16);

    let mut samples: Vec<(f64, f64, f64)> = (0..400)
        .map(|i| {
            let t = i as f64 * 0.05;
            let value = registry.draw(entry, &mut frame, t).unwrap();
            let params = registry.params(entry);
            (value, params.value(lissajous::FREQ_A), params.value(lissajous::FREQ_B))
        })
        .collect();
    samples.sort_by(|a, b| a.0.total_cmp(&b.0));

    for pair in samples.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        assert!(hi.1 >= lo.1, "freq_a fell while modulation rose");
        assert!(hi.2 <= lo.2, "freq_b rose while modulation rose");
    }
    // The source actually moved the target
    let spread = samples[samples.len() - 1].1 - samples[0].1;
    assert!(spread > 0.5);
}

#[test]
fn zero_strength_parks_target_at_midpoint() {
    let mut registry = registry();
    let entry = registry.find("plasma-lissajous").unwrap();
    registry.composite_mut(entry).unwrap().set_strength(0.0);

    let mut frame = Frame::new(40, 16);
    for i in 0..20 {
        let value = registry.draw(entry, &mut frame, i as f64 * 0.3).unwrap();
        assert_eq!(value, 0.0);
        assert!((registry.params(entry).value(lissajous::FREQ_A) - 4.0).abs() < 1e-12);
    }
}

#[test]
fn fluid_spiral_injects_before_target_update() {
    let mut registry = registry();
    let entry = registry.find("fluid-spiral").unwrap();
    registry.resize_all(40, 20);

    let mut t = 0.0;
    let mut saw_motion = false;
    for _ in 0..120 {
        t += DT;
        let value = registry.update(entry, DT, t).unwrap();
        assert!((-1.0..=1.0).contains(&value));
        let expected = map(value, 0.5, 3.0, MappingMode::Linear);
        let actual = registry.params(entry).value(spiral::ROTATION_SPEED);
        assert!((actual - expected).abs() < 1e-12);
        saw_motion |= value > 0.0;
    }
    // The fluid source keeps raining while the fusion is active
    assert!(saw_motion);
}

#[test]
fn target_stays_inside_range_at_max_strength() {
    let mut registry = registry();
    let entry = registry.find("lissajous-plasma").unwrap();
    registry.composite_mut(entry).unwrap().set_strength(2.0);

    let mut frame = Frame::new(30, 10);
    for i in 0..500 {
        let t = i as f64 * 0.07;
        registry.update(entry, DT, t);
        registry.draw(entry, &mut frame, t);
        for p in registry.params(entry).iter() {
            assert!((p.min()..=p.max()).contains(&p.value()), "{} = {}", p.name, p.value());
        }
    }
}

#[test]
fn rejects_self_modulation() {
    let mut registry = registry();
    let lissajous = registry.controlled(registry.find(GeneratorKind::Lissajous.id()).unwrap());
    let bad = composite::plasma_lissajous(lissajous, lissajous);
    assert!(matches!(registry.add_composite(bad), Err(Error::Composite(_))));
}

#[test]
fn accepts_custom_fusions() {
    let mut registry = registry();
    let before = registry.len();
    let tunnel = registry.find_generator("tunnel").unwrap();
    let spiral_id = registry.find_generator("spiral").unwrap();
    let fusion = CompositeAnimation::new("tunnel-spiral", "Tunnel → Spiral", tunnel, spiral_id, MappingMode::Quadratic)
        .bind(spiral::TIGHTNESS, 0.5, 2.5);

    let index = registry.add_composite(fusion).unwrap();
    assert_eq!(index, before);
    assert_eq!(registry.find("tunnel-spiral"), Some(index));
    assert!(registry.update(index, DT, 1.0).is_some());
}
