use tidewave::ocean::{HeightFieldAnimator, RIPPLE_RADIUS};
use tidewave::params::{ConfigPatch, SurfaceConfig, WeatherPreset};
use tidewave::scene::{HeadlessScene, SceneContainer};
use tidewave::OceanError;

fn config(segments: u32) -> SurfaceConfig {
    SurfaceConfig {
        width: 200.0,
        height: 200.0,
        segments,
        ..Default::default()
    }
}

fn initialized(scene: &mut HeadlessScene, segments: u32) -> HeightFieldAnimator {
    let mut animator = HeightFieldAnimator::new(config(segments));
    animator
        .initialize(Some(scene))
        .expect("headless scene initializes");
    animator
}

fn heights(animator: &HeightFieldAnimator) -> Vec<f32> {
    animator
        .renderable()
        .expect("surface is active")
        .geometry
        .heights()
        .collect()
}

fn assert_close(a: &[f32], b: &[f32], tolerance: f32) {
    assert_eq!(a.len(), b.len());
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        assert!(
            (x - y).abs() <= tolerance,
            "vertex {}: {} vs {} (tolerance {})",
            i,
            x,
            y,
            tolerance
        );
    }
}

#[test]
fn split_updates_match_single_update() {
    let mut scene = HeadlessScene::new();
    let mut split = initialized(&mut scene, 20);
    let mut single = initialized(&mut scene, 20);

    split.update(0.3);
    split.update(0.45);
    single.update(0.75);

    assert_close(&heights(&split), &heights(&single), 1e-4);
}

#[test]
fn replaying_elapsed_sequence_is_deterministic() {
    let steps = [0.016, 0.017, 0.5, 0.0, 0.033];
    let mut scene = HeadlessScene::new();
    let mut a = initialized(&mut scene, 16);
    let mut b = initialized(&mut scene, 16);
    for dt in steps {
        a.update(dt);
        b.update(dt);
    }
    assert_eq!(heights(&a), heights(&b));
}

#[test]
fn zero_elapsed_keeps_heights() {
    let mut scene = HeadlessScene::new();
    let mut animator = initialized(&mut scene, 12);
    animator.update(1.25);
    let before = heights(&animator);

    animator.update(0.0);
    assert_eq!(heights(&animator), before);
}

#[test]
fn ripple_center_gets_full_contribution() {
    let mut scene = HeadlessScene::new();
    let mut animator = initialized(&mut scene, 20);
    animator.update(0.1);
    let before = heights(&animator);
    let t = animator.clock_time().unwrap();

    let intensity = 1.5;
    animator.create_ripple(0.0, 0.0, intensity);
    let after = heights(&animator);

    let geometry = &animator.renderable().unwrap().geometry;
    let center = geometry
        .base()
        .iter()
        .position(|p| p.x == 0.0 && p.y == 0.0)
        .expect("even segment count has a center vertex");
    let expected = (-5.0 * t).sin() * intensity * 3.0;
    assert!(
        (after[center] - before[center] - expected).abs() < 1e-4,
        "center delta {} expected {}",
        after[center] - before[center],
        expected
    );

    // Everything at or beyond the radius is untouched
    for (i, p) in geometry.base().iter().enumerate() {
        if p.length() >= RIPPLE_RADIUS {
            assert_eq!(after[i], before[i], "vertex {} at {:?} moved", i, p);
        }
    }
}

#[test]
fn ripple_marks_buffer_dirty_and_refreshes_normals() {
    let mut scene = HeadlessScene::new();
    let mut animator = initialized(&mut scene, 20);
    animator.update(0.3);

    let geometry = &mut animator.renderable_mut().unwrap().geometry;
    assert!(geometry.take_dirty());
    assert!(!geometry.is_dirty());
    // One grid step from the ripple centre, where the ripple slope is steep
    let near = geometry
        .base()
        .iter()
        .position(|p| p.x == 10.0 && p.y == 0.0)
        .unwrap();
    let normal_before = geometry.vertices()[near].normal;

    animator.create_ripple(0.0, 0.0, 1.5);

    let geometry = &animator.renderable().unwrap().geometry;
    assert!(geometry.is_dirty());
    let normal_after = geometry.vertices()[near].normal;
    assert_ne!(normal_after, normal_before);
    let length = glam::Vec3::from(normal_after).length();
    assert!((length - 1.0).abs() < 1e-4, "normal length {}", length);
}

#[test]
fn ripple_follows_world_position() {
    let mut scene = HeadlessScene::new();
    let mut animator = initialized(&mut scene, 20);
    animator.update(0.2);
    let before = heights(&animator);

    // World z maps to local -y
    animator.create_ripple(60.0, -60.0, 1.0);
    let after = heights(&animator);

    let geometry = &animator.renderable().unwrap().geometry;
    let center = geometry
        .base()
        .iter()
        .position(|p| p.x == 60.0 && p.y == 60.0)
        .unwrap();
    assert_ne!(after[center], before[center]);
    // Margin absorbs rounding in the world-to-local conversion
    for (i, p) in geometry.base().iter().enumerate() {
        if p.distance(glam::Vec2::new(60.0, 60.0)) > RIPPLE_RADIUS + 1.0 {
            assert_eq!(after[i], before[i]);
        }
    }
}

#[test]
fn zero_amplitude_flattens_surface() {
    let mut scene = HeadlessScene::new();
    let mut animator = initialized(&mut scene, 10);
    animator.update(0.8);
    assert!(heights(&animator).iter().any(|h| *h != 0.0));

    animator.set_properties(&ConfigPatch::default().with_wave_amplitude(0.0));
    for dt in [0.0, 0.016, 3.0] {
        animator.update(dt);
        assert!(heights(&animator).iter().all(|h| *h == 0.0));
    }
}

#[test]
fn stormy_weather_sets_values() {
    let mut scene = HeadlessScene::new();
    let mut animator = initialized(&mut scene, 4);
    let preset = animator.apply_weather("stormy");

    assert_eq!(preset, WeatherPreset::Stormy);
    assert_eq!(animator.config.wave_amplitude, 2.5);
    assert_eq!(animator.config.wave_speed, 3.5);
    assert_eq!(animator.config.color, 0x002233);
    assert_eq!(animator.renderable().unwrap().material.color, 0x002233);
}

#[test]
fn unknown_weather_matches_default_preset() {
    let mut scene = HeadlessScene::new();
    let mut animator = initialized(&mut scene, 4);
    animator.apply_weather("stormy");

    let preset = animator.apply_weather("unknown-name");
    assert_eq!(preset, WeatherPreset::Default);
    assert_eq!(animator.config.wave_amplitude, 0.8);
    assert_eq!(animator.config.wave_speed, 1.2);
    assert_eq!(animator.config.color, 0x006994);
}

#[test]
fn cleanup_makes_operations_noops() {
    let mut scene = HeadlessScene::new();
    let mut animator = initialized(&mut scene, 8);
    let handle = animator.handle().unwrap();
    animator.update(0.5);

    animator.cleanup(&mut scene);
    assert!(!animator.is_initialized());
    assert!(!scene.contains(handle));
    assert!(scene.is_empty());

    let config_before = animator.config.clone();
    animator.update(1.0);
    animator.create_ripple(0.0, 0.0, 1.0);
    animator.set_properties(&ConfigPatch::default().with_opacity(0.1));
    animator.toggle_visibility(false);
    animator.apply_weather("calm");

    assert!(animator.renderable().is_none());
    assert!(animator.clock_time().is_none());
    assert_eq!(animator.config, config_before);
    assert!(scene.is_empty());

    // Second cleanup is harmless
    animator.cleanup(&mut scene);
}

#[test]
fn operations_before_initialize_are_noops() {
    let mut animator = HeightFieldAnimator::new(config(4));
    animator.update(1.0);
    animator.create_ripple(0.0, 0.0, 1.0);
    animator.toggle_visibility(false);
    assert!(!animator.is_initialized());
    assert_eq!(animator.config, config(4));
}

#[test]
fn missing_scene_leaves_animator_uninitialized() {
    let mut animator = HeightFieldAnimator::new(config(4));
    assert!(matches!(
        animator.initialize(None),
        Err(OceanError::MissingScene)
    ));
    assert!(!animator.is_initialized());
    assert!(animator.handle().is_none());
}

#[test]
fn grid_size_and_xy_are_stable() {
    for segments in [1, 3, 8] {
        let mut scene = HeadlessScene::new();
        let mut animator = initialized(&mut scene, segments);
        let expected = ((segments + 1) * (segments + 1)) as usize;

        let geometry = &animator.renderable().unwrap().geometry;
        assert_eq!(geometry.base().len(), expected);
        assert_eq!(geometry.vertices().len(), expected);
        let xy: Vec<[f32; 2]> = geometry
            .vertices()
            .iter()
            .map(|v| [v.position[0], v.position[1]])
            .collect();

        for step in 0..5 {
            animator.update(0.1 * step as f32);
            animator.create_ripple(10.0 * step as f32, 0.0, 2.0);
        }

        let geometry = &animator.renderable().unwrap().geometry;
        assert_eq!(geometry.vertices().len(), expected);
        for ((v, p), original) in geometry.vertices().iter().zip(geometry.base()).zip(&xy) {
            assert_eq!([v.position[0], v.position[1]], *original);
            assert_eq!([p.x, p.y], *original);
        }
    }
}

#[test]
fn independent_surfaces_do_not_share_state() {
    let mut scene = HeadlessScene::new();
    let mut a = initialized(&mut scene, 6);
    let mut b = initialized(&mut scene, 6);
    assert_eq!(scene.len(), 2);

    a.update(2.0);
    b.apply_weather("calm");
    assert_eq!(b.clock_time(), Some(0.0));
    assert_eq!(a.config.wave_amplitude, 0.8);

    a.cleanup(&mut scene);
    assert!(scene.contains(b.handle().unwrap()));
}
