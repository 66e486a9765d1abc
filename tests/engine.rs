//! End-to-end behavioral contracts of the engine.

use driftglass::forces;
use driftglass::prelude::*;
use driftglass::{color, AnimationScheduler, LOGICAL_DT_MS};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn basic_engine(count: usize, seed: u64) -> Engine {
    let config = SimulationConfig::new().with_count(count);
    Engine::new(config, Environment::default(), 640.0, 480.0).with_seed(seed)
}

#[test]
fn population_is_stable_across_ticks() {
    init_logger();
    let mut engine = basic_engine(50, 1);
    assert_eq!(engine.particles().len(), 50);
    for _ in 0..200 {
        engine.tick();
        let n = engine.particles().len();
        assert_eq!(n, 50);
        assert!(n <= engine.config().population_ceiling());
    }
}

#[test]
fn lifetime_decreases_then_resets() {
    init_logger();
    let config = SimulationConfig::new().with_count(12).with_lifetime(5.0);
    let mut engine = Engine::new(config, Environment::default(), 640.0, 480.0).with_seed(2);

    let id = engine.particles()[0].id;
    let mut last = 5.0f32;
    for _ in 0..30 {
        engine.tick();
        let p = engine
            .particles()
            .iter()
            .find(|p| p.id == id)
            .expect("particle ids are stable while under the ceiling");
        let t = p.lifetime.unwrap();
        // Never observable at or below zero.
        assert!(t > 0.0);
        assert!(t <= 5.0);
        // Either one tick younger, or freshly respawned at the maximum.
        assert!((last - t - 1.0).abs() < 1e-5 || (t - 5.0).abs() < 1e-5);
        last = t;
    }
}

#[test]
fn connection_edges_are_symmetric() {
    init_logger();
    let config = SimulationConfig::new().with_count(80).with_connections(120.0);
    let mut engine = Engine::new(config, Environment::default(), 500.0, 400.0).with_seed(3);
    for _ in 0..10 {
        engine.tick();
        for edge in engine.edges() {
            assert!(edge.distance < 120.0);
            let a = &engine.particles()[edge.a];
            let b = &engine.particles()[edge.b];
            assert!(a.connections.contains(&b.id));
            assert!(b.connections.contains(&a.id));
        }
    }
}

#[test]
fn mouse_force_falloff_profile() {
    // Exactly 0 at the radius, guarded at distance 0, decreasing between.
    let pointer = Vec2::new(0.0, 0.0);
    assert_eq!(forces::mouse(pointer, pointer, 100.0), Vec2::ZERO);
    assert_eq!(
        forces::mouse(Vec2::new(100.0, 0.0), pointer, 100.0),
        Vec2::ZERO
    );
    let near = forces::mouse(Vec2::new(1e-3, 0.0), pointer, 100.0).length();
    assert!(near > 0.9999);
    let mid = forces::mouse(Vec2::new(50.0, 0.0), pointer, 100.0).length();
    assert!((mid - 0.5).abs() < 1e-5);
    assert!(near > mid);
}

#[test]
fn gravity_bounce_restitution() {
    let env = Environment::default();
    let ctx = driftglass::TickContext {
        env: &env,
        pointer: None,
        mouse_radius: 0.0,
        centroid: Vec2::new(320.0, 240.0),
        tick: 0,
        width: 640.0,
        height: 480.0,
        speed: 1.0,
        dt: 1.0,
    };
    let mut p = Particle {
        id: 0,
        position: Vec2::new(320.0, 479.5),
        velocity: Vec2::new(0.0, 2.0),
        size: 2.0,
        opacity: 1.0,
        color: Vec3::ONE,
        kind: ParticleKind::Droplet,
        rotation: 0.0,
        rotation_speed: 0.0,
        lifetime: None,
        max_lifetime: None,
        connections: Vec::new(),
    };
    Behavior::Gravity.apply(&mut p, &ctx);
    let falling = p.velocity.y;
    assert!(falling > 2.0, "acceleration applies before the bounce");
    assert!(BoundaryPolicy::BounceFloor.apply(&mut p, 640.0, 480.0, 50.0));
    assert_eq!(p.position.y, 480.0);
    assert!((p.velocity.y + falling * 0.8).abs() < 1e-4);
}

#[test]
fn noon_is_brighter_than_midnight() {
    let noon = Environment::weather(Weather::Clear).at_hour(12.0);
    let midnight = Environment::weather(Weather::Clear).at_hour(0.0);
    assert!(noon.light_intensity() > midnight.light_intensity());
}

#[test]
fn reduced_motion_freezes_particles() {
    init_logger();
    let mut engine = basic_engine(30, 4);
    engine.set_reduced_motion(true);
    let mut surface = RasterSurface::new(640, 480);
    let mut scheduler = AnimationScheduler::new();

    assert!(!scheduler.frame(&mut engine, &mut surface));
    let before: Vec<Vec2> = engine.particles().iter().map(|p| p.position).collect();
    assert!(!scheduler.frame(&mut engine, &mut surface));
    let after: Vec<Vec2> = engine.particles().iter().map(|p| p.position).collect();
    assert_eq!(before, after);
}

#[test]
fn color_interpolation_endpoints_are_exact() {
    let a = Vec3::new(0.123, 0.456, 0.789);
    let b = Vec3::new(0.321, 0.654, 0.987);
    assert_eq!(color::lerp(a, b, 0.0), a);
    assert_eq!(color::lerp(a, b, 1.0), b);
}

#[test]
fn resize_reinitializes_into_new_bounds() {
    init_logger();
    let mut engine = basic_engine(60, 5);
    engine.resize(320.0, 200.0);
    engine.tick();
    assert_eq!(engine.particles().len(), 60);
    for p in engine.particles() {
        assert!(p.position.x >= 0.0 && p.position.x <= 320.0);
        assert!(p.position.y >= 0.0 && p.position.y <= 200.0);
    }
}

#[test]
fn stop_prevents_further_surface_writes() {
    init_logger();
    let mut engine = basic_engine(20, 6);
    let mut surface = RasterSurface::new(64, 48);
    let mut scheduler = AnimationScheduler::new();

    assert!(scheduler.frame(&mut engine, &mut surface));
    scheduler.stop(&mut engine);
    assert!(scheduler.is_stopped());

    // Paint a sentinel and confirm a post-stop frame leaves it alone.
    surface.clear(Vec3::new(1.0, 0.0, 1.0));
    assert!(!scheduler.frame(&mut engine, &mut surface));
    assert_eq!(surface.pixel(10, 10), Some([255, 0, 255, 255]));
    assert_eq!(surface.pixel(32, 24), Some([255, 0, 255, 255]));
}

#[test]
fn draw_on_empty_surface_is_noop() {
    init_logger();
    let engine = basic_engine(20, 7);
    let mut surface = RasterSurface::new(0, 0);
    // Must not panic or write anywhere.
    engine.draw(&mut surface);
}

#[test]
fn storm_scene_renders_and_exports() {
    init_logger();
    let config = SimulationConfig::new()
        .with_count(80)
        .with_behavior(Behavior::Gravity)
        .with_connections(60.0);
    let mut engine =
        Engine::new(config, Environment::weather(Weather::Storm), 320.0, 240.0).with_seed(8);
    let mut surface = RasterSurface::new(320, 240);
    for _ in 0..30 {
        engine.tick();
    }
    engine.draw(&mut surface);

    // The sky clear guarantees full coverage.
    let corner = surface.pixel(0, 0).unwrap();
    assert_eq!(corner[3], 255);

    let path = std::env::temp_dir().join("driftglass_storm.png");
    surface.save_png(&path).unwrap();
    std::fs::remove_file(&path).ok();
}

#[test]
fn fixed_step_is_sixteen_milliseconds() {
    assert_eq!(LOGICAL_DT_MS, 16.0);
}
