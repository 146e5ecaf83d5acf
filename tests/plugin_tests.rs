//! Headless tests for [`SimulationPlugin`].
//!
//! These tests use [`MinimalPlugins`] (no window, no rendering, no input
//! plugin), so the input resources the systems read are inserted by hand and
//! never cleared between frames unless a test does it.

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use orbit_sandbox::body::Body;
use orbit_sandbox::config::PhysicsConfig;
use orbit_sandbox::controller::{thrust_for_radius, Thruster};
use orbit_sandbox::simulation::{Focus, ShipController, SimulationPlugin, SimulationSettings, View};
use orbit_sandbox::universe::Universe;
use orbit_sandbox::vector::Vector2;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Minimal app with an empty starting field and a fixed seed.
fn app_with_config(config: PhysicsConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(config);
    app.init_resource::<ButtonInput<KeyCode>>();
    app.init_resource::<ButtonInput<MouseButton>>();
    app.init_resource::<AccumulatedMouseMotion>();
    app.init_resource::<AccumulatedMouseScroll>();
    app.add_plugins(SimulationPlugin);
    app
}

fn empty_config() -> PhysicsConfig {
    PhysicsConfig {
        seed_body_count: 0,
        rng_seed: Some(7),
        ..Default::default()
    }
}

fn tap(app: &mut App, key: KeyCode) {
    let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    keys.press(key);
    drop(keys);
    app.update();
    let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    keys.release(key);
    keys.clear();
}

/// Primary window with the cursor resting at the viewport center.
fn spawn_window_with_centred_cursor(app: &mut App) {
    let mut window = Window::default();
    let center = Vec2::new(window.width(), window.height()) * 0.5;
    window.set_cursor_position(Some(center));
    app.world_mut().spawn((window, PrimaryWindow));
}

fn universe(app: &App) -> &Universe {
    app.world().resource::<Universe>()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn startup_seeds_the_configured_field() {
    let mut app = app_with_config(PhysicsConfig {
        seed_body_count: 25,
        rng_seed: Some(3),
        merging_enabled: false,
        ..Default::default()
    });
    app.update();

    assert_eq!(universe(&app).len(), 25);
    let ship = app.world().resource::<ShipController>().0;
    let ship = ship.expect("ship controller is created at startup");
    assert_eq!(universe(&app).controller(ship).unwrap().body(), None);
}

#[test]
fn same_seed_gives_same_field() {
    let positions = |seed| {
        let mut app = app_with_config(PhysicsConfig {
            seed_body_count: 10,
            rng_seed: Some(seed),
            merging_enabled: false,
            ..Default::default()
        });
        app.update();
        universe(&app)
            .iter()
            .map(|(_, b)| b.position)
            .collect::<Vec<_>>()
    };
    assert_eq!(positions(99), positions(99));
}

#[test]
fn setting_keys_toggle_and_adjust() {
    let mut app = app_with_config(empty_config());
    app.update();
    let before = app.world().resource::<SimulationSettings>().clone();

    tap(&mut app, KeyCode::KeyM);
    tap(&mut app, KeyCode::KeyL);
    tap(&mut app, KeyCode::BracketRight);
    tap(&mut app, KeyCode::Equal);

    let after = app.world().resource::<SimulationSettings>();
    assert_eq!(after.merging_enabled, !before.merging_enabled);
    assert_eq!(after.population_enabled, !before.population_enabled);
    assert!((after.time_multiplier - (before.time_multiplier + 0.25)).abs() < 1e-12);
    assert!((after.click_radius - (before.click_radius + 1.0)).abs() < 1e-12);
}

#[test]
fn held_thrust_key_pushes_controlled_body() {
    let mut app = app_with_config(empty_config());
    app.update();

    let ship = app.world().resource::<ShipController>().0.unwrap();
    let id = {
        let mut u = app.world_mut().resource_mut::<Universe>();
        let id = u.add_body(Body::new(5.0, Vector2::ZERO, Vector2::ZERO, Color::WHITE).unwrap());
        u.attach_controller(ship, id).unwrap();
        id
    };

    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(KeyCode::KeyD);
    app.update();

    let u = universe(&app);
    let body = u.get(id).unwrap();
    assert!((body.velocity.x - thrust_for_radius(5.0)).abs() < 1e-12);
    assert_eq!(body.velocity.y, 0.0);
    assert!(u.controller(ship).unwrap().thrusters.get(Thruster::Right));
    assert!(!u.controller(ship).unwrap().thrusters.get(Thruster::Left));
}

#[test]
fn merging_runs_each_frame_when_enabled() {
    let mut app = app_with_config(empty_config());
    app.update();
    {
        let mut u = app.world_mut().resource_mut::<Universe>();
        u.add_body(Body::new(1.0, Vector2::ZERO, Vector2::ZERO, Color::WHITE).unwrap());
        u.add_body(Body::new(1.0, Vector2::new(1.0, 0.0), Vector2::ZERO, Color::WHITE).unwrap());
    }
    app.update();
    assert_eq!(universe(&app).len(), 1);
}

#[test]
fn population_fills_to_target_when_enabled() {
    let mut app = app_with_config(PhysicsConfig {
        population_enabled: true,
        target_body_count: 30,
        load_radius: 100.0,
        unload_radius: 300.0,
        spawn_buffer: 50.0,
        ..empty_config()
    });
    app.update();
    assert_eq!(universe(&app).len(), 30);
}

#[test]
fn camera_follows_heaviest_body() {
    let mut app = app_with_config(empty_config());
    app.update();
    let heavy = {
        let mut u = app.world_mut().resource_mut::<Universe>();
        u.add_body(Body::new(1.0, Vector2::new(-200.0, 0.0), Vector2::ZERO, Color::WHITE).unwrap());
        u.add_body(Body::new(4.0, Vector2::new(300.0, 50.0), Vector2::ZERO, Color::WHITE).unwrap())
    };
    app.update();

    let focus = *app.world().resource::<Focus>();
    assert_eq!(focus.followed, Some(heavy));
    assert_eq!(focus.heaviest, Some(heavy));

    let center = app.world().resource::<View>().0.center;
    let position = universe(&app).get(heavy).unwrap().position;
    assert_eq!(center, position);
}

#[test]
fn scroll_zooms_the_view() {
    let mut app = app_with_config(empty_config());
    app.update();
    app.world_mut().resource_mut::<AccumulatedMouseScroll>().delta = Vec2::new(0.0, 1.0);
    app.update();

    let zoom = app.world().resource::<View>().0.zoom();
    assert!((zoom - 1.1).abs() < 1e-9, "zoom = {zoom}");
}

#[test]
fn click_spawns_on_release_with_release_motion() {
    let mut app = app_with_config(empty_config());
    spawn_window_with_centred_cursor(&mut app);
    app.update();

    // Press while the mouse is moving fast: nothing spawns yet.
    app.world_mut().resource_mut::<AccumulatedMouseMotion>().delta = Vec2::new(40.0, 0.0);
    app.world_mut()
        .resource_mut::<ButtonInput<MouseButton>>()
        .press(MouseButton::Left);
    app.update();
    assert!(universe(&app).is_empty(), "press alone must not spawn");

    // Holding keeps it pending.
    app.world_mut().resource_mut::<ButtonInput<MouseButton>>().clear();
    app.update();
    assert!(universe(&app).is_empty());

    // Release with a different motion: that one sets the velocity.
    app.world_mut().resource_mut::<AccumulatedMouseMotion>().delta = Vec2::new(8.0, -4.0);
    app.world_mut()
        .resource_mut::<ButtonInput<MouseButton>>()
        .release(MouseButton::Left);
    app.update();

    let u = universe(&app);
    assert_eq!(u.len(), 1);
    let (_, body) = u.iter().next().unwrap();
    assert_eq!(body.velocity, Vector2::new(2.0, -1.0));
    let click_radius = app.world().resource::<SimulationSettings>().click_radius;
    assert_eq!(body.radius(), click_radius);
}
