use bevy::prelude::*;
use bevy::window::WindowResolution;

use orbit_sandbox::config::{self, PhysicsConfig};
use orbit_sandbox::graphics;
use orbit_sandbox::simulation::{self, SimulationPlugin};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Orbit Sandbox".into(),
                resolution: WindowResolution::new(1200, 800),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        // Compiled defaults; load_physics_config overwrites them from
        // assets/physics.toml (if present) before the universe is built.
        .insert_resource(PhysicsConfig::default())
        .add_plugins(SimulationPlugin)
        .add_systems(
            Startup,
            (
                config::load_physics_config.before(simulation::setup_simulation),
                graphics::setup_camera,
                graphics::setup_hud,
            ),
        )
        .add_systems(
            Update,
            (
                graphics::body_gizmo_system,
                graphics::thruster_gizmo_system,
                graphics::indicator_gizmo_system,
                graphics::click_preview_gizmo_system,
                graphics::hud_text_system,
            )
                .after(simulation::camera_follow_system),
        )
        .run();
}
