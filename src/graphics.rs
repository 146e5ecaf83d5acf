//! Camera setup, gizmo drawing and the status line.
//!
//! Universe coordinates have y growing down; Bevy's 2D world has y up.
//! [`to_bevy`] is the only place that flips.

use crate::constants::{
    FLAME_COLOR, FLAME_LENGTH_FACTOR, HUD_FONT_SIZE, INDICATOR_INSET, INDICATOR_RADIUS,
    SPAWNED_BODY_COLOR,
};
use crate::controller::Thruster;
use crate::simulation::{Focus, ShipController, SimulationSettings, View};
use crate::universe::Universe;
use crate::vector::Vector2;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Marker for the status text node.
#[derive(Component)]
pub struct HudText;

/// Universe point to Bevy world point.
pub fn to_bevy(p: Vector2) -> Vec2 {
    Vector2::new(p.x, -p.y).as_vec2()
}

/// Setup camera for 2D rendering
pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
    info!("[setup] camera spawned");
}

pub fn setup_hud(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: HUD_FONT_SIZE,
            ..default()
        },
        TextColor(Color::srgb(0.7, 0.7, 0.7)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            ..default()
        },
        HudText,
    ));
}

pub fn hud_text_system(
    universe: Res<Universe>,
    settings: Res<SimulationSettings>,
    view: Res<View>,
    mut q_text: Query<&mut Text, With<HudText>>,
) {
    let Ok(mut text) = q_text.single_mut() else {
        return;
    };
    *text = Text::new(format!(
        "Bodies: {} | Time x{:.2} | Click r={:.0} | Merge [M]: {} | Load [L]: {} | Zoom {:.2}",
        universe.len(),
        settings.time_multiplier,
        settings.click_radius,
        if settings.merging_enabled { "on" } else { "off" },
        if settings.population_enabled { "on" } else { "off" },
        view.0.zoom(),
    ));
}

/// Draw every body as a circle outline, in insertion order.
pub fn body_gizmo_system(mut gizmos: Gizmos, universe: Res<Universe>, view: Res<View>) {
    for (_, body) in universe.iter() {
        // Skip what the camera cannot see; a margin of the body radius keeps
        // edges from popping.
        let margin = body.radius() * view.0.zoom();
        if !view.0.contains(body.position, margin) {
            continue;
        }
        gizmos.circle_2d(to_bevy(body.position), body.radius() as f32, body.color);
    }
}

/// Flames behind the ship body for every thruster currently firing.
pub fn thruster_gizmo_system(
    mut gizmos: Gizmos,
    universe: Res<Universe>,
    ship: Res<ShipController>,
) {
    let Some(controller) = ship.0.and_then(|cid| universe.controller(cid)) else {
        return;
    };
    let Some(body) = controller.body().and_then(|id| universe.get(id)) else {
        return;
    };

    let r = body.radius();
    for thruster in Thruster::ALL {
        if !controller.thrusters.get(thruster) {
            continue;
        }
        // Exhaust points away from the push.
        let exhaust = -thruster.direction();
        let base = body.position + exhaust * r;
        let tip = body.position + exhaust * (r * (1.0 + FLAME_LENGTH_FACTOR));
        gizmos.line_2d(to_bevy(base), to_bevy(tip), FLAME_COLOR);
    }
}

/// Marker on the screen edge pointing at the heaviest body while it is
/// off screen.
pub fn indicator_gizmo_system(
    mut gizmos: Gizmos,
    universe: Res<Universe>,
    focus: Res<Focus>,
    view: Res<View>,
) {
    let Some(body) = focus.heaviest.and_then(|id| universe.get(id)) else {
        return;
    };
    let Some(screen) = view.0.edge_indicator(body.position, INDICATOR_INSET) else {
        return;
    };
    let world = view.0.screen_to_world(screen);
    let radius = INDICATOR_RADIUS / view.0.zoom();
    gizmos.circle_2d(to_bevy(world), radius as f32, body.color);
}

/// Outline of the body a click would spawn, under the cursor while the left
/// button is held.
pub fn click_preview_gizmo_system(
    mut gizmos: Gizmos,
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    settings: Res<SimulationSettings>,
    view: Res<View>,
) {
    if !buttons.pressed(MouseButton::Left) {
        return;
    }
    let Some(cursor) = windows.single().ok().and_then(|w| w.cursor_position()) else {
        return;
    };
    let world = view.0.screen_to_world(Vector2::from(cursor));
    gizmos.circle_2d(to_bevy(world), settings.click_radius as f32, SPAWNED_BODY_COLOR);
}
