//! Simulation plugin and systems for Bevy ECS.
//!
//! The whole world lives in one [`Universe`] resource.  Each frame a single
//! chained set of systems reads input, advances physics, merges contacts,
//! reconciles the population and moves the camera.  Drawing lives in
//! [`crate::graphics`] and only reads what these systems leave behind.
//!
//! Input resources (`ButtonInput<KeyCode>`, `ButtonInput<MouseButton>`,
//! `AccumulatedMouseMotion`, `AccumulatedMouseScroll`) come from Bevy's
//! `InputPlugin`; headless apps must insert them by hand.

use crate::body::{Body, BodyId};
use crate::config::PhysicsConfig;
use crate::constants::{
    CLICK_RADIUS_MAX, CLICK_RADIUS_MIN, CLICK_RADIUS_STEP, SPAWNED_BODY_COLOR,
    TIME_MULTIPLIER_MAX, TIME_MULTIPLIER_MIN, TIME_MULTIPLIER_STEP,
};
use crate::controller::{ControllerId, Thruster};
use crate::universe::Universe;
use crate::vector::Vector2;
use crate::view::ViewFrame;
use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::input::ButtonInput;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PhysicsConfig>()
            .init_resource::<Universe>()
            .init_resource::<SimulationSettings>()
            .init_resource::<ShipController>()
            .init_resource::<View>()
            .init_resource::<Focus>()
            .add_systems(Startup, setup_simulation)
            .add_systems(
                Update,
                (
                    sync_viewport_system,
                    settings_input_system,
                    thrust_input_system,
                    click_spawn_system,
                    physics_step_system,
                    merge_system,
                    population_system,
                    zoom_system,
                    camera_follow_system,
                )
                    .chain(),
            );
    }
}

// ── Resources ─────────────────────────────────────────────────────────────────

/// Parameters the user can change while the sandbox runs.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SimulationSettings {
    /// Scales the per-frame time step; `0` pauses.
    pub time_multiplier: f64,
    /// Radius of bodies spawned by clicking.
    pub click_radius: f64,
    pub merging_enabled: bool,
    pub population_enabled: bool,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}

impl SimulationSettings {
    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self {
            time_multiplier: 1.0,
            click_radius: config.click_radius,
            merging_enabled: config.merging_enabled,
            population_enabled: config.population_enabled,
        }
    }

    pub fn adjust_time_multiplier(&mut self, delta: f64) {
        self.time_multiplier =
            (self.time_multiplier + delta).clamp(TIME_MULTIPLIER_MIN, TIME_MULTIPLIER_MAX);
    }

    pub fn adjust_click_radius(&mut self, delta: f64) {
        self.click_radius = (self.click_radius + delta).clamp(CLICK_RADIUS_MIN, CLICK_RADIUS_MAX);
    }
}

/// The keyboard-driven controller, created unbound at startup.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ShipController(pub Option<ControllerId>);

/// Random source for seeding and population loading.
#[derive(Resource)]
pub struct SimRng(pub StdRng);

impl SimRng {
    /// Fixed seed when given, entropy otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }
}

/// Camera frame in universe coordinates.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct View(pub ViewFrame);

/// Bodies the camera and the off-screen indicator track this frame.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Focus {
    /// Body the camera is centred on.
    pub followed: Option<BodyId>,
    /// Heaviest body; gets an edge indicator when off screen.
    pub heaviest: Option<BodyId>,
}

// ── Startup ───────────────────────────────────────────────────────────────────

/// Build the universe from the loaded config and scatter the initial field.
///
/// Must run after `load_physics_config` so it sees the final values.
pub fn setup_simulation(mut commands: Commands, config: Res<PhysicsConfig>) {
    let mut rng = SimRng::new(config.rng_seed);

    let mut universe = match Universe::new(config.gravity_const) {
        Ok(universe) => universe,
        Err(e) => {
            warn!("[setup] {e}; using default gravity");
            Universe::default()
        }
    };

    match universe.seed_field(&config.field_params(), &mut rng.0) {
        Ok(ids) => info!("[setup] seeded {} bodies", ids.len()),
        Err(e) => warn!("[setup] seeding skipped: {e}"),
    }
    universe.compute_forces();

    let ship = universe.add_controller();
    let view = ViewFrame::default().with_zoom_limits(config.min_zoom, config.max_zoom);

    commands.insert_resource(universe);
    commands.insert_resource(rng);
    commands.insert_resource(SimulationSettings::from_config(&config));
    commands.insert_resource(ShipController(Some(ship)));
    commands.insert_resource(View(view));
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Keep the view's viewport matched to the primary window.
pub fn sync_viewport_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut view: ResMut<View>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = Vector2::new(window.width() as f64, window.height() as f64);
    if view.0.viewport != size {
        view.0.viewport = size;
    }
}

/// `M` merging, `L` population, `[`/`]` time multiplier, `-`/`=` click radius.
pub fn settings_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut settings: ResMut<SimulationSettings>,
) {
    if keys.just_pressed(KeyCode::KeyM) {
        settings.merging_enabled = !settings.merging_enabled;
        info!("[settings] merging {}", on_off(settings.merging_enabled));
    }
    if keys.just_pressed(KeyCode::KeyL) {
        settings.population_enabled = !settings.population_enabled;
        info!("[settings] population {}", on_off(settings.population_enabled));
    }
    if keys.just_pressed(KeyCode::BracketLeft) {
        settings.adjust_time_multiplier(-TIME_MULTIPLIER_STEP);
        info!("[settings] time x{:.2}", settings.time_multiplier);
    }
    if keys.just_pressed(KeyCode::BracketRight) {
        settings.adjust_time_multiplier(TIME_MULTIPLIER_STEP);
        info!("[settings] time x{:.2}", settings.time_multiplier);
    }
    if keys.just_pressed(KeyCode::Minus) {
        settings.adjust_click_radius(-CLICK_RADIUS_STEP);
    }
    if keys.just_pressed(KeyCode::Equal) {
        settings.adjust_click_radius(CLICK_RADIUS_STEP);
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

fn thruster_keys(thruster: Thruster) -> [KeyCode; 2] {
    match thruster {
        Thruster::Up => [KeyCode::KeyW, KeyCode::ArrowUp],
        Thruster::Down => [KeyCode::KeyS, KeyCode::ArrowDown],
        Thruster::Left => [KeyCode::KeyA, KeyCode::ArrowLeft],
        Thruster::Right => [KeyCode::KeyD, KeyCode::ArrowRight],
    }
}

/// WASD / arrows: flag each thruster and add its push to the controlled body.
pub fn thrust_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    ship: Res<ShipController>,
    mut universe: ResMut<Universe>,
) {
    let Some(cid) = ship.0 else {
        return;
    };
    let bound = universe.controller(cid).and_then(|c| c.body()).is_some();

    for thruster in Thruster::ALL {
        let held = bound && keys.any_pressed(thruster_keys(thruster));
        if let Err(e) = universe.set_thruster(cid, thruster, held) {
            warn!("[input] {e}");
            return;
        }
        if !held {
            continue;
        }
        if let Err(e) = universe.fire(cid, thruster) {
            warn!("[input] {e}");
        }
        if let Some(controller) = universe.controller_mut(cid) {
            controller.direction = thruster.direction();
        }
    }
}

/// Velocity handed to a click-spawned body for the given mouse motion.
///
/// Motion at or under `dead_zone` pixels spawns the body at rest.
pub fn click_velocity(motion: Vector2, factor: f64, dead_zone: f64) -> Vector2 {
    if motion.magnitude() <= dead_zone {
        Vector2::ZERO
    } else {
        motion * factor
    }
}

/// Releasing the left button spawns a body under the cursor, flung with the
/// mouse motion of that frame; with shift held the ship controller moves to
/// it.  While the button is held [`crate::graphics`] draws a preview disc.
pub fn click_spawn_system(
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    motion: Res<AccumulatedMouseMotion>,
    windows: Query<&Window, With<PrimaryWindow>>,
    config: Res<PhysicsConfig>,
    settings: Res<SimulationSettings>,
    view: Res<View>,
    ship: Res<ShipController>,
    mut universe: ResMut<Universe>,
) {
    if !buttons.just_released(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };

    let position = view.0.screen_to_world(Vector2::from(cursor));
    let velocity = click_velocity(
        Vector2::from(motion.delta),
        config.mouse_velocity_factor,
        config.mouse_dead_zone,
    );
    let transfer = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);

    let controller = if transfer { ship.0 } else { None };
    spawn_at(&mut universe, position, velocity, settings.click_radius, controller);
}

/// Add a click-spawned body and optionally bind `controller` to it.
pub fn spawn_at(
    universe: &mut Universe,
    position: Vector2,
    velocity: Vector2,
    radius: f64,
    controller: Option<ControllerId>,
) -> Option<BodyId> {
    let body = match Body::new(radius, position, velocity, SPAWNED_BODY_COLOR) {
        Ok(body) => body,
        Err(e) => {
            warn!("[spawn] {e}");
            return None;
        }
    };
    let id = universe.add_body(body);
    debug!("[spawn] {} at {} moving {}", id, position, velocity);

    if let Some(cid) = controller {
        match universe.attach_controller(cid, id) {
            Ok(()) => info!("[spawn] control moved to {}", id),
            Err(e) => warn!("[spawn] {e}"),
        }
    }
    Some(id)
}

// ── Physics ───────────────────────────────────────────────────────────────────

pub fn physics_step_system(
    config: Res<PhysicsConfig>,
    settings: Res<SimulationSettings>,
    mut universe: ResMut<Universe>,
) {
    let dt = config.time_step * settings.time_multiplier;
    if dt > 0.0 {
        universe.step(dt);
    }
}

pub fn merge_system(settings: Res<SimulationSettings>, mut universe: ResMut<Universe>) {
    universe.resolve_contacts(settings.merging_enabled);
}

/// Body the population ring and the camera are centred on: the controlled
/// body, else the heaviest body.
fn focus_body(universe: &mut Universe, ship: Option<ControllerId>) -> Option<BodyId> {
    let controlled = ship
        .and_then(|cid| universe.controller(cid))
        .and_then(|c| c.body());
    if controlled.is_some() {
        return controlled;
    }
    universe.most_massive_body().map(|(id, _)| id)
}

pub fn population_system(
    config: Res<PhysicsConfig>,
    settings: Res<SimulationSettings>,
    ship: Res<ShipController>,
    view: Res<View>,
    mut rng: ResMut<SimRng>,
    mut universe: ResMut<Universe>,
) {
    if !settings.population_enabled {
        return;
    }
    let center = focus_body(&mut universe, ship.0)
        .and_then(|id| universe.get(id))
        .map(|body| body.position)
        .unwrap_or(view.0.center);

    if let Err(e) = universe.reconcile(center, &config.population_params(), &mut rng.0) {
        warn!("[population] {e}");
    }
}

// ── Camera ────────────────────────────────────────────────────────────────────

/// Mouse wheel zoom about the cursor (or the viewport center).
pub fn zoom_system(
    scroll: Res<AccumulatedMouseScroll>,
    windows: Query<&Window, With<PrimaryWindow>>,
    config: Res<PhysicsConfig>,
    mut view: ResMut<View>,
) {
    let lines = scroll.delta.y as f64;
    if lines == 0.0 {
        return;
    }
    let anchor = windows
        .single()
        .ok()
        .and_then(|w| w.cursor_position())
        .map(Vector2::from)
        .unwrap_or(view.0.viewport * 0.5);

    let factor = (1.0 + config.zoom_speed).powf(lines);
    view.0.zoom_about(anchor, factor);
}

/// Centre the view on the focus body and push the frame to the 2D camera.
pub fn camera_follow_system(
    ship: Res<ShipController>,
    mut universe: ResMut<Universe>,
    mut view: ResMut<View>,
    mut focus: ResMut<Focus>,
    mut q_camera: Query<(&mut Transform, &mut Projection), With<Camera2d>>,
) {
    focus.followed = focus_body(&mut universe, ship.0);
    focus.heaviest = universe.most_massive_body().map(|(id, _)| id);

    if let Some(body) = focus.followed.and_then(|id| universe.get(id)) {
        view.0.follow(body.position);
    }

    let Ok((mut transform, mut projection)) = q_camera.single_mut() else {
        return;
    };
    let center = view.0.center;
    transform.translation.x = center.x as f32;
    transform.translation.y = -center.y as f32;
    if let Projection::Orthographic(ortho) = &mut *projection {
        ortho.scale = (1.0 / view.0.zoom()) as f32;
    }
}
