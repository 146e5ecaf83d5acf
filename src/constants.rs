//! Centralised physics and gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::PhysicsConfig`] mirrors the runtime-tunable subset and
//! uses these as its defaults.
//!
//! World units are canvas pixels with y pointing *down*; the render layer
//! flips y when handing positions to Bevy.

use bevy::color::Color;

// ── Physics: Gravity ──────────────────────────────────────────────────────────

/// Gravitational constant used by the pairwise force pass.
///
/// Not physically calibrated.  At 0.1 a radius-3 body (mass ≈ 28) pulls a
/// neighbour 100 u away with ≈ 2.8e-4 u/step², slow enough that a field of
/// several hundred small bodies clumps over a few thousand frames.
pub const GRAVITY_CONST: f64 = 0.1;

// ── Physics: Collision ────────────────────────────────────────────────────────

/// Fraction of the *inner* body's radius counted toward the contact distance.
///
/// Contact is `|d| <= r_outer + r_inner * CONTACT_INNER_DISCOUNT`.  The rule
/// is deliberately asymmetric: which body is "inner" depends on scan order.
pub const CONTACT_INNER_DISCOUNT: f64 = 4.0 / 7.0;

/// Whether merging is on when the sandbox starts.
pub const MERGING_ENABLED: bool = true;

// ── Controller ────────────────────────────────────────────────────────────────

/// Acceleration added per step by one held thruster on a body of
/// [`THRUST_REFERENCE_RADIUS`].
pub const THRUST_BASE_RATE: f64 = 0.05;

/// Radius at which a controller's thrust equals [`THRUST_BASE_RATE`].
///
/// `delta_acceleration = THRUST_BASE_RATE * radius / THRUST_REFERENCE_RADIUS`.
pub const THRUST_REFERENCE_RADIUS: f64 = 5.0;

// ── Population (dynamic loading) ─────────────────────────────────────────────

/// Inner edge of the ring in which new bodies are synthesized.
pub const LOAD_RADIUS: f64 = 1500.0;

/// Bodies farther than this from the tracked center are unloaded.
pub const UNLOAD_RADIUS: f64 = 3000.0;

/// Width of the spawn ring beyond [`LOAD_RADIUS`].
pub const SPAWN_BUFFER: f64 = 1000.0;

/// Population the reconcile pass tops the universe back up to.
pub const TARGET_BODY_COUNT: usize = 300;

/// Smallest radius of a synthesized body.
pub const LOADED_MIN_RADIUS: f64 = 1.0;

/// Added on top of [`LOADED_MIN_RADIUS`]: radii are drawn from
/// `[LOADED_MIN_RADIUS, LOADED_MIN_RADIUS + LOADED_RADIUS_RANGE)`.
pub const LOADED_RADIUS_RANGE: f64 = 3.0;

/// Divisor turning a loaded body's radius into its tangential speed.
pub const LOADED_SPEED_RADIUS_DIVISOR: f64 = 5.0;

/// Whether population loading runs when the sandbox starts.
pub const POPULATION_ENABLED: bool = false;

// ── Initial seeding ──────────────────────────────────────────────────────────

/// Number of bodies scattered at startup.
pub const SEED_BODY_COUNT: usize = 499;

/// Seeded radii are whole numbers in `1..=SEED_MAX_RADIUS`.
pub const SEED_MAX_RADIUS: u32 = 3;

/// Center of the initial field.
pub const SEED_CENTER_X: f64 = 400.0;
pub const SEED_CENTER_Y: f64 = 400.0;

/// Half-extent of the initial field along each axis.
pub const SEED_SPREAD: f64 = 800.0;

/// Per-axis speed bound of seeded bodies.
pub const SEED_MAX_SPEED: f64 = 0.2;

// ── Input / UI parameters ────────────────────────────────────────────────────

/// Simulation time advanced per rendered frame before the UI multiplier.
pub const TIME_STEP: f64 = 1.0;

/// Bounds and step of the time-multiplier keys.
pub const TIME_MULTIPLIER_MIN: f64 = 0.0;
pub const TIME_MULTIPLIER_MAX: f64 = 5.0;
pub const TIME_MULTIPLIER_STEP: f64 = 0.25;

/// Radius of a click-spawned body.
pub const CLICK_RADIUS: f64 = 5.0;

/// Bounds and step of the click-radius keys.
pub const CLICK_RADIUS_MIN: f64 = 1.0;
pub const CLICK_RADIUS_MAX: f64 = 50.0;
pub const CLICK_RADIUS_STEP: f64 = 1.0;

/// Fraction of the last mouse motion (px/frame) given to a click-spawned body.
pub const MOUSE_VELOCITY_FACTOR: f64 = 0.25;

/// Mouse motion at or below this magnitude spawns a body at rest.
///
/// Just over √2 so a one-pixel diagonal jitter does not fling bodies.
pub const MOUSE_DEAD_ZONE: f64 = 1.414;

// ── Camera ───────────────────────────────────────────────────────────────────

/// Minimum zoom (zoomed out).
pub const MIN_ZOOM: f64 = 0.05;

/// Maximum zoom (zoomed in).
pub const MAX_ZOOM: f64 = 10.0;

/// Multiplicative zoom change per scroll-wheel line.
pub const ZOOM_SPEED: f64 = 0.1;

/// Distance (px) of the off-screen indicator from the window edge.
pub const INDICATOR_INSET: f64 = 20.0;

// ── Colors ───────────────────────────────────────────────────────────────────

/// Color of uncontrolled seeded / loaded / merged bodies.
pub const DEFAULT_BODY_COLOR: Color = Color::WHITE;

/// Color of click-spawned bodies.
pub const SPAWNED_BODY_COLOR: Color = Color::srgb(0.3, 0.5, 1.0);

/// Color a body takes while a controller is bound to it.
pub const CONTROLLER_COLOR: Color = Color::srgb(0.2, 0.9, 0.3);

/// Thruster flame color.
pub const FLAME_COLOR: Color = Color::srgb(1.0, 0.6, 0.1);

/// Flame length as a fraction of the body radius.
pub const FLAME_LENGTH_FACTOR: f64 = 0.6;

/// Radius (px) of the off-screen indicator marker.
pub const INDICATOR_RADIUS: f64 = 6.0;

// ── HUD ──────────────────────────────────────────────────────────────────────

pub const HUD_FONT_SIZE: f32 = 16.0;
