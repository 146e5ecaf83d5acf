//! Runtime physics configuration loaded from `assets/physics.toml`.
//!
//! [`PhysicsConfig`] is a Bevy [`Resource`] that mirrors the tunable constants
//! in [`crate::constants`].  At startup, [`load_physics_config`] reads
//! `assets/physics.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the constants you care about:
//!
//! ```toml
//! gravity_const = 0.25
//! seed_body_count = 200
//! rng_seed = 42
//! ```
//!
//! A file that parses but fails [`PhysicsConfig::validate`] is rejected as a
//! whole; the sandbox then runs on compiled defaults.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `PhysicsConfig::default()`.

use crate::constants::*;
use crate::error::{
    validate_gravity_const, validate_non_negative, validate_positive, SimError, SimResult,
};
use crate::universe::{FieldParams, PopulationParams};
use crate::vector::Vector2;
use bevy::prelude::*;
use serde::Deserialize;

/// Default location of the override file, relative to the working directory.
pub const PHYSICS_CONFIG_PATH: &str = "assets/physics.toml";

/// Runtime-tunable physics and sandbox configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    // ── Physics: Gravity ──────────────────────────────────────────────────────
    pub gravity_const: f64,

    // ── Physics: Collision ────────────────────────────────────────────────────
    pub merging_enabled: bool,

    // ── Population ────────────────────────────────────────────────────────────
    pub population_enabled: bool,
    pub load_radius: f64,
    pub unload_radius: f64,
    pub spawn_buffer: f64,
    pub target_body_count: usize,
    pub loaded_min_radius: f64,
    pub loaded_radius_range: f64,

    // ── Initial seeding ───────────────────────────────────────────────────────
    pub seed_body_count: usize,
    pub seed_max_radius: u32,
    pub seed_center_x: f64,
    pub seed_center_y: f64,
    pub seed_spread: f64,
    pub seed_max_speed: f64,
    /// Fixed seed for reproducible runs; entropy when absent.
    pub rng_seed: Option<u64>,

    // ── Input / UI ────────────────────────────────────────────────────────────
    pub time_step: f64,
    pub click_radius: f64,
    pub mouse_velocity_factor: f64,
    pub mouse_dead_zone: f64,

    // ── Camera ────────────────────────────────────────────────────────────────
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_speed: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            // Gravity
            gravity_const: GRAVITY_CONST,
            // Collision
            merging_enabled: MERGING_ENABLED,
            // Population
            population_enabled: POPULATION_ENABLED,
            load_radius: LOAD_RADIUS,
            unload_radius: UNLOAD_RADIUS,
            spawn_buffer: SPAWN_BUFFER,
            target_body_count: TARGET_BODY_COUNT,
            loaded_min_radius: LOADED_MIN_RADIUS,
            loaded_radius_range: LOADED_RADIUS_RANGE,
            // Seeding
            seed_body_count: SEED_BODY_COUNT,
            seed_max_radius: SEED_MAX_RADIUS,
            seed_center_x: SEED_CENTER_X,
            seed_center_y: SEED_CENTER_Y,
            seed_spread: SEED_SPREAD,
            seed_max_speed: SEED_MAX_SPEED,
            rng_seed: None,
            // Input / UI
            time_step: TIME_STEP,
            click_radius: CLICK_RADIUS,
            mouse_velocity_factor: MOUSE_VELOCITY_FACTOR,
            mouse_dead_zone: MOUSE_DEAD_ZONE,
            // Camera
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_speed: ZOOM_SPEED,
        }
    }
}

impl PhysicsConfig {
    /// Parse a TOML document; absent keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> SimResult<()> {
        validate_gravity_const(self.gravity_const)?;
        self.population_params().validate()?;
        if self.seed_max_radius == 0 {
            return Err(SimError::UnsafeConstant {
                name: "SEED_MAX_RADIUS",
                value: 0.0,
                safe_range: "[1, ∞)",
            });
        }
        validate_non_negative("SEED_SPREAD", self.seed_spread)?;
        validate_non_negative("SEED_MAX_SPEED", self.seed_max_speed)?;
        validate_non_negative("TIME_STEP", self.time_step)?;
        validate_positive("CLICK_RADIUS", self.click_radius)?;
        validate_non_negative("MOUSE_VELOCITY_FACTOR", self.mouse_velocity_factor)?;
        validate_non_negative("MOUSE_DEAD_ZONE", self.mouse_dead_zone)?;
        validate_positive("MIN_ZOOM", self.min_zoom)?;
        validate_positive("MAX_ZOOM", self.max_zoom)?;
        if self.max_zoom < self.min_zoom {
            return Err(SimError::UnsafeConstant {
                name: "MAX_ZOOM",
                value: self.max_zoom,
                safe_range: "[MIN_ZOOM, ∞)",
            });
        }
        validate_non_negative("ZOOM_SPEED", self.zoom_speed)?;
        Ok(())
    }

    pub fn population_params(&self) -> PopulationParams {
        PopulationParams {
            load_radius: self.load_radius,
            unload_radius: self.unload_radius,
            spawn_buffer: self.spawn_buffer,
            target_count: self.target_body_count,
            min_radius: self.loaded_min_radius,
            radius_range: self.loaded_radius_range,
        }
    }

    pub fn field_params(&self) -> FieldParams {
        FieldParams {
            count: self.seed_body_count,
            max_radius: self.seed_max_radius,
            center: Vector2::new(self.seed_center_x, self.seed_center_y),
            spread: self.seed_spread,
            max_speed: self.seed_max_speed,
            ..Default::default()
        }
    }
}

/// Startup system: attempt to load `assets/physics.toml` and overwrite the
/// `PhysicsConfig` resource with the values present in the file.
///
/// Parse and validation failures are logged and the compiled defaults stay in
/// place.  A missing file only produces an info line.
pub fn load_physics_config(mut config: ResMut<PhysicsConfig>) {
    let path = PHYSICS_CONFIG_PATH;
    match std::fs::read_to_string(path) {
        Ok(contents) => match PhysicsConfig::from_toml_str(&contents) {
            Ok(loaded) => match loaded.validate() {
                Ok(()) => {
                    *config = loaded;
                    info!("[config] loaded physics config from {path}");
                }
                Err(e) => warn!("[config] rejected {path}: {e}; using defaults"),
            },
            Err(e) => warn!("[config] failed to parse {path}: {e}; using defaults"),
        },
        Err(_) => info!("[config] no {path} found; using compiled defaults"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(PhysicsConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = PhysicsConfig::from_toml_str("gravity_const = 0.25\nrng_seed = 42\n").unwrap();
        assert_eq!(cfg.gravity_const, 0.25);
        assert_eq!(cfg.rng_seed, Some(42));
        assert_eq!(cfg.seed_body_count, SEED_BODY_COUNT);
        assert_eq!(cfg.load_radius, LOAD_RADIUS);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(
            PhysicsConfig::from_toml_str("").unwrap(),
            PhysicsConfig::default()
        );
    }

    #[test]
    fn wrong_type_fails_to_parse() {
        assert!(PhysicsConfig::from_toml_str("gravity_const = \"strong\"").is_err());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let bad_gravity = PhysicsConfig {
            gravity_const: 0.0,
            ..Default::default()
        };
        assert!(bad_gravity.validate().is_err());

        let inverted = PhysicsConfig {
            load_radius: 500.0,
            unload_radius: 100.0,
            ..Default::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(SimError::UnsafeConstant { name: "UNLOAD_RADIUS", .. })
        ));

        // Spawn ring (load + buffer) pokes out past the unload radius.
        let ring_overshoot = PhysicsConfig {
            load_radius: 100.0,
            spawn_buffer: 100.0,
            unload_radius: 120.0,
            ..Default::default()
        };
        assert!(matches!(
            ring_overshoot.validate(),
            Err(SimError::UnsafeConstant { name: "UNLOAD_RADIUS", .. })
        ));

        let zoom = PhysicsConfig {
            min_zoom: 3.0,
            max_zoom: 2.0,
            ..Default::default()
        };
        assert!(zoom.validate().is_err());
    }

    #[test]
    fn params_mirror_fields() {
        let cfg = PhysicsConfig {
            target_body_count: 12,
            seed_center_x: -5.0,
            ..Default::default()
        };
        assert_eq!(cfg.population_params().target_count, 12);
        assert_eq!(cfg.field_params().center, Vector2::new(-5.0, SEED_CENTER_Y));
    }
}
