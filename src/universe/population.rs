//! Initial seeding and distance-based loading / unloading of bodies.
//!
//! [`Universe::reconcile`] keeps a roughly constant population around a moving
//! point of interest: far bodies are dropped and new ones are synthesized on
//! a ring just outside the visible area, with a tangential velocity so the
//! field drifts in a quasi-orbital way instead of sitting still.

use super::Universe;
use crate::body::{Body, BodyId};
use crate::constants::{
    DEFAULT_BODY_COLOR, LOADED_MIN_RADIUS, LOADED_RADIUS_RANGE, LOADED_SPEED_RADIUS_DIVISOR,
    LOAD_RADIUS, SEED_BODY_COUNT, SEED_CENTER_X, SEED_CENTER_Y, SEED_MAX_RADIUS, SEED_MAX_SPEED,
    SEED_SPREAD, SPAWN_BUFFER, TARGET_BODY_COUNT, UNLOAD_RADIUS,
};
use crate::error::{
    validate_non_negative, validate_positive, validate_unload_radius, SimError, SimResult,
};
use crate::vector::Vector2;
use bevy::color::Color;
use bevy::log::debug;
use rand::Rng;
use std::f64::consts::TAU;

/// Parameters of one reconcile pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationParams {
    /// Inner edge of the spawn ring, measured from the tracked center.
    pub load_radius: f64,
    /// Bodies beyond this distance from the center are removed.
    pub unload_radius: f64,
    /// Width of the spawn ring.
    pub spawn_buffer: f64,
    pub target_count: usize,
    pub min_radius: f64,
    /// Radii are drawn from `[min_radius, min_radius + radius_range)`.
    pub radius_range: f64,
}

impl Default for PopulationParams {
    fn default() -> Self {
        Self {
            load_radius: LOAD_RADIUS,
            unload_radius: UNLOAD_RADIUS,
            spawn_buffer: SPAWN_BUFFER,
            target_count: TARGET_BODY_COUNT,
            min_radius: LOADED_MIN_RADIUS,
            radius_range: LOADED_RADIUS_RANGE,
        }
    }
}

impl PopulationParams {
    pub fn validate(&self) -> SimResult<()> {
        validate_unload_radius(self.load_radius, self.spawn_buffer, self.unload_radius)?;
        validate_positive("LOADED_MIN_RADIUS", self.min_radius)?;
        validate_non_negative("LOADED_RADIUS_RANGE", self.radius_range)?;
        Ok(())
    }

    /// Build one body on the spawn ring around `center`.
    fn synthesize<R: Rng + ?Sized>(&self, center: Vector2, rng: &mut R) -> SimResult<Body> {
        let angle = rng.gen::<f64>() * TAU;
        let distance = self.load_radius + rng.gen::<f64>() * self.spawn_buffer;
        let position = center + Vector2::from_angle(angle) * distance;

        let radius = self.min_radius + rng.gen::<f64>() * self.radius_range;

        Body::new(radius, position, orbital_velocity(position, radius), DEFAULT_BODY_COLOR)
    }
}

/// Tangential velocity about the world origin, faster for bigger bodies.
///
/// `(y, -x) / |pos| * radius / 5`; a body exactly at the origin gets none.
pub fn orbital_velocity(position: Vector2, radius: f64) -> Vector2 {
    let r = position.magnitude();
    if r == 0.0 {
        return Vector2::ZERO;
    }
    Vector2::new(position.y / r, -position.x / r) * (radius / LOADED_SPEED_RADIUS_DIVISOR)
}

/// What a reconcile pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub unloaded: Vec<BodyId>,
    pub loaded: Vec<BodyId>,
}

/// Parameters of the startup field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldParams {
    pub count: usize,
    /// Radii are whole numbers in `1..=max_radius`.
    pub max_radius: u32,
    pub center: Vector2,
    /// Half-extent of the square field along each axis.
    pub spread: f64,
    /// Per-axis speed bound.
    pub max_speed: f64,
    pub color: Color,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            count: SEED_BODY_COUNT,
            max_radius: SEED_MAX_RADIUS,
            center: Vector2::new(SEED_CENTER_X, SEED_CENTER_Y),
            spread: SEED_SPREAD,
            max_speed: SEED_MAX_SPEED,
            color: DEFAULT_BODY_COLOR,
        }
    }
}

impl Universe {
    /// Unload bodies farther than `params.unload_radius` from `center`, then
    /// synthesize new ones until the population reaches `params.target_count`.
    ///
    /// Synthesized bodies get `Loaded` ids.  A population already at or above
    /// the target is only culled, never trimmed.
    pub fn reconcile<R: Rng + ?Sized>(
        &mut self,
        center: Vector2,
        params: &PopulationParams,
        rng: &mut R,
    ) -> SimResult<ReconcileReport> {
        params.validate()?;
        if !center.is_finite() {
            return Err(SimError::NonFiniteVector {
                name: "center",
                x: center.x,
                y: center.y,
            });
        }

        let mut report = ReconcileReport::default();

        let far: Vec<BodyId> = self
            .iter()
            .filter(|(_, body)| body.position.distance(center) > params.unload_radius)
            .map(|(id, _)| id)
            .collect();
        for id in far {
            self.remove_body(id);
            report.unloaded.push(id);
        }

        while self.len() < params.target_count {
            let body = params.synthesize(center, rng)?;
            report.loaded.push(self.add_loaded_body(body));
        }

        if !report.unloaded.is_empty() || !report.loaded.is_empty() {
            debug!(
                "[population] unloaded {}, loaded {}, now {}",
                report.unloaded.len(),
                report.loaded.len(),
                self.len()
            );
        }
        Ok(report)
    }

    /// Scatter `params.count` bodies over a square field.
    ///
    /// Uses the sequential id space, like any other explicit spawn.
    pub fn seed_field<R: Rng + ?Sized>(
        &mut self,
        params: &FieldParams,
        rng: &mut R,
    ) -> SimResult<Vec<BodyId>> {
        if params.max_radius == 0 {
            return Err(SimError::UnsafeConstant {
                name: "SEED_MAX_RADIUS",
                value: 0.0,
                safe_range: "[1, ∞)",
            });
        }
        validate_non_negative("SEED_SPREAD", params.spread)?;
        validate_non_negative("SEED_MAX_SPEED", params.max_speed)?;

        let mut ids = Vec::with_capacity(params.count);
        for _ in 0..params.count {
            let radius = rng.gen_range(1..=params.max_radius) as f64;
            let position = params.center
                + Vector2::new(
                    rng.gen_range(-1.0..1.0) * params.spread,
                    rng.gen_range(-1.0..1.0) * params.spread,
                );
            let velocity = Vector2::new(
                rng.gen_range(-1.0..1.0) * params.max_speed,
                rng.gen_range(-1.0..1.0) * params.max_speed,
            );
            let body = Body::new(radius, position, velocity, params.color)?;
            ids.push(self.add_body(body));
        }
        Ok(ids)
    }
}
