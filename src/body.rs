//! Point-mass discs and the inelastic merge rule.
//!
//! A body's mass is a pure function of its radius (`m = π/3 · r³`), so the
//! only way to change mass is to build a new body.  [`Body::combine`] does
//! that when two bodies collide.

use crate::constants::DEFAULT_BODY_COLOR;
use crate::controller::ControllerId;
use crate::error::{SimError, SimResult};
use crate::vector::Vector2;
use bevy::color::Color;
use std::f64::consts::PI;
use std::fmt;

/// Identity of a body inside one [`crate::universe::Universe`].
///
/// `Seq` ids come from the monotonic counter behind `add_body` (seeding,
/// clicks, merge products).  `Loaded` ids come from a separate counter used by
/// population reconcile.  Neither is ever reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyId {
    Seq(u64),
    Loaded(u64),
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyId::Seq(n) => write!(f, "#{}", n),
            BodyId::Loaded(n) => write!(f, "L{}", n),
        }
    }
}

/// Mass of a disc of the given radius.
pub fn radius_to_mass(radius: f64) -> f64 {
    (PI / 3.0) * radius.powi(3)
}

/// Inverse of [`radius_to_mass`].
pub fn mass_to_radius(mass: f64) -> f64 {
    ((3.0 * mass) / PI).cbrt()
}

/// A disc in the universe.
///
/// `position`, `velocity` and `acceleration` are open for the integrator and
/// input systems.  Finiteness is checked by the constructors only; code that
/// writes these fields directly can call [`Body::validate`] afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    radius: f64,
    mass: f64,
    pub position: Vector2,
    pub velocity: Vector2,
    pub acceleration: Vector2,
    /// Cosmetic only; physics never reads it.
    pub color: Color,
    controller: Option<ControllerId>,
}

impl Body {
    /// Build a body at rest acceleration-wise.
    ///
    /// Rejects radii that are not strictly positive and finite, and positions
    /// or velocities containing NaN / infinity.
    pub fn new(radius: f64, position: Vector2, velocity: Vector2, color: Color) -> SimResult<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(SimError::InvalidRadius { radius });
        }
        check_finite("position", position)?;
        check_finite("velocity", velocity)?;
        Ok(Self::from_parts(radius, position, velocity, color))
    }

    /// Build a body whose radius is derived from `mass`.
    pub fn with_mass(mass: f64, position: Vector2, velocity: Vector2, color: Color) -> SimResult<Self> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(SimError::InvalidMass { mass });
        }
        Self::new(mass_to_radius(mass), position, velocity, color)
    }

    fn from_parts(radius: f64, position: Vector2, velocity: Vector2, color: Color) -> Self {
        Self {
            radius,
            mass: radius_to_mass(radius),
            position,
            velocity,
            acceleration: Vector2::ZERO,
            color,
            controller: None,
        }
    }

    /// Re-check what the constructors enforce.
    pub fn validate(&self) -> SimResult<()> {
        check_finite("position", self.position)?;
        check_finite("velocity", self.velocity)?;
        check_finite("acceleration", self.acceleration)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn momentum(&self) -> Vector2 {
        self.velocity * self.mass
    }

    pub fn controller(&self) -> Option<ControllerId> {
        self.controller
    }

    /// Semi-implicit Euler: velocity first, then position with the new velocity.
    pub fn integrate(&mut self, dt: f64) {
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;
    }

    pub fn reset_acceleration(&mut self) {
        self.acceleration = Vector2::ZERO;
    }

    /// Accumulate; never overwrites.
    pub fn apply_acceleration(&mut self, accel: Vector2) {
        self.acceleration += accel;
    }

    /// Body half of a controller binding.  The controller half (and the
    /// thrust rescale) is done by [`crate::universe::Universe::attach_controller`].
    pub(crate) fn bind_controller(&mut self, id: ControllerId, color: Color) {
        self.controller = Some(id);
        self.color = color;
    }

    /// Hand the controller id over without touching the color.  Used when the
    /// universe takes ownership of a merge product.
    pub(crate) fn take_controller(&mut self) -> Option<ControllerId> {
        self.controller.take()
    }

    /// Drop the controller reference and revert to the default color.
    pub(crate) fn release_controller(&mut self) -> Option<ControllerId> {
        let previous = self.controller.take();
        if previous.is_some() {
            self.color = DEFAULT_BODY_COLOR;
        }
        previous
    }

    /// Inelastic merge of `a` and `b`.
    ///
    /// Mass is additive, position is the center of mass and velocity conserves
    /// momentum.  Color and controller come from the heavier input (`a` on a
    /// tie).  The product carries the controller id but the controller itself
    /// still points at the old body until the universe re-attaches it.
    pub fn combine(a: &Body, b: &Body) -> Body {
        let total_mass = a.mass + b.mass;

        let position = Vector2::new(
            (a.position.x * a.mass + b.position.x * b.mass) / total_mass,
            (a.position.y * a.mass + b.position.y * b.mass) / total_mass,
        );
        let velocity = Vector2::new(
            (a.velocity.x * a.mass + b.velocity.x * b.mass) / total_mass,
            (a.velocity.y * a.mass + b.velocity.y * b.mass) / total_mass,
        );

        let dominant = if b.mass > a.mass { b } else { a };

        let mut product = Body::from_parts(mass_to_radius(total_mass), position, velocity, dominant.color);
        // Keep the exact sum rather than re-deriving it through a cube root.
        product.mass = total_mass;
        product.controller = dominant.controller;
        product
    }
}

fn check_finite(name: &'static str, v: Vector2) -> SimResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(SimError::NonFiniteVector { name, x: v.x, y: v.y })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(radius: f64, x: f64, vx: f64) -> Body {
        Body::new(radius, Vector2::new(x, 0.0), Vector2::new(vx, 0.0), Color::WHITE).unwrap()
    }

    #[test]
    fn mass_radius_laws_are_inverse() {
        for r in [0.1, 1.0, 2.5, 7.0, 120.0] {
            let back = mass_to_radius(radius_to_mass(r));
            assert!((back - r).abs() < 1e-9 * r.max(1.0), "r={r}, back={back}");
        }
    }

    #[test]
    fn construction_derives_mass() {
        let b = body_at(3.0, 0.0, 0.0);
        assert!((b.mass() - PI * 9.0).abs() < 1e-12);
        assert_eq!(b.acceleration, Vector2::ZERO);
        assert_eq!(b.controller(), None);
    }

    #[test]
    fn rejects_bad_radius_and_nan_vectors() {
        let z = Vector2::ZERO;
        assert!(matches!(
            Body::new(0.0, z, z, Color::WHITE),
            Err(SimError::InvalidRadius { .. })
        ));
        assert!(matches!(
            Body::new(f64::NAN, z, z, Color::WHITE),
            Err(SimError::InvalidRadius { .. })
        ));
        assert!(matches!(
            Body::new(1.0, Vector2::new(f64::NAN, 0.0), z, Color::WHITE),
            Err(SimError::NonFiniteVector { name: "position", .. })
        ));
        assert!(matches!(
            Body::new(1.0, z, Vector2::new(0.0, f64::INFINITY), Color::WHITE),
            Err(SimError::NonFiniteVector { name: "velocity", .. })
        ));
        assert!(matches!(
            Body::with_mass(-2.0, z, z, Color::WHITE),
            Err(SimError::InvalidMass { .. })
        ));
    }

    #[test]
    fn validate_catches_fields_written_after_construction() {
        let mut b = body_at(1.0, 0.0, 0.0);
        assert_eq!(b.validate(), Ok(()));

        b.position.x = f64::NAN;
        assert!(matches!(
            b.validate(),
            Err(SimError::NonFiniteVector { name: "position", .. })
        ));

        b.position = Vector2::ZERO;
        b.acceleration = Vector2::new(f64::INFINITY, 0.0);
        assert!(matches!(
            b.validate(),
            Err(SimError::NonFiniteVector { name: "acceleration", .. })
        ));
    }

    #[test]
    fn integrate_updates_velocity_before_position() {
        let mut b = body_at(1.0, 0.0, 0.0);
        b.apply_acceleration(Vector2::new(2.0, 0.0));
        b.integrate(0.5);
        // v = 0 + 2*0.5 = 1, x = 0 + 1*0.5 = 0.5 (explicit Euler would give 0).
        assert_eq!(b.velocity, Vector2::new(1.0, 0.0));
        assert_eq!(b.position, Vector2::new(0.5, 0.0));
    }

    #[test]
    fn apply_acceleration_accumulates_and_reset_clears() {
        let mut b = body_at(1.0, 0.0, 0.0);
        b.apply_acceleration(Vector2::new(1.0, 1.0));
        b.apply_acceleration(Vector2::new(1.0, -3.0));
        assert_eq!(b.acceleration, Vector2::new(2.0, -2.0));
        b.reset_acceleration();
        assert_eq!(b.acceleration, Vector2::ZERO);
    }

    #[test]
    fn combine_conserves_mass_and_momentum() {
        let a = body_at(2.0, 0.0, 3.0);
        let b = body_at(1.0, 4.0, -1.0);

        let m = Body::combine(&a, &b);
        assert_eq!(m.mass(), a.mass() + b.mass());

        let p_before = a.momentum() + b.momentum();
        let p_after = m.momentum();
        assert!((p_before.x - p_after.x).abs() < 1e-9);
        assert!((p_before.y - p_after.y).abs() < 1e-9);

        let expected_x = (0.0 * a.mass() + 4.0 * b.mass()) / (a.mass() + b.mass());
        assert!((m.position.x - expected_x).abs() < 1e-12);
        assert!((m.radius() - mass_to_radius(a.mass() + b.mass())).abs() < 1e-12);
    }

    #[test]
    fn combine_takes_controller_and_color_from_heavier() {
        let mut small = body_at(1.0, 0.0, 0.0);
        let big = body_at(2.0, 1.0, 0.0);
        small.bind_controller(ControllerId(0), Color::BLACK);

        let m = Body::combine(&small, &big);
        assert_eq!(m.controller(), None);
        assert_eq!(m.color, Color::WHITE);

        let m = Body::combine(&big, &small);
        assert_eq!(m.controller(), None);
    }

    #[test]
    fn combine_tie_prefers_first_argument() {
        let mut a = body_at(1.0, 0.0, 0.0);
        let b = body_at(1.0, 1.0, 0.0);
        a.bind_controller(ControllerId(7), Color::BLACK);

        assert_eq!(Body::combine(&a, &b).controller(), Some(ControllerId(7)));
        assert_eq!(Body::combine(&b, &a).controller(), None);
    }

    #[test]
    fn release_controller_reverts_color() {
        let mut b = body_at(1.0, 0.0, 0.0);
        b.bind_controller(ControllerId(1), Color::BLACK);
        assert_eq!(b.release_controller(), Some(ControllerId(1)));
        assert_eq!(b.color, DEFAULT_BODY_COLOR);
        assert_eq!(b.release_controller(), None);
    }
}
