//! Directional-thrust actuator ("the ship").
//!
//! A [`Controller`] is owned by the [`Universe`](crate::universe::Universe)
//! and refers to its body by [`BodyId`]; the body refers back by
//! [`ControllerId`].  Binding, rebinding and firing all go through the
//! universe so both halves stay consistent.

use crate::body::BodyId;
use crate::constants::{CONTROLLER_COLOR, THRUST_BASE_RATE, THRUST_REFERENCE_RADIUS};
use crate::vector::Vector2;
use bevy::color::Color;
use std::fmt;

/// Index of a controller in its universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(pub usize);

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// One of the four screen-axis thrusters (y points down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Thruster {
    Up,
    Down,
    Left,
    Right,
}

impl Thruster {
    pub const ALL: [Thruster; 4] = [Thruster::Up, Thruster::Down, Thruster::Left, Thruster::Right];

    /// Unit direction of the acceleration this thruster produces.
    pub fn direction(self) -> Vector2 {
        match self {
            Thruster::Up => Vector2::new(0.0, -1.0),
            Thruster::Down => Vector2::new(0.0, 1.0),
            Thruster::Left => Vector2::new(-1.0, 0.0),
            Thruster::Right => Vector2::new(1.0, 0.0),
        }
    }
}

/// Which thrusters are currently firing.  Read by the renderer for flames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThrusterFlags {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl ThrusterFlags {
    pub fn get(&self, thruster: Thruster) -> bool {
        match thruster {
            Thruster::Up => self.up,
            Thruster::Down => self.down,
            Thruster::Left => self.left,
            Thruster::Right => self.right,
        }
    }

    pub fn set(&mut self, thruster: Thruster, on: bool) {
        match thruster {
            Thruster::Up => self.up = on,
            Thruster::Down => self.down = on,
            Thruster::Left => self.left = on,
            Thruster::Right => self.right = on,
        }
    }

    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Controller {
    body: Option<BodyId>,
    /// Facing, cosmetic only.
    pub direction: Vector2,
    delta_acceleration: f64,
    pub thrusters: ThrusterFlags,
    pub color: Color,
}

impl Default for Controller {
    fn default() -> Self {
        Self {
            body: None,
            direction: Vector2::new(1.0, 0.0),
            delta_acceleration: THRUST_BASE_RATE,
            thrusters: ThrusterFlags::default(),
            color: CONTROLLER_COLOR,
        }
    }
}

impl Controller {
    pub fn body(&self) -> Option<BodyId> {
        self.body
    }

    pub fn delta_acceleration(&self) -> f64 {
        self.delta_acceleration
    }

    /// Acceleration contribution of one thruster at the current thrust scale.
    pub fn thrust(&self, thruster: Thruster) -> Vector2 {
        thruster.direction() * self.delta_acceleration
    }

    pub(crate) fn bind(&mut self, body: BodyId, radius: f64) {
        self.body = Some(body);
        self.delta_acceleration = thrust_for_radius(radius);
    }

    pub(crate) fn unbind(&mut self) -> Option<BodyId> {
        self.thrusters = ThrusterFlags::default();
        self.body.take()
    }
}

/// Thrust scale law: linear in the bound body's radius.
pub fn thrust_for_radius(radius: f64) -> f64 {
    THRUST_BASE_RATE * (radius / THRUST_REFERENCE_RADIUS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_radius_gets_base_rate() {
        assert!((thrust_for_radius(THRUST_REFERENCE_RADIUS) - THRUST_BASE_RATE).abs() < 1e-15);
        assert!((thrust_for_radius(10.0) - 0.1).abs() < 1e-15);
    }

    #[test]
    fn thrust_points_along_screen_axes() {
        let mut c = Controller::default();
        c.bind(BodyId::Seq(1), 10.0);
        assert_eq!(c.thrust(Thruster::Up), Vector2::new(0.0, -0.1));
        assert_eq!(c.thrust(Thruster::Down), Vector2::new(0.0, 0.1));
        assert_eq!(c.thrust(Thruster::Left), Vector2::new(-0.1, 0.0));
        assert_eq!(c.thrust(Thruster::Right), Vector2::new(0.1, 0.0));
    }

    #[test]
    fn unbind_clears_flags() {
        let mut c = Controller::default();
        c.bind(BodyId::Seq(3), 5.0);
        c.thrusters.set(Thruster::Left, true);
        assert!(c.thrusters.any());

        assert_eq!(c.unbind(), Some(BodyId::Seq(3)));
        assert_eq!(c.body(), None);
        assert!(!c.thrusters.any());
    }
}
