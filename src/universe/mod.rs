//! The universe: owner of every body and controller.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`forces`] | Pairwise gravity pass (`compute_forces`) |
//! | [`merge`] | Contact detection and inelastic merging (`resolve_contacts`) |
//! | [`population`] | Initial seeding and distance-based load / unload (`seed_field`, `reconcile`) |
//!
//! This file holds the arena itself: insertion-ordered storage, id
//! allocation, controller binding, the most-massive tracker and `step`.
//!
//! ## Ordering
//!
//! Bodies live in a `Vec` in insertion order.  Force pairs, merge scans and
//! rendering all iterate that order, so a run is reproducible bit-for-bit
//! from the same inputs.

pub mod forces;
pub mod merge;
pub mod population;

pub use merge::in_contact;
pub use population::{FieldParams, PopulationParams, ReconcileReport};

use crate::body::{Body, BodyId};
use crate::constants::GRAVITY_CONST;
use crate::controller::{Controller, ControllerId, Thruster};
use crate::error::{validate_gravity_const, SimError, SimResult};
use crate::vector::Vector2;
use bevy::log::warn;
use bevy::prelude::Resource;

#[derive(Resource, Debug, Clone)]
pub struct Universe {
    gravity_const: f64,
    bodies: Vec<(BodyId, Body)>,
    controllers: Vec<Controller>,
    next_seq: u64,
    next_loaded: u64,
    most_massive: Option<BodyId>,
    /// Set when the tracked body was removed; the next query rescans.
    most_massive_stale: bool,
}

impl Default for Universe {
    fn default() -> Self {
        Self {
            gravity_const: GRAVITY_CONST,
            bodies: Vec::new(),
            controllers: Vec::new(),
            next_seq: 0,
            next_loaded: 0,
            most_massive: None,
            most_massive_stale: false,
        }
    }
}

impl Universe {
    pub fn new(gravity_const: f64) -> SimResult<Self> {
        validate_gravity_const(gravity_const)?;
        Ok(Self {
            gravity_const,
            ..Default::default()
        })
    }

    pub fn gravity_const(&self) -> f64 {
        self.gravity_const
    }

    pub fn set_gravity_const(&mut self, value: f64) -> SimResult<()> {
        validate_gravity_const(value)?;
        self.gravity_const = value;
        Ok(())
    }

    // ── Stepping ──────────────────────────────────────────────────────────────

    /// Advance by `dt`: integrate every body with the accelerations left by
    /// the previous pass, then recompute accelerations from the new positions.
    ///
    /// Thrust applied between two steps therefore lands in the *next*
    /// integration, and is wiped by the force pass right after it.
    pub fn step(&mut self, dt: f64) {
        for (_, body) in self.bodies.iter_mut() {
            body.integrate(dt);
        }
        self.compute_forces();
    }

    // ── Population ────────────────────────────────────────────────────────────

    /// Insert a body under the next sequential id.
    ///
    /// If the body carries a controller id (a merge product does), that
    /// controller is re-attached to it.
    pub fn add_body(&mut self, body: Body) -> BodyId {
        self.next_seq += 1;
        let id = BodyId::Seq(self.next_seq);
        self.insert(id, body);
        id
    }

    pub(crate) fn add_loaded_body(&mut self, body: Body) -> BodyId {
        self.next_loaded += 1;
        let id = BodyId::Loaded(self.next_loaded);
        self.insert(id, body);
        id
    }

    fn insert(&mut self, id: BodyId, mut body: Body) {
        let inherited = body.take_controller();
        let mass = body.mass();
        self.bodies.push((id, body));

        if !self.most_massive_stale {
            let heavier = match self.most_massive.and_then(|cur| self.get(cur)) {
                Some(current) => mass > current.mass(),
                None => true,
            };
            if heavier {
                self.most_massive = Some(id);
            }
        }

        if let Some(controller) = inherited {
            if let Err(err) = self.attach_controller(controller, id) {
                warn!("[universe] could not re-attach {} to {}: {}", controller, id, err);
            }
        }
    }

    /// Remove a body.  Surviving ids are untouched.  A controller bound to it
    /// is left unbound.
    pub fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        let idx = self.index_of(id)?;
        let (_, mut body) = self.bodies.remove(idx);

        if let Some(controller) = body.release_controller() {
            if let Some(c) = self.controllers.get_mut(controller.0) {
                c.unbind();
            }
        }
        if self.most_massive == Some(id) {
            self.most_massive = None;
            self.most_massive_stale = true;
        }
        Some(body)
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|(bid, _)| *bid == id).map(|(_, b)| b)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|(bid, _)| *bid == id).map(|(_, b)| b)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.index_of(id).is_some()
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.iter().position(|(bid, _)| *bid == id)
    }

    /// Bodies in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &Body)> + '_ {
        self.bodies.iter().map(|(id, body)| (*id, body))
    }

    pub fn ids(&self) -> Vec<BodyId> {
        self.bodies.iter().map(|(id, _)| *id).collect()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(|(_, b)| b.mass()).sum()
    }

    pub fn total_momentum(&self) -> Vector2 {
        self.bodies
            .iter()
            .fold(Vector2::ZERO, |acc, (_, b)| acc + b.momentum())
    }

    /// Heaviest body, first in insertion order on ties.
    ///
    /// Kept incrementally on insertion; rescanned lazily after the tracked
    /// body has been removed.
    pub fn most_massive_body(&mut self) -> Option<(BodyId, &Body)> {
        if self.most_massive_stale {
            self.most_massive = self.scan_most_massive();
            self.most_massive_stale = false;
        }
        let id = self.most_massive?;
        self.get(id).map(|body| (id, body))
    }

    fn scan_most_massive(&self) -> Option<BodyId> {
        let mut best: Option<(BodyId, f64)> = None;
        for (id, body) in &self.bodies {
            match best {
                Some((_, mass)) if body.mass() <= mass => {}
                _ => best = Some((*id, body.mass())),
            }
        }
        best.map(|(id, _)| id)
    }

    // ── Controllers ───────────────────────────────────────────────────────────

    /// Register a new, unbound controller.
    pub fn add_controller(&mut self) -> ControllerId {
        self.controllers.push(Controller::default());
        ControllerId(self.controllers.len() - 1)
    }

    pub fn controller(&self, id: ControllerId) -> Option<&Controller> {
        self.controllers.get(id.0)
    }

    /// Cosmetic fields only; binding goes through [`Universe::attach_controller`].
    pub fn controller_mut(&mut self, id: ControllerId) -> Option<&mut Controller> {
        self.controllers.get_mut(id.0)
    }

    pub fn controllers(&self) -> impl Iterator<Item = (ControllerId, &Controller)> + '_ {
        self.controllers
            .iter()
            .enumerate()
            .map(|(i, c)| (ControllerId(i), c))
    }

    /// Bind `controller` to `body`.
    ///
    /// The controller's previous body is released (reference cleared, color
    /// reverted), any other controller driving `body` is unbound, and the
    /// thrust scale is re-derived from `body`'s radius.
    pub fn attach_controller(&mut self, controller: ControllerId, body: BodyId) -> SimResult<()> {
        if controller.0 >= self.controllers.len() {
            return Err(SimError::UnknownController { id: controller });
        }
        if !self.contains(body) {
            return Err(SimError::UnknownBody { id: body });
        }

        if let Some(previous) = self.controllers[controller.0].unbind() {
            if let Some(prev_body) = self.get_mut(previous) {
                prev_body.release_controller();
            }
        }

        let color = self.controllers[controller.0].color;
        let target = self
            .get_mut(body)
            .ok_or(SimError::UnknownBody { id: body })?;
        let displaced = target.release_controller();
        target.bind_controller(controller, color);
        let radius = target.radius();

        if let Some(other) = displaced {
            if let Some(c) = self.controllers.get_mut(other.0) {
                c.unbind();
            }
        }

        self.controllers[controller.0].bind(body, radius);
        Ok(())
    }

    /// Unbind `controller`, returning the body it was driving.
    pub fn detach_controller(&mut self, controller: ControllerId) -> SimResult<Option<BodyId>> {
        let c = self
            .controllers
            .get_mut(controller.0)
            .ok_or(SimError::UnknownController { id: controller })?;
        let previous = c.unbind();
        if let Some(prev_body) = previous.and_then(|id| self.get_mut(id)) {
            prev_body.release_controller();
        }
        Ok(previous)
    }

    /// Mark a thruster as firing or idle (flame rendering only).
    pub fn set_thruster(&mut self, controller: ControllerId, thruster: Thruster, on: bool) -> SimResult<()> {
        let c = self
            .controllers
            .get_mut(controller.0)
            .ok_or(SimError::UnknownController { id: controller })?;
        c.thrusters.set(thruster, on);
        Ok(())
    }

    /// Add one thruster's contribution to the bound body's accumulator.
    ///
    /// An unbound controller yields [`SimError::ControllerUnbound`] and
    /// changes nothing.
    pub fn fire(&mut self, controller: ControllerId, thruster: Thruster) -> SimResult<()> {
        let c = self
            .controllers
            .get(controller.0)
            .ok_or(SimError::UnknownController { id: controller })?;
        let body_id = c.body().ok_or(SimError::ControllerUnbound { id: controller })?;
        let thrust = c.thrust(thruster);
        let body = self
            .get_mut(body_id)
            .ok_or(SimError::UnknownBody { id: body_id })?;
        body.apply_acceleration(thrust);
        Ok(())
    }

    pub fn move_up(&mut self, controller: ControllerId) -> SimResult<()> {
        self.fire(controller, Thruster::Up)
    }

    pub fn move_down(&mut self, controller: ControllerId) -> SimResult<()> {
        self.fire(controller, Thruster::Down)
    }

    pub fn move_left(&mut self, controller: ControllerId) -> SimResult<()> {
        self.fire(controller, Thruster::Left)
    }

    pub fn move_right(&mut self, controller: ControllerId) -> SimResult<()> {
        self.fire(controller, Thruster::Right)
    }
}
