//! Pairwise Newtonian gravity.
//!
//! Every unordered pair is visited exactly once, in insertion order, and both
//! bodies receive their share of the interaction in the same visit.  O(N²);
//! no partitioning.

use super::Universe;
use crate::body::Body;
use crate::vector::Vector2;

/// Accelerations `(on_a, on_b)` that `a` and `b` impart on each other.
///
/// Returns `None` when the bodies coincide (`|d|³ == 0`); the pair then
/// contributes nothing in either direction.
pub fn pair_accelerations(gravity_const: f64, a: &Body, b: &Body) -> Option<(Vector2, Vector2)> {
    let d = b.position - a.position;
    let r3 = d.magnitude().powi(3);
    if r3 == 0.0 {
        return None;
    }

    let on_a = d * (gravity_const * b.mass() / r3);
    let on_b = -d * (gravity_const * a.mass() / r3);
    Some((on_a, on_b))
}

impl Universe {
    /// Zero every accumulator, then add the gravity of every pair.
    ///
    /// Called by [`Universe::step`] after integration.  Call it directly once
    /// before the first step to prime accelerations from the initial layout.
    pub fn compute_forces(&mut self) {
        let g = self.gravity_const;

        for (_, body) in self.bodies.iter_mut() {
            body.reset_acceleration();
        }

        for i in 0..self.bodies.len() {
            let (head, tail) = self.bodies.split_at_mut(i + 1);
            let a = &mut head[i].1;
            for (_, b) in tail.iter_mut() {
                if let Some((on_a, on_b)) = pair_accelerations(g, a, b) {
                    a.apply_acceleration(on_a);
                    b.apply_acceleration(on_b);
                }
            }
        }
    }
}
