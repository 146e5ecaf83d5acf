//! Contact detection and inelastic merging.
//!
//! The scan is outer-then-inner in insertion order.  The first inner body in
//! contact with the outer one is merged with it; the product is appended with
//! a fresh id and both inputs are removed.  The outer scan then resumes at the
//! entry that followed the consumed outer body, so products are themselves
//! visited later in the same pass and chains collapse in one call.

use super::Universe;
use crate::body::Body;
use crate::constants::CONTACT_INNER_DISCOUNT;
use bevy::log::debug;

/// Contact test between the body being scanned (`outer`) and a candidate
/// (`inner`).
///
/// Only the inner radius is discounted, so `in_contact(a, b)` and
/// `in_contact(b, a)` can disagree for bodies of different sizes.
pub fn in_contact(outer: &Body, inner: &Body) -> bool {
    outer.position.distance(inner.position)
        <= outer.radius() + inner.radius() * CONTACT_INNER_DISCOUNT
}

impl Universe {
    /// Merge every body in contact.  Returns the number of merges.
    ///
    /// With `enabled == false` nothing is examined and bodies may overlap
    /// freely.
    pub fn resolve_contacts(&mut self, enabled: bool) -> usize {
        if !enabled {
            return 0;
        }

        let mut merges = 0;
        let mut i = 0;
        while i < self.bodies.len() {
            let Some(j) = self.first_contact(i) else {
                i += 1;
                continue;
            };

            let (id_a, id_b) = (self.bodies[i].0, self.bodies[j].0);
            let product = Body::combine(&self.bodies[i].1, &self.bodies[j].1);
            let product_id = self.add_body(product);
            self.remove_body(id_a);
            self.remove_body(id_b);
            merges += 1;

            debug!("[merge] {} + {} -> {}", id_a, id_b, product_id);

            // The entry after A shifted down by one if B sat before it.
            if j < i {
                i -= 1;
            }
        }
        merges
    }

    fn first_contact(&self, i: usize) -> Option<usize> {
        let outer = &self.bodies[i].1;
        self.bodies
            .iter()
            .enumerate()
            .find(|(j, (_, inner))| *j != i && in_contact(outer, inner))
            .map(|(j, _)| j)
    }
}
