//! Screen ↔ world transform for the sandbox camera.
//!
//! Screen space is window pixels with the origin top-left and y growing down,
//! which is the convention Bevy's `Window::cursor_position` reports.  World
//! space uses the same orientation, so the transform is a uniform scale about
//! the viewport center plus a translation.  The render layer flips y when it
//! hands positions to Bevy's y-up world.

use crate::constants::{MAX_ZOOM, MIN_ZOOM};
use crate::vector::Vector2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewFrame {
    /// World point shown at the middle of the viewport.
    pub center: Vector2,
    /// Screen pixels per world unit.
    zoom: f64,
    /// Viewport size in pixels.
    pub viewport: Vector2,
    min_zoom: f64,
    max_zoom: f64,
}

impl Default for ViewFrame {
    fn default() -> Self {
        Self::new(Vector2::new(1280.0, 720.0))
    }
}

impl ViewFrame {
    pub fn new(viewport: Vector2) -> Self {
        Self {
            center: Vector2::ZERO,
            zoom: 1.0,
            viewport,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }

    /// Replace the zoom bounds and re-clamp the current zoom.
    ///
    /// Inverted bounds are swapped.
    pub fn with_zoom_limits(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.min_zoom = min_zoom.min(max_zoom);
        self.max_zoom = max_zoom.max(min_zoom);
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
        self
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
    }

    fn half_viewport(&self) -> Vector2 {
        self.viewport * 0.5
    }

    pub fn world_to_screen(&self, world: Vector2) -> Vector2 {
        (world - self.center) * self.zoom + self.half_viewport()
    }

    pub fn screen_to_world(&self, screen: Vector2) -> Vector2 {
        (screen - self.half_viewport()) * (1.0 / self.zoom) + self.center
    }

    /// Multiply the zoom by `factor`, keeping the world point under `screen`
    /// where it is on screen.  The result is clamped to the zoom bounds.
    pub fn zoom_about(&mut self, screen: Vector2, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let anchor = self.screen_to_world(screen);
        self.set_zoom(self.zoom * factor);
        self.center = anchor - (screen - self.half_viewport()) * (1.0 / self.zoom);
    }

    pub fn follow(&mut self, target: Vector2) {
        self.center = target;
    }

    /// Whether `world` lands on screen, grown by `margin` pixels on every side.
    pub fn contains(&self, world: Vector2, margin: f64) -> bool {
        let s = self.world_to_screen(world);
        s.x >= -margin
            && s.y >= -margin
            && s.x <= self.viewport.x + margin
            && s.y <= self.viewport.y + margin
    }

    /// Screen point on a border `inset` pixels inside the viewport, in the
    /// direction of an off-screen `world` point.  `None` while it is visible.
    pub fn edge_indicator(&self, world: Vector2, inset: f64) -> Option<Vector2> {
        if self.contains(world, 0.0) {
            return None;
        }

        let half = self.half_viewport();
        let toward = self.world_to_screen(world) - half;
        let extent = Vector2::new((half.x - inset).max(0.0), (half.y - inset).max(0.0));

        // Largest t with |toward.x * t| <= extent.x and |toward.y * t| <= extent.y.
        let tx = if toward.x != 0.0 { extent.x / toward.x.abs() } else { f64::INFINITY };
        let ty = if toward.y != 0.0 { extent.y / toward.y.abs() } else { f64::INFINITY };
        let t = tx.min(ty);
        if !t.is_finite() {
            return None;
        }
        Some(half + toward * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vector2, b: Vector2) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    fn frame() -> ViewFrame {
        let mut v = ViewFrame::new(Vector2::new(800.0, 600.0));
        v.follow(Vector2::new(100.0, -50.0));
        v.set_zoom(2.0);
        v
    }

    #[test]
    fn center_maps_to_viewport_middle() {
        let v = frame();
        assert!(approx(v.world_to_screen(v.center), Vector2::new(400.0, 300.0)));
    }

    #[test]
    fn screen_world_round_trip() {
        let v = frame();
        for p in [Vector2::new(0.0, 0.0), Vector2::new(-321.5, 77.0), Vector2::new(1e4, -2e3)] {
            assert!(approx(v.screen_to_world(v.world_to_screen(p)), p));
        }
    }

    #[test]
    fn zoom_about_keeps_anchor_fixed() {
        let mut v = frame();
        let cursor = Vector2::new(120.0, 500.0);
        let before = v.screen_to_world(cursor);
        v.zoom_about(cursor, 1.7);
        assert!((v.zoom() - 3.4).abs() < 1e-12);
        assert!(approx(v.screen_to_world(cursor), before));
    }

    #[test]
    fn zoom_is_clamped_and_anchor_still_holds() {
        let mut v = frame().with_zoom_limits(0.5, 4.0);
        let cursor = Vector2::new(700.0, 20.0);
        let before = v.screen_to_world(cursor);
        v.zoom_about(cursor, 100.0);
        assert_eq!(v.zoom(), 4.0);
        assert!(approx(v.screen_to_world(cursor), before));

        v.zoom_about(cursor, 1e-6);
        assert_eq!(v.zoom(), 0.5);
    }

    #[test]
    fn bad_zoom_factor_is_ignored() {
        let mut v = frame();
        let center = v.center;
        v.zoom_about(Vector2::new(1.0, 1.0), 0.0);
        v.zoom_about(Vector2::new(1.0, 1.0), f64::NAN);
        assert_eq!(v.zoom(), 2.0);
        assert_eq!(v.center, center);
    }

    #[test]
    fn contains_honours_margin() {
        let v = frame();
        // 210 world units right of center -> 400 + 420 = 820 px, 20 px off screen.
        let p = Vector2::new(310.0, -50.0);
        assert!(!v.contains(p, 0.0));
        assert!(v.contains(p, 25.0));
    }

    #[test]
    fn indicator_is_none_when_visible() {
        let v = frame();
        assert_eq!(v.edge_indicator(v.center, 20.0), None);
    }

    #[test]
    fn indicator_sits_on_inset_border() {
        let v = frame();
        // Straight to the right, far away.
        let right = v.edge_indicator(Vector2::new(10_000.0, -50.0), 20.0).unwrap();
        assert!(approx(right, Vector2::new(780.0, 300.0)));

        // Straight up (negative world y is up on screen).
        let up = v.edge_indicator(Vector2::new(100.0, -10_000.0), 20.0).unwrap();
        assert!(approx(up, Vector2::new(400.0, 20.0)));

        // Diagonal: whichever edge the ray hits first.
        let diag = v
            .edge_indicator(Vector2::new(100.0 + 1000.0, -50.0 + 1000.0), 20.0)
            .unwrap();
        assert!((diag.y - 580.0).abs() < 1e-9);
        assert!(diag.x > 400.0 && diag.x < 780.0);
    }
}
