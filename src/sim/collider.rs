//! Circle and elliptical collision primitives
//!
//! Colliders are derived data: recomputed from the owning entity's draw
//! rect every update, never persisted independently. `update` is
//! idempotent and carries no history.

use glam::Vec2;

use super::rect::Rect;

/// Bounding circle derived from a draw rect
#[derive(Debug, Clone, Copy, Default)]
pub struct CircleCollider {
    pub center: Vec2,
    pub radius: f32,
}

impl CircleCollider {
    /// Recompute center/radius from the rect. Radius spans the larger
    /// dimension so non-square sprites stay fully covered.
    pub fn update(&mut self, rect: &Rect) {
        self.radius = rect.width.max(rect.height) / 2.0;
        self.center = rect.center();
    }

    /// Symmetric circle-vs-circle test
    pub fn intersects(&self, other: &CircleCollider) -> bool {
        self.center.distance(other.center) < self.radius + other.radius
    }
}

/// Angular center of the shield opening: straight down
const GAP_CENTER: f32 = std::f32::consts::FRAC_PI_2;

/// Default half-width of the opening in radians (~60 degrees)
const DEFAULT_GAP_WIDTH: f32 = 1.05;

/// Elliptical shield boundary with an open arc at the bottom
///
/// Incoming circles that approach through the gap sector pass freely;
/// everywhere else the dome blocks. The test is one-directional:
/// only ellipse-vs-circle is defined.
#[derive(Debug, Clone, Copy)]
pub struct EllipticalCollider {
    pub center: Vec2,
    pub radius_x: f32,
    pub radius_y: f32,
    pub gap_width: f32,
}

impl Default for EllipticalCollider {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            radius_x: 0.0,
            radius_y: 0.0,
            gap_width: DEFAULT_GAP_WIDTH,
        }
    }
}

impl EllipticalCollider {
    pub fn update(&mut self, rect: &Rect) {
        self.radius_x = rect.width / 2.0;
        self.radius_y = rect.height / 2.0;
        self.center = rect.center();
    }

    /// Ellipse-vs-circle test honoring the bottom gap.
    ///
    /// The circle's offset is normalized by the combined radii per axis;
    /// inside the unit disc means geometric overlap. A hit only counts
    /// when the approach angle falls outside the open gap interval, so
    /// the exact boundary angle still blocks.
    pub fn intersects(&self, other: &CircleCollider) -> bool {
        let d = other.center - self.center;

        let combined_rx = self.radius_x + other.radius;
        let combined_ry = self.radius_y + other.radius;
        if combined_rx <= 0.0 || combined_ry <= 0.0 {
            return false;
        }

        let norm = Vec2::new(d.x / combined_rx, d.y / combined_ry);
        if norm.length_squared() > 1.0 {
            return false;
        }

        let angle = d.y.atan2(d.x);
        if angle > GAP_CENTER - self.gap_width && angle < GAP_CENTER + self.gap_width {
            // Inside the open part of the dome
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn circle(x: f32, y: f32, r: f32) -> CircleCollider {
        CircleCollider {
            center: Vec2::new(x, y),
            radius: r,
        }
    }

    #[test]
    fn test_circle_center_from_rect() {
        let mut c = CircleCollider::default();
        // Non-square rect: center must be the true rect center, not
        // offset by the radius
        c.update(&Rect::new(0.0, 0.0, 100.0, 20.0));
        assert_eq!(c.center, Vec2::new(50.0, 10.0));
        assert_eq!(c.radius, 50.0);
    }

    #[test]
    fn test_circle_update_idempotent() {
        let rect = Rect::new(5.0, 7.0, 30.0, 40.0);
        let mut a = CircleCollider::default();
        a.update(&rect);
        let (center, radius) = (a.center, a.radius);
        a.update(&rect);
        assert_eq!(a.center, center);
        assert_eq!(a.radius, radius);
    }

    #[test]
    fn test_circle_intersects_touching_is_miss() {
        // Exactly touching circles use strict less-than
        let a = circle(0.0, 0.0, 5.0);
        let b = circle(10.0, 0.0, 5.0);
        assert!(!a.intersects(&b));

        let c = circle(9.9, 0.0, 5.0);
        assert!(a.intersects(&c));
    }

    #[test]
    fn test_ellipse_gap_excludes_bottom() {
        let mut shield = EllipticalCollider::default();
        shield.update(&Rect::new(-50.0, -40.0, 100.0, 80.0));

        // Probe directly below center (angle = PI/2): inside combined
        // radius, but in the gap
        let below = circle(0.0, 30.0, 8.0);
        assert!(!shield.intersects(&below));

        // Same normalized distance rotated to angle 0 (directly right)
        let right = circle(37.5, 0.0, 8.0);
        assert!(shield.intersects(&right));
    }

    #[test]
    fn test_ellipse_blocks_top() {
        let mut shield = EllipticalCollider::default();
        shield.update(&Rect::new(-50.0, -40.0, 100.0, 80.0));

        let above = circle(0.0, -30.0, 8.0);
        assert!(shield.intersects(&above));
    }

    #[test]
    fn test_ellipse_outside_misses() {
        let mut shield = EllipticalCollider::default();
        shield.update(&Rect::new(-50.0, -40.0, 100.0, 80.0));

        let far = circle(200.0, 0.0, 8.0);
        assert!(!shield.intersects(&far));
    }

    proptest! {
        #[test]
        fn prop_circle_intersection_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0, ar in 0.1f32..100.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0, br in 0.1f32..100.0,
        ) {
            let a = circle(ax, ay, ar);
            let b = circle(bx, by, br);
            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        }
    }
}
