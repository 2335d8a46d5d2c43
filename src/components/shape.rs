//! Collision footprint shapes.
//!
//! A [`Shape`] stores only the footprint geometry; every test takes the
//! owning entity's world position as a parameter, so the footprint can
//! never drift out of sync with the entity. Rectangles are anchored at
//! their top-left corner, circles at their center.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Geometric footprint used for collision and visibility tests.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Rectangle { width: f32, height: f32 },
    Circle { radius: f32 },
}

impl Shape {
    pub fn rect(width: f32, height: f32) -> Self {
        Shape::Rectangle { width, height }
    }

    pub fn circle(radius: f32) -> Self {
        Shape::Circle { radius }
    }

    /// Axis-aligned bounding box `(x, y, width, height)` in top-left
    /// origin form. Circles are enclosed in their bounding square.
    pub fn bounding_box(&self, position: Vec2) -> (f32, f32, f32, f32) {
        match *self {
            Shape::Rectangle { width, height } => (position.x, position.y, width, height),
            Shape::Circle { radius } => (
                position.x - radius,
                position.y - radius,
                radius * 2.0,
                radius * 2.0,
            ),
        }
    }

    /// Center point of the shape at the given entity position.
    pub fn center(&self, position: Vec2) -> Vec2 {
        match *self {
            Shape::Rectangle { width, height } => {
                Vec2::new(position.x + width * 0.5, position.y + height * 0.5)
            }
            Shape::Circle { .. } => position,
        }
    }

    /// A copy of the shape grown by `amount`: rectangle width and height
    /// each gain `2 * amount`, a circle's radius gains `amount`. Used for
    /// attack-reach tests.
    pub fn grown(&self, amount: f32) -> Shape {
        match *self {
            Shape::Rectangle { width, height } => Shape::Rectangle {
                width: width + 2.0 * amount,
                height: height + 2.0 * amount,
            },
            Shape::Circle { radius } => Shape::Circle {
                radius: radius + amount,
            },
        }
    }

    /// Symmetric pairwise intersection test.
    ///
    /// Boundary behavior differs by pair on purpose: rectangle/rectangle
    /// uses strict inequalities (edge touching is not a hit), while
    /// circle/circle uses `<=` (edge touching is a hit).
    pub fn intersects(&self, position: Vec2, other: &Shape, other_position: Vec2) -> bool {
        match (*self, *other) {
            (
                Shape::Rectangle { width, height },
                Shape::Rectangle {
                    width: ow,
                    height: oh,
                },
            ) => {
                position.x < other_position.x + ow
                    && position.x + width > other_position.x
                    && position.y < other_position.y + oh
                    && position.y + height > other_position.y
            }
            (Shape::Circle { radius }, Shape::Circle { radius: or }) => {
                let dist_sq = position.distance_squared(other_position);
                let radius_sum = radius + or;
                dist_sq <= radius_sum * radius_sum
            }
            (Shape::Rectangle { width, height }, Shape::Circle { radius }) => {
                rect_circle_intersects(position, width, height, other_position, radius)
            }
            (Shape::Circle { radius }, Shape::Rectangle { width, height }) => {
                // Same routine, mirrored arguments, so both orders agree.
                rect_circle_intersects(other_position, width, height, position, radius)
            }
        }
    }

    /// Does the segment `a -> b` cross this shape?
    ///
    /// Rectangles use the slab method, accumulating the admissible
    /// parametric interval across the four half-plane constraints;
    /// circles solve the quadratic for the parametrized line and accept
    /// a root inside `[0, 1]`. Used by line-of-sight occlusion.
    pub fn segment_intersects(&self, position: Vec2, a: Vec2, b: Vec2) -> bool {
        match *self {
            Shape::Rectangle { width, height } => {
                segment_vs_rect(a, b, position, position + Vec2::new(width, height))
            }
            Shape::Circle { radius } => segment_vs_circle(a, b, position, radius),
        }
    }
}

/// Nearest-point clamp test between a rectangle (top-left `rect_pos`) and
/// a circle centered at `circle_pos`, with an explicit corner
/// distance-squared fallback for the diagonal case.
fn rect_circle_intersects(
    rect_pos: Vec2,
    width: f32,
    height: f32,
    circle_pos: Vec2,
    radius: f32,
) -> bool {
    let half_w = width * 0.5;
    let half_h = height * 0.5;
    let dist_x = (circle_pos.x - (rect_pos.x + half_w)).abs();
    let dist_y = (circle_pos.y - (rect_pos.y + half_h)).abs();

    if dist_x > half_w + radius {
        return false;
    }
    if dist_y > half_h + radius {
        return false;
    }
    if dist_x <= half_w {
        return true;
    }
    if dist_y <= half_h {
        return true;
    }

    let corner_dist_sq = (dist_x - half_w).powi(2) + (dist_y - half_h).powi(2);
    corner_dist_sq <= radius * radius
}

/// Slab test of segment `a -> b` against the AABB `[min, max]`.
fn segment_vs_rect(a: Vec2, b: Vec2, min: Vec2, max: Vec2) -> bool {
    let dir = b - a;
    let mut t_enter = 0.0f32;
    let mut t_exit = 1.0f32;

    for axis in 0..2 {
        let (origin, delta, lo, hi) = if axis == 0 {
            (a.x, dir.x, min.x, max.x)
        } else {
            (a.y, dir.y, min.y, max.y)
        };

        if delta.abs() < f32::EPSILON {
            // Parallel to this slab: either always inside it or never.
            if origin < lo || origin > hi {
                return false;
            }
            continue;
        }

        let inv = 1.0 / delta;
        let mut t0 = (lo - origin) * inv;
        let mut t1 = (hi - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return false;
        }
    }

    true
}

/// Quadratic discriminant test of segment `a -> b` against a circle.
fn segment_vs_circle(a: Vec2, b: Vec2, center: Vec2, radius: f32) -> bool {
    let d = b - a;
    let f = a - center;

    let qa = d.dot(d);
    if qa < f32::EPSILON {
        // Degenerate segment: point containment.
        return f.length_squared() <= radius * radius;
    }
    let qb = 2.0 * f.dot(d);
    let qc = f.dot(f) - radius * radius;

    let discriminant = qb * qb - 4.0 * qa * qc;
    if discriminant < 0.0 {
        return false;
    }

    let sqrt_d = discriminant.sqrt();
    let t0 = (-qb - sqrt_d) / (2.0 * qa);
    let t1 = (-qb + sqrt_d) / (2.0 * qa);
    (0.0..=1.0).contains(&t0) || (0.0..=1.0).contains(&t1) || (t0 < 0.0 && t1 > 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    // ==================== BOUNDING BOX TESTS ====================

    #[test]
    fn rect_bounding_box_is_position_anchored() {
        let shape = Shape::rect(10.0, 20.0);
        assert_eq!(shape.bounding_box(v(3.0, 4.0)), (3.0, 4.0, 10.0, 20.0));
    }

    #[test]
    fn circle_bounding_box_is_enclosing_square() {
        let shape = Shape::circle(5.0);
        assert_eq!(shape.bounding_box(v(10.0, 10.0)), (5.0, 5.0, 10.0, 10.0));
    }

    // ==================== RECT/RECT TESTS ====================

    #[test]
    fn rects_overlap_symmetrically() {
        let a = Shape::rect(10.0, 10.0);
        let b = Shape::rect(10.0, 10.0);
        assert!(a.intersects(v(0.0, 0.0), &b, v(5.0, 5.0)));
        assert!(b.intersects(v(5.0, 5.0), &a, v(0.0, 0.0)));
    }

    #[test]
    fn touching_rect_edges_do_not_intersect() {
        let a = Shape::rect(10.0, 10.0);
        let b = Shape::rect(10.0, 10.0);
        // b starts exactly where a ends on both axes.
        assert!(!a.intersects(v(0.0, 0.0), &b, v(10.0, 0.0)));
        assert!(!a.intersects(v(0.0, 0.0), &b, v(0.0, 10.0)));
        assert!(!b.intersects(v(10.0, 0.0), &a, v(0.0, 0.0)));
    }

    #[test]
    fn disjoint_rects_do_not_intersect() {
        let a = Shape::rect(4.0, 4.0);
        let b = Shape::rect(4.0, 4.0);
        assert!(!a.intersects(v(0.0, 0.0), &b, v(100.0, 100.0)));
    }

    // ==================== CIRCLE/CIRCLE TESTS ====================

    #[test]
    fn circles_within_radius_sum_intersect() {
        let a = Shape::circle(10.0);
        let b = Shape::circle(10.0);
        assert!(a.intersects(v(0.0, 0.0), &b, v(15.0, 0.0)));
    }

    #[test]
    fn circles_beyond_radius_sum_do_not_intersect() {
        let a = Shape::circle(10.0);
        let b = Shape::circle(10.0);
        assert!(!a.intersects(v(0.0, 0.0), &b, v(21.0, 0.0)));
    }

    #[test]
    fn touching_circles_do_intersect() {
        // Unlike rectangles, edge contact counts for circles.
        let a = Shape::circle(10.0);
        let b = Shape::circle(10.0);
        assert!(a.intersects(v(0.0, 0.0), &b, v(20.0, 0.0)));
    }

    // ==================== RECT/CIRCLE TESTS ====================

    #[test]
    fn rect_circle_is_symmetric() {
        let rect = Shape::rect(10.0, 10.0);
        let circle = Shape::circle(3.0);
        let rp = v(0.0, 0.0);
        let cp = v(12.0, 5.0);
        assert_eq!(
            rect.intersects(rp, &circle, cp),
            circle.intersects(cp, &rect, rp)
        );
        assert!(rect.intersects(rp, &circle, cp));
    }

    #[test]
    fn circle_misses_rect_corner() {
        let rect = Shape::rect(10.0, 10.0);
        let circle = Shape::circle(2.0);
        // Corner at (10, 10); circle center 3,3 away diagonally (~4.24 > 2).
        assert!(!rect.intersects(v(0.0, 0.0), &circle, v(13.0, 13.0)));
    }

    #[test]
    fn circle_clips_rect_corner() {
        let rect = Shape::rect(10.0, 10.0);
        let circle = Shape::circle(2.0);
        // Corner at (10, 10); center 1,1 away diagonally (~1.41 < 2).
        assert!(rect.intersects(v(0.0, 0.0), &circle, v(11.0, 11.0)));
    }

    #[test]
    fn circle_inside_rect_intersects() {
        let rect = Shape::rect(20.0, 20.0);
        let circle = Shape::circle(1.0);
        assert!(rect.intersects(v(0.0, 0.0), &circle, v(10.0, 10.0)));
    }

    // ==================== GROWN SHAPE TESTS ====================

    #[test]
    fn grown_rect_gains_twice_amount_per_axis() {
        let shape = Shape::rect(10.0, 6.0).grown(5.0);
        assert_eq!(
            shape,
            Shape::Rectangle {
                width: 20.0,
                height: 16.0
            }
        );
    }

    #[test]
    fn grown_circle_gains_amount_on_radius() {
        assert_eq!(Shape::circle(3.0).grown(5.0), Shape::Circle { radius: 8.0 });
    }

    // ==================== SEGMENT TESTS ====================

    #[test]
    fn segment_through_rect_hits() {
        let rect = Shape::rect(10.0, 10.0);
        assert!(rect.segment_intersects(v(20.0, 20.0), v(0.0, 25.0), v(50.0, 25.0)));
    }

    #[test]
    fn segment_past_rect_misses() {
        let rect = Shape::rect(10.0, 10.0);
        assert!(!rect.segment_intersects(v(20.0, 20.0), v(0.0, 50.0), v(50.0, 50.0)));
    }

    #[test]
    fn segment_ending_before_rect_misses() {
        let rect = Shape::rect(10.0, 10.0);
        assert!(!rect.segment_intersects(v(20.0, 20.0), v(0.0, 25.0), v(10.0, 25.0)));
    }

    #[test]
    fn axis_parallel_segment_outside_slab_misses() {
        let rect = Shape::rect(10.0, 10.0);
        // Vertical segment left of the rectangle.
        assert!(!rect.segment_intersects(v(20.0, 20.0), v(5.0, 0.0), v(5.0, 100.0)));
    }

    #[test]
    fn segment_through_circle_hits() {
        let circle = Shape::circle(5.0);
        assert!(circle.segment_intersects(v(25.0, 25.0), v(0.0, 25.0), v(50.0, 25.0)));
    }

    #[test]
    fn segment_grazing_circle_misses() {
        let circle = Shape::circle(5.0);
        assert!(!circle.segment_intersects(v(25.0, 25.0), v(0.0, 31.0), v(50.0, 31.0)));
    }

    #[test]
    fn segment_fully_inside_circle_hits() {
        let circle = Shape::circle(10.0);
        assert!(circle.segment_intersects(v(0.0, 0.0), v(-2.0, 0.0), v(2.0, 0.0)));
    }
}
