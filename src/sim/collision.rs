//! Circle collision helpers
//!
//! Every entity in the playfield is a circle for collision purposes, so a
//! single overlap test covers player/enemy contact, bullet hits and pickups.

use glam::Vec2;

use crate::distance;

/// Anything with a circular collision body
pub trait Circle {
    fn center(&self) -> Vec2;
    fn radius(&self) -> f32;
}

/// Strict overlap of two circles (touching edges do not count)
#[inline]
pub fn circle_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    distance(a_pos, b_pos) < a_radius + b_radius
}

/// Overlap test for two circular bodies
#[inline]
pub fn overlaps<A: Circle + ?Sized, B: Circle + ?Sized>(a: &A, b: &B) -> bool {
    circle_overlap(a.center(), a.radius(), b.center(), b.radius())
}

/// Unit vector from `from` toward `to`, or zero when the points coincide
#[inline]
pub fn push_direction(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dot(Vec2, f32);

    impl Circle for Dot {
        fn center(&self) -> Vec2 {
            self.0
        }
        fn radius(&self) -> f32 {
            self.1
        }
    }

    #[test]
    fn test_overlap_when_closer_than_radii() {
        assert!(circle_overlap(Vec2::ZERO, 10.0, Vec2::new(15.0, 0.0), 10.0));
    }

    #[test]
    fn test_touching_circles_do_not_overlap() {
        assert!(!circle_overlap(Vec2::ZERO, 10.0, Vec2::new(20.0, 0.0), 10.0));
    }

    #[test]
    fn test_overlaps_uses_bodies() {
        let a = Dot(Vec2::new(100.0, 100.0), 55.0);
        let b = Dot(Vec2::new(180.0, 100.0), 40.0);
        let c = Dot(Vec2::new(300.0, 100.0), 40.0);
        assert!(overlaps(&a, &b));
        assert!(!overlaps(&a, &c));
    }

    #[test]
    fn test_push_direction_is_guarded() {
        let p = Vec2::new(3.0, 4.0);
        assert_eq!(push_direction(p, p), Vec2::ZERO);
        let d = push_direction(Vec2::ZERO, Vec2::new(0.0, 5.0));
        assert!((d - Vec2::Y).length() < 1e-6);
    }
}
