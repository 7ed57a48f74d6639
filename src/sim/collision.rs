//! Pointer hit testing against petals
//!
//! Petals are approximated as circles around their current position, sized
//! by scale and inflated by `HIT_RADIUS_FACTOR` so taps on small screens land.

use glam::Vec2;

use super::state::Petal;
use crate::consts::HIT_RADIUS_FACTOR;

/// Effective hit radius for a petal (pixels)
#[inline]
pub fn hit_radius(petal: &Petal) -> f32 {
    petal.radius() * HIT_RADIUS_FACTOR
}

/// True if `point` lies within the petal's hit circle
///
/// Opacity plays no part: a faded petal near the bottom is still hittable.
#[inline]
pub fn is_point_in_petal(point: Vec2, petal: &Petal) -> bool {
    let r = hit_radius(petal);
    point.distance_squared(petal.pos) <= r * r
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PETAL_RADIUS;
    use crate::sim::state::{PetalColor, PetalId, PetalSpec};

    fn petal_at(x: f32, y: f32) -> Petal {
        let spec = PetalSpec::common(PetalColor::Sakura, 1);
        Petal::at(PetalId(1), Vec2::new(x, y), spec)
    }

    #[test]
    fn test_center_hit() {
        let petal = petal_at(50.0, 50.0);
        assert!(is_point_in_petal(Vec2::new(50.0, 50.0), &petal));
    }

    #[test]
    fn test_hit_radius_is_generous() {
        let petal = petal_at(0.0, 0.0);
        // Outside the visual radius but inside the touch radius
        let just_outside_visual = Vec2::new(PETAL_RADIUS * 1.5, 0.0);
        assert!(is_point_in_petal(just_outside_visual, &petal));
        assert!(hit_radius(&petal) >= PETAL_RADIUS * 1.5);
    }

    #[test]
    fn test_miss() {
        let petal = petal_at(0.0, 0.0);
        let far = Vec2::new(0.0, hit_radius(&petal) + 0.5);
        assert!(!is_point_in_petal(far, &petal));
    }

    #[test]
    fn test_scale_grows_hit_area() {
        let mut small = petal_at(0.0, 0.0);
        small.scale = 0.8;
        let mut big = petal_at(0.0, 0.0);
        big.scale = 1.2;
        let point = Vec2::new(PETAL_RADIUS * HIT_RADIUS_FACTOR * 1.1, 0.0);
        assert!(!is_point_in_petal(point, &small));
        assert!(is_point_in_petal(point, &big));
    }

    #[test]
    fn test_faded_petal_still_hittable() {
        let mut petal = petal_at(10.0, 10.0);
        petal.opacity = 0.3;
        assert!(is_point_in_petal(Vec2::new(12.0, 9.0), &petal));
    }
}
