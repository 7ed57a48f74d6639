//! Easing curves for the collection flight
//!
//! Pure functions of normalized time; no petal state involved.

use glam::Vec2;

/// Easing curve applied to collection progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    QuadOut,
    /// Fast departure, gentle arrival at the badge
    #[default]
    CubicOut,
    CubicInOut,
}

impl Easing {
    /// Apply the curve to `t`, clamped to [0, 1]. Endpoints map to themselves.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Eased interpolation between two points
#[inline]
pub fn ease_vec2(from: Vec2, to: Vec2, t: f32, easing: Easing) -> Vec2 {
    from.lerp(to, easing.apply(t))
}
