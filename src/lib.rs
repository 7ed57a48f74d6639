//! Petal Drift - falling-petal collectible mini-game engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (petal physics, spawning, collection, frame driver)
//! - `session`: Per-visit running total and first-collection signal
//! - `season`: Seasonal palette supplier
//! - `persistence`: Fire-and-forget reward award sinks
//! - `renderer`: Swappable render step (vertex batches)
//! - `platform`: Browser bindings (wasm32 only)
//! - `settings`: Tunable engine configuration

pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod season;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::{Session, SessionUpdate};
pub use settings::{QualityPreset, RewardWeight, Settings, SettingsError};

use glam::Vec2;

/// Engine configuration constants
pub mod consts {
    /// Reference frame duration (60 Hz); velocities are expressed per reference frame
    pub const REFERENCE_FRAME_MS: f32 = 1000.0 / 60.0;
    /// Largest delta scale applied in one tick (stalled tab, debugger pause)
    pub const MAX_DELTA_SCALE: f32 = 2.0;
    /// Smallest delta applied in one tick; zero/negative clock deltas become this
    pub const MIN_DELTA_MS: f32 = 1.0;

    /// Default viewport when the host has not reported one
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1280.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 720.0;

    /// Visual radius of a petal at scale 1.0 (pixels)
    pub const PETAL_RADIUS: f32 = 12.0;
    /// Hit radius multiplier over the visual radius (touch friendly)
    pub const HIT_RADIUS_FACTOR: f32 = 1.75;
    /// Petals spawn this far above the top edge
    pub const SPAWN_Y: f32 = -PETAL_RADIUS * 2.0;
    /// Horizontal slack past either edge before a petal is evicted
    pub const HORIZONTAL_EXIT_MARGIN: f32 = 60.0;

    /// Initial downward speed range (pixels per reference frame)
    pub const FALL_SPEED_MIN: f32 = 1.0;
    pub const FALL_SPEED_MAX: f32 = 2.2;
    /// Initial horizontal speed range (pixels per reference frame, symmetric)
    pub const DRIFT_SPEED_MAX: f32 = 0.4;
    /// Angular velocity range (radians per reference frame, symmetric)
    pub const SPIN_MAX: f32 = 0.03;
    /// Scale variance around 1.0
    pub const SCALE_VARIANCE: f32 = 0.2;

    /// Sideways sway amplitude (pixels per reference frame)
    pub const SWAY_AMPLITUDE: f32 = 0.6;
    /// Sway period (milliseconds)
    pub const SWAY_PERIOD_MS: f32 = 3000.0;
    /// Fraction of viewport height where petals begin to fade out
    pub const FADE_START: f32 = 0.85;
    /// Opacity reached at the bottom edge
    pub const FADE_FLOOR: f32 = 0.3;

    /// Default spawn cadence and reward table
    pub const SPAWN_INTERVAL_MS: f64 = 800.0;
    pub const RARE_PROBABILITY: f32 = 0.04;
    pub const COMMON_VALUE: u32 = 1;
    pub const RARE_VALUE: u32 = 5;

    /// Collection flight duration toward the counter badge (milliseconds)
    pub const COLLECTION_DURATION_MS: f32 = 600.0;
    /// Counter badge fallback: inset from the top-right corner
    pub const COUNTER_CORNER_INSET: f32 = 48.0;
}

/// Wrap an angle to [-π, π)
#[inline]
pub fn wrap_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Normalize a viewport position to 0..1 on both axes (for award requests)
#[inline]
pub fn normalize_position(pos: Vec2, width: f32, height: f32) -> Vec2 {
    if width <= 0.0 || height <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        (pos.x / width).clamp(0.0, 1.0),
        (pos.y / height).clamp(0.0, 1.0),
    )
}
