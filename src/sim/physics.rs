//! Petal physics kernel
//!
//! Creation draws from the caller's RNG; everything after creation is a pure
//! function of the petal and the tick inputs. Velocities are per reference
//! frame, scaled by `delta_scale` so motion is frame-rate independent.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::state::{Petal, PetalId, PetalPhase, PetalSpec, Viewport};
use crate::consts::*;
use crate::wrap_angle;

/// Create a petal just above the top edge with randomized motion
pub fn create_petal<R: Rng>(
    id: PetalId,
    spec: PetalSpec,
    viewport: &Viewport,
    rng: &mut R,
) -> Petal {
    let x = rng.random_range(0.0..=viewport.width);
    let fall = rng.random_range(FALL_SPEED_MIN..=FALL_SPEED_MAX);
    let drift = rng.random_range(-DRIFT_SPEED_MAX..=DRIFT_SPEED_MAX);

    Petal {
        id,
        pos: Vec2::new(x, SPAWN_Y),
        vel: Vec2::new(drift, fall),
        rotation: rng.random_range(-std::f32::consts::PI..std::f32::consts::PI),
        angular_vel: rng.random_range(-SPIN_MAX..=SPIN_MAX),
        scale: 1.0 + rng.random_range(-SCALE_VARIANCE..=SCALE_VARIANCE),
        opacity: 1.0,
        sway_phase: rng.random_range(0.0..TAU),
        color: spec.color,
        tier: spec.tier,
        value: spec.value,
        phase: PetalPhase::Falling,
    }
}

/// Sideways sway offset per reference frame at `elapsed_ms`
///
/// The clock is reduced to one sway period in `f64` before narrowing, so
/// long sessions keep sub-millisecond resolution.
#[inline]
pub fn sway(elapsed_ms: f64, phase: f32) -> f32 {
    let cycle = (elapsed_ms.rem_euclid(SWAY_PERIOD_MS as f64) as f32) / SWAY_PERIOD_MS;
    (cycle * TAU + phase).sin() * SWAY_AMPLITUDE
}

/// Advance a falling petal by one tick
///
/// Collecting petals are returned unchanged: the collection flight owns
/// their position.
pub fn update_petal_physics(
    petal: &Petal,
    elapsed_ms: f64,
    delta_scale: f32,
    viewport: &Viewport,
) -> Petal {
    let mut next = petal.clone();
    if petal.is_collecting() {
        return next;
    }

    next.pos.x += (petal.vel.x + sway(elapsed_ms, petal.sway_phase)) * delta_scale;
    next.pos.y += petal.vel.y * delta_scale;
    next.rotation = wrap_angle(petal.rotation + petal.angular_vel * delta_scale);
    next.opacity = fade_for_height(next.pos.y, viewport);
    next
}

/// Opacity for a petal at height `y`: opaque until `FADE_START`, then linear to `FADE_FLOOR`
pub fn fade_for_height(y: f32, viewport: &Viewport) -> f32 {
    let fade_start = viewport.height * FADE_START;
    if y <= fade_start {
        return 1.0;
    }
    let span = (viewport.height - fade_start).max(f32::EPSILON);
    let t = ((y - fade_start) / span).clamp(0.0, 1.0);
    1.0 - t * (1.0 - FADE_FLOOR)
}

/// True once a petal has fallen past the bottom edge or drifted beyond either side
///
/// Does not look at the lifecycle phase; the frame driver only asks this of
/// falling petals.
pub fn should_remove_petal(petal: &Petal, viewport: &Viewport) -> bool {
    petal.pos.y > viewport.height
        || petal.pos.x < -HORIZONTAL_EXIT_MARGIN
        || petal.pos.x > viewport.width + HORIZONTAL_EXIT_MARGIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Collection, PetalColor};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn spec() -> PetalSpec {
        PetalSpec::common(PetalColor::Sakura, 1)
    }

    #[test]
    fn test_create_petal_ranges() {
        let viewport = Viewport::new(400.0, 300.0);
        let mut rng = Pcg32::seed_from_u64(42);
        for i in 0..500 {
            let p = create_petal(PetalId(i), spec(), &viewport, &mut rng);
            assert!(p.pos.x >= 0.0 && p.pos.x <= viewport.width);
            assert_eq!(p.pos.y, SPAWN_Y);
            assert!(p.vel.y >= FALL_SPEED_MIN && p.vel.y <= FALL_SPEED_MAX);
            assert!(p.vel.x.abs() <= DRIFT_SPEED_MAX);
            assert!(p.angular_vel.abs() <= SPIN_MAX);
            assert!((p.scale - 1.0).abs() <= SCALE_VARIANCE + 1e-6);
            assert_eq!(p.opacity, 1.0);
            assert!(!p.is_collecting());
        }
    }

    #[test]
    fn test_update_does_not_mutate_input() {
        let viewport = Viewport::default();
        let mut petal = Petal::at(PetalId(1), Vec2::new(100.0, 100.0), spec());
        petal.vel = Vec2::new(0.0, 2.0);
        let before = petal.clone();
        let next = update_petal_physics(&petal, 0.0, 1.0, &viewport);
        assert_eq!(petal, before);
        assert!((next.pos.y - 102.0).abs() < 1e-5);
    }

    #[test]
    fn test_delta_scale_scales_motion() {
        let viewport = Viewport::default();
        let mut petal = Petal::at(PetalId(1), Vec2::new(100.0, 100.0), spec());
        petal.vel = Vec2::new(0.0, 1.5);
        petal.angular_vel = 0.02;
        let one = update_petal_physics(&petal, 0.0, 1.0, &viewport);
        let two = update_petal_physics(&petal, 0.0, 2.0, &viewport);
        assert!(((two.pos.y - 100.0) - 2.0 * (one.pos.y - 100.0)).abs() < 1e-4);
        assert!((two.rotation - 0.04).abs() < 1e-5);
    }

    #[test]
    fn test_sway_moves_horizontally() {
        let viewport = Viewport::default();
        let mut petal = Petal::at(PetalId(1), Vec2::new(100.0, 100.0), spec());
        petal.sway_phase = std::f32::consts::FRAC_PI_2;
        let next = update_petal_physics(&petal, 0.0, 1.0, &viewport);
        assert!((next.pos.x - (100.0 + SWAY_AMPLITUDE)).abs() < 1e-4);
    }

    #[test]
    fn test_sway_stays_smooth_in_long_sessions() {
        // Ten hours in, a whole number of sway periods
        let ten_hours = 36_000_000.0;
        for offset in [0.0, 1.0, 750.0, 2999.5] {
            let early = sway(offset, 0.3);
            let late = sway(ten_hours + offset, 0.3);
            assert!((early - late).abs() < 1e-5, "offset {}: {} vs {}", offset, early, late);
        }
        // Adjacent milliseconds still differ
        assert_ne!(sway(ten_hours + 100.0, 0.0), sway(ten_hours + 101.0, 0.0));
    }

    #[test]
    fn test_collecting_petal_ignores_physics() {
        let viewport = Viewport::default();
        let mut petal = Petal::at(PetalId(1), Vec2::new(100.0, 100.0), spec());
        petal.vel = Vec2::new(1.0, 2.0);
        petal.phase = PetalPhase::Collecting(Collection {
            progress: 0.1,
            start: Vec2::new(100.0, 100.0),
            target: Vec2::new(500.0, 40.0),
        });
        let next = update_petal_physics(&petal, 500.0, 1.0, &viewport);
        assert_eq!(next, petal);
    }

    #[test]
    fn test_fade_near_bottom_only() {
        let viewport = Viewport::new(400.0, 400.0);
        assert_eq!(fade_for_height(10.0, &viewport), 1.0);
        assert_eq!(fade_for_height(340.0, &viewport), 1.0);
        let bottom = fade_for_height(400.0, &viewport);
        assert!((bottom - FADE_FLOOR).abs() < 1e-5);
        let mid = fade_for_height(370.0, &viewport);
        assert!(mid < 1.0 && mid > FADE_FLOOR);
    }

    #[test]
    fn test_off_screen_eviction() {
        let viewport = Viewport::new(800.0, 600.0);
        let below = Petal::at(PetalId(1), Vec2::new(400.0, viewport.height + 1.0), spec());
        assert!(should_remove_petal(&below, &viewport));

        let on_screen = Petal::at(PetalId(2), Vec2::new(400.0, 300.0), spec());
        assert!(!should_remove_petal(&on_screen, &viewport));

        // Slightly past an edge can sway back in
        let edge = Petal::at(PetalId(3), Vec2::new(-10.0, 300.0), spec());
        assert!(!should_remove_petal(&edge, &viewport));

        let far_left = Petal::at(
            PetalId(4),
            Vec2::new(-HORIZONTAL_EXIT_MARGIN - 1.0, 300.0),
            spec(),
        );
        let far_right = Petal::at(
            PetalId(5),
            Vec2::new(viewport.width + HORIZONTAL_EXIT_MARGIN + 1.0, 300.0),
            spec(),
        );
        assert!(should_remove_petal(&far_left, &viewport));
        assert!(should_remove_petal(&far_right, &viewport));
    }

    #[test]
    fn test_falling_petals_eventually_evicted() {
        let viewport = Viewport::new(1280.0, 720.0);
        let mut rng = Pcg32::seed_from_u64(3);
        // Slowest petal needs (height - SPAWN_Y) / FALL_SPEED_MIN reference frames
        let bound = ((viewport.height - SPAWN_Y) / FALL_SPEED_MIN).ceil() as u32 + 2;
        for i in 0..50 {
            let mut petal = create_petal(PetalId(i), spec(), &viewport, &mut rng);
            let mut elapsed = 0.0;
            let mut removed = false;
            for _ in 0..bound {
                elapsed += REFERENCE_FRAME_MS as f64;
                petal = update_petal_physics(&petal, elapsed, 1.0, &viewport);
                if should_remove_petal(&petal, &viewport) {
                    removed = true;
                    break;
                }
            }
            assert!(removed, "petal {} still live after {} ticks", i, bound);
        }
    }

    proptest! {
        #[test]
        fn prop_physics_is_deterministic(
            seed in any::<u64>(),
            scales in prop::collection::vec(0.05f32..2.0, 1..60),
        ) {
            let viewport = Viewport::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let start = create_petal(PetalId(1), spec(), &viewport, &mut rng);

            let run = |mut p: Petal| {
                let mut elapsed = 0.0;
                for s in &scales {
                    elapsed += (s * REFERENCE_FRAME_MS) as f64;
                    p = update_petal_physics(&p, elapsed, *s, &viewport);
                }
                p
            };
            prop_assert_eq!(run(start.clone()), run(start));
        }

        #[test]
        fn prop_falling_never_rises(scale in 0.05f32..2.0, elapsed in 0.0f64..100_000.0) {
            let viewport = Viewport::default();
            let mut rng = Pcg32::seed_from_u64(elapsed.to_bits());
            let petal = create_petal(PetalId(1), spec(), &viewport, &mut rng);
            let next = update_petal_physics(&petal, elapsed, scale, &viewport);
            prop_assert!(next.pos.y > petal.pos.y);
        }
    }
}
