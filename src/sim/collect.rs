//! Hit-test and collection protocol
//!
//! Falling -> Collecting -> removed. The protocol only proposes which petal a
//! strike claims; the frame driver owns the petal list and applies it.

use std::collections::HashSet;

use glam::Vec2;

use super::collision::is_point_in_petal;
use super::easing::{Easing, ease_vec2};
use super::state::{Collection, CollectionEvent, Petal, PetalId, PetalPhase};

/// Petal ids already claimed by the current pointer gesture
///
/// A slash that sweeps back and forth over one petal collects it once.
#[derive(Debug, Clone, Default)]
pub struct Gesture {
    active: bool,
    claimed: HashSet<PetalId>,
}

impl Gesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer down: start a fresh gesture
    pub fn begin(&mut self) {
        self.active = true;
        self.claimed.clear();
    }

    /// Pointer up / cancel
    pub fn end(&mut self) {
        self.active = false;
        self.claimed.clear();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn has_claimed(&self, id: PetalId) -> bool {
        self.claimed.contains(&id)
    }

    /// Record a claim; false if the id was already claimed this gesture
    pub fn claim(&mut self, id: PetalId) -> bool {
        self.claimed.insert(id)
    }
}

/// Where the on-screen petal counter badge currently is
///
/// `None` means unknown (badge not mounted yet); callers fall back to a
/// fixed corner instead of stalling the collection.
pub trait CounterAnchor {
    fn counter_position(&self) -> Option<Vec2>;
}

/// No counter badge on this page
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnchor;

impl CounterAnchor for NoAnchor {
    fn counter_position(&self) -> Option<Vec2> {
        None
    }
}

/// Badge pinned at a known position
#[derive(Debug, Clone, Copy)]
pub struct FixedAnchor(pub Vec2);

impl CounterAnchor for FixedAnchor {
    fn counter_position(&self) -> Option<Vec2> {
        Some(self.0)
    }
}

impl<F> CounterAnchor for F
where
    F: Fn() -> Option<Vec2>,
{
    fn counter_position(&self) -> Option<Vec2> {
        self()
    }
}

/// Index of the falling petal struck at `point`, if any
///
/// When several petals overlap the most recently spawned (topmost drawn)
/// one wins. Collecting petals and petals already claimed by `gesture`
/// are skipped.
pub fn find_strike(petals: &[Petal], point: Vec2, gesture: &Gesture) -> Option<usize> {
    petals
        .iter()
        .enumerate()
        .rev()
        .find(|(_, p)| {
            !p.is_collecting() && !gesture.has_claimed(p.id) && is_point_in_petal(point, p)
        })
        .map(|(i, _)| i)
}

/// Move a falling petal into its collection flight toward `target`
///
/// Returns the hit event, or `None` if the petal was already collecting
/// (a second strike is a no-op).
pub fn begin_collection(petal: &mut Petal, target: Vec2) -> Option<CollectionEvent> {
    if petal.is_collecting() {
        return None;
    }
    petal.phase = PetalPhase::Collecting(Collection {
        progress: 0.0,
        start: petal.pos,
        target,
    });
    Some(CollectionEvent {
        petal_id: petal.id,
        value: petal.value,
        tier: petal.tier,
        pos: petal.pos,
    })
}

/// Advance a collecting petal by `delta_ms` of a `duration_ms` flight
///
/// Progress saturates at exactly 1.0. Position follows the eased path from
/// the captured start to the captured target, fading as it arrives.
/// Falling petals are returned unchanged.
pub fn advance_collection(petal: &Petal, delta_ms: f32, duration_ms: f32, easing: Easing) -> Petal {
    let mut next = petal.clone();
    let PetalPhase::Collecting(collection) = petal.phase else {
        return next;
    };

    let step = if duration_ms > 0.0 { delta_ms.max(0.0) / duration_ms } else { 1.0 };
    let progress = (collection.progress + step).min(1.0);

    next.pos = ease_vec2(collection.start, collection.target, progress, easing);
    next.opacity = 1.0 - 0.5 * progress;
    next.phase = PetalPhase::Collecting(Collection { progress, ..collection });
    next
}

/// True once the collection flight has reached the counter
#[inline]
pub fn is_collection_complete(petal: &Petal) -> bool {
    matches!(petal.collection_progress(), Some(p) if p >= 1.0)
}
