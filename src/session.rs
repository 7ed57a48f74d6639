//! Session aggregator
//!
//! Running total of collected petal value for the current visit. Credit
//! happens at hit time: the total moves as soon as the frame driver reports
//! a hit, before the collection flight finishes. Persistence is forwarded
//! afterwards and can never roll the total back.

use glam::Vec2;

use crate::normalize_position;
use crate::persistence::{AwardRequest, AwardSink, NullSink};
use crate::sim::state::{CollectionEvent, PetalId, PetalTier, Viewport};

/// What a single collection changed, for UI feedback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionUpdate {
    pub petal_id: PetalId,
    pub value: u32,
    pub tier: PetalTier,
    pub total: u64,
    /// True exactly once per session: the first petal ever collected
    pub first_collection: bool,
}

/// Per-visit petal total
pub struct Session {
    total: u64,
    collections: u32,
    last_value: Option<u32>,
    last_tier: Option<PetalTier>,
    sink: Box<dyn AwardSink>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Box::new(NullSink))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("total", &self.total)
            .field("collections", &self.collections)
            .field("last_value", &self.last_value)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(sink: Box<dyn AwardSink>) -> Self {
        Self {
            total: 0,
            collections: 0,
            last_value: None,
            last_tier: None,
            sink,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of petals collected this session
    pub fn collections(&self) -> u32 {
        self.collections
    }

    /// Value of the most recent collection ("+5" vs "+1" pop)
    pub fn last_value(&self) -> Option<u32> {
        self.last_value
    }

    pub fn last_tier(&self) -> Option<PetalTier> {
        self.last_tier
    }

    pub fn has_collected(&self) -> bool {
        self.collections > 0
    }

    /// Credit a collected petal and forward it for persistence
    ///
    /// `pos` is in viewport pixels; the award request carries it normalized.
    pub fn collect_petal(
        &mut self,
        petal_id: PetalId,
        value: u32,
        tier: PetalTier,
        pos: Vec2,
        viewport: &Viewport,
    ) -> SessionUpdate {
        let first_collection = self.collections == 0;
        self.total = self.total.saturating_add(value as u64);
        self.collections = self.collections.saturating_add(1);
        self.last_value = Some(value);
        self.last_tier = Some(tier);

        if first_collection {
            log::info!("First petal collected this session ({} worth {})", petal_id, value);
        } else {
            log::debug!("Collected petal {} (+{}, total {})", petal_id, value, self.total);
        }

        let at = normalize_position(pos, viewport.width, viewport.height);
        let request = AwardRequest {
            amount: value,
            x: at.x,
            y: at.y,
        };
        if let Err(e) = self.sink.award(request) {
            log::warn!("Award for petal {} not persisted: {}", petal_id, e);
        }

        SessionUpdate {
            petal_id,
            value,
            tier,
            total: self.total,
            first_collection,
        }
    }

    /// Credit a hit reported by the frame driver
    pub fn record(&mut self, event: &CollectionEvent, viewport: &Viewport) -> SessionUpdate {
        self.collect_petal(event.petal_id, event.value, event.tier, event.pos, viewport)
    }
}
