//! Petal entity and field-level simulation types
//!
//! A petal is either falling under physics or flying toward the counter
//! badge after being hit. The two phases never overlap for a given tick.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Petal identity, unique among live petals of one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PetalId(pub u32);

impl std::fmt::Display for PetalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reward tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PetalTier {
    #[default]
    Common,
    Rare,
    Epic,
}

impl PetalTier {
    /// Fixed tint for the tier; common petals take the active palette instead
    pub fn signature_color(self) -> Option<PetalColor> {
        match self {
            PetalTier::Common => None,
            PetalTier::Rare => Some(PetalColor::Gold),
            PetalTier::Epic => Some(PetalColor::Iris),
        }
    }
}

/// Visual tint of a petal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PetalColor {
    #[default]
    Sakura,
    Blossom,
    Plum,
    Leaf,
    Maple,
    Amber,
    Frost,
    /// Reserved for rare petals
    Gold,
    /// Reserved for epic petals
    Iris,
}

/// Collection flight toward the counter badge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// 0..=1, reaching 1 removes the petal
    pub progress: f32,
    /// Position at hit time
    pub start: Vec2,
    /// Counter badge position captured at hit time
    pub target: Vec2,
}

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PetalPhase {
    /// Under physics (initial)
    #[default]
    Falling,
    /// Hit; animating toward the counter, immune to physics
    Collecting(Collection),
}

/// What the spawn selector decided a new petal should be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetalSpec {
    pub color: PetalColor,
    pub tier: PetalTier,
    pub value: u32,
}

impl PetalSpec {
    pub fn common(color: PetalColor, value: u32) -> Self {
        Self {
            color,
            tier: PetalTier::Common,
            value,
        }
    }

    pub fn rare(value: u32) -> Self {
        Self::special(PetalTier::Rare, value)
    }

    pub fn epic(value: u32) -> Self {
        Self::special(PetalTier::Epic, value)
    }

    fn special(tier: PetalTier, value: u32) -> Self {
        Self {
            color: tier.signature_color().unwrap_or_default(),
            tier,
            value,
        }
    }
}

/// A petal entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Petal {
    pub id: PetalId,
    pub pos: Vec2,
    /// Pixels per reference frame
    pub vel: Vec2,
    pub rotation: f32,
    /// Radians per reference frame
    pub angular_vel: f32,
    pub scale: f32,
    pub opacity: f32,
    /// Per-petal offset into the sway cycle so petals do not sway in unison
    pub sway_phase: f32,
    pub color: PetalColor,
    pub tier: PetalTier,
    /// Petals awarded when hit
    pub value: u32,
    pub phase: PetalPhase,
}

impl Petal {
    /// A falling petal at rest at `pos` (tests and hosts placing petals by hand)
    pub fn at(id: PetalId, pos: Vec2, spec: PetalSpec) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            angular_vel: 0.0,
            scale: 1.0,
            opacity: 1.0,
            sway_phase: 0.0,
            color: spec.color,
            tier: spec.tier,
            value: spec.value,
            phase: PetalPhase::Falling,
        }
    }

    /// Rare or better; these are drawn with a halo
    #[inline]
    pub fn is_rare(&self) -> bool {
        self.tier != PetalTier::Common
    }

    #[inline]
    pub fn is_collecting(&self) -> bool {
        matches!(self.phase, PetalPhase::Collecting(_))
    }

    /// Collection progress; `None` while falling
    #[inline]
    pub fn collection_progress(&self) -> Option<f32> {
        match self.phase {
            PetalPhase::Falling => None,
            PetalPhase::Collecting(c) => Some(c.progress),
        }
    }

    /// Visual radius in pixels
    #[inline]
    pub fn radius(&self) -> f32 {
        PETAL_RADIUS * self.scale
    }
}

/// Viewport bounds the petals fall through (pixels, origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Fallback counter badge position (inset from the top-right corner)
    pub fn default_counter_position(&self) -> Vec2 {
        Vec2::new(
            (self.width - COUNTER_CORNER_INSET).max(0.0),
            COUNTER_CORNER_INSET.min(self.height),
        )
    }
}

/// Emitted once per successful hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollectionEvent {
    pub petal_id: PetalId,
    pub value: u32,
    pub tier: PetalTier,
    /// Petal position at hit time (pixels)
    pub pos: Vec2,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}
