//! Deterministic petal simulation
//!
//! All engine logic lives here. This module must stay pure and headless:
//! - Seeded RNG owned by each field, consumed only at spawn time
//! - Frame deltas clamped before they reach physics
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collect;
pub mod collision;
pub mod easing;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collect::{CounterAnchor, FixedAnchor, Gesture, NoAnchor};
pub use collision::{hit_radius, is_point_in_petal};
pub use easing::Easing;
pub use physics::{create_petal, should_remove_petal, update_petal_physics};
pub use spawn::{
    Palette, Reward, SpawnDraws, SpawnRules, SpawnSelector, WeightedTable, rare_split,
};
pub use state::{
    Collection, CollectionEvent, Petal, PetalColor, PetalId, PetalPhase, PetalSpec, PetalTier,
    Viewport,
};
pub use tick::{PetalField, TickReport, clamp_frame_delta};
