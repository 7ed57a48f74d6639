//! Spawn timing and reward selection
//!
//! The decision itself is pure: given the live count, the clock, and the
//! random draws, it says whether a petal spawns and what it is. The RNG is
//! owned by the caller so tests can force any outcome.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{PetalColor, PetalSpec, PetalTier};
use crate::consts::*;

/// Cumulative-weight lookup table
///
/// `pick` returns the first entry whose cumulative weight meets or exceeds
/// `draw * total`, so ties resolve toward earlier entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedTable<T> {
    entries: Vec<T>,
    cumulative: Vec<f32>,
}

impl<T> WeightedTable<T> {
    /// Build from (item, weight) pairs; non-positive or non-finite weights are dropped
    pub fn new(weighted: impl IntoIterator<Item = (T, f32)>) -> Self {
        let mut entries = Vec::new();
        let mut cumulative = Vec::new();
        let mut running = 0.0;
        for (item, weight) in weighted {
            if !(weight.is_finite() && weight > 0.0) {
                continue;
            }
            running += weight;
            entries.push(item);
            cumulative.push(running);
        }
        Self { entries, cumulative }
    }

    pub fn total_weight(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Select with a uniform draw in [0, 1]; `None` only for an empty table
    pub fn pick(&self, draw: f32) -> Option<&T> {
        let target = draw.clamp(0.0, 1.0) * self.total_weight();
        let idx = self
            .cumulative
            .iter()
            .position(|&c| c >= target)
            .unwrap_or(self.entries.len().saturating_sub(1));
        self.entries.get(idx)
    }
}

/// Weighted set of colors common petals are drawn from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub name: String,
    pub colors: WeightedTable<PetalColor>,
}

impl Palette {
    pub fn new(
        name: impl Into<String>,
        colors: impl IntoIterator<Item = (PetalColor, f32)>,
    ) -> Self {
        Self {
            name: name.into(),
            colors: WeightedTable::new(colors),
        }
    }

    /// Baseline palette: plain sakura only
    pub fn normal() -> Self {
        Self::new("normal", [(PetalColor::Sakura, 1.0)])
    }

    pub fn pick(&self, draw: f32) -> PetalColor {
        self.colors.pick(draw).copied().unwrap_or_default()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::normal()
    }
}

/// What a spawned petal is worth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub tier: PetalTier,
    pub value: u32,
}

impl Reward {
    pub fn common(value: u32) -> Self {
        Self {
            tier: PetalTier::Common,
            value,
        }
    }

    pub fn rare(value: u32) -> Self {
        Self {
            tier: PetalTier::Rare,
            value,
        }
    }

    pub fn epic(value: u32) -> Self {
        Self {
            tier: PetalTier::Epic,
            value,
        }
    }
}

impl Default for Reward {
    fn default() -> Self {
        Self::common(COMMON_VALUE)
    }
}

/// Common/rare reward table: rare with `rare_probability`, otherwise common
///
/// The rare row comes first, so a draw exactly on the threshold is rare.
pub fn rare_split(
    rare_probability: f32,
    common_value: u32,
    rare_value: u32,
) -> WeightedTable<Reward> {
    let p = rare_probability.clamp(0.0, 1.0);
    WeightedTable::new([
        (Reward::rare(rare_value), p),
        (Reward::common(common_value), 1.0 - p),
    ])
}

/// Tunable spawn and reward parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnRules {
    /// Live-petal cap; at or above it nothing spawns
    pub max_petals: usize,
    pub interval_ms: f64,
    /// Drawn once per spawn with `SpawnDraws::rarity`
    pub rewards: WeightedTable<Reward>,
}

impl Default for SpawnRules {
    fn default() -> Self {
        Self {
            max_petals: 15,
            interval_ms: SPAWN_INTERVAL_MS,
            rewards: rare_split(RARE_PROBABILITY, COMMON_VALUE, RARE_VALUE),
        }
    }
}

/// Uniform draws consumed by one spawn decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnDraws {
    pub rarity: f32,
    pub color: f32,
}

impl SpawnDraws {
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        Self {
            rarity: rng.random::<f32>(),
            color: rng.random::<f32>(),
        }
    }
}

/// Spawn gate and reward selector with its timer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnSelector {
    pub rules: SpawnRules,
    /// Tick time of the last spawn; `None` until the first one
    last_spawn_ms: Option<f64>,
}

impl SpawnSelector {
    pub fn new(rules: SpawnRules) -> Self {
        Self {
            rules,
            last_spawn_ms: None,
        }
    }

    pub fn last_spawn_ms(&self) -> Option<f64> {
        self.last_spawn_ms
    }

    /// Cap and interval gate
    pub fn is_due(&self, live_count: usize, now_ms: f64) -> bool {
        if live_count >= self.rules.max_petals {
            return false;
        }
        match self.last_spawn_ms {
            None => true,
            Some(last) => now_ms - last > self.rules.interval_ms,
        }
    }

    /// Reward selection: one weighted draw over the reward table; tiers
    /// without a signature color are tinted from `palette`
    pub fn select(&self, draws: SpawnDraws, palette: &Palette) -> PetalSpec {
        let reward = self.rules.rewards.pick(draws.rarity).copied().unwrap_or_default();
        let color = reward
            .tier
            .signature_color()
            .unwrap_or_else(|| palette.pick(draws.color));
        PetalSpec {
            color,
            tier: reward.tier,
            value: reward.value,
        }
    }

    /// Pure spawn decision for one tick
    pub fn decide(
        &self,
        live_count: usize,
        now_ms: f64,
        draws: SpawnDraws,
        palette: &Palette,
    ) -> Option<PetalSpec> {
        if !self.is_due(live_count, now_ms) {
            return None;
        }
        Some(self.select(draws, palette))
    }

    /// Decide and, on a spawn, reset the timer to `now_ms`
    ///
    /// Draws are only consumed when a spawn is due, so idle ticks leave the
    /// RNG stream untouched.
    pub fn try_spawn<R: Rng>(
        &mut self,
        live_count: usize,
        now_ms: f64,
        rng: &mut R,
        palette: &Palette,
    ) -> Option<PetalSpec> {
        if !self.is_due(live_count, now_ms) {
            return None;
        }
        let spec = self.select(SpawnDraws::sample(rng), palette);
        self.last_spawn_ms = Some(now_ms);
        Some(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PetalTier;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn draws(rarity: f32) -> SpawnDraws {
        SpawnDraws { rarity, color: 0.5 }
    }

    #[test]
    fn test_weighted_pick_first_meeting_cumulative() {
        let table = WeightedTable::new([("a", 1.0), ("b", 1.0), ("c", 2.0)]);
        assert_eq!(table.total_weight(), 4.0);
        assert_eq!(table.pick(0.0), Some(&"a"));
        assert_eq!(table.pick(0.25), Some(&"a")); // exactly on the boundary
        assert_eq!(table.pick(0.26), Some(&"b"));
        assert_eq!(table.pick(0.5), Some(&"b"));
        assert_eq!(table.pick(0.51), Some(&"c"));
        assert_eq!(table.pick(1.0), Some(&"c"));
    }

    #[test]
    fn test_weighted_drops_bad_weights() {
        let table = WeightedTable::new([
            ("zero", 0.0),
            ("neg", -1.0),
            ("nan", f32::NAN),
            ("ok", 2.0),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.pick(0.0), Some(&"ok"));

        let empty: WeightedTable<&str> = WeightedTable::new([]);
        assert!(empty.is_empty());
        assert_eq!(empty.pick(0.5), None);
    }

    #[test]
    fn test_rare_worth_more() {
        let selector = SpawnSelector::new(SpawnRules::default());
        let rare = selector.select(draws(0.0), &Palette::normal());
        assert_eq!(rare.tier, PetalTier::Rare);
        assert_eq!(rare.value, RARE_VALUE);
        assert_eq!(rare.color, PetalColor::Gold);

        let common = selector.select(draws(0.99), &Palette::normal());
        assert_eq!(common.tier, PetalTier::Common);
        assert_eq!(common.value, COMMON_VALUE);
        assert_ne!(rare.value, common.value);
    }

    #[test]
    fn test_common_uses_palette() {
        let selector = SpawnSelector::new(SpawnRules::default());
        let palette = Palette::new(
            "autumn",
            [(PetalColor::Maple, 1.0), (PetalColor::Amber, 1.0)],
        );
        let spec = selector.select(
            SpawnDraws {
                rarity: 0.9,
                color: 0.9,
            },
            &palette,
        );
        assert_eq!(spec.color, PetalColor::Amber);
    }

    #[test]
    fn test_rare_split_threshold() {
        let selector = SpawnSelector::new(SpawnRules {
            rewards: rare_split(0.25, 1, 5),
            ..Default::default()
        });
        let palette = Palette::normal();
        assert_eq!(selector.select(draws(0.25), &palette).tier, PetalTier::Rare);
        assert_eq!(selector.select(draws(0.2501), &palette).tier, PetalTier::Common);

        // Degenerate splits keep a single row
        assert_eq!(rare_split(0.0, 1, 5).len(), 1);
        assert_eq!(rare_split(1.0, 1, 5).iter().next(), Some(&Reward::rare(5)));
    }

    #[test]
    fn test_three_tier_table_hits_each_band() {
        // Weights sum to 16 so band edges are exact: epic <= 1/16 < rare <= 4/16 < common
        let selector = SpawnSelector::new(SpawnRules {
            rewards: WeightedTable::new([
                (Reward::epic(10), 1.0),
                (Reward::rare(5), 3.0),
                (Reward::common(1), 12.0),
            ]),
            ..Default::default()
        });
        let palette = Palette::new("autumn", [(PetalColor::Maple, 1.0)]);

        let epic = selector.select(draws(0.0), &palette);
        assert_eq!(epic, PetalSpec::epic(10));
        assert_eq!(selector.select(draws(0.0625), &palette).tier, PetalTier::Epic);

        let rare = selector.select(draws(0.0626), &palette);
        assert_eq!(rare, PetalSpec::rare(5));
        assert_eq!(selector.select(draws(0.25), &palette).tier, PetalTier::Rare);

        let common = selector.select(draws(0.2501), &palette);
        assert_eq!(common, PetalSpec::common(PetalColor::Maple, 1));
        assert_eq!(selector.select(draws(1.0), &palette).tier, PetalTier::Common);
    }

    #[test]
    fn test_first_tick_spawns_then_interval_gates() {
        let mut selector = SpawnSelector::new(SpawnRules::default());
        let mut rng = Pcg32::seed_from_u64(1);
        let palette = Palette::normal();

        assert!(selector.try_spawn(0, 1000.0, &mut rng, &palette).is_some());
        assert_eq!(selector.last_spawn_ms(), Some(1000.0));

        // Not strictly past the interval yet
        let edge = 1000.0 + SPAWN_INTERVAL_MS;
        assert!(selector.try_spawn(1, edge, &mut rng, &palette).is_none());
        assert!(selector.try_spawn(1, edge + 1.0, &mut rng, &palette).is_some());
        assert_eq!(selector.last_spawn_ms(), Some(edge + 1.0));
    }

    #[test]
    fn test_spawn_cap() {
        let rules = SpawnRules {
            max_petals: 3,
            ..Default::default()
        };
        let mut selector = SpawnSelector::new(rules);
        let mut rng = Pcg32::seed_from_u64(1);
        let palette = Palette::normal();
        for t in 0..100 {
            let now = t as f64 * 10_000.0;
            assert!(selector.try_spawn(3, now, &mut rng, &palette).is_none());
            assert!(selector.decide(4, now, draws(0.0), &palette).is_none());
        }
        assert_eq!(selector.last_spawn_ms(), None);
    }

    #[test]
    fn test_rarity_rate_within_tolerance() {
        let selector = SpawnSelector::new(SpawnRules::default());
        let mut rng = Pcg32::seed_from_u64(0xC0FFEE);
        let palette = Palette::normal();
        let n = 100_000;
        let rare = (0..n)
            .map(|_| selector.select(SpawnDraws::sample(&mut rng), &palette))
            .filter(|spec| spec.tier == PetalTier::Rare)
            .count();

        let p = RARE_PROBABILITY as f64;
        let mean = n as f64 * p;
        let sigma = (n as f64 * p * (1.0 - p)).sqrt();
        assert!(
            (rare as f64 - mean).abs() <= 3.0 * sigma,
            "observed {} rare, expected {:.0} ± {:.0}",
            rare,
            mean,
            3.0 * sigma
        );
    }

    proptest! {
        #[test]
        fn prop_pick_always_returns_for_nonempty(
            weights in prop::collection::vec(0.01f32..10.0, 1..12),
            draw in 0.0f32..=1.0,
        ) {
            let table = WeightedTable::new(weights.iter().copied().enumerate());
            prop_assert!(table.pick(draw).is_some());
        }
    }
}
