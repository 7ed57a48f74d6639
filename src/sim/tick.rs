//! Frame driver
//!
//! One `tick` per animation frame: clamp the frame delta, maybe spawn,
//! advance every petal along whichever path its phase dictates, and drop the
//! ones that finished. The field is the only owner of the live petal list;
//! strikes go through it too.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::collect::{
    CounterAnchor, Gesture, NoAnchor, advance_collection, begin_collection, find_strike,
    is_collection_complete,
};
use super::easing::Easing;
use super::physics::{create_petal, should_remove_petal, update_petal_physics};
use super::spawn::{Palette, SpawnDraws, SpawnSelector};
use super::state::{CollectionEvent, Petal, PetalId, PetalSpec, RngState, Viewport};
use crate::consts::*;
use crate::season::PaletteSupplier;
use crate::settings::Settings;

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub spawned: Option<PetalId>,
    /// Collection flights that reached the counter and were removed
    pub completed: Vec<PetalId>,
    /// Falling petals that left the viewport and were removed
    pub evicted: Vec<PetalId>,
    /// Delta scale applied to physics this tick (0 when disabled)
    pub delta_scale: f32,
}

/// Clamp a raw wall-clock frame delta into the range physics accepts
///
/// Zero, negative, or NaN deltas (clock anomalies) become `MIN_DELTA_MS`;
/// stalls are capped at `MAX_DELTA_SCALE` reference frames.
pub fn clamp_frame_delta(raw_ms: f32) -> f32 {
    if !(raw_ms > 0.0) {
        log::debug!("Clock anomaly: frame delta {}ms, using {}ms", raw_ms, MIN_DELTA_MS);
        return MIN_DELTA_MS;
    }
    raw_ms.clamp(MIN_DELTA_MS, MAX_DELTA_SCALE * REFERENCE_FRAME_MS)
}

/// A live petal field: spawn timer, RNG, petals, and the current gesture
pub struct PetalField {
    viewport: Viewport,
    petals: Vec<Petal>,
    spawner: SpawnSelector,
    rng_state: RngState,
    rng: Pcg32,
    next_id: u32,
    /// Sum of clamped frame deltas (drives sway)
    elapsed_ms: f64,
    last_frame_ms: Option<f64>,
    gesture: Gesture,
    palette: Box<dyn PaletteSupplier>,
    anchor: Box<dyn CounterAnchor>,
    easing: Easing,
    collection_duration_ms: f32,
    reduced_motion: bool,
}

impl std::fmt::Debug for PetalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PetalField")
            .field("viewport", &self.viewport)
            .field("live", &self.petals.len())
            .field("seed", &self.rng_state.seed)
            .field("elapsed_ms", &self.elapsed_ms)
            .field("reduced_motion", &self.reduced_motion)
            .finish_non_exhaustive()
    }
}

impl PetalField {
    /// Create a field with the baseline palette and no counter badge
    pub fn new(settings: &Settings, viewport: Viewport) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        let rng_state = RngState::new(seed);
        log::debug!("Petal field created (seed {}, cap {})", seed, settings.max_petals());
        Self {
            viewport,
            petals: Vec::with_capacity(settings.max_petals()),
            spawner: SpawnSelector::new(settings.spawn_rules()),
            rng: rng_state.to_rng(),
            rng_state,
            next_id: 1,
            elapsed_ms: 0.0,
            last_frame_ms: None,
            gesture: Gesture::new(),
            palette: Box::new(Palette::normal()),
            anchor: Box::new(NoAnchor),
            easing: Easing::CubicOut,
            collection_duration_ms: settings.collection_duration_ms,
            reduced_motion: settings.reduced_motion,
        }
    }

    pub fn with_palette(mut self, palette: impl PaletteSupplier + 'static) -> Self {
        self.palette = Box::new(palette);
        self
    }

    pub fn with_anchor(mut self, anchor: impl CounterAnchor + 'static) -> Self {
        self.anchor = Box::new(anchor);
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn petals(&self) -> &[Petal] {
        &self.petals
    }

    pub fn live_count(&self) -> usize {
        self.petals.len()
    }

    pub fn petal(&self, id: PetalId) -> Option<&Petal> {
        self.petals.iter().find(|p| p.id == id)
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Resize; petals keep their pixel positions
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn max_petals(&self) -> usize {
        self.spawner.rules.max_petals
    }

    /// Change the live cap; petals above a lowered cap stay until they leave
    pub fn set_max_petals(&mut self, max_petals: usize) {
        let max_petals = max_petals.max(1);
        log::info!("Live petal cap {} -> {}", self.spawner.rules.max_petals, max_petals);
        self.spawner.rules.max_petals = max_petals;
    }

    pub fn is_enabled(&self) -> bool {
        !self.reduced_motion
    }

    /// Toggle reduced motion; enabling it drops every live petal
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        if reduced && !self.petals.is_empty() {
            log::info!("Reduced motion enabled, clearing {} petals", self.petals.len());
            self.petals.clear();
        }
        self.reduced_motion = reduced;
        self.gesture.end();
    }

    fn allocate_id(&mut self) -> PetalId {
        let id = PetalId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    /// Where collection flights head right now
    fn counter_target(&self) -> Vec2 {
        self.anchor
            .counter_position()
            .unwrap_or_else(|| self.viewport.default_counter_position())
    }

    fn frame_delta(&mut self, now_ms: f64) -> f32 {
        let raw = match self.last_frame_ms {
            Some(last) => (now_ms - last) as f32,
            None => REFERENCE_FRAME_MS,
        };
        self.last_frame_ms = Some(now_ms);
        clamp_frame_delta(raw)
    }

    /// Advance the field by one frame at wall-clock time `now_ms`
    pub fn tick(&mut self, now_ms: f64) -> TickReport {
        let mut report = TickReport::default();
        if self.reduced_motion {
            self.petals.clear();
            return report;
        }

        let delta_ms = self.frame_delta(now_ms);
        let delta_scale = delta_ms / REFERENCE_FRAME_MS;
        self.elapsed_ms += delta_ms as f64;
        report.delta_scale = delta_scale;

        // Spawn
        let live = self.petals.len();
        if self.spawner.is_due(live, now_ms) {
            let palette = self.palette.palette(now_ms);
            let rng = &mut self.rng;
            if let Some(spec) = self.spawner.try_spawn(live, now_ms, rng, &palette) {
                let id = self.allocate_id();
                let petal = create_petal(id, spec, &self.viewport, &mut self.rng);
                log::debug!(
                    "Spawned petal {} ({:?}, {:?}, +{}) at x={:.0}",
                    id,
                    spec.tier,
                    spec.color,
                    spec.value,
                    petal.pos.x
                );
                self.petals.push(petal);
                report.spawned = Some(id);
            }
        }

        // Advance: collection flight or physics, never both
        let viewport = self.viewport;
        let elapsed = self.elapsed_ms;
        let duration = self.collection_duration_ms;
        let easing = self.easing;
        let previous = std::mem::take(&mut self.petals);
        self.petals.reserve(previous.len());
        for petal in previous {
            if petal.is_collecting() {
                let next = advance_collection(&petal, delta_ms, duration, easing);
                if is_collection_complete(&next) {
                    report.completed.push(next.id);
                    continue;
                }
                self.petals.push(next);
            } else {
                let next = update_petal_physics(&petal, elapsed, delta_scale, &viewport);
                if should_remove_petal(&next, &viewport) {
                    report.evicted.push(next.id);
                    continue;
                }
                self.petals.push(next);
            }
        }

        if !report.evicted.is_empty() {
            log::debug!("Evicted {} petals off-screen", report.evicted.len());
        }
        report
    }

    /// Place a petal directly (burst effects, scripted scenes)
    ///
    /// Respects the live cap and reduced motion.
    pub fn insert(&mut self, spec: PetalSpec, pos: Vec2) -> Option<PetalId> {
        if self.reduced_motion || self.petals.len() >= self.spawner.rules.max_petals {
            return None;
        }
        let id = self.allocate_id();
        self.petals.push(Petal::at(id, pos, spec));
        Some(id)
    }

    /// Spawn up to `count` petals at once, ignoring the interval but not the cap
    ///
    /// Does not reset the spawn timer.
    pub fn burst(&mut self, count: usize, now_ms: f64) -> Vec<PetalId> {
        if self.reduced_motion {
            return Vec::new();
        }
        let room = self.spawner.rules.max_petals.saturating_sub(self.petals.len());
        let palette = self.palette.palette(now_ms);
        let mut spawned = Vec::with_capacity(count.min(room));
        for _ in 0..count.min(room) {
            let draws = SpawnDraws::sample(&mut self.rng);
            let spec = self.spawner.select(draws, &palette);
            let id = self.allocate_id();
            self.petals.push(create_petal(id, spec, &self.viewport, &mut self.rng));
            spawned.push(id);
        }
        if !spawned.is_empty() {
            log::debug!("Burst spawned {} petals", spawned.len());
        }
        spawned
    }

    /// Pointer down: starts a gesture (claims reset)
    pub fn begin_gesture(&mut self) {
        self.gesture.begin();
    }

    /// Pointer up / cancel
    pub fn end_gesture(&mut self) {
        self.gesture.end();
    }

    /// Strike at `point`; returns the hit if a falling petal was claimed
    ///
    /// Petals already collecting, or already claimed by the active gesture,
    /// are skipped, so repeated strikes never reward twice.
    pub fn strike(&mut self, point: Vec2) -> Option<CollectionEvent> {
        if self.reduced_motion {
            return None;
        }
        let idx = find_strike(&self.petals, point, &self.gesture)?;
        let target = self.counter_target();
        let petal = &mut self.petals[idx];
        if self.gesture.is_active() {
            self.gesture.claim(petal.id);
        }
        let event = begin_collection(petal, target)?;
        log::debug!(
            "Hit petal {} (+{}) at ({:.0}, {:.0})",
            event.petal_id,
            event.value,
            event.pos.x,
            event.pos.y
        );
        Some(event)
    }

    /// Strike along a drag segment, sampling densely enough not to skip petals
    pub fn slash(&mut self, from: Vec2, to: Vec2) -> Vec<CollectionEvent> {
        let step = PETAL_RADIUS * 0.5;
        let samples = ((from.distance(to) / step).ceil() as usize).max(1);
        let mut hits = Vec::new();
        for i in 0..=samples {
            let point = from.lerp(to, i as f32 / samples as f32);
            while let Some(event) = self.strike(point) {
                hits.push(event);
            }
        }
        hits
    }
}
