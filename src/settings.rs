//! Engine settings
//!
//! Persisted in LocalStorage on the web; hosts may also hand in JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::spawn::{Reward, SpawnRules, WeightedTable, rare_split};
use crate::sim::state::PetalTier;

/// Invalid or unreadable settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("rare_probability must be within [0, 1], got {0}")]
    RareProbability(f32),

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("rare_value ({rare}) must not be below common_value ({common})")]
    RareBelowCommon { rare: u32, common: u32 },

    #[error("max_petals must be at least 1")]
    ZeroCap,

    #[error("reward table has no row with a positive weight")]
    EmptyRewardTable,

    #[error("unknown quality preset {0:?}")]
    UnknownQuality(String),
}

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Live-petal cap for this preset
    pub fn max_petals(&self) -> usize {
        match self {
            QualityPreset::Low => 6,
            QualityPreset::Medium => 15,
            QualityPreset::High => 30,
        }
    }
}

/// One configured reward row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardWeight {
    pub tier: PetalTier,
    pub value: u32,
    pub weight: f32,
}

/// Petal engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Quality preset (drives the live-petal cap)
    pub quality: QualityPreset,
    /// Explicit cap, overriding the preset
    pub max_petals: Option<usize>,

    // === Spawning ===
    pub spawn_interval_ms: f64,
    /// Chance (0-1) that a spawned petal is rare
    pub rare_probability: f32,
    pub common_value: u32,
    pub rare_value: u32,
    /// Full reward table; when non-empty it replaces the common/rare split
    pub rewards: Vec<RewardWeight>,

    // === Collection ===
    /// Flight time from hit to counter badge
    pub collection_duration_ms: f32,

    // === Accessibility ===
    /// Disables the whole engine: nothing spawns, moves, or renders
    pub reduced_motion: bool,

    /// RNG seed; `None` picks a fresh one per field
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            max_petals: None,

            spawn_interval_ms: SPAWN_INTERVAL_MS,
            rare_probability: RARE_PROBABILITY,
            common_value: COMMON_VALUE,
            rare_value: RARE_VALUE,
            rewards: Vec::new(),

            collection_duration_ms: COLLECTION_DURATION_MS,

            reduced_motion: false,

            seed: None,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse and validate settings JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(0.0..=1.0).contains(&self.rare_probability) {
            return Err(SettingsError::RareProbability(self.rare_probability));
        }
        if !(self.spawn_interval_ms > 0.0) {
            return Err(SettingsError::NotPositive {
                field: "spawn_interval_ms",
                value: self.spawn_interval_ms,
            });
        }
        if !(self.collection_duration_ms > 0.0) {
            return Err(SettingsError::NotPositive {
                field: "collection_duration_ms",
                value: self.collection_duration_ms as f64,
            });
        }
        if self.rare_value < self.common_value {
            return Err(SettingsError::RareBelowCommon {
                rare: self.rare_value,
                common: self.common_value,
            });
        }
        if self.max_petals() == 0 {
            return Err(SettingsError::ZeroCap);
        }
        if !self.rewards.is_empty() && self.reward_table().is_empty() {
            return Err(SettingsError::EmptyRewardTable);
        }
        Ok(())
    }

    /// Switch to the named preset; an explicit cap override is dropped
    pub fn apply_quality(&mut self, name: &str) -> Result<QualityPreset, SettingsError> {
        let preset = QualityPreset::from_str(name)
            .ok_or_else(|| SettingsError::UnknownQuality(name.to_string()))?;
        self.quality = preset;
        self.max_petals = None;
        Ok(preset)
    }

    /// Effective live-petal cap
    pub fn max_petals(&self) -> usize {
        self.max_petals.unwrap_or_else(|| self.quality.max_petals())
    }

    /// Reward table spawns draw from
    pub fn reward_table(&self) -> WeightedTable<Reward> {
        if self.rewards.is_empty() {
            return rare_split(self.rare_probability, self.common_value, self.rare_value);
        }
        WeightedTable::new(self.rewards.iter().map(|row| {
            let reward = Reward {
                tier: row.tier,
                value: row.value,
            };
            (reward, row.weight)
        }))
    }

    /// Spawn parameters derived from these settings
    pub fn spawn_rules(&self) -> SpawnRules {
        SpawnRules {
            max_petals: self.max_petals(),
            interval_ms: self.spawn_interval_ms,
            rewards: self.reward_table(),
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "petal_drift_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded petal settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored petal settings: {}", e),
                }
            }
        }

        log::info!("Using default petal settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Petal settings saved");
            }
        }
    }
}
