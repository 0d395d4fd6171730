//! Audio preferences
//!
//! Volume and mute state travel as a plain value handed to whoever drives
//! the audio backend - never as ambient global state - so the simulation
//! core stays testable without one. Persisted through the same key-value
//! store as the profile.

use serde::{Deserialize, Serialize};

use crate::profile::KvStore;

/// Player audio preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Per-note syllable cues
    pub cue_volume: f32,
    /// Single-shot UI effects (destroy, miss, bomb)
    pub effect_volume: f32,
    /// Mute everything
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            cue_volume: 1.0,
            effect_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Storage key in the external store
    const STORAGE_KEY: &'static str = "tonefall_settings";

    /// Effective volume for syllable cues
    pub fn effective_cue_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.cue_volume).clamp(0.0, 1.0)
        }
    }

    /// Effective volume for UI effects
    pub fn effective_effect_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.effect_volume).clamp(0.0, 1.0)
        }
    }

    /// Load settings, defaulting on anything missing or unreadable
    pub fn load(store: &dyn KvStore) -> Self {
        store
            .get(Self::STORAGE_KEY)
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    /// Persist settings
    pub fn save(&self, store: &mut dyn KvStore) {
        if let Ok(json) = serde_json::to_string(self) {
            store.set(Self::STORAGE_KEY, &json);
        }
    }
}
