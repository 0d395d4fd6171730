//! Persisted player profile
//!
//! Best score and last-used difficulty, stored as one JSON value behind a
//! key-value store the embedding layer provides (browser LocalStorage, a
//! file, a test map). Read at run start, written at run end. Missing or
//! corrupt entries default silently - durable-storage failure handling is
//! the store's concern, not the core's.

use serde::{Deserialize, Serialize};

/// External key-value storage.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore(std::collections::HashMap<String, String>);

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }
}

/// What survives between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub best_score: u64,
    pub last_difficulty: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            best_score: 0,
            last_difficulty: "standard".to_string(),
        }
    }
}

impl Profile {
    /// Storage key in the external store
    const STORAGE_KEY: &'static str = "tonefall_profile";

    /// Load the profile, defaulting on anything missing or unreadable
    pub fn load(store: &dyn KvStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Some(json) => serde_json::from_str(&json).unwrap_or_else(|err| {
                log::warn!("profile unreadable ({err}), starting fresh");
                Self::default()
            }),
            None => {
                log::info!("no profile found, starting fresh");
                Self::default()
            }
        }
    }

    /// Persist the profile
    pub fn save(&self, store: &mut dyn KvStore) {
        if let Ok(json) = serde_json::to_string(self) {
            store.set(Self::STORAGE_KEY, &json);
            log::info!("profile saved (best {})", self.best_score);
        }
    }

    /// Whether a finished run sets a new best
    pub fn beats(&self, score: u64) -> bool {
        score > 0 && score > self.best_score
    }

    /// Fold a finished run into the profile. Returns true on a new best.
    pub fn record_run(&mut self, score: u64, difficulty_id: &str) -> bool {
        self.last_difficulty = difficulty_id.to_string();
        if self.beats(score) {
            self.best_score = score;
            true
        } else {
            false
        }
    }
}
