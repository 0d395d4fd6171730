//! Tonefall - a falling-syllable tone-typing defense game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (notes, matching, difficulty, game state)
//! - `audio`: Per-note cue scheduling against an external cue player
//! - `profile`: Best score / last difficulty persistence behind a key-value store
//! - `settings`: Audio preferences, passed explicitly instead of living in globals
//!
//! Rendering, audio clip resolution, and durable storage are external
//! collaborators; the crate only exposes what to draw, when to sound, and
//! what to persist.

pub mod audio;
pub mod profile;
pub mod settings;
pub mod sim;

pub use audio::{CuePlayer, CueScheduler};
pub use profile::Profile;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Vertical progress at which a note reaches the base line
    pub const BASE_PROGRESS: f32 = 100.0;
    /// Width of the playfield in field units (x runs 0..100)
    pub const FIELD_WIDTH: f32 = 100.0;
    /// Impact point all notes drift toward as they fall
    pub const TARGET_X: f32 = 50.0;
    /// Keep spawn columns away from the playfield edges
    pub const SPAWN_X_MARGIN: f32 = 6.0;

    /// Elapsed time assumed for the very first tick of a run (one 60 Hz frame)
    pub const NOMINAL_FRAME_MS: f64 = 16.7;
    /// Upper clamp on per-tick elapsed time (tab switches, debugger stops)
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Level-1 interval between spawn attempts
    pub const BASE_SPAWN_INTERVAL_MS: f64 = 2200.0;
    /// Multiplicative spawn-interval shrink per level
    pub const SPAWN_INTERVAL_DECAY: f64 = 0.92;
    /// Spawn interval floor - the game never spawns faster than this
    pub const MIN_SPAWN_INTERVAL_MS: f64 = 650.0;

    /// Level-1 fall speed in progress units per millisecond (~22 s to the base)
    pub const BASE_FALL_SPEED: f32 = 0.0045;
    /// Multiplicative fall-speed growth per level
    pub const FALL_SPEED_GROWTH: f32 = 1.08;
    /// Fall speed ceiling
    pub const MAX_FALL_SPEED: f32 = 0.015;

    /// The concurrency cap grows by one every this many levels
    pub const CAP_GROWTH_LEVELS: u32 = 3;
    /// Absolute ceiling on simultaneously live notes
    pub const MAX_CONCURRENT: usize = 8;

    /// Below this level notes always show pinyin
    pub const HANZI_INTRO_LEVEL: u32 = 3;
    /// At and past this level notes always show hanzi
    pub const HANZI_SATURATION_LEVEL: u32 = 12;

    /// Cue interval for a note at the top of the field
    pub const CUE_MAX_INTERVAL_MS: f64 = 2400.0;
    /// Cue interval for a note touching the base line
    pub const CUE_MIN_INTERVAL_MS: f64 = 280.0;
    /// Exponent of the urgency decay curve
    pub const CUE_URGENCY_EXP: f32 = 1.5;
    /// How long a note counts as "currently sounding" after a cue starts
    pub const CUE_SOUNDING_MS: f64 = 600.0;

    /// Explosion phase durations
    pub const EXPLOSION_EXPAND_MS: f64 = 160.0;
    pub const EXPLOSION_SHOW_MS: f64 = 650.0;
    pub const EXPLOSION_FADE_MS: f64 = 240.0;

    /// Base score per destroyed note
    pub const DESTROY_SCORE: u64 = 10;
    /// Extra score per combo step
    pub const COMBO_BONUS_STEP: u64 = 2;
    /// Combo steps stop counting past this streak
    pub const COMBO_BONUS_CAP: u32 = 10;
    /// Bonus for destroying a note shown in hanzi form
    pub const HANZI_BONUS: u64 = 5;

    /// Combo streak required to arm the bomb
    pub const BOMB_COMBO_THRESHOLD: u32 = 10;
    /// Score per note cleared by the bomb
    pub const BOMB_SCORE_PER_NOTE: u64 = 5;
    /// Spawn suppression window installed by the bomb
    pub const BOMB_SPAWN_HOLD_MS: f64 = 3000.0;

    /// Health at run start
    pub const START_HEALTH: u32 = 100;
}

/// Stereo pan in [-1, 1] for a horizontal field position in [0, 100]
#[inline]
pub fn pan_from_x(x: f32) -> f32 {
    (x / 50.0 - 1.0).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pan_spans_the_field() {
        assert_eq!(pan_from_x(0.0), -1.0);
        assert_eq!(pan_from_x(50.0), 0.0);
        assert_eq!(pan_from_x(100.0), 1.0);
        // Drift can overshoot transiently; pan stays in range
        assert_eq!(pan_from_x(140.0), 1.0);
    }
}
