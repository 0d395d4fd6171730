//! Deterministic simulation module
//!
//! All gameplay logic lives here. The module is deterministic by contract:
//! - Time comes in as explicit timestamps, never read from a clock
//! - Seeded RNG only, carried inside `GameState`
//! - Single-threaded: keystroke handlers and the tick mutate the same state
//!   but are serialized by the caller, so nothing here locks
//! - No rendering, audio backend, or storage dependencies - those arrive as
//!   traits

pub mod explosion;
pub mod level;
pub mod matching;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod trajectory;

pub use explosion::{EXPLOSION_TOTAL_MS, Explosion, ExplosionPhase};
pub use level::{
    DifficultyConfig, LevelConfig, PRESET_IDS, SyllableEntry, hanzi_probability, level_config,
    preset, presets,
};
pub use matching::{clear_input, confirm_tone, push_char, update_targeting};
pub use spawn::spawn_note;
pub use state::{GamePhase, GameState, Note, NoteForm, RunEvent};
pub use tick::{fire_bomb, tick};
pub use trajectory::{drift_x, position};
