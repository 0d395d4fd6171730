//! Game state and core simulation types
//!
//! All state a run needs to continue lives here and serializes as one
//! snapshot; the RNG rides along so restored runs stay deterministic.
//! Transient audio bookkeeping is rebuilt instead of persisted.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::explosion::Explosion;
use super::level::{DifficultyConfig, LevelConfig, level_config};
use super::trajectory;
use crate::audio::CueScheduler;
use crate::consts::*;

/// Phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Notes fall, input is live
    Running,
    /// Health hit zero; terminal for the run
    Defeated,
}

/// Which written form a note shows while falling. The explosion reveal shows
/// the other one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteForm {
    Pinyin,
    Hanzi,
}

impl NoteForm {
    /// The form not shown in flight
    pub fn other(self) -> Self {
        match self {
            NoteForm::Pinyin => NoteForm::Hanzi,
            NoteForm::Hanzi => NoteForm::Pinyin,
        }
    }
}

/// One falling syllable in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: u32,
    /// Toneless pinyin the player types ("ma")
    pub pinyin: String,
    /// Tone 1-4
    pub tone: u8,
    /// Hanzi for this (pinyin, tone)
    pub glyph: String,
    /// Form shown while falling
    pub form: NoteForm,
    /// Horizontal column this note spawned in
    pub spawn_x: f32,
    /// Vertical progress: 0 at spawn, `BASE_PROGRESS` at the base line
    pub progress: f32,
    /// Progress per millisecond, stamped at spawn; level changes never
    /// retune notes already in flight
    pub fall_speed: f32,
    /// Current best match for the typed buffer
    pub highlighted: bool,
    /// Typed exactly, waiting on a tone digit
    pub awaiting_tone: bool,
    /// When the next audio cue for this note is due
    pub next_cue_at: f64,
}

impl Note {
    /// Syllable+tone key handed to the external cue resolver ("ma3")
    pub fn key(&self) -> String {
        format!("{}{}", self.pinyin, self.tone)
    }

    /// Current horizontal position
    pub fn x(&self) -> f32 {
        trajectory::drift_x(self.spawn_x, self.progress)
    }

    /// Current field position for the renderer
    pub fn position(&self) -> Vec2 {
        trajectory::position(self.spawn_x, self.progress)
    }

    /// Whether this note has hit the base line
    pub fn reached_base(&self) -> bool {
        self.progress >= BASE_PROGRESS
    }
}

/// Discrete outcomes of a tick or an input, for the external layer to map to
/// UI sounds and HUD updates.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    Spawned { id: u32, key: String },
    Destroyed { id: u32, key: String, score_delta: u64 },
    Missed { id: u32, key: String },
    WrongTone { tone: u8 },
    LevelUp { level: u32 },
    BombDetonated { cleared: usize },
    Defeated { score: u64 },
}

/// Complete run state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Preset selected by the menu layer; read-only here
    pub difficulty: DifficultyConfig,
    /// Current level, 1-based
    pub level: u32,
    /// Tuning derived from (level, difficulty); recomputed on level-up
    pub level_cfg: LevelConfig,
    pub phase: GamePhase,
    pub score: u64,
    /// 0-100; each miss costs `difficulty.health_loss_per_miss`
    pub health: u32,
    /// Consecutive destroys without a miss or wrong tone
    pub combo: u32,
    /// Destroys counted toward the next level-up
    pub destroyed_this_level: u32,
    /// Live falling notes
    pub notes: Vec<Note>,
    /// Detached reveal animations; never re-enter `notes`
    pub explosions: Vec<Explosion>,
    /// Pending typed characters
    pub input: String,
    /// Wall-clock of the previous tick; `None` before the first tick
    pub last_tick_at: Option<f64>,
    /// Wall-clock of the last successful spawn
    pub last_spawn_at: Option<f64>,
    /// Spawning is suppressed until this timestamp (bomb relief window)
    pub spawn_hold_until: f64,
    /// Set while paused; used to rebase clocks on resume
    paused_at: Option<f64>,
    /// Seeded RNG for all stochastic choices
    pub rng: Pcg32,
    /// Per-note cue due-times live on the notes; the "currently sounding"
    /// side lives here, keyed by note id
    #[serde(skip)]
    pub cues: CueScheduler,
    next_id: u32,
}

impl GameState {
    /// Start a fresh run
    pub fn new(seed: u64, difficulty: DifficultyConfig) -> Self {
        let level_cfg = level_config(1, &difficulty);
        Self {
            seed,
            difficulty,
            level: 1,
            level_cfg,
            phase: GamePhase::Running,
            score: 0,
            health: START_HEALTH,
            combo: 0,
            destroyed_this_level: 0,
            notes: Vec::new(),
            explosions: Vec::new(),
            input: String::new(),
            last_tick_at: None,
            last_spawn_at: None,
            spawn_hold_until: 0.0,
            paused_at: None,
            rng: Pcg32::seed_from_u64(seed),
            cues: CueScheduler::default(),
            next_id: 1,
        }
    }

    /// Allocate a new note ID
    pub fn next_note_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Whether the bomb is armed
    pub fn bomb_ready(&self) -> bool {
        self.combo >= BOMB_COMBO_THRESHOLD
    }

    /// Remove the note at `idx` as a confirmed destroy: score it, advance the
    /// combo and level counters, and hand it to the explosion list.
    pub fn destroy_note(&mut self, idx: usize, now: f64, events: &mut Vec<RunEvent>) {
        let note = self.notes.remove(idx);
        self.cues.forget(note.id);

        let mut delta =
            DESTROY_SCORE + COMBO_BONUS_STEP * u64::from(self.combo.min(COMBO_BONUS_CAP));
        if note.form == NoteForm::Hanzi {
            delta += HANZI_BONUS;
        }
        self.combo += 1;
        self.score += delta;
        self.destroyed_this_level += 1;

        events.push(RunEvent::Destroyed {
            id: note.id,
            key: note.key(),
            score_delta: delta,
        });
        self.explosions.push(Explosion::from_note(&note, now));

        if self.destroyed_this_level >= self.difficulty.notes_per_level {
            self.level += 1;
            self.destroyed_this_level = 0;
            self.level_cfg = level_config(self.level, &self.difficulty);
            log::info!("level up -> {} ({})", self.level, self.difficulty.id);
            events.push(RunEvent::LevelUp { level: self.level });
        }
    }

    /// Mark the run as paused. The driver detaches its tick callback; this
    /// only records when the pause began.
    pub fn pause(&mut self, now: f64) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    /// Rebase every stored clock by the paused duration so elapsed-time
    /// computation never observes the gap.
    pub fn resume(&mut self, now: f64) {
        let Some(paused_at) = self.paused_at.take() else {
            return;
        };
        let gap = (now - paused_at).max(0.0);
        if let Some(t) = self.last_tick_at.as_mut() {
            *t += gap;
        }
        if let Some(t) = self.last_spawn_at.as_mut() {
            *t += gap;
        }
        self.spawn_hold_until += gap;
        for note in &mut self.notes {
            note.next_cue_at += gap;
        }
        for explosion in &mut self.explosions {
            explosion.started_at += gap;
        }
        self.cues.rebase(gap);
    }

    /// Whether the run is paused
    pub fn paused(&self) -> bool {
        self.paused_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::preset;

    fn state() -> GameState {
        GameState::new(7, preset("standard").unwrap())
    }

    fn push_note(state: &mut GameState, pinyin: &str, tone: u8, progress: f32) -> u32 {
        let id = state.next_note_id();
        state.notes.push(Note {
            id,
            pinyin: pinyin.to_string(),
            tone,
            glyph: "口".to_string(),
            form: NoteForm::Pinyin,
            spawn_x: 20.0,
            progress,
            fall_speed: 0.005,
            highlighted: false,
            awaiting_tone: false,
            next_cue_at: 0.0,
        });
        id
    }

    #[test]
    fn key_and_position() {
        let mut s = state();
        push_note(&mut s, "ma", 3, 0.0);
        let note = &s.notes[0];
        assert_eq!(note.key(), "ma3");
        assert_eq!(note.position(), Vec2::new(20.0, 0.0));
        assert!(!note.reached_base());
    }

    #[test]
    fn destroy_scores_and_builds_combo() {
        let mut s = state();
        push_note(&mut s, "ma", 1, 40.0);
        push_note(&mut s, "xi", 2, 10.0);

        let mut events = Vec::new();
        s.destroy_note(0, 1_000.0, &mut events);
        assert_eq!(s.score, DESTROY_SCORE);
        assert_eq!(s.combo, 1);

        s.destroy_note(0, 1_100.0, &mut events);
        assert_eq!(s.score, 2 * DESTROY_SCORE + COMBO_BONUS_STEP);
        assert_eq!(s.combo, 2);
        assert_eq!(s.explosions.len(), 2);
        assert!(s.notes.is_empty());
        assert!(matches!(events[0], RunEvent::Destroyed { .. }));
    }

    #[test]
    fn combo_bonus_caps() {
        let mut s = state();
        s.combo = COMBO_BONUS_CAP + 25;
        push_note(&mut s, "ma", 1, 0.0);
        let mut events = Vec::new();
        s.destroy_note(0, 0.0, &mut events);
        let expected = DESTROY_SCORE + COMBO_BONUS_STEP * u64::from(COMBO_BONUS_CAP);
        assert_eq!(s.score, expected);
    }

    #[test]
    fn hanzi_form_pays_extra() {
        let mut s = state();
        push_note(&mut s, "ma", 1, 0.0);
        s.notes[0].form = NoteForm::Hanzi;
        let mut events = Vec::new();
        s.destroy_note(0, 0.0, &mut events);
        assert_eq!(s.score, DESTROY_SCORE + HANZI_BONUS);
    }

    #[test]
    fn level_up_recomputes_config_and_resets_counter() {
        let mut s = state();
        let before = s.level_cfg;
        s.destroyed_this_level = s.difficulty.notes_per_level - 1;
        push_note(&mut s, "ma", 1, 0.0);
        let mut events = Vec::new();
        s.destroy_note(0, 0.0, &mut events);

        assert_eq!(s.level, 2);
        assert_eq!(s.destroyed_this_level, 0);
        assert!(s.level_cfg.spawn_interval_ms < before.spawn_interval_ms);
        assert!(s.level_cfg.fall_speed > before.fall_speed);
        assert!(events.contains(&RunEvent::LevelUp { level: 2 }));
    }

    #[test]
    fn resume_rebases_all_clocks() {
        let mut s = state();
        push_note(&mut s, "ma", 1, 0.0);
        s.last_tick_at = Some(1_000.0);
        s.last_spawn_at = Some(900.0);
        s.spawn_hold_until = 1_500.0;
        s.notes[0].next_cue_at = 1_200.0;

        s.pause(2_000.0);
        assert!(s.paused());
        s.resume(7_000.0); // 5 s paused

        assert_eq!(s.last_tick_at, Some(6_000.0));
        assert_eq!(s.last_spawn_at, Some(5_900.0));
        assert_eq!(s.spawn_hold_until, 6_500.0);
        assert_eq!(s.notes[0].next_cue_at, 6_200.0);
        assert!(!s.paused());

        // Double-resume is a no-op
        s.resume(9_000.0);
        assert_eq!(s.last_tick_at, Some(6_000.0));
    }

    #[test]
    fn snapshot_round_trip_keeps_rng_stream() {
        use rand::Rng;

        let mut s = state();
        push_note(&mut s, "shu", 4, 33.0);
        let json = serde_json::to_string(&s).unwrap();
        let mut restored: GameState = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.notes.len(), 1);
        assert_eq!(restored.notes[0].key(), "shu4");
        // Same RNG stream after restore
        let a: u64 = s.rng.random();
        let b: u64 = restored.rng.random();
        assert_eq!(a, b);
    }
}
