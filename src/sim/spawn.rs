//! Note factory
//!
//! Picks what falls next: a uniform syllable from the difficulty-filtered
//! pool, a uniform tone among the playable ones, a spawn column, and the
//! written form. The tick driver decides *when* to call this; the factory
//! only enforces the concurrency cap.

use rand::Rng;
use rand_pcg::Pcg32;

use super::level::{DifficultyConfig, hanzi_probability};
use super::state::{GameState, Note, NoteForm};
use crate::consts::{FIELD_WIDTH, SPAWN_X_MARGIN};

/// Try to create one note. `None` when the live count already meets the cap
/// or no pool syllable has a playable tone under this difficulty.
pub fn spawn_note(state: &mut GameState, now: f64) -> Option<Note> {
    if state.notes.len() >= state.level_cfg.concurrency_cap {
        return None;
    }

    let candidates: Vec<usize> = state
        .difficulty
        .pool
        .iter()
        .enumerate()
        .filter(|(_, entry)| !entry.playable_tones(&state.difficulty).is_empty())
        .map(|(i, _)| i)
        .collect();
    if candidates.is_empty() {
        log::debug!("spawn skipped: no playable syllable in pool");
        return None;
    }

    let (mut pinyin, mut tone, mut glyph) =
        pick_syllable(&mut state.rng, &state.difficulty, &candidates);

    // A live duplicate of the same syllable+tone is confusing to hear and
    // read, so retry once with a different base syllable. Accept the
    // duplicate rather than stall if the pool has nothing else.
    if key_is_live(state, &pinyin, tone) {
        let others: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|&i| state.difficulty.pool[i].pinyin != pinyin)
            .collect();
        if !others.is_empty() {
            (pinyin, tone, glyph) = pick_syllable(&mut state.rng, &state.difficulty, &others);
        }
    }

    let form = if state.rng.random::<f32>() < hanzi_probability(state.level) {
        NoteForm::Hanzi
    } else {
        NoteForm::Pinyin
    };
    let spawn_x = state
        .rng
        .random_range(SPAWN_X_MARGIN..FIELD_WIDTH - SPAWN_X_MARGIN);

    let id = state.next_note_id();
    log::debug!("spawn #{id}: {pinyin}{tone} at x={spawn_x:.1}");
    Some(Note {
        id,
        pinyin,
        tone,
        glyph,
        form,
        spawn_x,
        progress: 0.0,
        fall_speed: state.level_cfg.fall_speed,
        highlighted: false,
        awaiting_tone: false,
        // First cue is due immediately; the scheduler fires it next tick
        next_cue_at: now,
    })
}

fn pick_syllable(
    rng: &mut Pcg32,
    difficulty: &DifficultyConfig,
    indices: &[usize],
) -> (String, u8, String) {
    let entry = &difficulty.pool[indices[rng.random_range(0..indices.len())]];
    let tones = entry.playable_tones(difficulty);
    let tone = tones[rng.random_range(0..tones.len())];
    let glyph = entry.glyph_for(tone).unwrap_or_default().to_string();
    (entry.pinyin.clone(), tone, glyph)
}

fn key_is_live(state: &GameState, pinyin: &str, tone: u8) -> bool {
    state
        .notes
        .iter()
        .any(|n| n.pinyin == pinyin && n.tone == tone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::{SyllableEntry, preset};

    fn tiny_difficulty(entries: &[(&str, u8)]) -> DifficultyConfig {
        DifficultyConfig {
            id: "test".to_string(),
            pool: entries
                .iter()
                .map(|(pinyin, tone)| SyllableEntry {
                    pinyin: (*pinyin).to_string(),
                    glyphs: vec![(*tone, "口".to_string())],
                })
                .collect(),
            enabled_tones: [true, true, true, true],
            concurrency_cap: 4,
            health_loss_per_miss: 10,
            notes_per_level: 10,
        }
    }

    #[test]
    fn respects_concurrency_cap() {
        let mut s = GameState::new(1, preset("standard").unwrap());
        for _ in 0..s.level_cfg.concurrency_cap {
            let note = spawn_note(&mut s, 0.0).unwrap();
            s.notes.push(note);
        }
        assert!(spawn_note(&mut s, 0.0).is_none());
    }

    #[test]
    fn empty_filtered_pool_spawns_nothing() {
        let mut diff = preset("standard").unwrap();
        diff.enabled_tones = [false; 4];
        let mut s = GameState::new(1, diff);
        assert!(spawn_note(&mut s, 0.0).is_none());
    }

    #[test]
    fn spawned_note_matches_level_tuning() {
        let mut s = GameState::new(42, preset("standard").unwrap());
        let note = spawn_note(&mut s, 5_000.0).unwrap();
        assert_eq!(note.progress, 0.0);
        assert_eq!(note.fall_speed, s.level_cfg.fall_speed);
        assert!(note.spawn_x >= SPAWN_X_MARGIN && note.spawn_x <= FIELD_WIDTH - SPAWN_X_MARGIN);
        assert!(s.difficulty.tone_enabled(note.tone));
        assert_eq!(note.next_cue_at, 5_000.0);
        assert!(!note.glyph.is_empty());
    }

    #[test]
    fn retries_away_from_a_live_duplicate() {
        let diff = tiny_difficulty(&[("ma", 1), ("xi", 2)]);
        for seed in 0..32 {
            let mut s = GameState::new(seed, diff.clone());
            let live = spawn_note(&mut s, 0.0).unwrap();
            let live_key = live.key();
            s.notes.push(live);
            // With a second base syllable available, the retry must dodge
            let next = spawn_note(&mut s, 0.0).unwrap();
            assert_ne!(next.key(), live_key);
        }
    }

    #[test]
    fn accepts_duplicate_as_last_resort() {
        let diff = tiny_difficulty(&[("ma", 1)]);
        let mut s = GameState::new(9, diff);
        let live = spawn_note(&mut s, 0.0).unwrap();
        s.notes.push(live);
        let next = spawn_note(&mut s, 0.0).unwrap();
        assert_eq!(next.key(), "ma1");
    }

    #[test]
    fn form_is_pinned_by_level() {
        use crate::consts::HANZI_SATURATION_LEVEL;

        let mut s = GameState::new(3, preset("standard").unwrap());
        for _ in 0..50 {
            let note = spawn_note(&mut s, 0.0).unwrap();
            assert_eq!(note.form, NoteForm::Pinyin); // level 1: always pinyin
        }

        s.level = HANZI_SATURATION_LEVEL;
        for _ in 0..50 {
            let note = spawn_note(&mut s, 0.0).unwrap();
            assert_eq!(note.form, NoteForm::Hanzi);
        }
    }
}
