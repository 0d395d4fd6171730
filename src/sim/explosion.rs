//! Destroyed-note reveal lifecycle
//!
//! A destroyed or bombed note detaches into an `Explosion`: a short
//! time-driven animation that reveals the written form the note was *not*
//! showing. Phase is derived purely from elapsed time, so the driver just
//! asks and purges.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Note, NoteForm};
use crate::consts::{EXPLOSION_EXPAND_MS, EXPLOSION_FADE_MS, EXPLOSION_SHOW_MS};

/// Total lifetime of an explosion
pub const EXPLOSION_TOTAL_MS: f64 = EXPLOSION_EXPAND_MS + EXPLOSION_SHOW_MS + EXPLOSION_FADE_MS;

/// Animation phase, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionPhase {
    Expanding,
    Showing,
    Fading,
}

/// A detached reveal record; never re-enters the live note list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    /// Field position at the moment of destruction
    pub pos: Vec2,
    pub pinyin: String,
    pub tone: u8,
    pub glyph: String,
    /// Form the note showed in flight; the reveal draws the other one
    pub shown: NoteForm,
    /// Monotonic timestamp the animation started at
    pub started_at: f64,
}

impl Explosion {
    /// Detach a note into its reveal animation
    pub fn from_note(note: &Note, now: f64) -> Self {
        Self {
            pos: note.position(),
            pinyin: note.pinyin.clone(),
            tone: note.tone,
            glyph: note.glyph.clone(),
            shown: note.form,
            started_at: now,
        }
    }

    /// The form the reveal should draw
    pub fn reveal_form(&self) -> NoteForm {
        self.shown.other()
    }

    /// Phase and normalized progress within it, or `None` once the total
    /// duration has elapsed (the purge signal).
    pub fn phase_at(&self, now: f64) -> Option<(ExplosionPhase, f32)> {
        let elapsed = (now - self.started_at).max(0.0);
        if elapsed >= EXPLOSION_TOTAL_MS {
            return None;
        }
        if elapsed < EXPLOSION_EXPAND_MS {
            Some((ExplosionPhase::Expanding, (elapsed / EXPLOSION_EXPAND_MS) as f32))
        } else if elapsed < EXPLOSION_EXPAND_MS + EXPLOSION_SHOW_MS {
            Some((
                ExplosionPhase::Showing,
                ((elapsed - EXPLOSION_EXPAND_MS) / EXPLOSION_SHOW_MS) as f32,
            ))
        } else {
            Some((
                ExplosionPhase::Fading,
                ((elapsed - EXPLOSION_EXPAND_MS - EXPLOSION_SHOW_MS) / EXPLOSION_FADE_MS) as f32,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn explosion(started_at: f64) -> Explosion {
        Explosion {
            pos: Vec2::new(50.0, 80.0),
            pinyin: "ma".to_string(),
            tone: 2,
            glyph: "麻".to_string(),
            shown: NoteForm::Pinyin,
            started_at,
        }
    }

    #[test]
    fn phase_boundaries_are_exact() {
        let e = explosion(1_000.0);

        assert_eq!(e.phase_at(1_000.0), Some((ExplosionPhase::Expanding, 0.0)));
        // First instant of each following phase
        let show_start = 1_000.0 + EXPLOSION_EXPAND_MS;
        assert_eq!(e.phase_at(show_start), Some((ExplosionPhase::Showing, 0.0)));
        let fade_start = show_start + EXPLOSION_SHOW_MS;
        assert_eq!(e.phase_at(fade_start), Some((ExplosionPhase::Fading, 0.0)));
    }

    #[test]
    fn purges_exactly_at_total_duration() {
        let e = explosion(1_000.0);
        let end = 1_000.0 + EXPLOSION_TOTAL_MS;
        assert!(e.phase_at(end - 0.001).is_some());
        assert_eq!(e.phase_at(end), None);
        assert_eq!(e.phase_at(end + 10_000.0), None);
    }

    #[test]
    fn progress_is_normalized_within_phase() {
        let e = explosion(0.0);
        let (phase, t) = e.phase_at(EXPLOSION_EXPAND_MS / 2.0).unwrap();
        assert_eq!(phase, ExplosionPhase::Expanding);
        assert!((t - 0.5).abs() < 1e-6);

        let (phase, t) = e
            .phase_at(EXPLOSION_EXPAND_MS + EXPLOSION_SHOW_MS * 0.25)
            .unwrap();
        assert_eq!(phase, ExplosionPhase::Showing);
        assert!((t - 0.25).abs() < 1e-6);
    }

    #[test]
    fn reveal_shows_the_other_form() {
        let mut e = explosion(0.0);
        assert_eq!(e.reveal_form(), NoteForm::Hanzi);
        e.shown = NoteForm::Hanzi;
        assert_eq!(e.reveal_form(), NoteForm::Pinyin);
    }
}
