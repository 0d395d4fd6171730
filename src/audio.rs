//! Per-note audio cue scheduling
//!
//! Every live note carries its own cue clock: the closer it falls to the
//! base, the shorter the interval until its next cue, producing an
//! accelerating heartbeat per note. Resolving a key to an actual clip (or a
//! synthesized fallback) is the external `CuePlayer`'s problem; the core
//! only decides when to fire, for which key, and at what stereo pan.
//!
//! Cues are not mutually exclusive - any number of notes may sound at once,
//! unlike single-shot UI effects elsewhere in the game.

use std::collections::HashMap;
use std::fmt;

use crate::consts::*;
use crate::pan_from_x;
use crate::sim::state::Note;

/// Why a cue failed to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CueError {
    /// The resolver found neither a clip nor a fallback for the key
    Unresolved,
    /// The backend accepted the key but refused playback
    Playback(String),
}

impl fmt::Display for CueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CueError::Unresolved => write!(f, "no clip or fallback for key"),
            CueError::Playback(reason) => write!(f, "playback refused: {reason}"),
        }
    }
}

impl std::error::Error for CueError {}

/// External collaborator that turns a syllable+tone key into audible sound.
///
/// `play_cue` returns once playback has *started*; it must never block on a
/// cue finishing, and the scheduler never waits on it.
pub trait CuePlayer {
    fn play_cue(&mut self, key: &str, pan: f32) -> Result<(), CueError>;
}

/// Interval until the next cue for a note at `progress`: a slow pulse near
/// the top decaying to a rapid one at the base via a power curve.
pub fn urgency_interval_ms(progress: f32) -> f64 {
    let remaining = (1.0 - progress / BASE_PROGRESS).clamp(0.0, 1.0);
    CUE_MIN_INTERVAL_MS
        + (CUE_MAX_INTERVAL_MS - CUE_MIN_INTERVAL_MS) * f64::from(remaining.powf(CUE_URGENCY_EXP))
}

/// Fires due cues and tracks which notes are currently sounding.
///
/// The sounding map is a second view of the note set, keyed by the same ids,
/// kept outside the notes themselves so cue bookkeeping and tick advancement
/// stay independently testable.
#[derive(Debug, Clone, Default)]
pub struct CueScheduler {
    sounding_until: HashMap<u32, f64>,
}

impl CueScheduler {
    /// Run once per tick over the live notes. A failed cue is logged and
    /// dropped - the due timestamp still advances, so the next interval
    /// naturally re-triggers; there is no retry.
    pub fn advance(&mut self, now: f64, notes: &mut [Note], player: &mut dyn CuePlayer) {
        for note in notes.iter_mut() {
            if note.reached_base() || now < note.next_cue_at {
                continue;
            }
            let key = note.key();
            match player.play_cue(&key, pan_from_x(note.x())) {
                Ok(()) => {
                    self.sounding_until.insert(note.id, now + CUE_SOUNDING_MS);
                }
                Err(err) => log::warn!("cue '{key}' failed: {err}"),
            }
            note.next_cue_at = now + urgency_interval_ms(note.progress);
        }
        self.sounding_until.retain(|_, expiry| *expiry > now);
    }

    /// Whether a note's latest cue is still ringing (display flag)
    pub fn is_sounding(&self, id: u32) -> bool {
        self.sounding_until.contains_key(&id)
    }

    /// How many notes are sounding right now
    pub fn sounding_count(&self) -> usize {
        self.sounding_until.len()
    }

    /// Drop bookkeeping for a destroyed note
    pub fn forget(&mut self, id: u32) {
        self.sounding_until.remove(&id);
    }

    /// Shift every expiry forward after a pause
    pub fn rebase(&mut self, gap: f64) {
        for expiry in self.sounding_until.values_mut() {
            *expiry += gap;
        }
    }
}
