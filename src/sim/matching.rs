//! Incremental input matching and tone resolution
//!
//! Keystrokes arrive between ticks and only touch the typed buffer and the
//! targeting flags; the tick loop owns every other mutation. Targeting is
//! recomputed from scratch on every buffer change, so the flags never go
//! stale when notes spawn or die under the player's fingers.

use std::cmp::Ordering;

use super::state::{GamePhase, GameState, RunEvent};

/// Append a typed character (a-z, case-insensitive) and retarget.
/// Returns the id of the newly highlighted note, if any.
pub fn push_char(state: &mut GameState, c: char) -> Option<u32> {
    if state.phase != GamePhase::Running || !c.is_ascii_alphabetic() {
        return None;
    }
    state.input.push(c.to_ascii_lowercase());
    update_targeting(state)
}

/// Drop the pending buffer (backspace / escape) and clear targeting.
pub fn clear_input(state: &mut GameState) {
    state.input.clear();
    update_targeting(state);
}

/// Recompute targeting for the current buffer.
///
/// Exact matches win over prefix matches; ties go to the note with the
/// greatest progress (closest to the base, most urgent). The winner is
/// highlighted, and additionally flagged as awaiting a tone digit when the
/// buffer spells its whole syllable.
pub fn update_targeting(state: &mut GameState) -> Option<u32> {
    for note in &mut state.notes {
        note.highlighted = false;
        note.awaiting_tone = false;
    }
    if state.input.is_empty() {
        return None;
    }

    let input = state.input.as_str();
    let exact_exists = state.notes.iter().any(|n| n.pinyin == input);
    let winner = state
        .notes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.pinyin.starts_with(input))
        .filter(|(_, n)| !exact_exists || n.pinyin == input)
        .max_by(|(_, a), (_, b)| {
            a.progress
                .partial_cmp(&b.progress)
                .unwrap_or(Ordering::Equal)
        })
        .map(|(i, _)| i)?;

    let note = &mut state.notes[winner];
    note.highlighted = true;
    note.awaiting_tone = exact_exists;
    Some(note.id)
}

/// Resolve a tone digit against the pending syllable.
///
/// Deliberately searches **all** live notes for the syllable+tone pair, not
/// just the highlighted one: several notes with the same base syllable but
/// different tones may be in flight, and any of them is a legal kill in any
/// order. No match is a wrong-tone outcome: nothing is removed, the combo
/// resets, and the pending disambiguation clears.
pub fn confirm_tone(state: &mut GameState, tone: u8, now: f64) -> Vec<RunEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Running {
        return events;
    }
    let Some(pending) = state
        .notes
        .iter()
        .find(|n| n.awaiting_tone)
        .map(|n| n.pinyin.clone())
    else {
        return events;
    };

    let target = state
        .notes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.pinyin == pending && n.tone == tone)
        .max_by(|(_, a), (_, b)| {
            a.progress
                .partial_cmp(&b.progress)
                .unwrap_or(Ordering::Equal)
        })
        .map(|(i, _)| i);

    match target {
        Some(idx) => {
            state.destroy_note(idx, now, &mut events);
        }
        None => {
            log::debug!("wrong tone {tone} for '{pending}'");
            state.combo = 0;
            events.push(RunEvent::WrongTone { tone });
        }
    }
    state.input.clear();
    update_targeting(state);
    events
}
