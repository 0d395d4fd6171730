//! Per-frame simulation driver
//!
//! One `tick` per display refresh, resilient to uneven frame delivery: all
//! motion is scaled by measured elapsed time, clamped against huge gaps, and
//! the first tick assumes a nominal frame instead of a jump.
//!
//! Fixed intra-tick order: advance positions, fire due cues, apply misses,
//! then attempt a spawn - so the concurrency cap always sees the post-miss
//! population - and finally age the explosions.

use super::explosion::Explosion;
use super::matching;
use super::spawn::spawn_note;
use super::state::{GamePhase, GameState, RunEvent};
use crate::audio::CuePlayer;
use crate::consts::*;

/// Advance the run to wall-clock `now` (milliseconds, monotonic).
pub fn tick(state: &mut GameState, now: f64, player: &mut dyn CuePlayer) -> Vec<RunEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Running || state.paused() {
        return events;
    }

    let elapsed = match state.last_tick_at {
        Some(prev) => (now - prev).clamp(0.0, MAX_FRAME_MS),
        None => NOMINAL_FRAME_MS,
    };
    state.last_tick_at = Some(now);

    // Fall, then sound: cues fire from the positions the player sees
    for note in &mut state.notes {
        note.progress += note.fall_speed * elapsed as f32;
    }
    state.cues.advance(now, &mut state.notes, player);

    // Misses, batched into one health deduction
    let (missed, survivors): (Vec<_>, Vec<_>) =
        state.notes.drain(..).partition(|n| n.reached_base());
    state.notes = survivors;
    if !missed.is_empty() {
        state.combo = 0;
        let loss = state.difficulty.health_loss_per_miss * missed.len() as u32;
        state.health = state.health.saturating_sub(loss);
        for note in &missed {
            state.cues.forget(note.id);
            events.push(RunEvent::Missed {
                id: note.id,
                key: note.key(),
            });
        }
        log::debug!("{} reached the base, health {}", missed.len(), state.health);
        // The highlighted note may be among the missed; recompute
        matching::update_targeting(state);

        if state.health == 0 {
            state.phase = GamePhase::Defeated;
            log::info!(
                "defeated at level {} with score {}",
                state.level,
                state.score
            );
            events.push(RunEvent::Defeated { score: state.score });
        }
    }

    // One spawn attempt, after misses freed their slots
    if state.phase == GamePhase::Running && now >= state.spawn_hold_until {
        let due = match state.last_spawn_at {
            Some(prev) => now - prev >= state.level_cfg.spawn_interval_ms,
            None => true,
        };
        if due {
            if let Some(note) = spawn_note(state, now) {
                events.push(RunEvent::Spawned {
                    id: note.id,
                    key: note.key(),
                });
                state.notes.push(note);
                state.last_spawn_at = Some(now);
            }
        }
    }

    state.explosions.retain(|e| e.phase_at(now).is_some());

    events
}

/// Combo-gated clear-all. Converts every live note to an explosion in one
/// stroke, awards a flat amount per note, resets the combo, and installs a
/// spawn-suppression window so the player gets a breather instead of an
/// instantly refilled screen.
pub fn fire_bomb(state: &mut GameState, now: f64) -> Vec<RunEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Running || !state.bomb_ready() || state.notes.is_empty() {
        return events;
    }

    let cleared = state.notes.len();
    for note in state.notes.drain(..) {
        state.cues.forget(note.id);
        state.explosions.push(Explosion::from_note(&note, now));
    }
    state.score += BOMB_SCORE_PER_NOTE * cleared as u64;
    state.combo = 0;
    state.input.clear();
    state.spawn_hold_until = now + BOMB_SPAWN_HOLD_MS;
    log::info!("bomb cleared {cleared} notes");
    events.push(RunEvent::BombDetonated { cleared });
    events
}
