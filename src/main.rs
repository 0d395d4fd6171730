//! Tonefall headless demo
//!
//! Runs a scripted session against a synthetic 60 Hz clock: a simple bot
//! types the most urgent note's syllable, confirms its tone, and fires the
//! bomb when armed. Exercises the whole core - spawning, matching, cues,
//! scoring, persistence - without a renderer or an audio backend.
//!
//! Usage: `tonefall [seed]`

use std::cmp::Ordering;

use tonefall::audio::{CueError, CuePlayer};
use tonefall::profile::{MemoryStore, Profile};
use tonefall::settings::Settings;
use tonefall::sim::{self, GamePhase, GameState, RunEvent};

/// Cue player that only narrates what would sound
struct LoggingCues {
    volume: f32,
}

impl CuePlayer for LoggingCues {
    fn play_cue(&mut self, key: &str, pan: f32) -> Result<(), CueError> {
        log::debug!("cue {key} pan {pan:+.2} vol {:.2}", self.volume);
        Ok(())
    }
}

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xF00D);

    let mut store = MemoryStore::default();
    let settings = Settings::load(&store);
    let mut profile = Profile::load(&store);

    let Some(difficulty) = sim::preset(&profile.last_difficulty).or_else(|| sim::preset("standard"))
    else {
        log::error!("no usable difficulty preset");
        return;
    };
    let difficulty_id = difficulty.id.clone();
    log::info!("seed {seed}, difficulty {difficulty_id}");

    let mut state = GameState::new(seed, difficulty);
    let mut player = LoggingCues {
        volume: settings.effective_cue_volume(),
    };

    let frame_ms = 1_000.0 / 60.0;
    let mut now = 0.0;
    let mut frames: u64 = 0;

    while state.phase == GamePhase::Running && now < 120_000.0 {
        now += frame_ms;
        frames += 1;

        for event in sim::tick(&mut state, now, &mut player) {
            report(&event);
        }

        // The bot acts at a human-ish cadence, one keystroke at a time
        if frames % 6 == 0 {
            bot_step(&mut state, now);
        }
    }

    let new_best = profile.record_run(state.score, &difficulty_id);
    profile.save(&mut store);

    println!(
        "run over after {:.1}s: score {}{}, level {}, health {}",
        now / 1_000.0,
        state.score,
        if new_best { " (new best)" } else { "" },
        state.level,
        state.health,
    );
}

fn report(event: &RunEvent) {
    match event {
        RunEvent::Spawned { key, .. } => log::debug!("spawned {key}"),
        RunEvent::Destroyed { key, score_delta, .. } => {
            log::info!("destroyed {key} (+{score_delta})")
        }
        RunEvent::Missed { key, .. } => log::info!("missed {key}"),
        RunEvent::WrongTone { tone } => log::info!("wrong tone {tone}"),
        RunEvent::LevelUp { level } => log::info!("level {level}"),
        RunEvent::BombDetonated { cleared } => log::info!("bomb cleared {cleared}"),
        RunEvent::Defeated { score } => log::info!("defeated with {score}"),
    }
}

/// One bot action: bomb when it pays, otherwise type toward the note
/// nearest the base and confirm its tone.
fn bot_step(state: &mut GameState, now: f64) {
    if state.bomb_ready() && state.notes.len() >= 3 {
        for event in sim::fire_bomb(state, now) {
            report(&event);
        }
        return;
    }

    let Some(target) = state.notes.iter().max_by(|a, b| {
        a.progress
            .partial_cmp(&b.progress)
            .unwrap_or(Ordering::Equal)
    }) else {
        return;
    };
    let (pinyin, tone) = (target.pinyin.clone(), target.tone);

    // Abandon a stale buffer that no longer leads to the target
    if !pinyin.starts_with(state.input.as_str()) {
        sim::clear_input(state);
    }

    if state.input.len() < pinyin.len() {
        let next = pinyin.as_bytes()[state.input.len()] as char;
        sim::push_char(state, next);
    }
    if state.notes.iter().any(|n| n.awaiting_tone) {
        for event in sim::confirm_tone(state, tone, now) {
            report(&event);
        }
    }
}
