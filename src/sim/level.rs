//! Difficulty presets and per-level tuning curves
//!
//! Everything here is pure: the same (level, difficulty) pair always maps to
//! the same `LevelConfig`, which keeps progression testable and lets the
//! driver recompute the config freely on level-up.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// One syllable the player can type, with its playable tone/glyph pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyllableEntry {
    /// Toneless pinyin, lowercase a-z (what the player types)
    pub pinyin: String,
    /// (tone, hanzi) pairs this syllable can spawn as
    pub glyphs: Vec<(u8, String)>,
}

impl SyllableEntry {
    /// Tones of this entry that the difficulty has in play
    pub fn playable_tones(&self, difficulty: &DifficultyConfig) -> Vec<u8> {
        self.glyphs
            .iter()
            .map(|(tone, _)| *tone)
            .filter(|tone| difficulty.tone_enabled(*tone))
            .collect()
    }

    /// Hanzi for a specific tone, if this syllable carries it
    pub fn glyph_for(&self, tone: u8) -> Option<&str> {
        self.glyphs
            .iter()
            .find(|(t, _)| *t == tone)
            .map(|(_, hanzi)| hanzi.as_str())
    }
}

/// An immutable difficulty preset, selected by the menu layer outside the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Stable preset identifier ("beginner", "standard", "expert")
    pub id: String,
    /// Candidate syllables for the spawner
    pub pool: Vec<SyllableEntry>,
    /// Which of tones 1-4 are in play
    pub enabled_tones: [bool; 4],
    /// Base cap on simultaneously live notes (grows with level)
    pub concurrency_cap: usize,
    /// Health deducted per note that reaches the base
    pub health_loss_per_miss: u32,
    /// Destroys required to advance a level
    pub notes_per_level: u32,
}

impl DifficultyConfig {
    /// Whether a tone (1-4) is in play for this preset
    pub fn tone_enabled(&self, tone: u8) -> bool {
        matches!(tone, 1..=4) && self.enabled_tones[tone as usize - 1]
    }
}

/// Spawn/fall/cap tuning for one level, derived - never persisted or mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Interval between spawn attempts
    pub spawn_interval_ms: f64,
    /// Vertical progress per millisecond, stamped onto notes at spawn
    pub fall_speed: f32,
    /// Cap on simultaneously live notes
    pub concurrency_cap: usize,
}

/// Compute the tuning for a level. Level <= 1 returns the base values exactly;
/// each further level tightens spawn interval and fall speed multiplicatively
/// inside their configured bounds, and widens the cap one step every
/// `CAP_GROWTH_LEVELS`.
pub fn level_config(level: u32, difficulty: &DifficultyConfig) -> LevelConfig {
    let steps = level.saturating_sub(1);
    let spawn_interval_ms = (BASE_SPAWN_INTERVAL_MS * SPAWN_INTERVAL_DECAY.powi(steps as i32))
        .max(MIN_SPAWN_INTERVAL_MS);
    let fall_speed =
        (BASE_FALL_SPEED * FALL_SPEED_GROWTH.powi(steps as i32)).min(MAX_FALL_SPEED);
    let concurrency_cap = (difficulty.concurrency_cap + (steps / CAP_GROWTH_LEVELS) as usize)
        .min(MAX_CONCURRENT);
    LevelConfig {
        spawn_interval_ms,
        fall_speed,
        concurrency_cap,
    }
}

/// Probability that a note spawns showing hanzi instead of pinyin.
/// Pinned to 0 before the intro level, 1 from the saturation level, linear
/// in between.
pub fn hanzi_probability(level: u32) -> f32 {
    if level < HANZI_INTRO_LEVEL {
        0.0
    } else if level >= HANZI_SATURATION_LEVEL {
        1.0
    } else {
        (level - HANZI_INTRO_LEVEL) as f32 / (HANZI_SATURATION_LEVEL - HANZI_INTRO_LEVEL) as f32
    }
}

// === Built-in dictionary and presets ===

/// Compact pinyin -> (tone, hanzi) dataset backing the built-in presets.
/// Tone numbers 1-4; syllables without a glyph for a tone simply omit it.
const DICT: &[(&str, &[(u8, &str)])] = &[
    ("ma", &[(1, "妈"), (2, "麻"), (3, "马"), (4, "骂")]),
    ("ba", &[(1, "八"), (2, "拔"), (3, "把"), (4, "爸")]),
    ("bao", &[(1, "包"), (3, "保"), (4, "抱")]),
    ("bi", &[(1, "逼"), (2, "鼻"), (3, "笔"), (4, "必")]),
    ("da", &[(1, "搭"), (2, "答"), (3, "打"), (4, "大")]),
    ("di", &[(1, "低"), (2, "敌"), (3, "底"), (4, "地")]),
    ("du", &[(1, "都"), (2, "读"), (3, "赌"), (4, "度")]),
    ("fu", &[(1, "夫"), (2, "福"), (3, "府"), (4, "父")]),
    ("hai", &[(2, "还"), (3, "海"), (4, "害")]),
    ("hua", &[(1, "花"), (2, "华"), (4, "画")]),
    ("ji", &[(1, "鸡"), (2, "急"), (3, "几"), (4, "记")]),
    ("li", &[(2, "离"), (3, "里"), (4, "力")]),
    ("mai", &[(2, "埋"), (3, "买"), (4, "卖")]),
    ("mao", &[(1, "猫"), (2, "毛"), (4, "帽")]),
    ("mi", &[(2, "迷"), (3, "米"), (4, "密")]),
    ("shan", &[(1, "山"), (3, "闪"), (4, "扇")]),
    ("shi", &[(1, "诗"), (2, "十"), (3, "史"), (4, "是")]),
    ("shu", &[(1, "书"), (2, "熟"), (3, "鼠"), (4, "树")]),
    ("tang", &[(1, "汤"), (2, "糖"), (3, "躺"), (4, "烫")]),
    ("wen", &[(1, "温"), (2, "文"), (3, "稳"), (4, "问")]),
    ("xi", &[(1, "西"), (2, "习"), (3, "洗"), (4, "戏")]),
    ("xue", &[(2, "学"), (3, "雪"), (4, "血")]),
    ("yan", &[(1, "烟"), (2, "盐"), (3, "眼"), (4, "燕")]),
    ("yu", &[(2, "鱼"), (3, "雨"), (4, "玉")]),
    ("zhu", &[(1, "猪"), (2, "竹"), (3, "主"), (4, "住")]),
];

fn pool_from(dict: &[(&str, &[(u8, &str)])]) -> Vec<SyllableEntry> {
    dict.iter()
        .map(|(pinyin, glyphs)| SyllableEntry {
            pinyin: (*pinyin).to_string(),
            glyphs: glyphs
                .iter()
                .map(|(tone, hanzi)| (*tone, (*hanzi).to_string()))
                .collect(),
        })
        .collect()
}

/// The ids of the built-in presets, in menu order.
pub const PRESET_IDS: [&str; 3] = ["beginner", "standard", "expert"];

/// Look up a built-in preset by id.
pub fn preset(id: &str) -> Option<DifficultyConfig> {
    match id {
        "beginner" => Some(DifficultyConfig {
            id: "beginner".to_string(),
            // Short pool, and only the two most distinct tones
            pool: pool_from(&DICT[..12]),
            enabled_tones: [true, false, false, true],
            concurrency_cap: 3,
            health_loss_per_miss: 10,
            notes_per_level: 8,
        }),
        "standard" => Some(DifficultyConfig {
            id: "standard".to_string(),
            pool: pool_from(DICT),
            enabled_tones: [true, true, true, true],
            concurrency_cap: 4,
            health_loss_per_miss: 10,
            notes_per_level: 10,
        }),
        "expert" => Some(DifficultyConfig {
            id: "expert".to_string(),
            pool: pool_from(DICT),
            enabled_tones: [true, true, true, true],
            concurrency_cap: 6,
            health_loss_per_miss: 20,
            notes_per_level: 12,
        }),
        _ => None,
    }
}

/// All built-in presets, in menu order.
pub fn presets() -> Vec<DifficultyConfig> {
    PRESET_IDS.iter().filter_map(|id| preset(id)).collect()
}
