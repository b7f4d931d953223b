//! Static level definitions
//!
//! Levels ship as JSON embedded in the binary and are parsed once on first use.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::body::Rect;
use super::enemy::EnemyKind;
use super::entity::{CollectibleKind, HazardKind, PlatformKind, PlatformMotion};
use super::state::Era;
use crate::error::LevelError;

const LEVELS_JSON: &str = include_str!("../../assets/levels.json");

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// What finishes a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "amount", rename_all = "lowercase")]
pub enum Requirement {
    /// Hold at least this many keys
    Keys(u32),
    /// Collect every quantum fragment (the amount is informational)
    Quantum(u32),
    /// Defeat every enemy
    Boss(u32),
    /// Hold at least this many bananas
    Bananas(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformDef {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(rename = "type", default)]
    pub kind: PlatformKind,
    pub float_amplitude: Option<f32>,
    pub float_speed: Option<f32>,
    pub move_x: Option<f32>,
    pub move_y: Option<f32>,
    pub speed: Option<f32>,
    /// Opacity override for holographic platforms
    pub alpha: Option<f32>,
}

impl PlatformDef {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Animation parameters with defaults filled in
    pub fn motion(&self) -> PlatformMotion {
        let d = PlatformMotion::default();
        PlatformMotion {
            float_amplitude: self.float_amplitude.unwrap_or(d.float_amplitude),
            float_speed: self.float_speed.unwrap_or(d.float_speed),
            move_x: self.move_x.unwrap_or(d.move_x),
            move_y: self.move_y.unwrap_or(d.move_y),
            move_speed: self.speed.unwrap_or(d.move_speed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollectibleDef {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "type")]
    pub kind: CollectibleKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyDef {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "type")]
    pub kind: EnemyKind,
    pub patrol_range: Option<f32>,
    pub health: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardDef {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(rename = "type")]
    pub kind: HazardKind,
}

/// One level's static layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDef {
    pub name: String,
    /// Timeline the level is themed around
    pub era: u16,
    pub width: f32,
    pub height: f32,
    pub description: String,
    pub difficulty: String,
    pub player_start: Point,
    pub completion_requirement: Requirement,
    pub platforms: Vec<PlatformDef>,
    pub collectibles: Vec<CollectibleDef>,
    pub enemies: Vec<EnemyDef>,
    #[serde(default)]
    pub hazards: Vec<HazardDef>,
}

impl LevelDef {
    pub fn era(&self) -> Option<Era> {
        Era::try_from(self.era).ok()
    }
}

/// Parse a JSON array of levels
pub fn parse_levels(json: &str) -> Result<Vec<LevelDef>, LevelError> {
    Ok(serde_json::from_str(json)?)
}

/// All shipped levels, parsed on first call
pub fn levels() -> &'static [LevelDef] {
    static LEVELS: OnceLock<Vec<LevelDef>> = OnceLock::new();
    LEVELS.get_or_init(|| match parse_levels(LEVELS_JSON) {
        Ok(levels) => {
            log::info!("Loaded {} levels", levels.len());
            levels
        }
        Err(e) => {
            log::error!("Bundled level data is unusable: {}", e);
            Vec::new()
        }
    })
}

/// Look up a level by 1-based number
pub fn level(number: u32) -> Result<&'static LevelDef, LevelError> {
    number
        .checked_sub(1)
        .and_then(|i| levels().get(i as usize))
        .ok_or(LevelError::NotFound(number))
}

pub fn level_count() -> u32 {
    levels().len() as u32
}
