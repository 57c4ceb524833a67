use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Identity of the player who owns a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub u64);

impl OwnerId {
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Abyss reporting period number. Ordering follows the period sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Season(pub u32);

impl Season {
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which period a live fetch targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    Current,
    Previous,
}

impl Period {
    pub fn is_previous(self) -> bool {
        matches!(self, Period::Previous)
    }
}

/// A single unit that took part in a battle half.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleCharacter {
    pub id: u32,
    pub name: String,
    pub level: u32,
    #[serde(default)]
    pub rarity: u8,
}

/// One half of a chamber.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battle {
    pub half: u8,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub characters: Vec<BattleCharacter>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chamber {
    pub chamber: u8,
    pub stars: u8,
    pub max_stars: u8,
    pub battles: Vec<Battle>,
}

impl Chamber {
    /// Largest lineup used across the chamber's battle halves.
    pub fn lineup_size(&self) -> usize {
        self.battles
            .iter()
            .map(|battle| battle.characters.len())
            .max()
            .unwrap_or(0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Floor {
    pub floor: u8,
    pub stars: u8,
    pub max_stars: u8,
    pub chambers: Vec<Chamber>,
}

impl Floor {
    pub fn final_chamber(&self) -> Option<&Chamber> {
        self.chambers.last()
    }
}

/// Season-wide results as reported by the statistics API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpiralAbyss {
    pub season: Season,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub total_battles: u32,
    pub total_wins: u32,
    pub max_floor: String,
    pub total_stars: u32,
    #[serde(default)]
    pub floors: Vec<Floor>,
}

impl SpiralAbyss {
    /// The chamber whose final battle decides special-clear labels.
    pub fn final_chamber(&self) -> Option<&Chamber> {
        self.floors.last().and_then(Floor::final_chamber)
    }
}

/// Roster entry used when rendering floor cards (constellation, weapon, etc.).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: u32,
    pub name: String,
    pub level: u32,
    #[serde(default)]
    pub constellation: u8,
    #[serde(default)]
    pub weapon: Option<String>,
}

/// A season snapshot as persisted in the history index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonRecord {
    pub owner_id: OwnerId,
    pub season: Season,
    pub abyss: SpiralAbyss,
    #[serde(default)]
    pub characters: Vec<Character>,
}

impl SeasonRecord {
    pub fn is_owned_by(&self, requester: OwnerId) -> bool {
        self.owner_id == requester
    }

    pub fn floor(&self, index: usize) -> Option<&Floor> {
        self.abyss.floors.get(index)
    }
}

/// Contents of the single-slot showcase cache for an owner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShowcaseEntry {
    pub owner_id: OwnerId,
    pub season: Season,
    pub payload: serde_json::Value,
}
