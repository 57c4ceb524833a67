//! Display-side derivations over stored records: honor labels and list summaries.
//!
//! Nothing here is persisted; everything is recomputed from the record on read.

use crate::model::{Floor, Season, SeasonRecord, SpiralAbyss};
use serde::Serialize;
use time::macros::format_description;
use time::OffsetDateTime;

pub const MAX_STARS: u32 = 36;
pub const MIN_BATTLES: u32 = 12;

/// Special-clear classification for a fully starred season.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Honor {
    /// Every chamber cleared on the first attempt.
    Crown,
    SingleUnit,
    TwoUnit,
}

impl Honor {
    pub fn label(self) -> &'static str {
        match self {
            Honor::Crown => "crown",
            Honor::SingleUnit => "single-unit clear",
            Honor::TwoUnit => "two-unit clear",
        }
    }

    /// Classifies a season; `None` for anything short of full stars.
    pub fn classify(abyss: &SpiralAbyss) -> Option<Self> {
        if abyss.total_stars != MAX_STARS {
            return None;
        }
        if abyss.total_battles == MIN_BATTLES {
            return Some(Honor::Crown);
        }
        match abyss.final_chamber()?.lineup_size() {
            1 => Some(Honor::SingleUnit),
            2 => Some(Honor::TwoUnit),
            _ => None,
        }
    }
}

/// List-view projection of a stored season.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SeasonSummary {
    pub season: Season,
    pub total_stars: u32,
    pub total_battles: u32,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub honor: Option<Honor>,
}

impl SeasonSummary {
    pub fn of(record: &SeasonRecord) -> Self {
        let abyss = &record.abyss;
        Self {
            season: record.season,
            total_stars: abyss.total_stars,
            total_battles: abyss.total_battles,
            start_time: abyss.start_time,
            end_time: abyss.end_time,
            honor: Honor::classify(abyss),
        }
    }

    /// `[Season 5] ★ 36 (crown)`
    pub fn option_label(&self) -> String {
        let mut label = format!("[Season {}] ★ {}", self.season, self.total_stars);
        if let Some(honor) = self.honor {
            label.push_str(&format!(" ({})", honor.label()));
        }
        label
    }

    /// `2024.01.16 ~ 2024.02.15`
    pub fn date_range(&self) -> String {
        format!("{} ~ {}", format_day(self.start_time), format_day(self.end_time))
    }
}

fn format_day(at: OffsetDateTime) -> String {
    let format = format_description!("[year].[month].[day]");
    at.format(&format)
        .unwrap_or_else(|_| at.date().to_string())
}

/// `[★9] Floor 12`
pub fn floor_label(floor: &Floor) -> String {
    format!("[★{}] Floor {}", floor.stars, floor.floor)
}

/// Lineups of the final chamber, one battle half per segment.
pub fn floor_description(floor: &Floor) -> String {
    let Some(chamber) = floor.final_chamber() else {
        return String::new();
    };
    chamber
        .battles
        .iter()
        .map(|battle| {
            let names: Vec<&str> = battle
                .characters
                .iter()
                .map(|character| character.name.as_str())
                .collect();
            format!("{}: {}", battle.half, names.join(" "))
        })
        .collect::<Vec<_>>()
        .join(" | ")
}
