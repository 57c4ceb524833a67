use super::reply::{ControlId, ControlView, OptionView};
use crate::model::SeasonRecord;
use crate::summary::{floor_description, floor_label};

/// Mutating action offered as the first option of the floor picker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordAction {
    Save,
    Remove,
}

impl RecordAction {
    pub fn value(self) -> &'static str {
        match self {
            RecordAction::Save => "SAVE",
            RecordAction::Remove => "REMOVE",
        }
    }

    fn option(self) -> OptionView {
        let (label, description) = match self {
            RecordAction::Save => (
                "Save this record",
                "Store this record so it can be viewed from history later",
            ),
            RecordAction::Remove => ("Delete this record", "Remove this record from history"),
        };
        OptionView {
            label: label.into(),
            description: description.into(),
            value: self.value().into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    OpenSeason(usize),
    OpenFloor(usize),
    Apply(RecordAction),
}

/// A selection control that maps a chosen option value onto a session transition.
pub trait SelectControl {
    /// `None` when `value` is not one of this control's options.
    fn on_select(&self, value: &str) -> Option<Transition>;
}

fn parse_index(value: &str, len: usize) -> Option<usize> {
    value.parse::<usize>().ok().filter(|index| *index < len)
}

pub struct SeasonPicker {
    pub seasons: usize,
}

impl SelectControl for SeasonPicker {
    fn on_select(&self, value: &str) -> Option<Transition> {
        parse_index(value, self.seasons).map(Transition::OpenSeason)
    }
}

pub struct FloorPicker {
    pub action: RecordAction,
    pub floors: usize,
}

impl FloorPicker {
    pub fn for_record(action: RecordAction, record: &SeasonRecord) -> Self {
        Self {
            action,
            floors: record.abyss.floors.len(),
        }
    }

    pub fn view(&self, record: &SeasonRecord) -> ControlView {
        let floors = record
            .abyss
            .floors
            .iter()
            .enumerate()
            .map(|(i, floor)| OptionView {
                label: floor_label(floor),
                description: floor_description(floor),
                value: i.to_string(),
            });
        ControlView {
            id: ControlId::FloorPicker,
            placeholder: "Select a floor".into(),
            options: std::iter::once(self.action.option()).chain(floors).collect(),
        }
    }
}

impl SelectControl for FloorPicker {
    fn on_select(&self, value: &str) -> Option<Transition> {
        if value == self.action.value() {
            return Some(Transition::Apply(self.action));
        }
        parse_index(value, self.floors).map(Transition::OpenFloor)
    }
}
