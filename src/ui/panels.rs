use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::filter::{FatalityRange, FilterSelection};
use crate::data::model::{AccidentDataset, AgeGroup, VehicleType};

// ---------------------------------------------------------------------------
// Filter widgets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

/// Multi-select dropdown; `value` is the default selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dropdown {
    pub id: &'static str,
    pub options: Vec<DropdownOption>,
    pub value: Vec<String>,
    pub multi: bool,
}

/// Range slider snapping to `marks`; `step: null` allows nothing in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeSlider {
    pub id: &'static str,
    pub min: i64,
    pub max: i64,
    pub value: FatalityRange,
    pub marks: BTreeMap<String, String>,
    pub step: Option<i64>,
}

/// Every widget of the page, with defaults taken from the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub vehicles: Dropdown,
    pub ages: Dropdown,
    pub fatalities: RangeSlider,
}

impl Controls {
    pub fn from_dataset(dataset: &AccidentDataset) -> Self {
        let defaults = FilterSelection::all(dataset);

        let vehicles = Dropdown {
            id: "vehicle-dropdown",
            options: VehicleType::ALL
                .iter()
                .map(|v| DropdownOption {
                    label: v.column().to_string(),
                    value: v.column().to_string(),
                })
                .collect(),
            value: defaults
                .vehicle_types
                .iter()
                .map(|v| v.column().to_string())
                .collect(),
            multi: true,
        };

        let ages = Dropdown {
            id: "age-dropdown",
            options: AgeGroup::ALL
                .iter()
                .map(|a| DropdownOption {
                    label: a.label().to_string(),
                    value: a.column().to_string(),
                })
                .collect(),
            value: defaults
                .age_groups
                .iter()
                .map(|a| a.column().to_string())
                .collect(),
            multi: true,
        };

        let range = defaults.fatality_range;
        let fatalities = RangeSlider {
            id: "fatality-slider",
            min: range.min,
            max: range.max,
            value: range,
            marks: dataset
                .fatality_values()
                .iter()
                .map(|dead| (dead.to_string(), dead.to_string()))
                .collect(),
            step: None,
        };

        Controls {
            vehicles,
            ages,
            fatalities,
        }
    }
}
