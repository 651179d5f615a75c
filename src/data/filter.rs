use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::{AccidentDataset, AccidentRecord, AgeGroup, VehicleType};

// ---------------------------------------------------------------------------
// Filter selection: the three widget values
// ---------------------------------------------------------------------------

/// Inclusive fatality range, serialized as `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i64; 2]", into = "[i64; 2]")]
pub struct FatalityRange {
    pub min: i64,
    pub max: i64,
}

impl FatalityRange {
    pub fn new(min: i64, max: i64) -> Self {
        FatalityRange { min, max }
    }

    /// An inverted range contains nothing.
    pub fn contains(&self, dead: i64) -> bool {
        self.min <= dead && dead <= self.max
    }
}

impl From<[i64; 2]> for FatalityRange {
    fn from([min, max]: [i64; 2]) -> Self {
        FatalityRange { min, max }
    }
}

impl From<FatalityRange> for [i64; 2] {
    fn from(range: FatalityRange) -> Self {
        [range.min, range.max]
    }
}

/// What the user currently has selected.
///
/// An empty vehicle or age set matches no record: the "any selected column is
/// positive" test has no column to succeed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub vehicle_types: BTreeSet<VehicleType>,
    pub age_groups: BTreeSet<AgeGroup>,
    pub fatality_range: FatalityRange,
}

impl FilterSelection {
    /// Everything selected over the dataset's observed fatality bounds.
    pub fn all(dataset: &AccidentDataset) -> Self {
        let (min, max) = dataset.fatality_bounds().unwrap_or((0, 0));
        FilterSelection {
            vehicle_types: VehicleType::ALL.into_iter().collect(),
            age_groups: AgeGroup::ALL.into_iter().collect(),
            fatality_range: FatalityRange::new(min, max),
        }
    }

    pub fn matches_vehicle(&self, record: &AccidentRecord) -> bool {
        self.vehicle_types
            .iter()
            .any(|&v| record.vehicle_count(v) > 0.0)
    }

    pub fn matches_age(&self, record: &AccidentRecord) -> bool {
        self.age_groups
            .iter()
            .any(|&a| record.injury_count(a) > 0.0)
    }

    /// All three predicates must hold.
    pub fn matches(&self, record: &AccidentRecord) -> bool {
        self.matches_vehicle(record)
            && self.matches_age(record)
            && self.fatality_range.contains(record.dead)
    }
}

/// Records passing the selection, in dataset order.
pub fn filtered_records<'a>(
    dataset: &'a AccidentDataset,
    selection: &'a FilterSelection,
) -> impl Iterator<Item = &'a AccidentRecord> + 'a {
    dataset
        .records()
        .iter()
        .filter(move |rec| selection.matches(rec))
}
