use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Indicator columns
// ---------------------------------------------------------------------------

/// Vehicle involved in the accident. The variant name doubles as the column
/// name in the source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    #[serde(rename = "MOTORCYCLE")]
    Motorcycle,
    #[serde(rename = "TRUCK")]
    Truck,
    #[serde(rename = "BICYCLE")]
    Bicycle,
    #[serde(rename = "PRIVATE")]
    Private,
}

impl VehicleType {
    pub const ALL: [VehicleType; 4] = [
        VehicleType::Motorcycle,
        VehicleType::Truck,
        VehicleType::Bicycle,
        VehicleType::Private,
    ];

    pub fn column(self) -> &'static str {
        match self {
            VehicleType::Motorcycle => "MOTORCYCLE",
            VehicleType::Truck => "TRUCK",
            VehicleType::Bicycle => "BICYCLE",
            VehicleType::Private => "PRIVATE",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Age bracket of the injured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "INJ0_19")]
    Age0To19,
    #[serde(rename = "INJ20_64")]
    Age20To64,
    #[serde(rename = "INJ65_")]
    Age65Plus,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 3] = [AgeGroup::Age0To19, AgeGroup::Age20To64, AgeGroup::Age65Plus];

    pub fn column(self) -> &'static str {
        match self {
            AgeGroup::Age0To19 => "INJ0_19",
            AgeGroup::Age20To64 => "INJ20_64",
            AgeGroup::Age65Plus => "INJ65_",
        }
    }

    /// Human readable dropdown label.
    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Age0To19 => "Age 0-19",
            AgeGroup::Age20To64 => "Age 20-64",
            AgeGroup::Age65Plus => "Age 65+",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Returned when a label does not name any known indicator column.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for VehicleType {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VehicleType::ALL
            .into_iter()
            .find(|v| v.column() == s)
            .ok_or_else(|| UnknownLabel {
                kind: "vehicle type",
                value: s.to_string(),
            })
    }
}

impl FromStr for AgeGroup {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgeGroup::ALL
            .into_iter()
            .find(|a| a.column() == s)
            .ok_or_else(|| UnknownLabel {
                kind: "age group",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// AccidentRecord – one row of the table
// ---------------------------------------------------------------------------

/// A single accident. Indicator columns hold counts; only their sign matters
/// to the filters.
#[derive(Debug, Clone, PartialEq)]
pub struct AccidentRecord {
    /// `None` when the source cell was missing.
    pub city: Option<String>,
    /// Number of fatalities. Missing source values are stored as 0.
    pub dead: i64,
    pub vehicles: [f64; 4],
    pub injuries: [f64; 3],
}

impl AccidentRecord {
    pub fn new(city: Option<String>, dead: i64) -> Self {
        AccidentRecord {
            city,
            dead,
            vehicles: [0.0; 4],
            injuries: [0.0; 3],
        }
    }

    pub fn with_vehicle(mut self, vehicle: VehicleType, count: f64) -> Self {
        self.vehicles[vehicle.index()] = count;
        self
    }

    pub fn with_injury(mut self, group: AgeGroup, count: f64) -> Self {
        self.injuries[group.index()] = count;
        self
    }

    pub fn vehicle_count(&self, vehicle: VehicleType) -> f64 {
        self.vehicles[vehicle.index()]
    }

    pub fn injury_count(&self, group: AgeGroup) -> f64 {
        self.injuries[group.index()]
    }
}

// ---------------------------------------------------------------------------
// AccidentDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with indices computed once at load time.
#[derive(Debug, Clone)]
pub struct AccidentDataset {
    records: Vec<AccidentRecord>,
    /// Distinct fatality values, ascending.
    fatality_values: BTreeSet<i64>,
    /// Record count per city over the whole table.
    city_totals: BTreeMap<String, usize>,
}

impl AccidentDataset {
    /// Build indices from the loaded records.
    pub fn from_records(records: Vec<AccidentRecord>) -> Self {
        let mut fatality_values = BTreeSet::new();
        let mut city_totals: BTreeMap<String, usize> = BTreeMap::new();

        for rec in &records {
            fatality_values.insert(rec.dead);
            if let Some(city) = &rec.city {
                *city_totals.entry(city.clone()).or_default() += 1;
            }
        }

        AccidentDataset {
            records,
            fatality_values,
            city_totals,
        }
    }

    pub fn records(&self) -> &[AccidentRecord] {
        &self.records
    }

    pub fn fatality_values(&self) -> &BTreeSet<i64> {
        &self.fatality_values
    }

    /// Observed `(min, max)` fatality count, `None` for an empty dataset.
    pub fn fatality_bounds(&self) -> Option<(i64, i64)> {
        let min = *self.fatality_values.first()?;
        let max = *self.fatality_values.last()?;
        Some((min, max))
    }

    pub fn city_totals(&self) -> &BTreeMap<String, usize> {
        &self.city_totals
    }

    /// Largest per-city record count over the unfiltered table.
    pub fn max_city_count(&self) -> usize {
        self.city_totals.values().copied().max().unwrap_or(0)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
