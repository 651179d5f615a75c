use std::collections::BTreeMap;

use serde::Serialize;

use super::model::AccidentRecord;

/// Number of accidents recorded for one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityCount {
    pub city: String,
    pub count: usize,
}

/// Group records by city and count them, ascending by count.
///
/// Records without a city belong to no group. Equal counts are ordered by city
/// name so repeated calls give identical output.
pub fn count_by_city<'a, I>(records: I) -> Vec<CityCount>
where
    I: IntoIterator<Item = &'a AccidentRecord>,
{
    let mut groups: BTreeMap<&str, usize> = BTreeMap::new();
    for rec in records {
        if let Some(city) = rec.city.as_deref() {
            *groups.entry(city).or_default() += 1;
        }
    }

    let mut counts: Vec<CityCount> = groups
        .into_iter()
        .map(|(city, count)| CityCount {
            city: city.to_string(),
            count,
        })
        .collect();
    // BTreeMap yields cities in name order, so a stable sort keeps ties sorted.
    counts.sort_by_key(|c| c.count);
    counts
}
