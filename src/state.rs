use std::sync::Arc;

use crate::config::ChartSettings;
use crate::data::aggregate::{count_by_city, CityCount};
use crate::data::filter::{filtered_records, FilterSelection};
use crate::data::model::AccidentDataset;
use crate::ui::panels::Controls;
use crate::ui::plot::{build_chart, ChartDescriptor};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Everything a request needs, built once at startup and never mutated.
/// Cloning is cheap; the dataset is shared.
#[derive(Debug, Clone)]
pub struct AppState {
    dataset: Arc<AccidentDataset>,
    /// Value axis bound from the unfiltered dataset.
    axis_max: usize,
    controls: Arc<Controls>,
    chart: Arc<ChartSettings>,
}

impl AppState {
    pub fn new(dataset: AccidentDataset, chart: ChartSettings) -> Self {
        let axis_max = dataset.max_city_count();
        let controls = Controls::from_dataset(&dataset);
        Self {
            dataset: Arc::new(dataset),
            axis_max,
            controls: Arc::new(controls),
            chart: Arc::new(chart),
        }
    }

    pub fn dataset(&self) -> &AccidentDataset {
        &self.dataset
    }

    pub fn axis_max(&self) -> usize {
        self.axis_max
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    /// Default widget values.
    pub fn default_selection(&self) -> FilterSelection {
        FilterSelection::all(&self.dataset)
    }

    /// Per-city counts of the records matching `selection`, ascending.
    pub fn aggregate(&self, selection: &FilterSelection) -> Vec<CityCount> {
        count_by_city(filtered_records(&self.dataset, selection))
    }

    /// Recompute the chart for the current widget values.
    pub fn update_chart(&self, selection: &FilterSelection) -> ChartDescriptor {
        let counts = self.aggregate(selection);
        log::debug!(
            "selection {:?} → {} cities, {} accidents",
            selection,
            counts.len(),
            counts.iter().map(|c| c.count).sum::<usize>()
        );
        build_chart(&counts, self.axis_max, &self.chart)
    }
}
