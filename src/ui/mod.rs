/// Browser-facing pieces: the page, its widgets and the chart.
pub mod panels;
pub mod plot;

/// The single page served at `/`. Widgets are filled from `/api/controls`
/// and the chart from `/api/chart`.
pub const INDEX_HTML: &str = include_str!("../../assets/index.html");
