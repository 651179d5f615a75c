mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::Context;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::default();

    // Without a dataset there is nothing to serve.
    let dataset = data::loader::load_file(&config.data_path)
        .with_context(|| format!("loading accident data from {}", config.data_path.display()))?;

    let state = AppState::new(dataset, config.chart.clone());
    if let Some((min, max)) = state.dataset().fatality_bounds() {
        log::info!(
            "Fatality range {min}..={max}, largest city has {} accidents",
            state.axis_max()
        );
    }

    app::serve(&config, state).await
}
