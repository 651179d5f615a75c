use std::collections::BTreeSet;
use std::str::FromStr;

use anyhow::Context;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::config::Config;
use crate::data::filter::{FatalityRange, FilterSelection};
use crate::data::model::UnknownLabel;
use crate::state::AppState;
use crate::ui::panels::Controls;
use crate::ui::plot::{render_svg, ChartDescriptor};
use crate::ui::INDEX_HTML;

// ---------------------------------------------------------------------------
// HTTP app
// ---------------------------------------------------------------------------

/// Routes:
/// * `GET  /`             – the dashboard page
/// * `GET  /api/controls` – widget options and defaults
/// * `POST /api/chart`    – chart for a JSON [`FilterSelection`]
/// * `GET  /api/chart`    – chart for a [`ChartQuery`]
/// * `GET  /chart.svg`    – same as above, rendered as SVG
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/controls", get(controls))
        .route("/api/chart", get(chart_from_query).post(chart_from_body))
        .route("/chart.svg", get(chart_svg))
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: &Config, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    log::info!("Dashboard listening on http://{}", config.bind_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;
    log::info!("Dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {e}");
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    UnknownLabel(#[from] UnknownLabel),
    #[error("chart rendering failed: {0}")]
    Render(#[from] std::fmt::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::UnknownLabel(_) => StatusCode::BAD_REQUEST,
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            log::error!("{self}");
        } else {
            log::warn!("Rejected chart request: {self}");
        }
        (status, self.to_string()).into_response()
    }
}

// ---------------------------------------------------------------------------
// Query-string selection
// ---------------------------------------------------------------------------

/// `?vehicles=MOTORCYCLE,TRUCK&ages=INJ0_19&min=0&max=2`
///
/// An absent parameter keeps the widget default; a present but empty list
/// selects nothing.
#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    pub vehicles: Option<String>,
    pub ages: Option<String>,
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl ChartQuery {
    pub fn into_selection(self, defaults: FilterSelection) -> Result<FilterSelection, UnknownLabel> {
        let vehicle_types = match self.vehicles {
            Some(list) => parse_list(&list)?,
            None => defaults.vehicle_types,
        };
        let age_groups = match self.ages {
            Some(list) => parse_list(&list)?,
            None => defaults.age_groups,
        };
        let fatality_range = FatalityRange::new(
            self.min.unwrap_or(defaults.fatality_range.min),
            self.max.unwrap_or(defaults.fatality_range.max),
        );
        Ok(FilterSelection {
            vehicle_types,
            age_groups,
            fatality_range,
        })
    }
}

fn parse_list<T>(list: &str) -> Result<BTreeSet<T>, UnknownLabel>
where
    T: FromStr<Err = UnknownLabel> + Ord,
{
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn controls(State(state): State<AppState>) -> Json<Controls> {
    Json(state.controls().clone())
}

async fn chart_from_body(
    State(state): State<AppState>,
    Json(selection): Json<FilterSelection>,
) -> Json<ChartDescriptor> {
    Json(state.update_chart(&selection))
}

async fn chart_from_query(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartDescriptor>, ApiError> {
    let selection = query.into_selection(state.default_selection())?;
    Ok(Json(state.update_chart(&selection)))
}

async fn chart_svg(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let selection = query.into_selection(state.default_selection())?;
    let svg = render_svg(&state.update_chart(&selection))?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}
