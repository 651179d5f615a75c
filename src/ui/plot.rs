use std::fmt::{self, Write};

use serde::Serialize;

use crate::color::bar_colors;
use crate::config::ChartSettings;
use crate::data::aggregate::CityCount;

// ---------------------------------------------------------------------------
// Chart descriptor (Plotly figure JSON)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescriptor {
    pub data: Vec<BarSeries>,
    pub layout: Layout,
}

/// One horizontal bar trace: cities on the category axis, counts on the
/// value axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub y: Vec<String>,
    pub x: Vec<usize>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    pub orientation: &'static str,
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: String,
    pub height: u32,
    pub xaxis: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub range: [usize; 2],
}

impl ChartDescriptor {
    pub fn series(&self) -> &BarSeries {
        &self.data[0]
    }

    pub fn axis_max(&self) -> usize {
        self.layout.xaxis.range[1]
    }
}

/// Build the figure for already sorted counts.
///
/// `axis_max` is taken as given; callers pass the bound of the unfiltered
/// dataset so the scale stays put between interactions.
pub fn build_chart(counts: &[CityCount], axis_max: usize, settings: &ChartSettings) -> ChartDescriptor {
    let y: Vec<String> = counts.iter().map(|c| c.city.clone()).collect();
    let x: Vec<usize> = counts.iter().map(|c| c.count).collect();
    let color = bar_colors(&x, axis_max);

    ChartDescriptor {
        data: vec![BarSeries {
            y,
            x,
            kind: "bar",
            name: settings.series_name.clone(),
            orientation: "h",
            marker: Marker { color },
        }],
        layout: Layout {
            title: settings.title.clone(),
            height: settings.height,
            xaxis: Axis {
                range: [0, axis_max],
            },
        },
    }
}

// ---------------------------------------------------------------------------
// SVG rendering
// ---------------------------------------------------------------------------

const SVG_WIDTH: u32 = 960;
const LABEL_WIDTH: u32 = 200;
const ROW_HEIGHT: u32 = 22;
const BAR_HEIGHT: u32 = 16;
const TOP_MARGIN: u32 = 56;
const BOTTOM_MARGIN: u32 = 36;
const RIGHT_MARGIN: u32 = 60;

/// Render the figure as a standalone SVG document.
///
/// The largest bar is drawn at the top, as Plotly does for an ascending
/// category axis. Height follows the number of bars, not `layout.height`.
pub fn render_svg(chart: &ChartDescriptor) -> Result<String, fmt::Error> {
    let series = chart.series();
    let axis_max = chart.axis_max();
    let rows = series.y.len().max(1) as u32;
    let height = TOP_MARGIN + rows * ROW_HEIGHT + BOTTOM_MARGIN;
    let plot_width = SVG_WIDTH - LABEL_WIDTH - RIGHT_MARGIN;
    let axis_y = TOP_MARGIN + rows * ROW_HEIGHT;

    let mut out = String::new();
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{SVG_WIDTH}" height="{height}" viewBox="0 0 {SVG_WIDTH} {height}" font-family="sans-serif" font-size="12">"#
    )?;
    writeln!(
        out,
        r#"<text x="{}" y="28" font-size="18" text-anchor="middle">{}</text>"#,
        SVG_WIDTH / 2,
        escape(&chart.layout.title)
    )?;

    if series.y.is_empty() {
        writeln!(
            out,
            r##"<text x="{}" y="{}" text-anchor="middle" fill="#666">No accidents match the current filters</text>"##,
            LABEL_WIDTH + plot_width / 2,
            TOP_MARGIN + ROW_HEIGHT / 2 + 4
        )?;
    }

    for (row, ((city, count), color)) in series
        .y
        .iter()
        .zip(&series.x)
        .zip(&series.marker.color)
        .rev()
        .enumerate()
    {
        let top = TOP_MARGIN + row as u32 * ROW_HEIGHT;
        let bar_top = top + (ROW_HEIGHT - BAR_HEIGHT) / 2;
        let width = scaled(*count, axis_max, plot_width);
        let baseline = top + ROW_HEIGHT / 2 + 4;
        writeln!(
            out,
            r#"<text x="{}" y="{baseline}" text-anchor="end">{}</text>"#,
            LABEL_WIDTH - 8,
            escape(city)
        )?;
        writeln!(
            out,
            r#"<rect x="{LABEL_WIDTH}" y="{bar_top}" width="{width}" height="{BAR_HEIGHT}" fill="{color}"/>"#
        )?;
        writeln!(
            out,
            r#"<text x="{}" y="{baseline}">{count}</text>"#,
            LABEL_WIDTH + width + 4
        )?;
    }

    writeln!(
        out,
        r##"<line x1="{LABEL_WIDTH}" y1="{axis_y}" x2="{}" y2="{axis_y}" stroke="#444"/>"##,
        LABEL_WIDTH + plot_width
    )?;
    writeln!(
        out,
        r#"<text x="{LABEL_WIDTH}" y="{}" text-anchor="middle">0</text>"#,
        axis_y + 16
    )?;
    writeln!(
        out,
        r#"<text x="{}" y="{}" text-anchor="middle">{axis_max}</text>"#,
        LABEL_WIDTH + plot_width,
        axis_y + 16
    )?;
    out.write_str("</svg>\n")?;
    Ok(out)
}

fn scaled(count: usize, axis_max: usize, plot_width: u32) -> u32 {
    if axis_max == 0 {
        return 0;
    }
    let ratio = (count as f64 / axis_max as f64).clamp(0.0, 1.0);
    (ratio * f64::from(plot_width)).round() as u32
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, usize)]) -> Vec<CityCount> {
        pairs
            .iter()
            .map(|&(city, count)| CityCount {
                city: city.to_string(),
                count,
            })
            .collect()
    }

    #[test]
    fn descriptor_matches_plotly_shape() {
        let chart = build_chart(&counts(&[("Eilat", 1), ("Haifa", 3)]), 7, &ChartSettings::default());
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["data"][0]["type"], "bar");
        assert_eq!(json["data"][0]["orientation"], "h");
        assert_eq!(json["data"][0]["name"], "SF");
        assert_eq!(json["data"][0]["y"], serde_json::json!(["Eilat", "Haifa"]));
        assert_eq!(json["data"][0]["x"], serde_json::json!([1, 3]));
        assert_eq!(json["data"][0]["marker"]["color"].as_array().unwrap().len(), 2);
        assert_eq!(json["layout"]["title"], "Accidents by City");
        assert_eq!(json["layout"]["height"], 20000);
        assert_eq!(json["layout"]["xaxis"]["range"], serde_json::json!([0, 7]));
    }

    #[test]
    fn empty_counts_give_one_empty_series() {
        let chart = build_chart(&[], 4, &ChartSettings::default());
        assert_eq!(chart.data.len(), 1);
        assert!(chart.series().x.is_empty());
        assert!(chart.series().y.is_empty());
        assert_eq!(chart.axis_max(), 4);
    }

    #[test]
    fn svg_draws_one_bar_per_city() {
        let chart = build_chart(&counts(&[("Eilat", 1), ("Haifa", 4)]), 4, &ChartSettings::default());
        let svg = render_svg(&chart).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<rect").count(), 2);
        // Largest bar first (top of the chart).
        assert!(svg.find(">Haifa<").unwrap() < svg.find(">Eilat<").unwrap());
        let full = format!(r#"width="{}""#, SVG_WIDTH - LABEL_WIDTH - RIGHT_MARGIN);
        assert!(svg.contains(&full));
    }

    #[test]
    fn svg_escapes_city_names() {
        let chart = build_chart(&counts(&[("A&B <x>", 1)]), 1, &ChartSettings::default());
        let svg = render_svg(&chart).unwrap();
        assert!(svg.contains("A&amp;B &lt;x&gt;"));
        assert!(!svg.contains("<x>"));
    }

    #[test]
    fn svg_for_empty_chart_says_so() {
        let svg = render_svg(&build_chart(&[], 3, &ChartSettings::default())).unwrap();
        assert!(svg.contains("No accidents match"));
        assert_eq!(svg.matches("<rect").count(), 0);
    }

    #[test]
    fn scaling_is_clamped() {
        assert_eq!(scaled(5, 0, 100), 0);
        assert_eq!(scaled(5, 10, 100), 50);
        assert_eq!(scaled(20, 10, 100), 100);
    }
}
