use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;

/// Accident table read at startup, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "accid_taz.csv";
pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 8050));

pub const CHART_TITLE: &str = "Accidents by City";
/// Figure height in pixels; tall enough for one readable row per city.
pub const CHART_HEIGHT: u32 = 20_000;
pub const SERIES_NAME: &str = "SF";

/// Fixed presentation of the bar chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSettings {
    pub title: String,
    pub height: u32,
    pub series_name: String,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            title: CHART_TITLE.to_string(),
            height: CHART_HEIGHT,
            series_name: SERIES_NAME.to_string(),
        }
    }
}

/// Process configuration. The dashboard takes no flags or environment
/// variables; everything comes from the defaults above.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub chart: ChartSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            bind_addr: DEFAULT_BIND_ADDR,
            chart: ChartSettings::default(),
        }
    }
}
