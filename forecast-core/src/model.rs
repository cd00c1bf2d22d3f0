use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One time-stamped forecast data point.
///
/// Immutable once built; the controller replaces the whole list of entries
/// atomically on each successful fetch, in API response order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Forecast time, as reported by the API (3-hour steps).
    pub timestamp: NaiveDateTime,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    /// Short weather description, e.g. "light rain".
    pub description: String,
    /// OpenWeather icon identifier, e.g. "10d".
    pub icon: String,
}
