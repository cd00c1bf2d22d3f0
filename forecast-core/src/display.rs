//! Pure display derivations for a [`ForecastEntry`](crate::model::ForecastEntry).
//!
//! Everything here is a stateless function of its input so that any frontend
//! (one-shot CLI, live screen) renders identical values.

use chrono::NaiveDateTime;

/// Base URL for OpenWeather condition icons.
pub const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Full English weekday name, e.g. "Sunday".
pub fn weekday_name(timestamp: NaiveDateTime) -> String {
    timestamp.format("%A").to_string()
}

/// Zero-padded "HH:MM" time of day.
pub fn time_hhmm(timestamp: NaiveDateTime) -> String {
    timestamp.format("%H:%M").to_string()
}

/// Temperature rounded to the nearest whole degree, e.g. "22°C".
pub fn format_temp_c(temperature_c: f64) -> String {
    format!("{}°C", temperature_c.round() as i64)
}

pub fn format_wind_mps(wind_speed_mps: f64) -> String {
    format!("{wind_speed_mps} m/s")
}

pub fn format_humidity(humidity_pct: u8) -> String {
    format!("{humidity_pct}%")
}

/// URL of the 2x condition icon for an OpenWeather icon id.
pub fn icon_url(icon: &str) -> String {
    format!("{ICON_BASE_URL}/{icon}@2x.png")
}
