//! Pure text rendering of controller state.
//!
//! Kept free of terminal I/O so both `show` and the live screen build their
//! output here, and so it is unit-testable.

use forecast_core::display::{
    format_humidity, format_temp_c, format_wind_mps, icon_url, time_hhmm, weekday_name,
};
use forecast_core::ForecastEntry;

/// Render current conditions (first entry) plus one line per forecast entry.
pub fn render_forecast(city: &str, entries: &[ForecastEntry]) -> String {
    let mut out = String::new();

    let Some(current) = entries.first() else {
        out.push_str("No forecast available.\n");
        return out;
    };

    out.push_str(city);
    out.push('\n');
    out.push_str(&format!(
        "  {}  {}\n",
        format_temp_c(current.temperature_c),
        current.description
    ));
    out.push_str(&format!(
        "  Wind {}   Humidity {}\n",
        format_wind_mps(current.wind_speed_mps),
        format_humidity(current.humidity_pct)
    ));
    out.push_str(&format!("  Icon: {}\n\n", icon_url(&current.icon)));

    for entry in entries {
        out.push_str(&format!(
            "  {:<10} {}  {:<24} {:>5}\n",
            weekday_name(entry.timestamp),
            time_hhmm(entry.timestamp),
            entry.description,
            format_temp_c(entry.temperature_c)
        ));
    }

    out
}

/// Full live-screen text: search line, then spinner / prompt / forecast.
pub fn screen_text(query: &str, loading: bool, entries: &[ForecastEntry]) -> String {
    let mut out = format!("Search: {query}_\n\n");

    if loading {
        out.push_str("Loading...\n");
    } else if entries.is_empty() {
        out.push_str("Type a city name.\n");
    } else {
        out.push_str(&render_forecast(query.trim(), entries));
    }

    out.push_str("\n[Enter] fetch now   [Esc] quit\n");
    out
}
