use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::model::ForecastEntry;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors produced by the forecast client.
///
/// The controller treats every variant identically ("no data"); the
/// distinction exists for logging and for the one-shot CLI path.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request to OpenWeather failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("OpenWeather returned HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("OpenWeather reported status '{cod}'")]
    UnexpectedStatus { cod: String },

    #[error("failed to parse forecast response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Anything the controller can fetch a forecast from.
///
/// Implemented by [`OpenWeatherClient`]; controller tests substitute a mock.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn fetch(&self, city: &str) -> Result<Vec<ForecastEntry>, ClientError>;
}

/// Client for the OpenWeather 5-day / 3-hour forecast endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Result<Self, ClientError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Construct against an explicit base URL (used by tests against a mock server).
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            api_key,
            base_url,
            http,
        })
    }

    /// Fetch the multi-day forecast for a city, in API response order.
    pub async fn fetch_forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, ClientError> {
        let url = format!("{}/data/2.5/forecast", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ClientError::Http {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: OwForecastResponse = serde_json::from_str(&body)?;

        if !cod_is_success(&parsed.cod) {
            return Err(ClientError::UnexpectedStatus {
                cod: cod_display(&parsed.cod),
            });
        }

        Ok(parsed.list.into_iter().map(ForecastEntry::from).collect())
    }
}

#[async_trait]
impl ForecastSource for OpenWeatherClient {
    async fn fetch(&self, city: &str) -> Result<Vec<ForecastEntry>, ClientError> {
        self.fetch_forecast(city).await
    }
}

// ===== Wire format =====

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    /// OpenWeather reports this as the string "200" on success, but error
    /// payloads sometimes carry a bare number.
    cod: Value,
    #[serde(default)]
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    #[serde(default)]
    dt_txt: String,
    main: OwMain,
    wind: OwWind,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

impl From<OwForecastEntry> for ForecastEntry {
    fn from(entry: OwForecastEntry) -> Self {
        let timestamp = NaiveDateTime::parse_from_str(&entry.dt_txt, DT_TXT_FORMAT)
            .ok()
            .or_else(|| DateTime::from_timestamp(entry.dt, 0).map(|dt| dt.naive_utc()))
            .unwrap_or_default();

        let (description, icon) = entry
            .weather
            .into_iter()
            .next()
            .map(|w| (w.description, w.icon))
            .unwrap_or_else(|| ("Unknown".to_string(), String::new()));

        ForecastEntry {
            timestamp,
            temperature_c: entry.main.temp,
            humidity_pct: entry.main.humidity,
            wind_speed_mps: entry.wind.speed,
            description,
            icon,
        }
    }
}

fn cod_is_success(cod: &Value) -> bool {
    cod.as_str() == Some("200") || cod.as_u64() == Some(200)
}

fn cod_display(cod: &Value) -> String {
    match cod.as_str() {
        Some(s) => s.to_string(),
        None => cod.to_string(),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    // Cut on a char boundary so multibyte bodies cannot panic the slice.
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
