use anyhow::Context;
use clap::{Parser, Subcommand};
use forecast_core::{Config, OpenWeatherClient};

/// City shown on the live screen when neither the command line nor the
/// config names one.
const DEFAULT_CITY: &str = "Hermosillo";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "City forecast CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and an optional default city.
    Configure,

    /// Fetch and print the forecast for a city once.
    Show {
        /// City name, e.g. "Berlin".
        city: String,
    },

    /// Interactive screen: edit the city name, the forecast follows.
    Live {
        /// City to start with; falls back to the configured default.
        city: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => show(&city).await,
            Command::Live { city } => {
                let config = Config::load()?;
                let city = city
                    .or_else(|| config.default_city.clone())
                    .unwrap_or_else(|| DEFAULT_CITY.to_string());
                let client = OpenWeatherClient::new(config.api_key()?.to_string())?;
                crate::live::run(client, &city).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.api_key = Some(api_key);

    let default_city = inquire::Text::new("Default city (optional):")
        .with_default(config.default_city.as_deref().unwrap_or(""))
        .prompt()
        .context("Failed to read default city")?;
    config.default_city = {
        let trimmed = default_city.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    };

    config.save()?;
    println!(
        "Saved configuration to {}",
        Config::config_file_path()?.display()
    );

    Ok(())
}

async fn show(city: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    let client = OpenWeatherClient::new(config.api_key()?.to_string())?;

    let entries = client
        .fetch_forecast(city)
        .await
        .with_context(|| format!("Failed to fetch forecast for '{city}'"))?;

    print!("{}", crate::view::render_forecast(city, &entries));

    Ok(())
}
