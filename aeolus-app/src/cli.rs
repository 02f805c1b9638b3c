use std::path::PathBuf;

use aeolus_core::{Config, OpenWeatherClient, PreferencesStore, WeatherRecord, WeatherService};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use crate::{
    app::App,
    logging::{self, LogTarget},
    tui,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "aeolus", version, about = "Aeolus weather window")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// City to show on startup instead of the last searched one.
    #[arg(long)]
    pub city: Option<String>,

    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Preferences file to use instead of the platform default.
    #[arg(long, global = true)]
    pub preferences: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print current weather once and exit.
    Show {
        /// City name, optionally "City,CountryCode". Defaults to the last searched city.
        city: Option<String>,

        /// Print the normalized record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Store the OpenWeather API key in the config file.
    Configure,
}

impl Cli {
    pub fn log_target(&self) -> LogTarget {
        match (&self.command, logging::default_log_file()) {
            (None, Some(path)) => LogTarget::File(path),
            _ => LogTarget::Stderr,
        }
    }

    pub async fn run(self) -> Result<()> {
        match self.command {
            None => {
                let config = load_config(self.config.as_ref());
                let client = OpenWeatherClient::from_config(&config)?;
                let app = App::new(client, preferences_store(self.preferences)?);
                tui::run(app, self.city).await
            }
            Some(Command::Show { city, json }) => {
                let config = load_config(self.config.as_ref());
                let client = OpenWeatherClient::from_config(&config)?;
                let city = match city {
                    Some(city) => city,
                    None => preferences_store(self.preferences)?.load().last_location,
                };

                let record = client
                    .fetch_weather(&city)
                    .await
                    .with_context(|| format!("Unable to load weather for '{city}'"))?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&record)?);
                } else {
                    println!("{}", format_record(&record));
                }
                Ok(())
            }
            Some(Command::Configure) => configure(self.config),
        }
    }
}

/// Missing config is the normal first run; a broken one is logged and ignored.
fn load_config(path: Option<&PathBuf>) -> Config {
    let loaded = match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    loaded.unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {e:#}");
        Config::default()
    })
}

fn preferences_store(path: Option<PathBuf>) -> Result<PreferencesStore> {
    match path {
        Some(path) => Ok(PreferencesStore::new(path)),
        None => PreferencesStore::at_default_path(),
    }
}

fn configure(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => Config::config_file_path()?,
    };

    let mut config = Config::load_from(&path)?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Create one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    config.save_to(&path)?;

    println!("Saved API key to {}", path.display());
    if aeolus_core::config::API_KEY_ENV_VARS
        .iter()
        .any(|name| std::env::var_os(name).is_some())
    {
        println!("Note: an API key in the environment takes precedence over the config file.");
    }

    Ok(())
}

pub fn format_record(record: &WeatherRecord) -> String {
    format!(
        "{city}, {country}\n\
         {temp}°C  {desc}\n\
         ↓ {min}°C | ↑ {max}°C\n\
         Humidity {humidity}%  Wind Speed {wind} m/s  Real Feel {feel}°C",
        city = record.city,
        country = record.country,
        temp = record.temperature,
        desc = record.description,
        min = record.temperature_min,
        max = record.temperature_max,
        humidity = record.humidity,
        wind = record.wind_speed,
        feel = record.real_feel,
    )
}
