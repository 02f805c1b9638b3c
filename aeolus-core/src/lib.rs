//! Core library for the Aeolus weather app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client (geocoding, current weather, forecast, icons)
//! - Normalized weather records
//! - Persisted UI preferences
//!
//! It is used by `aeolus-app`, but holds no UI code of its own.

pub mod config;
pub mod error;
pub mod model;
pub mod preferences;
pub mod provider;

pub use config::Config;
pub use error::WeatherError;
pub use model::{ForecastEntry, GeoLocation, WeatherRecord};
pub use preferences::{Mode, Preferences, PreferencesStore};
pub use provider::{WeatherService, openweather::OpenWeatherClient};
