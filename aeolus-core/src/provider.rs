use async_trait::async_trait;
use std::fmt::Debug;

use crate::{ForecastEntry, GeoLocation, WeatherError, WeatherRecord};

pub mod openweather;

/// The operations the UI shell needs from a weather backend.
#[async_trait]
pub trait WeatherService: Send + Sync + Debug {
    /// Geocode `city`, then fetch and normalize its current conditions.
    async fn fetch_weather(&self, city: &str) -> Result<WeatherRecord, WeatherError>;

    /// Next few forecast steps for an already geocoded location, usually
    /// [`WeatherRecord::location`].
    async fn fetch_forecast_at(
        &self,
        location: &GeoLocation,
    ) -> Result<Vec<ForecastEntry>, WeatherError>;

    /// Raw PNG bytes for a condition glyph. `None` on any failure.
    async fn fetch_icon(&self, icon_code: &str) -> Option<Vec<u8>>;
}
