use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    Config, ForecastEntry, GeoLocation, WeatherError, WeatherRecord,
    model::{round_temperature, title_case},
};

use super::WeatherService;

const GEOCODE_PATH: &str = "/geo/1.0/direct";
const WEATHER_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";
const FORECAST_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// OpenWeather client: geocode by name, then look up by coordinates.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    api_base_url: String,
    icon_base_url: String,
    forecast_count: u8,
    http: Client,
}

impl OpenWeatherClient {
    /// Build a client from config. A missing API key is logged, not fatal:
    /// requests will simply be rejected upstream.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.resolve_api_key().unwrap_or_else(|| {
            error!(
                "OpenWeather API key not found. Set OPENWEATHER_API_KEY or run `aeolus configure`."
            );
            String::new()
        });

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            api_key,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            icon_base_url: config.icon_base_url.trim_end_matches('/').to_string(),
            forecast_count: config.forecast_count,
            http,
        })
    }

    /// Best geocoding match for `city` (`"City"` or `"City,CC"`).
    ///
    /// Every failure mode, including transport errors, collapses into `NotFound`.
    #[instrument(skip(self))]
    pub async fn resolve_coordinates(&self, city: &str) -> Result<GeoLocation, WeatherError> {
        let query = city.trim();
        if query.is_empty() {
            return Err(WeatherError::NotFound(city.to_string()));
        }

        let not_found = || WeatherError::NotFound(query.to_string());

        let (status, body) = self
            .get(GEOCODE_PATH, &[("q", query.to_string()), ("limit", "1".to_string())])
            .await
            .map_err(|e| {
                warn!("Geocoding request failed: {e}");
                not_found()
            })?;

        if !status.is_success() {
            warn!("Geocoding failed with status {}: {}", status, truncate_body(&body));
            return Err(not_found());
        }

        let matches: Vec<OwGeoMatch> = serde_json::from_str(&body).map_err(|e| {
            warn!("Failed to parse geocoding JSON: {e}");
            not_found()
        })?;

        let best = matches.into_iter().next().ok_or_else(not_found)?;
        debug!(name = %best.name, lat = best.lat, lon = best.lon, "Geocoded");

        Ok(GeoLocation {
            latitude: best.lat,
            longitude: best.lon,
            name: best.name,
            country: best.country,
        })
    }

    /// Geocode `city`, then fetch its forecast steps.
    pub async fn fetch_forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, WeatherError> {
        let location = self.resolve_coordinates(city).await?;
        self.fetch_forecast_at(&location).await
    }

    async fn get(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<(StatusCode, String), reqwest::Error> {
        let url = format!("{}{}", self.api_base_url, path);

        let res = self
            .http
            .get(url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        Ok((status, body))
    }

    /// Request against a weather endpoint, mapping transport and status errors.
    async fn get_weather_endpoint(
        &self,
        path: &str,
        location: &GeoLocation,
        extra: &[(&str, String)],
    ) -> Result<(StatusCode, String), WeatherError> {
        let mut params = vec![
            ("lat", location.latitude.to_string()),
            ("lon", location.longitude.to_string()),
            ("units", "metric".to_string()),
            ("lang", "en".to_string()),
        ];
        params.extend(extra.iter().cloned());

        let (status, body) = self
            .get(path, &params)
            .await
            .map_err(|e| WeatherError::network(e.to_string()))?;

        if !status.is_success() {
            return Err(WeatherError::network(format!(
                "status {}: {}",
                status,
                truncate_body(&body)
            )));
        }

        Ok((status, body))
    }
}

#[async_trait]
impl WeatherService for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn fetch_weather(&self, city: &str) -> Result<WeatherRecord, WeatherError> {
        let location = self.resolve_coordinates(city).await?;
        let (status, body) = self.get_weather_endpoint(WEATHER_PATH, &location, &[]).await?;

        let record = normalize_current(&body, status, &location)?;
        info!(city = %record.city, country = %record.country, temp = record.temperature, "Weather loaded");
        Ok(record)
    }

    #[instrument(skip(self), fields(lat = location.latitude, lon = location.longitude))]
    async fn fetch_forecast_at(
        &self,
        location: &GeoLocation,
    ) -> Result<Vec<ForecastEntry>, WeatherError> {
        let (_, body) = self
            .get_weather_endpoint(
                FORECAST_PATH,
                location,
                &[("cnt", self.forecast_count.to_string())],
            )
            .await?;

        normalize_forecast(&body)
    }

    async fn fetch_icon(&self, icon_code: &str) -> Option<Vec<u8>> {
        if icon_code.trim().is_empty() {
            return None;
        }

        let url = format!("{}/{}@4x.png", self.icon_base_url, icon_code);

        let res = match self.http.get(&url).send().await {
            Ok(res) => res,
            Err(e) => {
                debug!("Icon request failed for {icon_code}: {e}");
                return None;
            }
        };

        if res.status() != StatusCode::OK {
            debug!("Icon {icon_code} returned status {}", res.status());
            return None;
        }

        match res.bytes().await {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(e) => {
                debug!("Failed to read icon body for {icon_code}: {e}");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoMatch {
    name: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    country: Option<String>,
}

/// `cod` is a number on /weather and a string on /forecast.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwCode {
    Number(u16),
    Text(String),
}

impl OwCode {
    fn as_status(&self) -> Option<u16> {
        match self {
            OwCode::Number(n) => Some(*n),
            OwCode::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    icon: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    cod: Option<OwCode>,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

/// Build a record from a /weather body. The geocoded name replaces the
/// payload's own `name`.
pub(crate) fn normalize_current(
    body: &str,
    status: StatusCode,
    location: &GeoLocation,
) -> Result<WeatherRecord, WeatherError> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).map_err(|e| WeatherError::malformed(e.to_string()))?;

    let condition = parsed
        .weather
        .first()
        .ok_or_else(|| WeatherError::malformed("empty `weather` list"))?;

    if parsed.sys.country.trim().is_empty() {
        return Err(WeatherError::malformed("empty `sys.country`"));
    }

    let status_code = parsed
        .cod
        .as_ref()
        .and_then(OwCode::as_status)
        .unwrap_or(status.as_u16());

    Ok(WeatherRecord {
        status_code,
        latitude: location.latitude,
        longitude: location.longitude,
        city: location.name.clone(),
        country: parsed.sys.country,
        temperature: round_temperature(parsed.main.temp),
        temperature_min: round_temperature(parsed.main.temp_min),
        temperature_max: round_temperature(parsed.main.temp_max),
        real_feel: round_temperature(parsed.main.feels_like),
        weather_icon: condition.icon.clone(),
        description: title_case(&condition.description),
        humidity: parsed.main.humidity,
        wind_speed: parsed.wind.speed,
    })
}

pub(crate) fn normalize_forecast(body: &str) -> Result<Vec<ForecastEntry>, WeatherError> {
    let parsed: OwForecastResponse =
        serde_json::from_str(body).map_err(|e| WeatherError::malformed(e.to_string()))?;

    parsed
        .list
        .into_iter()
        .map(|entry| -> Result<ForecastEntry, WeatherError> {
            let date_time = NaiveDateTime::parse_from_str(&entry.dt_txt, FORECAST_TIME_FORMAT)
                .map_err(|e| WeatherError::malformed(format!("bad `dt_txt` '{}': {e}", entry.dt_txt)))?;

            let condition = entry
                .weather
                .first()
                .ok_or_else(|| WeatherError::malformed("empty `weather` list in forecast entry"))?;

            Ok(ForecastEntry {
                date_time,
                temperature: round_temperature(entry.main.temp),
                temperature_min: round_temperature(entry.main.temp_min),
                temperature_max: round_temperature(entry.main.temp_max),
                weather_icon: condition.icon.clone(),
                description: title_case(&condition.description),
            })
        })
        .collect()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
