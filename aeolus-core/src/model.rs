use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Best geocoding match for a free-text city query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Canonical name from the geocoder, may differ from the query.
    pub name: String,
    pub country: Option<String>,
}

/// Normalized current conditions for one city.
///
/// Built only from a complete upstream payload, see
/// [`crate::provider::openweather`]. Temperatures are whole degrees Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    pub status_code: u16,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub country: String,
    pub temperature: i32,
    pub temperature_min: i32,
    pub temperature_max: i32,
    pub real_feel: i32,
    pub weather_icon: String,
    pub description: String,
    pub humidity: u8,
    pub wind_speed: f64,
}

impl WeatherRecord {
    /// The geocoded location this record was fetched for.
    pub fn location(&self) -> GeoLocation {
        GeoLocation {
            latitude: self.latitude,
            longitude: self.longitude,
            name: self.city.clone(),
            country: Some(self.country.clone()),
        }
    }
}

/// One step of the short-range forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastEntry {
    pub date_time: NaiveDateTime,
    pub temperature: i32,
    pub temperature_min: i32,
    pub temperature_max: i32,
    pub weather_icon: String,
    pub description: String,
}

/// Rounds a Celsius reading to whole degrees, ties to even.
pub fn round_temperature(celsius: f64) -> i32 {
    celsius.round_ties_even() as i32
}

/// Upper-cases the first letter of every word and lower-cases the rest.
///
/// A "word" starts at any letter not preceded by another letter, so
/// `"light rain"` becomes `"Light Rain"` and `"o'clock"` becomes `"O'Clock"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }

    out
}
