use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::{
    error::ApiError,
    model::{CurrentWeather, Location},
    request::{GeocodeSpec, WeatherSpec},
};

use super::{Geocoder, WeatherSource, fetch_body};

/// Geocoding and current weather. The API key travels in each request spec.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: Url,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoEntry {
    lat: f64,
    lon: f64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    local_names: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[async_trait]
impl Geocoder for OpenWeatherClient {
    async fn geocode(&self, spec: &GeocodeSpec) -> Result<Option<Location>, ApiError> {
        let body = fetch_body(&self.http, spec.url(&self.base_url)).await?;
        let entries: Vec<OwGeoEntry> = serde_json::from_str(&body)?;

        let Some(first) = entries.into_iter().next() else {
            tracing::info!(city = spec.city_name(), "no geocoding match");
            return Ok(None);
        };

        let key = spec.local_name_key();
        let city = first
            .local_names
            .get(&key)
            .cloned()
            .or(first.name)
            .unwrap_or_else(|| spec.city_name().to_string());

        tracing::info!(%city, lat = first.lat, lon = first.lon, "resolved location");

        Ok(Some(Location {
            lat: first.lat,
            lon: first.lon,
            city,
        }))
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current_weather(&self, spec: &WeatherSpec) -> Result<Option<CurrentWeather>, ApiError> {
        let body = fetch_body(&self.http, spec.url(&self.base_url)).await?;

        if is_empty_payload(&body)? {
            tracing::info!(lat = spec.lat(), lon = spec.lon(), "empty weather payload");
            return Ok(None);
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;

        let description = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .unwrap_or_else(|| "unknown".to_string());

        Ok(Some(CurrentWeather {
            city_name: parsed.name,
            temperature: parsed.main.temp,
            description,
        }))
    }
}

/// Blank body, `null`, `{}` and `[]` all mean "nothing to report".
fn is_empty_payload(body: &str) -> Result<bool, ApiError> {
    if body.trim().is_empty() {
        return Ok(true);
    }

    let value: serde_json::Value = serde_json::from_str(body)?;
    Ok(match value {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        serde_json::Value::Array(items) => items.is_empty(),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payloads() {
        assert!(is_empty_payload("").unwrap());
        assert!(is_empty_payload("  \n").unwrap());
        assert!(is_empty_payload("null").unwrap());
        assert!(is_empty_payload("{}").unwrap());
        assert!(is_empty_payload("[]").unwrap());
        assert!(!is_empty_payload(r#"{"name":"Moscow"}"#).unwrap());
        assert!(is_empty_payload("{not json").is_err());
    }

    #[test]
    fn geo_entry_tolerates_missing_local_names() {
        let entry: OwGeoEntry =
            serde_json::from_str(r#"{"lat":1.5,"lon":2.5,"name":"Somewhere"}"#).unwrap();
        assert!(entry.local_names.is_empty());
        assert_eq!(entry.name.as_deref(), Some("Somewhere"));
    }
}
