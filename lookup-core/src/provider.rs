use crate::{
    Config,
    error::ApiError,
    model::{CurrentWeather, Location},
    provider::{openweather::OpenWeatherClient, placeholder::PlaceholderClient},
    request::{GeocodeSpec, WeatherSpec},
};
use async_trait::async_trait;
use reqwest::Client;
use std::{convert::TryFrom, fmt::Debug};
use url::Url;

pub mod openweather;
pub mod placeholder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceId {
    Placeholder,
    OpenWeather,
}

impl ServiceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceId::Placeholder => "placeholder",
            ServiceId::OpenWeather => "openweather",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ServiceId::Placeholder => "https://jsonplaceholder.typicode.com",
            ServiceId::OpenWeather => "https://api.openweathermap.org",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        matches!(self, ServiceId::OpenWeather)
    }

    pub const fn all() -> &'static [ServiceId] {
        &[ServiceId::Placeholder, ServiceId::OpenWeather]
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ServiceId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "placeholder" | "jsonplaceholder" => Ok(ServiceId::Placeholder),
            "openweather" => Ok(ServiceId::OpenWeather),
            _ => Err(anyhow::anyhow!(
                "Unknown service '{value}'. Supported services: placeholder, openweather."
            )),
        }
    }
}

/// Resolves a city name to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// `Ok(None)` when the service knows no such place.
    async fn geocode(&self, spec: &GeocodeSpec) -> Result<Option<Location>, ApiError>;
}

/// Current conditions at a pair of coordinates.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// `Ok(None)` when the service answered with an empty payload.
    async fn current_weather(&self, spec: &WeatherSpec) -> Result<Option<CurrentWeather>, ApiError>;
}

/// GET `url` and return the body of a successful response.
pub(crate) async fn fetch_body(http: &Client, url: Url) -> Result<String, ApiError> {
    let endpoint = url.path().to_string();
    tracing::debug!(%endpoint, "GET");

    let res = http.get(url).send().await.map_err(ApiError::request)?;

    let status = res.status();
    if !status.is_success() {
        // Body is decoration only; the status decides the tier.
        let body = res.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status,
            endpoint,
            body: truncate_body(&body),
        });
    }

    res.text().await.map_err(ApiError::request)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}

fn base_url(id: ServiceId, config: &Config) -> anyhow::Result<Url> {
    let raw = config.base_url(id);
    Url::parse(raw).map_err(|e| anyhow::anyhow!("Invalid base URL '{raw}' for service '{id}': {e}"))
}

/// Construct the posts client from config.
pub fn placeholder_from_config(config: &Config) -> anyhow::Result<PlaceholderClient> {
    Ok(PlaceholderClient::new(base_url(ServiceId::Placeholder, config)?))
}

/// The OpenWeather API key; mandatory for the weather lookup.
pub fn openweather_api_key(config: &Config) -> anyhow::Result<&str> {
    let id = ServiceId::OpenWeather;
    config.api_key(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for service '{id}'.\n\
                 Hint: run `lookup configure {id}` or set {}.",
            crate::config::OPENWEATHER_KEY_ENV
        )
    })
}

/// Construct the OpenWeather client from config.
pub fn openweather_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    Ok(OpenWeatherClient::new(base_url(ServiceId::OpenWeather, config)?))
}
