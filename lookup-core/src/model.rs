use serde::{Deserialize, Serialize};

/// Country used when the caller does not name one.
pub const DEFAULT_COUNTRY_CODE: &str = "RU";

/// A single entry of the posts collection. Extra JSON fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub body: String,
}

/// Coordinates resolved by the geocoder plus the localized display name.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    pub city_name: String,
    pub temperature: f64,
    pub description: String,
}

/// What the user asked the weather lookup for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery {
    pub city_name: String,
    pub state_code: String,
    pub country_code: String,
}

impl CityQuery {
    pub fn new(city_name: impl Into<String>) -> Self {
        Self {
            city_name: city_name.into(),
            state_code: String::new(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
        }
    }

    pub fn with_state(mut self, state_code: impl Into<String>) -> Self {
        self.state_code = state_code.into();
        self
    }

    pub fn with_country(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = country_code.into();
        self
    }

    /// Language tag for the weather request: the country code in lowercase.
    pub fn lang(&self) -> String {
        self.country_code.to_lowercase()
    }
}

/// Measurement system understood by the weather endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Standard,
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Standard => "standard",
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    /// Suffix printed after a temperature in these units.
    pub fn symbol(&self) -> &'static str {
        match self {
            Units::Standard => "K",
            Units::Metric => "℃",
            Units::Imperial => "℉",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Standard, Units::Metric, Units::Imperial]
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "standard" => Ok(Units::Standard),
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown units '{value}'. Supported units: standard, metric, imperial."
            )),
        }
    }
}
