//! Query URLs for the OpenWeather endpoints.
//!
//! These are plain values: building a URL never touches the network. The two
//! endpoints disagree on casing, so the geocoding country code is stored in
//! uppercase and the weather language tag in lowercase.

use url::Url;

use crate::model::{CityQuery, Location, Units};

pub const GEOCODE_PATH: &str = "geo/1.0/direct";
pub const WEATHER_PATH: &str = "data/2.5/weather";

/// Only the best match is ever used.
const GEOCODE_LIMIT: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeSpec {
    api_key: String,
    city_name: String,
    state_code: String,
    country_code: String,
}

impl GeocodeSpec {
    pub fn new(
        api_key: impl Into<String>,
        city_name: impl Into<String>,
        state_code: impl Into<String>,
        country_code: &str,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            city_name: city_name.into(),
            state_code: state_code.into(),
            country_code: country_code.to_uppercase(),
        }
    }

    pub fn from_query(api_key: impl Into<String>, query: &CityQuery) -> Self {
        Self::new(api_key, query.city_name.as_str(), query.state_code.as_str(), &query.country_code)
    }

    pub fn city_name(&self) -> &str {
        &self.city_name
    }

    pub fn state_code(&self) -> &str {
        &self.state_code
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// Key of the `local_names` entry holding the localized city name.
    pub fn local_name_key(&self) -> String {
        self.country_code.to_lowercase()
    }

    /// `<base>/geo/1.0/direct?q=<city>,<state>,<country>&limit=1&appid=<key>`
    pub fn url(&self, base: &Url) -> Url {
        let q = format!("{},{},{}", self.city_name, self.state_code, self.country_code);

        let mut url = endpoint(base, GEOCODE_PATH);
        url.query_pairs_mut()
            .append_pair("q", &q)
            .append_pair("limit", GEOCODE_LIMIT)
            .append_pair("appid", &self.api_key);
        url
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSpec {
    api_key: String,
    lat: f64,
    lon: f64,
    mode: Option<String>,
    units: Units,
    lang: String,
}

impl WeatherSpec {
    /// Metric units, Russian descriptions, JSON payload.
    pub fn new(api_key: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            api_key: api_key.into(),
            lat,
            lon,
            mode: None,
            units: Units::default(),
            lang: "ru".to_string(),
        }
    }

    pub fn for_location(api_key: impl Into<String>, location: &Location) -> Self {
        Self::new(api_key, location.lat, location.lon)
    }

    /// Response format (`xml` or `html`). Empty means the default JSON.
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        let mode = mode.into();
        self.mode = (!mode.is_empty()).then_some(mode);
        self
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn with_lang(mut self, lang: &str) -> Self {
        self.lang = lang.to_lowercase();
        self
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn mode(&self) -> Option<&str> {
        self.mode.as_deref()
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// `<base>/data/2.5/weather?lat=..&lon=..[&mode=..]&units=..&lang=..&appid=..`
    pub fn url(&self, base: &Url) -> Url {
        let mut url = endpoint(base, WEATHER_PATH);
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("lat", &self.lat.to_string())
                .append_pair("lon", &self.lon.to_string());
            if let Some(mode) = &self.mode {
                pairs.append_pair("mode", mode);
            }
            pairs
                .append_pair("units", self.units.as_str())
                .append_pair("lang", &self.lang)
                .append_pair("appid", &self.api_key);
        }
        url
    }
}

/// Append `path` to whatever path prefix `base` already has.
pub(crate) fn endpoint(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    let joined = format!("{}/{}", base.path().trim_end_matches('/'), path);
    url.set_path(&joined);
    url.set_query(None);
    url
}
