//! Geocode a city, then fetch its current weather.
//!
//! Each step reports its own failures to the console and degrades to an
//! absent value, so the chain stops at the first step that yields nothing.

use std::io::Write;

use crate::{
    model::{CityQuery, CurrentWeather, Location, Units},
    provider::{Geocoder, WeatherSource},
    request::{GeocodeSpec, WeatherSpec},
};

/// Terminal state of one lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(CurrentWeather),
    /// Geocoding failed or matched nothing; the weather source was not called.
    LocationNotFound,
    WeatherUnavailable,
}

impl LookupOutcome {
    pub fn weather(&self) -> Option<&CurrentWeather> {
        match self {
            Self::Found(weather) => Some(weather),
            _ => None,
        }
    }
}

/// Resolve `spec` to a location, reporting errors instead of returning them.
pub async fn locate<G>(geocoder: &G, spec: &GeocodeSpec, out: &mut impl Write) -> Option<Location>
where
    G: Geocoder + ?Sized,
{
    match geocoder.geocode(spec).await {
        Ok(location) => location,
        Err(err) => {
            err.report(out);
            None
        }
    }
}

/// Fetch current conditions, reporting errors and empty payloads.
pub async fn fetch_current<W>(
    source: &W,
    spec: &WeatherSpec,
    out: &mut impl Write,
) -> Option<CurrentWeather>
where
    W: WeatherSource + ?Sized,
{
    match source.current_weather(spec).await {
        Ok(Some(weather)) => Some(weather),
        Ok(None) => {
            let _ = writeln!(out, "Weather data not found");
            None
        }
        Err(err) => {
            err.report(out);
            None
        }
    }
}

/// `"<city>, <temperature><unit>, <description>"`. Whole temperatures keep
/// their `.0`.
pub fn format_weather(weather: &CurrentWeather, units: Units) -> String {
    format!(
        "{}, {:?}{}, {}",
        weather.city_name,
        weather.temperature,
        units.symbol(),
        weather.description
    )
}

/// Print the current weather for `query`.
///
/// Makes at most two requests: one to geocode the city and, only if that
/// produced a location, one for the weather at its coordinates. The weather
/// description language is the query's country code in lowercase.
pub async fn show_current_weather<G, W>(
    geocoder: &G,
    weather: &W,
    api_key: &str,
    units: Units,
    query: &CityQuery,
    out: &mut impl Write,
) -> LookupOutcome
where
    G: Geocoder + ?Sized,
    W: WeatherSource + ?Sized,
{
    let geocode = GeocodeSpec::from_query(api_key, query);
    let Some(location) = locate(geocoder, &geocode, out).await else {
        let _ = writeln!(out, "Location could not be determined");
        return LookupOutcome::LocationNotFound;
    };

    let spec = WeatherSpec::for_location(api_key, &location)
        .with_units(units)
        .with_lang(&query.lang());

    match fetch_current(weather, &spec, out).await {
        Some(current) => {
            let _ = writeln!(out, "{}", format_weather(&current, units));
            LookupOutcome::Found(current)
        }
        None => LookupOutcome::WeatherUnavailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Debug)]
    enum Reply<T> {
        Value(T),
        Empty,
        Status(StatusCode),
    }

    impl<T: Clone> Reply<T> {
        fn produce(&self, endpoint: &str) -> Result<Option<T>, ApiError> {
            match self {
                Reply::Value(v) => Ok(Some(v.clone())),
                Reply::Empty => Ok(None),
                Reply::Status(status) => Err(ApiError::Status {
                    status: *status,
                    endpoint: endpoint.to_string(),
                    body: String::new(),
                }),
            }
        }
    }

    #[derive(Debug)]
    struct StubGeocoder {
        reply: Reply<Location>,
        calls: AtomicUsize,
        last: Mutex<Option<GeocodeSpec>>,
    }

    impl StubGeocoder {
        fn new(reply: Reply<Location>) -> Self {
            Self { reply, calls: AtomicUsize::new(0), last: Mutex::new(None) }
        }
    }

    #[async_trait]
    impl Geocoder for StubGeocoder {
        async fn geocode(&self, spec: &GeocodeSpec) -> Result<Option<Location>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(spec.clone());
            self.reply.produce("/geo/1.0/direct")
        }
    }

    #[derive(Debug)]
    struct StubWeather {
        reply: Reply<CurrentWeather>,
        calls: AtomicUsize,
        last: Mutex<Option<WeatherSpec>>,
    }

    impl StubWeather {
        fn new(reply: Reply<CurrentWeather>) -> Self {
            Self { reply, calls: AtomicUsize::new(0), last: Mutex::new(None) }
        }
    }

    #[async_trait]
    impl WeatherSource for StubWeather {
        async fn current_weather(
            &self,
            spec: &WeatherSpec,
        ) -> Result<Option<CurrentWeather>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(spec.clone());
            self.reply.produce("/data/2.5/weather")
        }
    }

    fn moscow() -> Location {
        Location { lat: 55.75, lon: 37.61, city: "Москва".into() }
    }

    fn clear_sky() -> CurrentWeather {
        CurrentWeather {
            city_name: "Moscow".into(),
            temperature: 3.2,
            description: "clear sky".into(),
        }
    }

    async fn run(geo: &StubGeocoder, weather: &StubWeather, query: &CityQuery) -> (LookupOutcome, String) {
        let mut out = Vec::new();
        let outcome = show_current_weather(geo, weather, "KEY", Units::Metric, query, &mut out).await;
        (outcome, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn prints_weather_for_resolved_city() {
        let geo = StubGeocoder::new(Reply::Value(moscow()));
        let weather = StubWeather::new(Reply::Value(clear_sky()));

        let (outcome, printed) = run(&geo, &weather, &CityQuery::new("Moscow")).await;

        assert_eq!(outcome, LookupOutcome::Found(clear_sky()));
        assert_eq!(printed, "Moscow, 3.2℃, clear sky\n");
        assert_eq!(geo.calls.load(Ordering::SeqCst), 1);
        assert_eq!(weather.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn forwards_coordinates_and_lowercased_language() {
        let geo = StubGeocoder::new(Reply::Value(moscow()));
        let weather = StubWeather::new(Reply::Value(clear_sky()));

        let query = CityQuery::new("Moscow").with_country("ru");
        run(&geo, &weather, &query).await;

        let geo_spec = geo.last.lock().unwrap().clone().unwrap();
        assert_eq!(geo_spec.country_code(), "RU");

        let spec = weather.last.lock().unwrap().clone().unwrap();
        assert_eq!(spec.lat(), 55.75);
        assert_eq!(spec.lon(), 37.61);
        assert_eq!(spec.lang(), "ru");
        assert_eq!(spec.units(), Units::Metric);
        assert_eq!(spec.mode(), None);
    }

    #[tokio::test]
    async fn empty_geocode_skips_weather() {
        let geo = StubGeocoder::new(Reply::Empty);
        let weather = StubWeather::new(Reply::Value(clear_sky()));

        let (outcome, printed) = run(&geo, &weather, &CityQuery::new("Atlantis")).await;

        assert_eq!(outcome, LookupOutcome::LocationNotFound);
        assert_eq!(printed, "Location could not be determined\n");
        assert_eq!(weather.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn geocode_http_error_is_reported_and_stops_chain() {
        let geo = StubGeocoder::new(Reply::Status(StatusCode::UNAUTHORIZED));
        let weather = StubWeather::new(Reply::Value(clear_sky()));

        let (outcome, printed) = run(&geo, &weather, &CityQuery::new("Moscow")).await;

        assert_eq!(outcome, LookupOutcome::LocationNotFound);
        assert!(printed.starts_with("HTTP error: 401 Unauthorized"));
        assert!(printed.ends_with("Location could not be determined\n"));
        assert_eq!(weather.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn weather_not_found_is_reported() {
        let geo = StubGeocoder::new(Reply::Value(moscow()));
        let weather = StubWeather::new(Reply::Status(StatusCode::NOT_FOUND));

        let (outcome, printed) = run(&geo, &weather, &CityQuery::new("Moscow")).await;

        assert_eq!(outcome, LookupOutcome::WeatherUnavailable);
        assert!(printed.starts_with("HTTP error: 404 Not Found"));
        assert!(outcome.weather().is_none());
    }

    #[tokio::test]
    async fn empty_weather_payload_short_circuits() {
        let geo = StubGeocoder::new(Reply::Value(moscow()));
        let weather = StubWeather::new(Reply::Empty);

        let (outcome, printed) = run(&geo, &weather, &CityQuery::new("Moscow")).await;

        assert_eq!(outcome, LookupOutcome::WeatherUnavailable);
        assert_eq!(printed, "Weather data not found\n");
    }

    #[test]
    fn format_keeps_fraction_of_whole_temperature() {
        let weather = CurrentWeather { temperature: 3.0, ..clear_sky() };
        assert_eq!(format_weather(&weather, Units::Metric), "Moscow, 3.0℃, clear sky");

        let weather = CurrentWeather { temperature: -12.0, ..clear_sky() };
        assert_eq!(format_weather(&weather, Units::Metric), "Moscow, -12.0℃, clear sky");
    }

    #[test]
    fn format_uses_unit_symbol() {
        assert_eq!(format_weather(&clear_sky(), Units::Imperial), "Moscow, 3.2℉, clear sky");
        assert_eq!(format_weather(&clear_sky(), Units::Standard), "Moscow, 3.2K, clear sky");
    }
}
