//! Core library for the `lookup` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Query URL construction for the OpenWeather endpoints
//! - HTTP clients for JSONPlaceholder posts and OpenWeather
//! - The geocode-then-weather lookup chain
//!
//! It is used by `lookup-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod lookup;
pub mod model;
pub mod posts;
pub mod provider;
pub mod request;

pub use config::{Config, ServiceConfig};
pub use error::ApiError;
pub use lookup::{LookupOutcome, show_current_weather};
pub use model::{CityQuery, CurrentWeather, Location, Post, Units};
pub use posts::{format_posts, show_posts};
pub use provider::{
    Geocoder, ServiceId, WeatherSource, openweather::OpenWeatherClient,
    placeholder::PlaceholderClient,
};
pub use request::{GeocodeSpec, WeatherSpec};
