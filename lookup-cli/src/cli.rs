use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use lookup_core::{
    CityQuery, Config, ServiceId, Units,
    model::DEFAULT_COUNTRY_CODE,
    provider::{openweather_api_key, openweather_from_config, placeholder_from_config},
    show_current_weather, show_posts,
};

/// Posts shown when no count is given.
const DEFAULT_POST_COUNT: usize = 5;
/// City looked up when the binary runs without a subcommand.
const DEFAULT_CITY: &str = "Moscow";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "lookup", version, about = "Posts and weather lookups")]
pub struct Cli {
    /// Without a subcommand: show five posts, then the weather in Moscow.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials and endpoints for a service.
    Configure {
        /// Service short name, e.g. "openweather" or "placeholder".
        service: String,
    },

    /// Show the first posts of the JSONPlaceholder collection.
    Posts {
        /// Number of posts to show.
        #[arg(short, long, default_value_t = DEFAULT_POST_COUNT)]
        count: usize,
    },

    /// Show current weather for a city.
    Weather {
        /// City name.
        city: String,

        /// State/region code, mostly useful for US cities.
        #[arg(long, default_value = "")]
        state: String,

        /// Two-letter country code; also selects the description language.
        #[arg(long, default_value = DEFAULT_COUNTRY_CODE)]
        country: String,

        /// standard, metric or imperial.
        #[arg(long, default_value = "metric")]
        units: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Configure { service }) => configure(&service),
            Some(Command::Posts { count }) => posts(count).await,
            Some(Command::Weather { city, state, country, units }) => {
                let units = Units::try_from(units.as_str())?;
                let query = CityQuery::new(city).with_state(state).with_country(country);
                weather(&query, units).await
            }
            None => {
                posts(DEFAULT_POST_COUNT).await?;
                println!();
                weather(&CityQuery::new(DEFAULT_CITY), Units::Metric).await
            }
        }
    }
}

async fn posts(count: usize) -> anyhow::Result<()> {
    let config = Config::load()?;
    let client = placeholder_from_config(&config)?;

    show_posts(&client, count, &mut std::io::stdout()).await;
    Ok(())
}

async fn weather(query: &CityQuery, units: Units) -> anyhow::Result<()> {
    let config = Config::load()?;
    let api_key = openweather_api_key(&config)?;
    let client = openweather_from_config(&config)?;

    let outcome = show_current_weather(
        &client,
        &client,
        api_key,
        units,
        query,
        &mut std::io::stdout(),
    )
    .await;

    tracing::debug!(?outcome, "weather lookup finished");
    Ok(())
}

fn configure(service: &str) -> anyhow::Result<()> {
    let id = ServiceId::try_from(service)?;
    let mut config = Config::load()?;

    if id.requires_api_key() {
        let api_key = Password::new(&format!("API key for {id}:"))
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?;

        if !api_key.trim().is_empty() {
            config.upsert_api_key(id, api_key.trim().to_string());
        }
    }

    let base_url = Text::new(&format!("Base URL for {id}:"))
        .with_default(config.base_url(id))
        .prompt()
        .context("Failed to read base URL")?;

    config.update_base_url(id, &base_url);

    let path = config.save()?;
    println!("Saved {id} configuration to {}", path.display());

    Ok(())
}
