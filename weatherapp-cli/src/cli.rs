use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use inquire::{Confirm, Password, Text};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    task::JoinSet,
};
use weatherapp_core::{
    Config, FixedLocation, LocationFix, LocationProvider, LocationQuery, QueryBuilder,
    WeatherService, WeatherSession, location::startup_query,
};

use crate::view::TerminalView;

type TerminalSession = WeatherSession<WeatherService, TerminalView>;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherapp", version, about = "Current weather for a city or a position")]
pub struct Cli {
    /// Log filter used when RUST_LOG is not set, e.g. "debug" or "weatherapp_core=info".
    #[arg(long, global = true, env = "WEATHERAPP_LOG", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Last known device position, standing in for a location service.
#[derive(Debug, Clone, Copy, Args)]
pub struct LocationArgs {
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,
}

impl LocationArgs {
    fn provider(self) -> FixedLocation {
        FixedLocation(LocationFix::from(self.lat.zip(self.lon)))
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and default city.
    Configure,

    /// Show current weather once.
    Show {
        /// City to look up; without it the position or the default city is used.
        city: Option<String>,

        #[command(flatten)]
        location: LocationArgs,
    },

    /// Show weather for the position or default city, then for every city typed on stdin.
    Watch {
        #[command(flatten)]
        location: LocationArgs,
    },

    /// Print the request URL (API key redacted).
    Url {
        city: Option<String>,

        #[command(flatten)]
        location: LocationArgs,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, location } => show(city, location).await,
            Command::Watch { location } => watch(location).await,
            Command::Url { city, location } => print_url(city, location).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        cfg.api_key = Some(api_key.trim().to_string());
    }

    cfg.default_city = Text::new("Default city:")
        .with_default(&cfg.default_city)
        .prompt()
        .context("Failed to read default city")?
        .trim()
        .to_string();

    cfg.metric_coordinates = Confirm::new("Request metric units for position lookups?")
        .with_default(cfg.metric_coordinates)
        .with_help_message("Without it the provider reports position lookups in Kelvin")
        .prompt()
        .context("Failed to read units choice")?;

    let path = cfg.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

fn session(cfg: &Config) -> anyhow::Result<TerminalSession> {
    let service = WeatherService::new(cfg.query_builder()?);
    Ok(WeatherSession::new(
        Arc::new(service),
        Arc::new(TerminalView),
        cfg.default_query(),
    ))
}

async fn show(city: Option<String>, location: LocationArgs) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let session = session(&cfg)?;

    let result = match city {
        Some(city) => session.lookup(LocationQuery::city(city)).await,
        None => session.start(&location.provider()).await,
    };

    if let Err(err) = result {
        bail!("lookup failed: {err}");
    }
    Ok(())
}

async fn watch(location: LocationArgs) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let session = session(&cfg)?;
    let mut lookups = JoinSet::new();

    let fix = location.provider().last_known().await;
    lookups.spawn(session.begin(startup_query(fix, session.default_query())).run());

    println!("Type a city name and press enter. Ctrl-D quits.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        lookups.spawn(session.begin(LocationQuery::city(line)).run());

        // Reap finished lookups so the set does not grow without bound.
        while lookups.try_join_next().is_some() {}
    }

    while lookups.join_next().await.is_some() {}
    Ok(())
}

async fn print_url(city: Option<String>, location: LocationArgs) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let queries = QueryBuilder::new(cfg.api_key.clone().unwrap_or_default())
        .with_endpoint(cfg.endpoint.clone())
        .with_metric_coordinates(cfg.metric_coordinates);

    let query = match city {
        Some(city) => LocationQuery::city(city),
        None => startup_query(location.provider().last_known().await, &cfg.default_query()),
    };

    println!("{}", queries.redacted_url(&query));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_with_negative_coordinates() {
        let cli = Cli::parse_from(["weatherapp", "show", "--lat", "45.42", "--lon", "-75.69"]);

        match cli.command {
            Command::Show { city, location } => {
                assert_eq!(city, None);
                assert_eq!(
                    location.provider(),
                    FixedLocation(LocationFix::Found { latitude: 45.42, longitude: -75.69 })
                );
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn lat_without_lon_is_rejected() {
        assert!(Cli::try_parse_from(["weatherapp", "show", "--lat", "45.0"]).is_err());
    }

    #[test]
    fn missing_position_is_unavailable() {
        let cli = Cli::parse_from(["weatherapp", "watch"]);

        match cli.command {
            Command::Watch { location } => {
                assert_eq!(location.provider(), FixedLocation(LocationFix::Unavailable));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn show_accepts_city_and_log_level() {
        let cli = Cli::parse_from(["weatherapp", "show", "Ottawa", "--log-level", "debug"]);

        assert_eq!(cli.log_level, "debug");
        assert!(matches!(cli.command, Command::Show { city: Some(ref c), .. } if c == "Ottawa"));
    }
}
