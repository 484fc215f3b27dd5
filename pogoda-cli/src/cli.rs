use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::Text;
use pogoda_core::{Config, WeatherLookup, WeatherResult};
use std::path::{Path, PathBuf};

use crate::server;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "pogoda", version, about = "Current weather for a city name")]
pub struct Cli {
    /// Config file to use instead of the one in the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current weather for a city.
    Show {
        /// City name, e.g. "Kraków" or "Zielona Góra".
        city: String,

        /// Print the JSON response body instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Serve lookups at GET /api/weather/{city}/.
    Serve {
        /// Address to bind; defaults to `server.bind` from the config.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Interactively edit provider endpoints and server settings.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = load_config(self.config.as_deref())?;

        match self.command {
            Command::Show { city, json } => {
                let lookup = WeatherLookup::from_config(&config)?;

                match lookup.lookup(&city).await {
                    Ok(result) if json => {
                        println!("{}", serde_json::to_string_pretty(&result)?);
                    }
                    Ok(result) => println!("{}", format_result(&result)),
                    Err(err) => {
                        if json {
                            println!("{}", server::error_body(&err));
                        }
                        return Err(err.into());
                    }
                }
            }
            Command::Serve { bind } => {
                let bind = bind.unwrap_or_else(|| config.server.bind.clone());
                let lookup = WeatherLookup::from_config(&config)?;
                server::run(lookup, &bind).await?;
            }
            Command::Configure => configure(config, self.config.as_deref())?,
        }

        Ok(())
    }
}

/// Reads `--config` when given, otherwise the platform config file.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    match explicit {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Writes back to wherever [`load_config`] read from and returns that path.
fn save_config(config: &Config, explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => {
            config.save_to(path)?;
            Ok(path.to_path_buf())
        }
        None => {
            config.save()?;
            Config::config_file_path()
        }
    }
}

fn configure(mut config: Config, explicit: Option<&Path>) -> anyhow::Result<()> {
    config.geocoder.url = prompt("Geocoder search URL:", &config.geocoder.url)?;
    config.geocoder.user_agent = prompt("Geocoder user agent:", &config.geocoder.user_agent)?;
    config.forecast.url = prompt("Forecast URL:", &config.forecast.url)?;
    config.server.bind = prompt("Server bind address:", &config.server.bind)?;

    let path = save_config(&config, explicit)?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

fn prompt(message: &str, current: &str) -> anyhow::Result<String> {
    let answer = Text::new(message)
        .with_default(current)
        .prompt()
        .with_context(|| format!("Failed to read answer for {message:?}"))?;
    Ok(answer.trim().to_string())
}

fn format_result(result: &WeatherResult) -> String {
    format!(
        "{}: {}\n  Temperatura: {}\n  Wilgotność:  {}\n  Wiatr:       {}",
        result.city,
        result.description,
        format_temp(result.temperature),
        format_humidity(result.humidity),
        format_wind(result.wind_speed),
    )
}

fn format_temp(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}°C", v.round() as i64),
        None => "--°C".to_string(),
    }
}

fn format_humidity(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}%", v.round() as i64),
        None => "--%".to_string(),
    }
}

fn format_wind(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{} km/h", v.round() as i64),
        None => "-- km/h".to_string(),
    }
}
