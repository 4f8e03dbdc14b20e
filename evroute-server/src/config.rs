//! Server configuration: a TOML file with command-line overrides.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use evroute_core::model::EngineConfig;
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(name = "evroute-server", about = "Charging-aware EV route planning API")]
pub struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Socket address to listen on, overrides the config file.
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    /// Charger dataset (GeoJSON), overrides the config file.
    #[arg(long)]
    pub dataset: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub dataset: PathBuf,
    /// Base URL of the ORS-compatible routing provider.
    pub ors_url: String,
    pub ors_profile: String,
    pub engine: EngineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".parse().expect("valid literal address"),
            dataset: PathBuf::from("chargers.geojson"),
            ors_url: "http://localhost:8080/ors".to_string(),
            ors_profile: "driving-car".to_string(),
            engine: EngineConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads the optional TOML file, then applies CLI overrides on top.
    pub fn load(cli: &Cli) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = match &cli.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                toml::from_str(&raw)?
            }
            None => Self::default(),
        };

        if let Some(bind) = cli.bind {
            config.bind = bind;
        }
        if let Some(dataset) = &cli.dataset {
            config.dataset = dataset.clone();
        }
        Ok(config)
    }
}
