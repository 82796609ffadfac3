//! Application settings.
//!
//! Read from an optional TOML file (`config/wallets.toml` unless
//! `--config-path` says otherwise) and overridden by `WALLETS__*`
//! environment variables, e.g. `WALLETS__SERVER__PORT=9000`.

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/wallets.toml";

#[derive(Debug, Parser)]
#[command(name = "wallets", about = "Wallet ledger HTTP server")]
struct Args {
    /// Config file path (TOML). Missing files are ignored.
    #[arg(long, env = "WALLETS_CONFIG_PATH", default_value = DEFAULT_CONFIG_PATH)]
    config_path: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub shutdown_grace_period_secs: u64,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8080,
            shutdown_grace_period_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Database {
    /// `sqlite:` or `postgres://` connection URL.
    pub url: String,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            url: "sqlite:./wallets.db?mode=rwc".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub database: Database,
    /// Currency codes new wallets may use.
    pub currencies: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: App::default(),
            server: Server::default(),
            database: Database::default(),
            currencies: vec!["USD".to_string()],
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();
        Self::from_path(&args.config_path)
    }

    fn from_path(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("WALLETS")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("currencies")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
