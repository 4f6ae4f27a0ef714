//! Handles settings for the application. Configuration is written in
//! `settings.toml` and can be overridden with `DONORSENSE__*` environment
//! variables and command line flags.
//!
//! See `settings.toml` for the configuration.
use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use engine::DatePolicy;
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Data {
    #[serde(default = "default_data_dir")]
    pub dir: String,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Option<Server>,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub filters: DatePolicy,
}

#[derive(Debug, Parser)]
#[command(name = "donorsense", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the dataset directory.
    #[arg(long)]
    data_dir: Option<String>,
    /// Override the log level.
    #[arg(long)]
    level: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();

        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let mut settings = Self::from_builder(
            Config::builder()
                .add_source(File::with_name(config_path).required(false))
                .add_source(Environment::with_prefix("DONORSENSE").separator("__")),
        )?;

        if let Some(dir) = args.data_dir {
            settings.data.dir = dir;
        }
        if let Some(level) = args.level {
            settings.app.level = level;
        }

        Ok(settings)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}
