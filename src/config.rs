use anyhow::Result;
use clap::Parser;
use serde::Deserialize;
use serde_yaml;
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "linkshelf")]
#[command(about = "Runs the linkshelf bookmarking service", long_about = None)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".linkshelf")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct App {
    pub database: String,
    pub port: i32,
    #[serde(default = "default_user")]
    pub default_user: String,
    #[serde(default)]
    pub turso_url: Option<String>,
    #[serde(default)]
    pub turso_auth_token: Option<String>,
    #[serde(default = "default_sync_interval")]
    pub sync_interval_seconds: u64,
}

fn default_user() -> String {
    "local".to_string()
}

fn default_sync_interval() -> u64 {
    60
}

impl App {
    pub fn get_db(&self) -> &str {
        &self.database
    }

    pub fn get_port(&self) -> i32 {
        self.port
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Rebrandly {
    #[serde(default = "default_rebrandly_url")]
    pub base_url: String,
    /// Pause between consecutive upstream calls of a bulk run.
    #[serde(default = "default_request_interval")]
    pub request_interval_ms: u64,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_rebrandly_url() -> String {
    "https://api.rebrandly.com".to_string()
}

fn default_request_interval() -> u64 {
    1000
}

fn default_timeout() -> u64 {
    30
}

impl Default for Rebrandly {
    fn default() -> Self {
        Rebrandly {
            base_url: default_rebrandly_url(),
            request_interval_ms: default_request_interval(),
            timeout_seconds: default_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    pub app: App,
    #[serde(default)]
    pub rebrandly: Rebrandly,
}

impl Config {
    pub fn new(path: &str) -> Result<Self> {
        let cfg = Config::load_config(path)?;
        Ok(cfg)
    }

    fn load_config(path: &str) -> Result<Config> {
        let yaml_str = fs::read_to_string(path)?;
        Config::from_yaml(&yaml_str)
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Config> {
        let yaml_with_env = Config::substitute_env_vars(yaml_str)?;
        let config: Config = serde_yaml::from_str(&yaml_with_env)?;
        Ok(config)
    }

    fn substitute_env_vars(yaml_str: &str) -> Result<String> {
        let mut result = yaml_str.to_string();
        let mut offset = 0;

        while let Some(start) = result[offset..].find("${") {
            let actual_start = offset + start;
            if let Some(end) = result[actual_start..].find('}') {
                let var_name = &result[actual_start + 2..actual_start + end];

                // ${VAR:-default}
                let env_value = if let Some(default_start) = var_name.find(":-") {
                    let actual_var = &var_name[..default_start];
                    let default_val = &var_name[default_start + 2..];
                    env::var(actual_var).unwrap_or_else(|_| default_val.to_string())
                } else {
                    env::var(var_name).unwrap_or_else(|_| {
                        tracing::warn!(variable = var_name, "environment variable not found");
                        String::new()
                    })
                };

                result.replace_range(actual_start..actual_start + end + 1, &env_value);
                offset = actual_start + env_value.len();
            } else {
                break;
            }
        }

        Ok(result)
    }
}
