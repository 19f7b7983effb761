use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_IP: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_VAULT_PIN: &str = "1234";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Application configuration
/// In debug builds: loads a .env file first, then reads the environment
/// In release builds: reads the environment only
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Address the HTTP server binds to
    pub ip: IpAddr,
    pub port: u16,
    /// SQLite file to persist to; None keeps everything in memory
    pub database_path: Option<PathBuf>,
    /// Insert the sample library when the media store starts empty
    pub seed_sample_data: bool,
    /// PIN the vault prompt is compared against
    pub vault_pin: String,
    /// Whether a .env file was found and applied
    pub env_file_loaded: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ip: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            database_path: None,
            seed_sample_data: true,
            vault_pin: DEFAULT_VAULT_PIN.to_string(),
            env_file_loaded: false,
        }
    }
}

impl Config {
    /// Load configuration based on build mode
    pub fn load() -> Result<Self, ConfigError> {
        #[cfg(debug_assertions)]
        let env_file_loaded = dotenvy::dotenv().is_ok();
        #[cfg(not(debug_assertions))]
        let env_file_loaded = false;

        let mut config = Self::from_lookup(|name| std::env::var(name).ok())?;
        config.env_file_loaded = env_file_loaded;
        Ok(config)
    }

    /// Build configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ip_value = lookup("MEDIALIB_IP").unwrap_or_else(|| DEFAULT_IP.to_string());
        let ip = ip_value
            .parse::<IpAddr>()
            .map_err(|e| invalid("MEDIALIB_IP", &ip_value, e))?;

        let port = match lookup("MEDIALIB_PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|e| invalid("MEDIALIB_PORT", &value, e))?,
            None => DEFAULT_PORT,
        };

        let database_path = lookup("MEDIALIB_DATABASE_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let seed_sample_data = match lookup("MEDIALIB_SEED_SAMPLE_DATA") {
            Some(value) => parse_bool("MEDIALIB_SEED_SAMPLE_DATA", &value)?,
            None => true,
        };

        let vault_pin =
            lookup("MEDIALIB_VAULT_PIN").unwrap_or_else(|| DEFAULT_VAULT_PIN.to_string());

        Ok(Config {
            ip,
            port,
            database_path,
            seed_sample_data,
            vault_pin,
            env_file_loaded: false,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }

    /// Suggested location for a persistent database: ~/.medialib/medialib.db
    pub fn default_database_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".medialib").join("medialib.db"))
    }
}

fn invalid(name: &'static str, value: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(invalid(name, value, "expected true or false")),
    }
}
