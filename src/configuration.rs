//! src/configuration.rs

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_aux::field_attributes::{
    deserialize_bool_from_anything, deserialize_number_from_string,
    deserialize_option_number_from_string,
};
use sqlx::postgres::{PgConnectOptions, PgSslMode};

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub waitlist: WaitlistSettings,
    pub store: StoreSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    /// Sub-path the page is served under, e.g. `/probya-coming-soon`.
    #[serde(default)]
    pub base_path: String,
    /// Directory holding `images/`, served under `{base_path}/images`.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl ApplicationSettings {
    /// `base_path` with a leading slash and no trailing one; empty at the root.
    pub fn normalized_base_path(&self) -> String {
        let trimmed = self.base_path.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct WaitlistSettings {
    pub table: String,
    /// Error code the store reports when the address is already present.
    pub unique_violation_code: String,
}

#[derive(Deserialize, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreSettings {
    Rest(RestStoreSettings),
    Postgres(DatabaseSettings),
}

#[derive(Deserialize, Clone)]
pub struct RestStoreSettings {
    pub base_url: String,
    pub api_key: Secret<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub timeout_milliseconds: Option<u64>,
}

impl RestStoreSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_milliseconds.map(Duration::from_millis)
    }
}

#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: Secret<String>,
    // store settings sit inside a tagged enum, so env strings arrive unconverted
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    #[serde(default, deserialize_with = "deserialize_bool_from_anything")]
    pub require_ssl: bool,
}

impl DatabaseSettings {
    pub fn without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };
        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .ssl_mode(ssl_mode)
    }

    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db().database(&self.database_name)
    }
}

/// Reads `configuration.yaml` from the working directory, then lets
/// `APP_`-prefixed variables override it (`APP_APPLICATION__PORT=8080`).
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration"))
        .add_source(environment())
        .build()?;
    settings.try_deserialize()
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
}
