//! Store connection settings.
//!
//! Settings are layered with `figment`: built-in defaults, then an optional
//! TOML file, then `KANWIKI_`-prefixed environment variables
//! (`KANWIKI_BASE_URL`, `KANWIKI_USER`, `KANWIKI_PASSWORD`,
//! `KANWIKI_BOARDS`, `KANWIKI_CLIENT_HEADER`).

use crate::board::domain::{BoardDomainError, BoardName};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Environment variable prefix for settings overrides.
pub const ENV_PREFIX: &str = "KANWIKI_";

/// Default value of the client-identification header.
pub const DEFAULT_CLIENT_HEADER: &str = "TiddlyWiki";

/// Errors raised while loading or validating settings.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// No store base address is configured.
    #[error("store base URL is not configured")]
    MissingBaseUrl,

    /// The configured base address is not an absolute URL.
    #[error("invalid store base URL '{0}'")]
    InvalidBaseUrl(String),

    /// No board is configured.
    #[error("no boards configured")]
    NoBoards,

    /// A configured board name is invalid.
    #[error("invalid board name: {0}")]
    InvalidBoard(#[from] BoardDomainError),

    /// The settings sources could not be read or merged.
    #[error("failed to load settings: {0}")]
    Load(Arc<figment::Error>),
}

/// Connection settings for the remote document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Base address of the store, without the `/recipes/...` suffix.
    pub base_url: Option<String>,
    /// Basic-auth user; no credentials are sent when absent or empty.
    pub user: Option<String>,
    /// Basic-auth password.
    pub password: Option<String>,
    /// Boards offered by the board selector, first one opened by default.
    pub boards: Vec<String>,
    /// Value of the `X-Requested-With` header sent with writes.
    pub client_header: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            user: None,
            password: None,
            boards: Vec::new(),
            client_header: DEFAULT_CLIENT_HEADER.to_owned(),
        }
    }
}

impl StoreSettings {
    /// Loads settings from defaults, an optional TOML file and the
    /// environment.
    ///
    /// A missing file is treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a source cannot be parsed.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(|err| ConfigError::Load(Arc::new(err)))
    }

    /// Returns the base address without trailing slashes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingBaseUrl`] when unset or blank.
    pub fn base_url(&self) -> Result<&str, ConfigError> {
        self.base_url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingBaseUrl)
    }

    /// Returns the basic-auth pair when a user is configured.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let user = self.user.as_deref().filter(|user| !user.is_empty())?;
        Some((user, self.password.as_deref().unwrap_or_default()))
    }

    /// Returns the configured boards as validated names.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBoard`] for a blank entry.
    pub fn board_names(&self) -> Result<Vec<BoardName>, ConfigError> {
        self.boards
            .iter()
            .map(|name| BoardName::new(name.as_str()).map_err(ConfigError::from))
            .collect()
    }
}
