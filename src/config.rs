//! Route configuration, read from TOML.
//!
//! ```toml
//! backend = "pipewire"
//! case_sensitive = false
//!
//! [[route]]
//! from = { device = "MDA Piano", name = "left_out" }
//! to = { device = "Scarlett 4i4 4th Gen Analog", name = "playback_FL" }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use app_dirs2::{get_app_root, AppDataType, AppInfo};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::common::BackendKind;
use crate::errors::ConfigError;
use crate::matching::MatchOptions;
use crate::routing::Route;

pub const APP_INFO: AppInfo = AppInfo {
    name: "portwire",
    author: "portwire",
};
pub const CONFIG_FILE_NAME: &str = "routes.toml";
pub const DEFAULT_CLIENT_NAME: &str = "portwire";

const BUILTIN_ROUTES: &str = include_str!("../routes.toml");

fn default_client_name() -> String {
    DEFAULT_CLIENT_NAME.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    #[serde(default)]
    pub backend: BackendKind,
    #[serde(default = "default_client_name")]
    pub client_name: String,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default, rename = "route")]
    pub routes: Vec<Route>,
}

/// Where a [`RouteConfig`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Builtin,
}

impl RouteConfig {
    pub fn from_toml_str(text: &str) -> Result<RouteConfig, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<RouteConfig, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&text)
    }

    /// The routes compiled into the binary.
    pub fn builtin() -> Result<RouteConfig, ConfigError> {
        Self::from_toml_str(BUILTIN_ROUTES)
    }

    /// `<user config dir>/portwire/routes.toml`, whether or not it exists.
    pub fn user_path() -> Result<PathBuf, ConfigError> {
        get_app_root(AppDataType::UserConfig, &APP_INFO)
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .map_err(|_| ConfigError::NoConfigDir)
    }

    /// Loads `explicit` if given, else the user config file if there is one,
    /// else the built-in routes.
    pub fn locate(explicit: Option<&Path>) -> Result<(RouteConfig, ConfigSource), ConfigError> {
        Self::locate_in(explicit, Self::user_path().ok())
    }

    /// [`RouteConfig::locate`] with the user config file given explicitly.
    pub fn locate_in(
        explicit: Option<&Path>,
        user: Option<PathBuf>,
    ) -> Result<(RouteConfig, ConfigSource), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, ConfigSource::File(path.to_path_buf())));
        }
        match user {
            Some(path) if path.is_file() => {
                debug!("reading routes from {}", path.display());
                let config = Self::load(&path)?;
                Ok((config, ConfigSource::File(path)))
            }
            _ => {
                debug!("no user route file, using built-in routes");
                Ok((Self::builtin()?, ConfigSource::Builtin))
            }
        }
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            case_sensitive: self.case_sensitive,
        }
    }
}

impl Default for RouteConfig {
    fn default() -> RouteConfig {
        RouteConfig {
            backend: BackendKind::default(),
            client_name: default_client_name(),
            case_sensitive: false,
            routes: Vec::new(),
        }
    }
}
