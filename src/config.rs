//! Startup configuration.
//!
//! Read once from the environment:
//! - `TOTP_SECRET`: base32 secret; without it the app stays idle
//! - `TOTP_ICON_PATH`: tray icon file, optional

use std::{path::PathBuf, time::Duration};

use crate::secret::Secret;

pub const SECRET_VAR: &str = "TOTP_SECRET";
pub const ICON_PATH_VAR: &str = "TOTP_ICON_PATH";

/// Tick period of the tooltip refresh.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

pub const DEFAULT_TITLE: &str = "TOTP";

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` routes the app to its idle state.
    pub secret: Option<Secret>,
    pub icon_path: Option<PathBuf>,
    pub refresh_interval: Duration,
    /// Shown as the tray title and as the tooltip until the first tick.
    pub title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            secret: None,
            icon_path: None,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            title: DEFAULT_TITLE.into(),
        }
    }
}

impl Config {
    /// Loads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(SECRET_VAR).and_then(Secret::new);
        let icon_path = lookup(ICON_PATH_VAR)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Self {
            secret,
            icon_path,
            ..Self::default()
        }
    }
}
