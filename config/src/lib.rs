//! Load configuration from XDG `config.toml` and project `.env`, then apply to the process
//! environment with priority: **existing env > .env > XDG**.
//!
//! The react-loop binary calls [`load_and_apply`] once at startup, before reading
//! `GOOGLE_API_KEY`, `REACT_MODEL` and the `REACT_*` loop knobs from the environment.
//!
//! ```toml
//! # ~/.config/react-loop/config.toml
//! [env]
//! GOOGLE_API_KEY = "..."
//! REACT_BUDGET = "8"
//! ```

mod project_env;
mod xdg_toml;

use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

pub use xdg_toml::config_path;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read {path}: {message}")]
    Dotenv { path: String, message: String },
}

/// Keys applied by one [`load_and_apply`] call, by source.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Applied {
    pub from_dotenv: Vec<String>,
    pub from_xdg: Vec<String>,
}

impl Applied {
    pub fn is_empty(&self) -> bool {
        self.from_dotenv.is_empty() && self.from_xdg.is_empty()
    }
}

/// Loads config from XDG `config.toml` and optional project `.env`, then sets environment
/// variables only for keys that are **not** already set (so existing env has highest priority).
///
/// Order of precedence when a key is missing in the process environment:
/// 1. Value from project `.env` (current directory or `override_dir` if given)
/// 2. Value from `$XDG_CONFIG_HOME/<app_name>/config.toml` `[env]` table
///
/// * `app_name`: e.g. `"react-loop"`, used for XDG path `~/.config/<app_name>/config.toml`.
/// * `override_dir`: if `Some`, look for `.env` in this directory instead of `std::env::current_dir()`.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<Applied, LoadError> {
    let xdg_map = xdg_toml::load_env_map(app_name)?;
    let dotenv_map = project_env::load_env_map(override_dir)?;

    let mut keys: Vec<&String> = xdg_map
        .keys()
        .chain(dotenv_map.keys())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    keys.sort();

    let mut applied = Applied::default();
    for key in keys {
        if std::env::var_os(key).is_some() {
            continue;
        }
        if let Some(v) = dotenv_map.get(key) {
            std::env::set_var(key, v);
            applied.from_dotenv.push(key.clone());
        } else if let Some(v) = xdg_map.get(key) {
            std::env::set_var(key, v);
            applied.from_xdg.push(key.clone());
        }
    }

    Ok(applied)
}

// Tests that touch XDG_CONFIG_HOME hold this lock.
#[cfg(test)]
static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
