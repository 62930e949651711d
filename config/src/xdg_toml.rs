//! Load `[env]` table from `$XDG_CONFIG_HOME/<app>/config.toml`.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::LoadError;

/// `$XDG_CONFIG_HOME`, falling back to `~/.config`.
fn config_home() -> Result<PathBuf, LoadError> {
    match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => dirs::home_dir()
            .map(|home| home.join(".config"))
            .ok_or_else(|| LoadError::XdgPath("cannot determine home directory".to_string())),
    }
}

/// Path of the app's `config.toml`, whether or not it exists.
pub fn config_path(app_name: &str) -> Result<PathBuf, LoadError> {
    Ok(config_home()?.join(app_name).join("config.toml"))
}

#[derive(serde::Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    env: HashMap<String, String>,
}

/// Returns env key-value pairs from `[env]` section. Missing file or empty section returns empty map.
pub fn load_env_map(app_name: &str) -> Result<HashMap<String, String>, LoadError> {
    let path = config_path(app_name)?;
    if !path.is_file() {
        return Ok(HashMap::new());
    }
    let content = std::fs::read_to_string(&path).map_err(LoadError::XdgRead)?;
    let config: ConfigFile = toml::from_str(&content)?;
    Ok(config.env)
}
