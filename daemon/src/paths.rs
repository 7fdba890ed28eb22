/// Canonical location of the optional FL Presence config file.
///
/// On Windows the file lives at %APPDATA%\FlPresence\config.toml. Elsewhere
/// (useful only for development) it falls back to $XDG_CONFIG_HOME or
/// $HOME/.config.
use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR_NAME: &str = "FlPresence";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Returns the FL Presence configuration directory.
pub fn app_data_dir() -> Result<PathBuf> {
    let base = if cfg!(windows) {
        std::env::var_os("APPDATA").context("APPDATA environment variable not set")?
    } else {
        match std::env::var_os("XDG_CONFIG_HOME") {
            Some(dir) => dir,
            None => {
                let home = std::env::var_os("HOME").context("HOME environment variable not set")?;
                PathBuf::from(home).join(".config").into_os_string()
            }
        }
    };
    Ok(PathBuf::from(base).join(APP_DIR_NAME))
}

/// Returns the full path to the config file inside [`app_data_dir`].
pub fn config_file_path() -> Result<PathBuf> {
    Ok(app_data_dir()?.join(CONFIG_FILE_NAME))
}
