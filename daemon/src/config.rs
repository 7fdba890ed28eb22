use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const MIN_POLL_INTERVAL_MS: u64 = 10;
pub const MAX_POLL_INTERVAL_MS: u64 = 10_000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
/// Case-sensitive marker matched against window titles.
pub const DEFAULT_APP_MARKER: &str = "FL Studio";
/// Asset key of the large image uploaded to the Discord application.
pub const DEFAULT_LARGE_IMAGE: &str = "flstudio10";
/// Placeholder shipped until the user fills in their own application ID.
pub const DEFAULT_CLIENT_ID: &str = "Discord Developer Portal Client ID You Created";
/// Environment variable that overrides `client_id` from the config file.
pub const CLIENT_ID_ENV: &str = "FLPRESENCE_CLIENT_ID";

/// Root configuration structure. Deserialized from %APPDATA%\FlPresence\config.toml.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Discord application (client) ID passed to the IPC handshake.
    pub client_id: String,
    /// Delay between two polls of the window list. Clamped to [10, 10000].
    pub poll_interval_ms: u64,
    /// Substring identifying a window as belonging to the target application.
    pub app_marker: String,
    /// Asset key shown as the large image of the activity.
    pub large_image: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            app_marker: DEFAULT_APP_MARKER.to_string(),
            large_image: DEFAULT_LARGE_IMAGE.to_string(),
        }
    }
}

impl Config {
    /// Returns the effective poll interval, clamped to the supported range.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(
            self.poll_interval_ms
                .clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS),
        )
    }

    /// Replaces `client_id` with `value` when it is present and non-blank.
    pub fn apply_client_id_override(&mut self, value: Option<String>) {
        if let Some(id) = value.filter(|v| !v.trim().is_empty()) {
            self.client_id = id.trim().to_string();
        }
    }

    /// Rejects values the monitor cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            bail!("client_id is empty; set it in the config file or via {CLIENT_ID_ENV}");
        }
        if self.app_marker.trim().is_empty() {
            bail!("app_marker is empty; every window title would match");
        }
        Ok(())
    }
}

/// Loads the config file at `path`, returning `Config::default()` if the file does not exist.
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_interval(ms: u64) -> Config {
        Config {
            poll_interval_ms: ms,
            ..Config::default()
        }
    }

    // ── defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn config_default_values() {
        let c = Config::default();
        assert_eq!(c.client_id, DEFAULT_CLIENT_ID);
        assert_eq!(c.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(c.app_marker, "FL Studio");
        assert_eq!(c.large_image, "flstudio10");
    }

    #[test]
    fn default_poll_interval_is_100ms() {
        assert_eq!(Config::default().poll_interval(), Duration::from_millis(100));
    }

    // ── poll_interval ─────────────────────────────────────────────────────────

    #[test]
    fn poll_interval_clamps_below_min() {
        assert_eq!(
            with_interval(0).poll_interval(),
            Duration::from_millis(MIN_POLL_INTERVAL_MS)
        );
    }

    #[test]
    fn poll_interval_clamps_above_max() {
        assert_eq!(
            with_interval(60_000).poll_interval(),
            Duration::from_millis(MAX_POLL_INTERVAL_MS)
        );
    }

    #[test]
    fn poll_interval_within_range_is_kept() {
        assert_eq!(with_interval(250).poll_interval(), Duration::from_millis(250));
    }

    // ── client id override ────────────────────────────────────────────────────

    #[test]
    fn client_id_override_replaces_value() {
        let mut c = Config::default();
        c.apply_client_id_override(Some(" 1234567890 ".to_string()));
        assert_eq!(c.client_id, "1234567890");
    }

    #[test]
    fn blank_client_id_override_is_ignored() {
        let mut c = Config::default();
        c.apply_client_id_override(Some("   ".to_string()));
        assert_eq!(c.client_id, DEFAULT_CLIENT_ID);
        c.apply_client_id_override(None);
        assert_eq!(c.client_id, DEFAULT_CLIENT_ID);
    }

    // ── validate ──────────────────────────────────────────────────────────────

    #[test]
    fn validate_accepts_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_client_id() {
        let c = Config {
            client_id: " ".to_string(),
            ..Config::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_marker() {
        let c = Config {
            app_marker: String::new(),
            ..Config::default()
        };
        assert!(c.validate().is_err());
    }

    // ── load_or_default ───────────────────────────────────────────────────────

    #[test]
    fn load_or_default_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nonexistent.toml");
        let config = load_or_default(&path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_or_default_parses_valid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
client_id = "998877665544332211"
poll_interval_ms = 500
app_marker = "FL Studio"
large_image = "fl21"
"#,
        )
        .unwrap();

        let config = load_or_default(&path).unwrap();
        assert_eq!(config.client_id, "998877665544332211");
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.app_marker, "FL Studio");
        assert_eq!(config.large_image, "fl21");
    }

    #[test]
    fn load_or_default_partial_toml_uses_field_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        // Only override one field; the rest should get their defaults.
        std::fs::write(&path, "client_id = \"42\"\n").unwrap();

        let config = load_or_default(&path).unwrap();
        assert_eq!(config.client_id, "42");
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(config.app_marker, DEFAULT_APP_MARKER);
        assert_eq!(config.large_image, DEFAULT_LARGE_IMAGE);
    }

    #[test]
    fn load_or_default_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is not valid toml ][[[").unwrap();
        assert!(load_or_default(&path).is_err());
    }

    #[test]
    fn load_or_default_wrong_type_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "poll_interval_ms = \"fast\"\n").unwrap();
        assert!(load_or_default(&path).is_err());
    }
}
