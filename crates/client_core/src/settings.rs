use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use pdf_export::DEFAULT_EXPORT_FILE_NAME;
use shared::domain::LayoutVariant;
use tracing::warn;
use url::Url;

use crate::error::ClientError;

pub const SETTINGS_FILE_NAME: &str = "story_writer.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub layout: LayoutVariant,
    pub export_path: PathBuf,
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:9000".into(),
            layout: LayoutVariant::Stacked,
            export_path: PathBuf::from(DEFAULT_EXPORT_FILE_NAME),
            request_timeout_secs: None,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Applies keys from a `story_writer.toml` document. Unknown keys and
    /// unparsable values are ignored with a warning.
    pub fn apply_file(&mut self, raw: &str) {
        let table = match raw.parse::<toml::Table>() {
            Ok(table) => table,
            Err(err) => {
                warn!("ignoring invalid {SETTINGS_FILE_NAME}: {err}");
                return;
            }
        };

        for (key, value) in &table {
            let text = match value {
                toml::Value::String(text) => text.clone(),
                toml::Value::Integer(number) => number.to_string(),
                other => {
                    warn!(key = %key, "ignoring non-scalar setting value: {other}");
                    continue;
                }
            };
            self.apply_value(key, &text);
        }
    }

    /// Applies environment overrides through `lookup`, so callers and tests
    /// can supply their own environment.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for (var, key) in [
            ("STORY_API_URL", "api_base_url"),
            ("APP__API_BASE_URL", "api_base_url"),
            ("APP__LAYOUT", "layout"),
            ("APP__EXPORT_PATH", "export_path"),
            ("APP__REQUEST_TIMEOUT_SECS", "request_timeout_secs"),
        ] {
            if let Some(value) = lookup(var) {
                self.apply_value(key, &value);
            }
        }
    }

    fn apply_value(&mut self, key: &str, value: &str) {
        let value = value.trim();
        match key {
            "api_base_url" => self.api_base_url = value.to_string(),
            "layout" => match value.parse::<LayoutVariant>() {
                Ok(layout) => self.layout = layout,
                Err(err) => warn!("{err}"),
            },
            "export_path" => {
                if !value.is_empty() {
                    self.export_path = PathBuf::from(value);
                }
            }
            "request_timeout_secs" => match value.parse::<u64>() {
                Ok(secs) => self.request_timeout_secs = Some(secs),
                Err(err) => warn!(value, "ignoring request_timeout_secs: {err}"),
            },
            other => warn!(key = other, "ignoring unknown setting"),
        }
    }
}

/// Defaults, then the settings file, then environment overrides.
///
/// The file is read from the working directory, falling back to
/// `<config dir>/story_writer/story_writer.toml`.
pub fn load_settings() -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Some(path) = settings_file_path() {
        match fs::read_to_string(&path) {
            Ok(raw) => settings.apply_file(&raw),
            Err(err) => warn!(path = %path.display(), "failed to read settings file: {err}"),
        }
    }

    settings.apply_env(|name| std::env::var(name).ok());
    settings
}

fn settings_file_path() -> Option<PathBuf> {
    let local = Path::new(SETTINGS_FILE_NAME);
    if local.exists() {
        return Some(local.to_path_buf());
    }

    dirs::config_dir()
        .map(|dir| dir.join("story_writer").join(SETTINGS_FILE_NAME))
        .filter(|path| path.exists())
}

/// Trims whitespace and trailing slashes and checks that the base URL is an
/// absolute http(s) URL.
pub fn normalize_base_url(raw: &str) -> Result<String, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: String| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let parsed = Url::parse(trimmed).map_err(|err| invalid(err.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
