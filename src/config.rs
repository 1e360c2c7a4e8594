use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Error;
use crate::model::operation::Operation;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    jira: TrackerConfig,
}

/// Jira connection and workflow settings.
///
/// Empty strings stand for absent values; which fields must be present
/// depends on the operation, see [`TrackerConfig::validate`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Jira host without scheme, e.g. `acme.atlassian.net`
    pub url: String,
    pub project_id: String,
    /// Prefix of issue keys, e.g. `ADA` in `ADA-122`
    pub project_key: String,
    pub user_email: String,
    pub user_token: String,
    /// Status an issue must be in before it may move to Done
    pub ready_for_release_status_name: String,
    pub done_transition_id: String,
    pub released_to_staging_transition_id: String,
    pub timeout_secs: Option<u64>,
}

impl TrackerConfig {
    /// Overlay values from the environment on top of `self`. Set variables win.
    pub fn merge_env<F>(mut self, lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields: [(&str, &mut String); 8] = [
            ("JIRA_URL", &mut self.url),
            ("JIRA_PROJECT_ID", &mut self.project_id),
            ("JIRA_PROJECT_KEY", &mut self.project_key),
            ("JIRA_USER_EMAIL", &mut self.user_email),
            ("JIRA_USER_TOKEN", &mut self.user_token),
            (
                "JIRA_READY_FOR_RELEASE_STATUS_NAME",
                &mut self.ready_for_release_status_name,
            ),
            ("JIRA_DONE_TRANSITION_ID", &mut self.done_transition_id),
            (
                "JIRA_RELEASED_ON_STAGING_TRANSITION_ID",
                &mut self.released_to_staging_transition_id,
            ),
        ];
        for (var, slot) in fields {
            if let Some(value) = lookup(var) {
                *slot = value;
            }
        }

        if let Some(raw) = lookup("JIRA_TIMEOUT_SECS").filter(|v| !v.trim().is_empty()) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    Error::InvalidConfig(format!(
                        "JIRA_TIMEOUT_SECS must be a positive number of seconds, got '{raw}'"
                    ))
                })?;
            self.timeout_secs = Some(secs);
        }

        Ok(self)
    }

    /// Check that every field `operation` needs is present.
    ///
    /// Reports the first missing field by its environment variable name.
    pub fn validate(&self, operation: Operation) -> Result<(), Error> {
        let mut required: Vec<(&'static str, &str)> = vec![
            ("JIRA_URL", self.url.as_str()),
            ("JIRA_PROJECT_ID", self.project_id.as_str()),
            ("JIRA_PROJECT_KEY", self.project_key.as_str()),
            ("JIRA_USER_EMAIL", self.user_email.as_str()),
            ("JIRA_USER_TOKEN", self.user_token.as_str()),
        ];
        match operation {
            Operation::Verify => {
                required.push((
                    "JIRA_READY_FOR_RELEASE_STATUS_NAME",
                    self.ready_for_release_status_name.as_str(),
                ));
                required.push(("JIRA_DONE_TRANSITION_ID", self.done_transition_id.as_str()));
            }
            Operation::Release => {
                required.push((
                    "JIRA_RELEASED_ON_STAGING_TRANSITION_ID",
                    self.released_to_staging_transition_id.as_str(),
                ));
            }
        }

        match required.into_iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(Error::MissingConfig { field }),
            None => Ok(()),
        }
    }

    /// `https://<url>` unless the configured value already carries a scheme.
    pub fn base_url(&self) -> String {
        let url = self.url.trim().trim_end_matches('/');
        if url.starts_with("https://") || url.starts_with("http://") {
            url.to_string()
        } else {
            format!("https://{url}")
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn has_staging_transition(&self) -> bool {
        !self.released_to_staging_transition_id.trim().is_empty()
    }
}

fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".jira-release")
        .join("config.toml")
}

fn load_file(path: &Path) -> Result<TrackerConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let file: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(file.jira)
}

/// Read the config file and apply `JIRA_*` environment overrides.
///
/// The default file is optional; an explicitly given path must exist.
pub fn load_config(path: Option<&Path>) -> Result<TrackerConfig> {
    let file = match path {
        Some(path) => load_file(path)?,
        None => {
            let default = config_path();
            if default.exists() {
                load_file(&default)?
            } else {
                TrackerConfig::default()
            }
        }
    };
    let config = file.merge_env(|var| std::env::var(var).ok())?;
    Ok(config)
}
