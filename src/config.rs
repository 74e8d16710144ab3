use crate::error::{DemoError, DemoResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const ENV_PUBLISHABLE_KEY: &str = "GEOTRACK_PUBLISHABLE_KEY";
pub const ENV_USER_ID: &str = "GEOTRACK_USER_ID";

/// Demo shell configuration
///
/// Every field is optional in the JSON file; missing ones take the defaults
/// below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Key passed to the SDK on initialize. Empty means "not configured",
    /// which the SDK reports on the first track request.
    pub publishable_key: String,
    pub user_id: Option<String>,
    /// Post a notification for asynchronous errors instead of only logging
    pub notify_errors: bool,
    pub notify_client_locations: bool,
    /// Append the SDK's confidence to event text
    pub include_confidence: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            publishable_key: String::new(),
            user_id: None,
            notify_errors: true,
            notify_client_locations: false,
            include_confidence: false,
        }
    }
}

impl DemoConfig {
    /// Read a JSON config file
    pub fn load(path: &Path) -> DemoResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            DemoError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&contents)
            .map_err(|e| DemoError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Load from `path` when given, defaults otherwise, then apply the
    /// process environment.
    pub fn resolve(path: Option<&Path>) -> DemoResult<Self> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(config.with_overrides(|name| std::env::var(name).ok()))
    }

    /// Apply `GEOTRACK_*` overrides from `lookup`; blank values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_PUBLISHABLE_KEY).filter(|v| !v.trim().is_empty()) {
            self.publishable_key = key;
        }
        if let Some(user_id) = lookup(ENV_USER_ID).filter(|v| !v.trim().is_empty()) {
            self.user_id = Some(user_id);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"publishable_key": "prj_test_pk_123"}}"#).unwrap();

        let config = DemoConfig::load(file.path()).unwrap();
        assert_eq!(config.publishable_key, "prj_test_pk_123");
        assert_eq!(config.user_id, None);
        assert!(config.notify_errors);
        assert!(!config.include_confidence);
    }

    #[test]
    fn test_bad_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = DemoConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, DemoError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = DemoConfig::load(Path::new("/nonexistent/geotrack.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn test_env_overrides() {
        let config = DemoConfig::default().with_overrides(|name| match name {
            ENV_PUBLISHABLE_KEY => Some("prj_live_pk".to_string()),
            ENV_USER_ID => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.publishable_key, "prj_live_pk");
        assert_eq!(config.user_id, None);
    }
}
