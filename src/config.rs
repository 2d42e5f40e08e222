use anyhow::{Context, Result};
use plankit::{DeclarationPolicy, Dialect, EngineOptions, ReadinessConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::ClassifyArgs;

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(dir.join("plansum"))
}

/// Get the default config file path
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

// ============================================================================
// Config
// ============================================================================

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlansumConfig {
    pub readiness: ReadinessSection,
    pub classify: ClassifySection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessSection {
    pub interval_ms: u64,
    pub max_retry: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready_marker: Option<String>,
}

impl Default for ReadinessSection {
    fn default() -> Self {
        let defaults = ReadinessConfig::default();
        Self {
            interval_ms: defaults.interval.as_millis() as u64,
            max_retry: defaults.max_retry,
            ready_marker: None,
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifySection {
    pub dialect: Dialect,
    pub duplicate_declaration: DeclarationPolicy,
}

impl PlansumConfig {
    /// Load the config from `path`, or from the default location.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is
    /// an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path()?,
        };
        Self::load_from(&path)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid TOML format in {}", path.display()))
    }

    /// Serialize the effective config
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Apply command-line overrides to the classification settings
    pub fn apply_classify_args(&mut self, args: &ClassifyArgs) {
        if let Some(dialect) = args.dialect {
            self.classify.dialect = dialect.into();
        }
        if let Some(policy) = args.duplicate_declaration {
            self.classify.duplicate_declaration = policy.into();
        }
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            dialect: self.classify.dialect,
            declaration_policy: self.classify.duplicate_declaration,
        }
    }

    pub fn readiness_config(&self) -> ReadinessConfig {
        ReadinessConfig::new(
            Duration::from_millis(self.readiness.interval_ms),
            self.readiness.max_retry,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{DialectArg, PolicyArg};
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = PlansumConfig::load(Some(dir.path().join("nope.toml").as_path())).unwrap();

        assert_eq!(config.readiness.interval_ms, 500);
        assert_eq!(config.readiness.max_retry, 30);
        assert_eq!(config.classify.dialect, Dialect::Auto);
        assert_eq!(config.classify.duplicate_declaration, DeclarationPolicy::Last);
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[readiness]
max_retry = 5
ready_marker = "Job succeeded"

[classify]
duplicate_declaration = "reject"
"#,
        )
        .unwrap();

        let config = PlansumConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.readiness.interval_ms, 500);
        assert_eq!(config.readiness.max_retry, 5);
        assert_eq!(config.readiness.ready_marker.as_deref(), Some("Job succeeded"));
        assert_eq!(config.classify.dialect, Dialect::Auto);
        assert_eq!(config.classify.duplicate_declaration, DeclarationPolicy::Reject);
        assert_eq!(
            config.readiness_config(),
            ReadinessConfig::new(Duration::from_millis(500), 5)
        );
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[classify]\ndialect = \"klingon\"\n").unwrap();

        let err = PlansumConfig::load(Some(path.as_path())).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid TOML"));
    }

    #[test]
    fn test_classify_args_override() {
        let mut config = PlansumConfig::default();
        config.apply_classify_args(&ClassifyArgs {
            dialect: Some(DialectArg::Markup),
            duplicate_declaration: Some(PolicyArg::First),
        });

        let options = config.engine_options();
        assert_eq!(options.dialect, Dialect::Markup);
        assert_eq!(options.declaration_policy, DeclarationPolicy::First);
    }

    #[test]
    fn test_to_toml_round_trips() {
        let config = PlansumConfig::default();
        let text = config.to_toml().unwrap();
        let parsed: PlansumConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.readiness.max_retry, config.readiness.max_retry);
        assert!(text.contains("dialect = \"auto\""));
    }
}
