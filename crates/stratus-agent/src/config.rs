//! Agent Configuration
//!
//! Loaded from TOML. Every section and field is optional; anything missing
//! takes its default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use stratus_convergence::BackoffConfig;
use stratus_core::{GroupFilter, StratusError, StratusResult};

/// Environment variable overriding the storage root.
pub const STRATUS_PATH_ENV: &str = "STRATUS_PATH";

/// Resolve the directory holding Stratus state.
///
/// Priority:
/// 1. `$STRATUS_PATH/.stratus` if STRATUS_PATH is set
/// 2. `~/.stratus` (home directory)
/// 3. `./.stratus` (current directory fallback)
pub fn default_storage_path() -> PathBuf {
    std::env::var(STRATUS_PATH_ENV)
        .ok()
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".stratus")
}

/// `config.toml` inside [`default_storage_path`].
pub fn default_config_path() -> PathBuf {
    default_storage_path().join("config.toml")
}

/// Agent configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Convergence polling backoff
    pub backoff: BackoffSection,

    /// Log output
    pub logging: LoggingConfig,

    /// Which groups and port reachability checks consider
    pub reachability: ReachabilityConfig,
}

/// Backoff configuration, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffSection {
    /// Base delay in milliseconds
    pub base_ms: u64,

    /// Delay ceiling in milliseconds
    pub cap_ms: u64,

    /// Upper bound on the jitter exponent
    pub max_exponent: u32,

    /// Optional ceiling on fetches per poll; unset means only the cap ends a poll
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
}

impl BackoffSection {
    /// Convert to the scheduler's representation.
    pub fn to_backoff_config(&self) -> BackoffConfig {
        let mut config = BackoffConfig::new(
            Duration::from_millis(self.base_ms),
            Duration::from_millis(self.cap_ms),
        )
        .with_max_exponent(self.max_exponent);
        config.max_attempts = self.max_attempts;
        config
    }
}

impl Default for BackoffSection {
    fn default() -> Self {
        let defaults = BackoffConfig::default();
        Self {
            base_ms: u64::try_from(defaults.base.as_millis()).unwrap_or(u64::MAX),
            cap_ms: u64::try_from(defaults.cap.as_millis()).unwrap_or(u64::MAX),
            max_exponent: defaults.max_exponent,
            max_attempts: defaults.max_attempts,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,

    /// Colorize output
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi: true,
        }
    }
}

/// Reachability configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReachabilityConfig {
    /// Only consider these group ids (empty = all)
    pub group_ids: Vec<String>,

    /// Only consider these group names (empty = all)
    pub group_names: Vec<String>,

    /// Port checked by [`crate::ReachabilityService::check_probe_port`]
    pub probe_port: u16,
}

impl ReachabilityConfig {
    /// The group filter passed to the resource query.
    pub fn group_filter(&self) -> GroupFilter {
        GroupFilter {
            group_ids: self.group_ids.clone(),
            group_names: self.group_names.clone(),
        }
    }
}

impl Default for ReachabilityConfig {
    fn default() -> Self {
        Self {
            group_ids: Vec::new(),
            group_names: Vec::new(),
            probe_port: 22,
        }
    }
}

impl AgentConfig {
    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> StratusResult<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| StratusError::config(format!("Invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> StratusResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| StratusError::config(format!("Failed to serialize config: {e}")))
    }

    /// Load from `path`.
    pub fn load_from_path(path: &Path) -> StratusResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            StratusError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Load from `path`, or return defaults if it does not exist.
    pub fn load_or_default(path: &Path) -> StratusResult<Self> {
        if path.exists() {
            Self::load_from_path(path)
        } else {
            tracing::debug!(path = %path.display(), "No config file; using defaults");
            Ok(Self::default())
        }
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> StratusResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StratusError::config(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
        let text = self.to_toml_string()?;
        std::fs::write(path, text).map_err(|e| {
            StratusError::config(format!("Failed to write {}: {e}", path.display()))
        })
    }

    /// Reject values the services cannot run with.
    pub fn validate(&self) -> StratusResult<()> {
        self.backoff
            .to_backoff_config()
            .validate()
            .map_err(|e| StratusError::config(format!("[backoff] {}", e.message())))?;
        if self.logging.level.trim().is_empty() {
            return Err(StratusError::config("[logging] level must not be empty"));
        }
        Ok(())
    }

    /// Backoff used by [`crate::ResourceLifecycle`].
    pub fn backoff_config(&self) -> BackoffConfig {
        self.backoff.to_backoff_config()
    }
}
