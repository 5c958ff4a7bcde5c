//! arielfw configuration
//!
//! Lives in /etc/arielfw/config.toml. Every field has a default, so a missing
//! file or a partial file is fine:
//!
//! ```toml
//! [log]
//! level = "info"
//!
//! [replies]
//! append_errno_detail = true
//! max_message_len = 4096
//! ```

use crate::error::ArielFwError;
use crate::reply::DEFAULT_MAX_MESSAGE_LEN;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// System configuration directory
pub const SYSTEM_CONFIG_DIR: &str = "/etc/arielfw";
const CONFIG_FILE: &str = "config.toml";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// How replies are built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyConfig {
    /// Append strerror text to errno-derived failure messages
    #[serde(default = "default_append_errno_detail")]
    pub append_errno_detail: bool,

    /// Longest message in bytes (valid: 64-65536)
    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,
}

fn default_append_errno_detail() -> bool {
    true
}

fn default_max_message_len() -> usize {
    DEFAULT_MAX_MESSAGE_LEN
}

impl ReplyConfig {
    /// max_message_len clamped to 64-65536
    pub fn effective_max_message_len(&self) -> usize {
        self.max_message_len.clamp(64, 65536)
    }

    pub fn max_message_len_was_clamped(&self) -> bool {
        self.max_message_len != self.effective_max_message_len()
    }
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            append_errno_detail: default_append_errno_detail(),
            max_message_len: default_max_message_len(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArielFwConfig {
    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub replies: ReplyConfig,
}

impl ArielFwConfig {
    /// Default config file location
    pub fn default_path() -> PathBuf {
        Path::new(SYSTEM_CONFIG_DIR).join(CONFIG_FILE)
    }

    pub fn parse(text: &str) -> Result<Self, ArielFwError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from `path`. A missing file gives the defaults; an unreadable or
    /// malformed file is an error.
    pub fn load(path: &Path) -> Result<Self, ArielFwError> {
        match fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::parse(&text).map_err(|e| {
                    ArielFwError::Config(format!("{}: {}", path.display(), e))
                })?;
                debug!(path = %path.display(), "Loaded config");
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn to_toml(&self) -> Result<String, ArielFwError> {
        toml::to_string_pretty(self).map_err(|e| ArielFwError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ArielFwConfig::default();
        assert_eq!(config.log.level, "info");
        assert!(config.replies.append_errno_detail);
        assert_eq!(config.replies.max_message_len, 4096);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = ArielFwConfig::parse("[replies]\nappend_errno_detail = false\n").unwrap();
        assert!(!config.replies.append_errno_detail);
        assert_eq!(config.replies.max_message_len, 4096);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_max_message_len_clamped() {
        let config = ArielFwConfig::parse("[replies]\nmax_message_len = 8\n").unwrap();
        assert_eq!(config.replies.effective_max_message_len(), 64);
        assert!(config.replies.max_message_len_was_clamped());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ArielFwConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ArielFwConfig::default());
    }

    #[test]
    fn test_load_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[log\nlevel = ").unwrap();
        let err = ArielFwConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ArielFwError::Config(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = ArielFwConfig::default();
        config.log.level = "debug".to_string();
        let text = config.to_toml().unwrap();
        assert_eq!(ArielFwConfig::parse(&text).unwrap(), config);
    }
}
