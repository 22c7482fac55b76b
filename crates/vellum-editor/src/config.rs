//! Editor timing and layout configuration.
//!
//! Loaded from RON. Every field has a default, so a config file only needs
//! the values it overrides:
//!
//! ```ron
//! (
//!     sync_debounce_ms: 500,
//!     mobile_breakpoint_px: 640,
//! )
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::EditorError;

/// Quiet period before the manager emits the document to the form.
pub const DEFAULT_SYNC_DEBOUNCE_MS: u64 = 200;
/// Quiet period after typing before a surface reports its content.
pub const DEFAULT_INPUT_DEBOUNCE_MS: u64 = 300;
/// Delay after a native command before the surface reads its markup back.
pub const DEFAULT_COMMAND_SETTLE_MS: u64 = 50;
/// Viewports narrower than this use the mobile toolbar overlay.
pub const DEFAULT_MOBILE_BREAKPOINT_PX: u32 = 768;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub sync_debounce_ms: u64,
    pub input_debounce_ms: u64,
    pub command_settle_ms: u64,
    pub mobile_breakpoint_px: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            sync_debounce_ms: DEFAULT_SYNC_DEBOUNCE_MS,
            input_debounce_ms: DEFAULT_INPUT_DEBOUNCE_MS,
            command_settle_ms: DEFAULT_COMMAND_SETTLE_MS,
            mobile_breakpoint_px: DEFAULT_MOBILE_BREAKPOINT_PX,
        }
    }
}

impl EditorConfig {
    /// Parse a RON config. Missing fields take their defaults.
    pub fn from_ron_str(text: &str) -> Result<Self, EditorError> {
        Ok(ron::from_str(text)?)
    }

    /// Read and parse a RON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| EditorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron_str(&text)?;
        tracing::debug!(path = %path.display(), ?config, "loaded editor config");
        Ok(config)
    }

    pub fn sync_debounce(&self) -> Duration {
        Duration::from_millis(self.sync_debounce_ms)
    }

    pub fn input_debounce(&self) -> Duration {
        Duration::from_millis(self.input_debounce_ms)
    }

    pub fn command_settle(&self) -> Duration {
        Duration::from_millis(self.command_settle_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.sync_debounce(), Duration::from_millis(200));
        assert_eq!(config.input_debounce(), Duration::from_millis(300));
        assert_eq!(config.command_settle(), Duration::from_millis(50));
        assert_eq!(config.mobile_breakpoint_px, 768);
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = EditorConfig::from_ron_str("(sync_debounce_ms: 500)").unwrap();
        assert_eq!(config.sync_debounce_ms, 500);
        assert_eq!(config.input_debounce_ms, DEFAULT_INPUT_DEBOUNCE_MS);
    }

    #[test]
    fn test_bad_ron_is_an_error() {
        let err = EditorConfig::from_ron_str("(sync_debounce_ms: \"soon\")").unwrap_err();
        assert!(matches!(err, EditorError::Ron(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "(mobile_breakpoint_px: 640, command_settle_ms: 10)").unwrap();

        let config = EditorConfig::load(file.path()).unwrap();
        assert_eq!(config.mobile_breakpoint_px, 640);
        assert_eq!(config.command_settle_ms, 10);
    }

    #[test]
    fn test_load_missing_file() {
        let err = EditorConfig::load("/definitely/not/here.ron").unwrap_err();
        assert!(matches!(err, EditorError::Io { .. }));
    }
}
