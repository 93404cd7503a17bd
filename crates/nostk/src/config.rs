//! Runtime configuration for the nostk CLI.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::Error;

/// Data directory name under `$HOME`.
pub const DEFAULT_DIR_NAME: &str = ".nostk";

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PUBLISH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NostkConfig {
    /// Directory holding keys, relay list, profile and custom emoji.
    pub home: PathBuf,

    /// Editor command for `editRelays` / `editProfile`.
    pub editor: Option<String>,

    pub connect_timeout: Duration,
    pub publish_timeout: Duration,
}

impl NostkConfig {
    /// Create configuration from environment variables.
    ///
    /// - `NOSTK_HOME` - data directory (default: `$HOME/.nostk`)
    /// - `EDITOR` - editor used by the edit commands
    /// - `NOSTK_CONNECT_TIMEOUT_SECS` - per-relay connect timeout (default: 10)
    /// - `NOSTK_PUBLISH_TIMEOUT_SECS` - per-relay publish timeout (default: 10)
    pub fn from_env() -> Result<Self, Error> {
        let home = match env::var("NOSTK_HOME") {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => {
                let home = env::var("HOME")
                    .ok()
                    .filter(|h| !h.is_empty())
                    .ok_or(Error::MissingEnv("HOME"))?;
                PathBuf::from(home).join(DEFAULT_DIR_NAME)
            }
        };

        let editor = env::var("EDITOR").ok().filter(|e| !e.trim().is_empty());

        let connect_timeout = env::var("NOSTK_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);

        let publish_timeout = env::var("NOSTK_PUBLISH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PUBLISH_TIMEOUT_SECS);

        Ok(Self {
            home,
            editor,
            connect_timeout: Duration::from_secs(connect_timeout),
            publish_timeout: Duration::from_secs(publish_timeout),
        })
    }

    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            editor: None,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            publish_timeout: Duration::from_secs(DEFAULT_PUBLISH_TIMEOUT_SECS),
        }
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = home.into();
        self
    }

    pub fn with_editor(mut self, editor: impl Into<String>) -> Self {
        self.editor = Some(editor.into());
        self
    }

    /// Use the same timeout for connecting and publishing.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self.publish_timeout = timeout;
        self
    }

    pub fn editor(&self) -> Result<&str, Error> {
        self.editor.as_deref().ok_or(Error::MissingEnv("EDITOR"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let config = NostkConfig::new("/tmp/a")
            .with_home("/tmp/b")
            .with_editor("vi")
            .with_timeout(Duration::from_secs(3));
        assert_eq!(config.home, PathBuf::from("/tmp/b"));
        assert_eq!(config.editor().unwrap(), "vi");
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.publish_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_missing_editor() {
        let config = NostkConfig::new("/tmp/a");
        assert!(matches!(config.editor(), Err(Error::MissingEnv("EDITOR"))));
    }
}
