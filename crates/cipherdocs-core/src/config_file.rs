use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub display: Option<DisplayConfig>,
    pub extraction: Option<ExtractionConfig>,
    pub output: Option<OutputConfig>,
    pub clipboard: Option<ClipboardConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub completion_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub download_dir: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardConfig {
    pub feedback_ms: Option<u64>,
}

/// Platform config directory path: `<config_dir>/cipherdocs/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cipherdocs").join("config.toml"))
}

/// Load config by cascading CWD `.cipherdocs.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".cipherdocs.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        display: Some(DisplayConfig {
            theme: overlay
                .display
                .as_ref()
                .and_then(|d| d.theme.clone())
                .or_else(|| base.display.as_ref().and_then(|d| d.theme.clone())),
        }),
        extraction: Some(ExtractionConfig {
            completion_delay_ms: overlay
                .extraction
                .as_ref()
                .and_then(|e| e.completion_delay_ms)
                .or_else(|| base.extraction.as_ref().and_then(|e| e.completion_delay_ms)),
        }),
        output: Some(OutputConfig {
            download_dir: overlay
                .output
                .as_ref()
                .and_then(|o| o.download_dir.clone())
                .or_else(|| base.output.as_ref().and_then(|o| o.download_dir.clone())),
        }),
        clipboard: Some(ClipboardConfig {
            feedback_ms: overlay
                .clipboard
                .as_ref()
                .and_then(|c| c.feedback_ms)
                .or_else(|| base.clipboard.as_ref().and_then(|c| c.feedback_ms)),
        }),
    }
}

/// Fully resolved settings used by the binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub theme: String,
    pub completion_delay: Duration,
    pub download_dir: PathBuf,
    pub copy_feedback: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "hacker".to_string(),
            completion_delay: Duration::from_millis(500),
            download_dir: PathBuf::from("."),
            copy_feedback: Duration::from_secs(2),
        }
    }
}

impl Settings {
    /// Resolve settings: env vars > config file > defaults.
    /// CLI flags are applied on top by the caller.
    pub fn resolve(file: &ConfigFile) -> Self {
        let env_theme = std::env::var("CIPHERDOCS_THEME").ok();
        let env_download_dir = std::env::var("CIPHERDOCS_DOWNLOAD_DIR").ok();
        Self::from_sources(file, env_theme, env_download_dir)
    }

    fn from_sources(
        file: &ConfigFile,
        env_theme: Option<String>,
        env_download_dir: Option<String>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            theme: env_theme
                .or_else(|| file.display.as_ref().and_then(|d| d.theme.clone()))
                .unwrap_or(defaults.theme),
            completion_delay: file
                .extraction
                .as_ref()
                .and_then(|e| e.completion_delay_ms)
                .map(Duration::from_millis)
                .unwrap_or(defaults.completion_delay),
            download_dir: env_download_dir
                .or_else(|| file.output.as_ref().and_then(|o| o.download_dir.clone()))
                .map(PathBuf::from)
                .unwrap_or(defaults.download_dir),
            copy_feedback: file
                .clipboard
                .as_ref()
                .and_then(|c| c.feedback_ms)
                .map(Duration::from_millis)
                .unwrap_or(defaults.copy_feedback),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_serialization() {
        let config = ConfigFile {
            display: Some(DisplayConfig {
                theme: Some("modern".to_string()),
            }),
            extraction: Some(ExtractionConfig {
                completion_delay_ms: Some(250),
            }),
            output: Some(OutputConfig {
                download_dir: Some("/tmp/out".to_string()),
            }),
            clipboard: None,
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_config_parses() {
        let parsed: ConfigFile = toml::from_str("[output]\ndownload_dir = \"out\"\n").unwrap();
        assert!(parsed.display.is_none());
        assert_eq!(parsed.output.unwrap().download_dir.as_deref(), Some("out"));
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            display: Some(DisplayConfig {
                theme: Some("hacker".to_string()),
            }),
            extraction: Some(ExtractionConfig {
                completion_delay_ms: Some(100),
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            display: Some(DisplayConfig {
                theme: Some("modern".to_string()),
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        assert_eq!(merged.display.unwrap().theme.as_deref(), Some("modern"));
        assert_eq!(merged.extraction.unwrap().completion_delay_ms, Some(100));
    }

    #[test]
    fn malformed_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display\ntheme = ").unwrap();
        assert!(load_from_path(&path).is_none());
    }

    #[test]
    fn settings_precedence() {
        let file = ConfigFile {
            display: Some(DisplayConfig {
                theme: Some("modern".to_string()),
            }),
            output: Some(OutputConfig {
                download_dir: Some("from-file".to_string()),
            }),
            clipboard: Some(ClipboardConfig {
                feedback_ms: Some(750),
            }),
            ..Default::default()
        };

        let s = Settings::from_sources(&file, None, Some("from-env".into()));
        assert_eq!(s.theme, "modern");
        assert_eq!(s.download_dir, PathBuf::from("from-env"));
        assert_eq!(s.copy_feedback, Duration::from_millis(750));
        assert_eq!(s.completion_delay, Duration::from_millis(500));

        let s = Settings::from_sources(&ConfigFile::default(), None, None);
        assert_eq!(s, Settings::default());
    }
}
