//! TOML configuration.
//!
//! Every key is optional; missing keys take their defaults.
//!
//! ```toml
//! [format]
//! precision = 2
//! thousands_separator = true
//! currency_symbol = "$"
//!
//! [export]
//! directory = "exports"
//!
//! [display]
//! result_delay_ms = 0
//! width = 92
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use acct_core::FormatConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::display::Style;

const MAX_PRECISION: u32 = 10;
const MIN_WIDTH: usize = 40;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("precision {0} is out of range; expected 0 to 10")]
    InvalidPrecision(u32),

    #[error("display width {0} is too narrow; expected at least 40")]
    InvalidWidth(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Base directory workbooks are written under.
    pub directory: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("exports"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Pause before the results of a flow are printed.
    pub result_delay_ms: u64,
    pub width: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            result_delay_ms: 0,
            width: 92,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub format: FormatConfig,
    pub export: ExportSettings,
    pub display: DisplaySettings,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = toml::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), ?settings, "config loaded");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.format.precision > MAX_PRECISION {
            return Err(SettingsError::InvalidPrecision(self.format.precision));
        }
        if self.display.width < MIN_WIDTH {
            return Err(SettingsError::InvalidWidth(self.display.width));
        }
        Ok(())
    }

    pub fn result_delay(&self) -> Duration {
        Duration::from_millis(self.display.result_delay_ms)
    }

    pub fn style(
        &self,
        ansi: bool,
    ) -> Style {
        Style {
            width: self.display.width,
            ansi,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings: Settings = toml::from_str("").unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.format.precision, 2);
        assert_eq!(settings.export.directory, PathBuf::from("exports"));
        assert_eq!(settings.display.width, 92);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [format]
            precision = 4
            currency_symbol = "€"

            [display]
            result_delay_ms = 1500
            "#,
        )
        .unwrap();

        assert_eq!(settings.format.precision, 4);
        assert_eq!(settings.format.currency_symbol, "€");
        assert!(settings.format.thousands_separator);
        assert_eq!(settings.result_delay(), Duration::from_millis(1500));
        assert_eq!(settings.display.width, 92);
    }

    #[test]
    fn validate_rejects_precision_out_of_range() {
        let mut settings = Settings::default();
        settings.format.precision = 11;

        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidPrecision(11))
        ));
    }

    #[test]
    fn validate_rejects_narrow_width() {
        let mut settings = Settings::default();
        settings.display.width = 10;

        assert!(matches!(settings.validate(), Err(SettingsError::InvalidWidth(10))));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Settings::load(Path::new("/nonexistent/acct.toml")).unwrap_err();

        assert!(matches!(err, SettingsError::Read { .. }));
    }

    #[test]
    fn load_reports_parse_errors() {
        let path = std::env::temp_dir().join(format!("acct-settings-{}.toml", std::process::id()));
        fs::write(&path, "[format]\nprecision = \"two\"\n").unwrap();

        let err = Settings::load(&path).unwrap_err();

        assert!(matches!(err, SettingsError::Parse { .. }));
        let _ = fs::remove_file(&path);
    }
}
