//! Application settings configuration.

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Terminal width (in columns) below which grids stop forcing menu
    /// state onto their editors.
    pub narrow_width: u16,
    /// Maximum width of a rendered grid.
    pub max_width: u16,
    /// Interval between tick events, in milliseconds.
    pub tick_rate_ms: u64,
    /// The UI theme to use.
    pub theme: String,
    /// Log filter directive, used when `RUST_LOG` is not set.
    pub log_filter: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            narrow_width: 45,
            max_width: 120,
            tick_rate_ms: 100,
            theme: "dark".to_string(),
            log_filter: None,
        }
    }
}

impl Settings {
    /// Validate these settings.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.max_width < 20 {
            return Err(ConfigError::ValidationError(format!(
                "max_width must be at least 20 (got {})",
                self.max_width
            )));
        }
        if self.narrow_width == 0 {
            return Err(ConfigError::ValidationError(
                "narrow_width cannot be 0".to_string(),
            ));
        }
        if self.tick_rate_ms == 0 {
            return Err(ConfigError::ValidationError(
                "tick_rate_ms cannot be 0".to_string(),
            ));
        }
        if self.theme.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "theme cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.narrow_width, 45);
        assert_eq!(settings.max_width, 120);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: Settings = toml::from_str("max_width = 80").unwrap();
        assert_eq!(settings.max_width, 80);
        assert_eq!(settings.tick_rate_ms, 100);
        assert_eq!(settings.theme, "dark");
    }

    #[test]
    fn test_validation_errors() {
        let narrow = Settings {
            max_width: 10,
            ..Settings::default()
        };
        assert!(matches!(
            narrow.validate(),
            Err(ConfigError::ValidationError(msg)) if msg.contains("max_width")
        ));

        let no_tick = Settings {
            tick_rate_ms: 0,
            ..Settings::default()
        };
        assert!(no_tick.validate().is_err());
    }
}
