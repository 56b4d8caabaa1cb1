//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::{Config, KNOWN_PROVIDERS};

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.caption_max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "generation.caption_max_tokens must be > 0".into(),
            ));
        }
        if self.generation.description_max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "generation.description_max_tokens must be > 0".into(),
            ));
        }
        let temperature = self.generation.description_temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::ValidationError(
                "generation.description_temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.limits.llm_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.llm_timeout_ms must be > 0".into(),
            ));
        }
        if !KNOWN_PROVIDERS.contains(&self.llm.provider.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "llm.provider must be one of {}, got '{}'",
                KNOWN_PROVIDERS.join(", "),
                self.llm.provider
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_caption_tokens() {
        let mut config = Config::default();
        config.generation.caption_max_tokens = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("caption_max_tokens"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.limits.llm_timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("llm_timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_invalid_temperature() {
        let mut config = Config::default();
        config.generation.description_temperature = 2.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("description_temperature"));

        config.generation.description_temperature = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_provider() {
        let mut config = Config::default();
        config.llm.provider = "hal9000".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("hal9000"));
    }
}
