//! Configuration validation

use crate::config::types::Settings;
use crate::error::{ConfigError, ConfigResult};

/// Validate loaded settings
pub fn validate_settings(settings: &Settings) -> ConfigResult<()> {
    if settings.sigils.is_empty() {
        return Err(ConfigError::Invalid(
            "sigils must contain at least one character".to_string(),
        ));
    }

    // a sigil made of whitespace or quotes could never survive tokenizing
    if let Some(c) = settings
        .sigils
        .chars()
        .find(|c| c.is_whitespace() || *c == '"' || *c == '\'' || c.is_alphanumeric())
    {
        return Err(ConfigError::Invalid(format!(
            "Invalid sigil character: {:?}",
            c
        )));
    }

    if settings.program.as_deref().is_some_and(|p| p.trim().is_empty()) {
        return Err(ConfigError::Invalid("program must not be blank".to_string()));
    }

    Ok(())
}
