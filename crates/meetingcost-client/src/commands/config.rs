//! Configuration commands.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Dump the current configuration to stdout.
pub fn dump(config: &ClientConfig) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", ClientConfig::default_path().display());
    println!("{}", toml_str);

    Ok(())
}

/// Validate the configuration.
///
/// Out-of-range values are not errors: they are listed along with the value
/// the session will actually use.
pub fn validate(config: &ClientConfig) -> ClientResult<()> {
    let adjustments = config.adjustments();
    for note in &adjustments {
        println!("note: {}", note);
    }

    if config.display.currency_symbol.chars().any(char::is_control) {
        return Err(ClientError::config(
            "display.currency_symbol must not contain control characters",
        ));
    }

    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path() -> ClientResult<()> {
    let config_path = ClientConfig::default_path();
    println!("config: {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn clamped_values_still_validate() {
        let mut config = ClientConfig::default();
        config.defaults.attendees = 500;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn control_characters_in_symbol_are_rejected() {
        let mut config = ClientConfig::default();
        config.display.currency_symbol = "\u{7}$".to_string();
        assert!(matches!(validate(&config), Err(ClientError::Config(_))));
    }

    #[test]
    fn default_config_dumps() {
        assert!(dump(&ClientConfig::default()).is_ok());
    }
}
