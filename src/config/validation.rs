//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use url::Url;
use crate::utils::errors::{AsanaBuddyError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_catalog_config(&settings.catalog)?;
    validate_media_config(&settings.media)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(AsanaBuddyError::Config(
            "Bot token is required".to_string()
        ));
    }

    if let Some(ref webhook_url) = config.webhook_url {
        Url::parse(webhook_url)?;

        if !config.webhook_path.starts_with('/') {
            return Err(AsanaBuddyError::Config(
                "Webhook path must start with '/'".to_string()
            ));
        }

        if config.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(AsanaBuddyError::Config(
                format!("Invalid listen address: {}", config.listen_addr)
            ));
        }
    }

    Ok(())
}

/// Validate catalog store configuration
fn validate_catalog_config(config: &super::CatalogConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(AsanaBuddyError::Config(
            "Catalog URL is required".to_string()
        ));
    }
    Url::parse(&config.url)?;

    if config.api_key.is_empty() {
        return Err(AsanaBuddyError::Config(
            "Catalog API key is required".to_string()
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(AsanaBuddyError::Config(
            "Catalog timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate media configuration
fn validate_media_config(config: &super::MediaConfig) -> Result<()> {
    for image in [
        &config.primary_series_image,
        &config.intermediate_series_image,
        &config.advanced_series_image,
        &config.mixed_series_image,
        &config.wishes_base_url,
        &config.donate_url,
    ] {
        Url::parse(image)?;
    }

    if config.perfect_videos.is_empty() {
        return Err(AsanaBuddyError::Config(
            "At least one celebration video must be configured".to_string()
        ));
    }
    for video in &config.perfect_videos {
        Url::parse(video)?;
    }

    if config.wishes_count == 0 {
        return Err(AsanaBuddyError::Config(
            "Wishes count must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(AsanaBuddyError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(AsanaBuddyError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.bot.token = "12345:test_token".to_string();
        settings.catalog.api_key = "anon-key".to_string();
        settings
    }

    #[test]
    fn test_default_settings_with_credentials_are_valid() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_missing_token_is_rejected() {
        let mut settings = valid_settings();
        settings.bot.token.clear();
        assert_matches!(validate_settings(&settings), Err(AsanaBuddyError::Config(_)));
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        let mut settings = valid_settings();
        settings.catalog.api_key.clear();
        assert_matches!(validate_settings(&settings), Err(AsanaBuddyError::Config(_)));
    }

    #[test]
    fn test_bad_catalog_url_is_rejected() {
        let mut settings = valid_settings();
        settings.catalog.url = "not a url".to_string();
        assert_matches!(validate_settings(&settings), Err(AsanaBuddyError::UrlParse(_)));
    }

    #[test]
    fn test_webhook_path_must_be_absolute() {
        let mut settings = valid_settings();
        settings.bot.webhook_url = Some("https://bot.example.com".to_string());
        settings.bot.webhook_path = "webhook".to_string();
        assert_matches!(validate_settings(&settings), Err(AsanaBuddyError::Config(_)));
    }

    #[test]
    fn test_empty_video_pool_is_rejected() {
        let mut settings = valid_settings();
        settings.media.perfect_videos.clear();
        assert_matches!(validate_settings(&settings), Err(AsanaBuddyError::Config(_)));
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let mut settings = valid_settings();
        settings.logging.level = "verbose".to_string();
        assert_matches!(validate_settings(&settings), Err(AsanaBuddyError::Config(_)));
    }
}
