//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub catalog: CatalogConfig,
    pub media: MediaConfig,
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
    pub webhook_url: Option<String>,
    pub webhook_path: String,
    pub listen_addr: String,
}

/// Remote catalog store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Project base URL; the REST root lives under `/rest/v1`
    pub url: String,
    pub api_key: String,
    pub timeout_seconds: u64,
}

/// Static media shown around the flows
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    pub primary_series_image: String,
    pub intermediate_series_image: String,
    pub advanced_series_image: String,
    pub mixed_series_image: String,
    /// Celebratory videos for a perfect quiz round
    pub perfect_videos: Vec<String>,
    /// Base URL of the numbered relaxation wish cards (`{base}/{n}.png`)
    pub wishes_base_url: String,
    pub wishes_count: u32,
    pub donate_url: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the daily-rolling log file; stdout only when unset
    pub directory: Option<String>,
    pub json: bool,
}

const STORAGE_BASE: &str = "https://zhsqobhlvtarkksnwsfy.supabase.co/storage/v1/object/public";

impl Settings {
    /// Load settings from defaults, configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let defaults = Settings::default();

        let settings = config::Config::builder()
            .set_default("bot.token", defaults.bot.token)?
            .set_default("bot.webhook_path", defaults.bot.webhook_path)?
            .set_default("bot.listen_addr", defaults.bot.listen_addr)?
            .set_default("catalog.url", defaults.catalog.url)?
            .set_default("catalog.api_key", defaults.catalog.api_key)?
            .set_default("catalog.timeout_seconds", defaults.catalog.timeout_seconds)?
            .set_default("media.primary_series_image", defaults.media.primary_series_image)?
            .set_default("media.intermediate_series_image", defaults.media.intermediate_series_image)?
            .set_default("media.advanced_series_image", defaults.media.advanced_series_image)?
            .set_default("media.mixed_series_image", defaults.media.mixed_series_image)?
            .set_default("media.perfect_videos", defaults.media.perfect_videos)?
            .set_default("media.wishes_base_url", defaults.media.wishes_base_url)?
            .set_default("media.wishes_count", defaults.media.wishes_count)?
            .set_default("media.donate_url", defaults.media.donate_url)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.json", defaults.logging.json)?
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("ASANABUDDY")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("media.perfect_videos")
                    .try_parsing(true),
            )
            // Plain deployment variables win over everything else
            .set_override_option("bot.token", std::env::var("TELEGRAM_BOT_TOKEN").ok())?
            .set_override_option("bot.webhook_url", std::env::var("WEBHOOK_URL").ok())?
            .set_override_option("catalog.url", std::env::var("SUPABASE_URL").ok())?
            .set_override_option("catalog.api_key", std::env::var("SUPABASE_KEY").ok())?
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::AsanaBuddyError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
                webhook_url: None,
                webhook_path: "/webhook".to_string(),
                listen_addr: "0.0.0.0:8080".to_string(),
            },
            catalog: CatalogConfig {
                url: "https://zhsqobhlvtarkksnwsfy.supabase.co".to_string(),
                api_key: String::new(),
                timeout_seconds: 10,
            },
            media: MediaConfig {
                primary_series_image: format!("{}/Other/Primary.png", STORAGE_BASE),
                intermediate_series_image: format!("{}/Other/Intermediate.png", STORAGE_BASE),
                advanced_series_image: format!("{}/Other/Advanced2.png", STORAGE_BASE),
                mixed_series_image: format!("{}/Other/Primary.png", STORAGE_BASE),
                perfect_videos: vec![format!("{}/Other/IMG_4867.MP4", STORAGE_BASE)],
                wishes_base_url: format!("{}/Wishes", STORAGE_BASE),
                wishes_count: 11,
                donate_url: "https://pay.cloudtips.ru/p/6b21b46b".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: None,
                json: false,
            },
        }
    }
}
