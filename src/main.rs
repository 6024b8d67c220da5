//! AsanaBuddy Telegram Bot
//!
//! Main application entry point

use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use teloxide::{prelude::*, types::{CallbackQuery, Update}};
use teloxide::dispatching::UpdateHandler;
use teloxide::update_listeners::webhooks;
use tracing::{info, warn, error};
use url::Url;

use AsanaBuddy::{
    config::Settings,
    utils::logging,
    services::ServiceFactory,
    state::SessionStore,
    handlers::{Command, handle_command, handle_callback_query, handle_message},
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;
    settings.validate().context("Invalid configuration")?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", AsanaBuddy::info());

    let store = SessionStore::new();
    let services = ServiceFactory::new(settings.clone(), store.clone())?;
    info!(catalog = %settings.catalog.url, "Services initialized");

    let bot = Bot::new(&settings.bot.token);

    let mut dispatcher = Dispatcher::builder(bot.clone(), create_handler())
        .dependencies(dptree::deps![Arc::new(services), store])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("An error has occurred in the dispatcher"))
        .enable_ctrlc_handler()
        .build();

    match &settings.bot.webhook_url {
        Some(webhook_url) => {
            let addr: SocketAddr = settings.bot.listen_addr.parse().context("Invalid listen address")?;
            let url = Url::parse(&format!(
                "{}{}",
                webhook_url.trim_end_matches('/'),
                settings.bot.webhook_path
            ))?;

            info!(url = %url, addr = %addr, "Starting bot with webhook...");
            let listener = webhooks::axum(bot, webhooks::Options::new(addr, url)).await?;
            dispatcher
                .dispatch_with_listener(listener, LoggingErrorHandler::with_custom_text("An error from the update listener"))
                .await;
        }
        None => {
            info!("Starting bot with polling mode...");
            dispatcher.dispatch().await;
        }
    }

    info!("AsanaBuddy bot has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        .branch(Update::filter_message()
            .branch(
                // Handle commands
                dptree::entry()
                    .filter_command::<Command>()
                    .endpoint(handle_commands)
            )
            .branch(
                // Handle free-text input
                dptree::endpoint(handle_messages)
            )
        )
        .branch(
            // Handle callback queries
            Update::filter_callback_query()
                .endpoint(handle_callbacks)
        )
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: Arc<ServiceFactory>,
    store: SessionStore,
) -> HandlerResult {
    if let Err(e) = handle_command(bot, msg, cmd, services, store).await {
        error!(error = %e, severity = %e.severity(), "Error handling command");
        return Err(e.into());
    }

    Ok(())
}

/// Handle regular messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    services: Arc<ServiceFactory>,
    store: SessionStore,
) -> HandlerResult {
    if let Err(e) = handle_message(bot, msg, services, store).await {
        error!(error = %e, severity = %e.severity(), "Error handling message");
        return Err(e.into());
    }

    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(
    bot: Bot,
    query: CallbackQuery,
    services: Arc<ServiceFactory>,
    store: SessionStore,
) -> HandlerResult {
    let user_id = query.from.id.0 as i64;

    if let Err(e) = handle_callback_query(bot, query, services, store).await {
        error!(user_id = user_id, error = %e, severity = %e.severity(), "Error handling callback query");
        return Err(e.into());
    }

    Ok(())
}
