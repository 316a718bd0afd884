mod bot;
mod callbacks;
mod dependencies;
mod gateway;

use std::sync::Arc;

use cashback_core::config::BotConfig;
use cashback_core::form::handler::FormFlow;
use cashback_core::helpers::bot_commands::Command;
use teloxide::{error_handlers::LoggingErrorHandler, prelude::*, utils::command::BotCommands};

use crate::bot::handler_tree::handler_tree;
use crate::dependencies::BotDependencies;
use crate::gateway::TelegramGateway;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();
    log::info!("Starting cashback_bot...");

    let config = BotConfig::from_env()?;
    log::info!(
        "Submissions will be forwarded to admin {} (strict bracket selection: {})",
        config.flow.admin_chat_id,
        config.flow.strict_bracket_selection
    );

    let bot = Bot::new(config.token.clone());

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let bot_deps = BotDependencies {
        flow: Arc::new(FormFlow::new(config.flow)),
        gateway: TelegramGateway::new(bot.clone()),
    };

    Dispatcher::builder(bot, handler_tree())
        .dependencies(dptree::deps![bot_deps])
        .default_handler(|update| async move {
            log::debug!("Unhandled update: {:?}", update.kind);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
