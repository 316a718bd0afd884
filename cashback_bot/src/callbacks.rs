//! Callback query handling for cashback_bot.

use anyhow::Result;
use cashback_core::form::dto::Submitter;
use teloxide::types::CallbackQuery;

use crate::dependencies::BotDependencies;

pub async fn handle_callback_query(query: CallbackQuery, bot_deps: BotDependencies) -> Result<()> {
    let data = query.data.as_deref().unwrap_or("");
    let from = Submitter {
        user_id: query.from.id.0 as i64,
        username: query.from.username.clone(),
    };

    bot_deps
        .flow
        .handle_callback(&bot_deps.gateway, &query.id.to_string(), &from, data)
        .await;
    Ok(())
}
