use anyhow::Result;
use cashback_core::form::dto::{FormInput, Submitter};
use teloxide::types::Message;

use crate::dependencies::BotDependencies;

pub fn submitter_of(msg: &Message) -> Option<Submitter> {
    let user = msg.from.as_ref()?;
    Some(Submitter {
        user_id: user.id.0 as i64,
        username: user.username.clone(),
    })
}

/// Maps a Telegram message onto a form input. Photos use their largest size.
pub fn classify(msg: &Message) -> FormInput {
    if let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) {
        return FormInput::Photo(photo.file.id.to_string());
    }
    match msg.text() {
        Some(text) => FormInput::Text(text.to_string()),
        None => FormInput::Other,
    }
}

pub async fn handle_message(msg: Message, bot_deps: BotDependencies) -> Result<()> {
    let Some(submitter) = submitter_of(&msg) else {
        return Ok(());
    };

    bot_deps
        .flow
        .handle_input(&bot_deps.gateway, &submitter, classify(&msg))
        .await;
    Ok(())
}
