use anyhow::Result;
use cashback_core::form::dto::FormInput;
use cashback_core::helpers::bot_commands::Command;
use teloxide::types::Message;

use crate::bot::handler::submitter_of;
use crate::dependencies::BotDependencies;

pub async fn answers(msg: Message, cmd: Command, bot_deps: BotDependencies) -> Result<()> {
    let Some(submitter) = submitter_of(&msg) else {
        return Ok(());
    };

    match cmd {
        Command::Start => {
            let first_name = msg
                .from
                .as_ref()
                .map(|user| user.first_name.clone())
                .unwrap_or_default();
            bot_deps
                .flow
                .start(&bot_deps.gateway, submitter.user_id, &first_name)
                .await;
        }
        Command::Done => {
            bot_deps
                .flow
                .handle_input(&bot_deps.gateway, &submitter, FormInput::Done)
                .await;
        }
    }

    Ok(())
}
