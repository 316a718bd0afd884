use crate::dependencies::BotDependencies;
use anyhow::Result;
use cashback_core::helpers::bot_commands::Command;
use teloxide::{
    dispatching::{DpHandlerDescription, HandlerExt, UpdateFilterExt},
    dptree::{self, Handler},
    types::{CallbackQuery, Message, Update},
};

use crate::{bot::answers::answers, bot::handler::handle_message, callbacks::handle_callback_query};

pub fn handler_tree() -> Handler<'static, Result<()>, DpHandlerDescription> {
    dptree::entry()
        .branch(
            Update::filter_message()
                // The form only runs in private chats, where chat id == user id.
                .filter(|msg: Message| msg.chat.is_private())
                .branch(
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(answers),
                )
                .branch(dptree::entry().endpoint(handle_message)),
        )
        .branch(Update::filter_callback_query().endpoint(
            |query: CallbackQuery, bot_deps: BotDependencies| async move {
                handle_callback_query(query, bot_deps).await
            },
        ))
}
