pub mod bot_commands;
pub mod callback_data;
