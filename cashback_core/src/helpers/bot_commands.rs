use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "Start (or restart) the cashback form.")]
    Start,
    #[command(description = "Finish sending deposit screenshots.")]
    Done,
}
