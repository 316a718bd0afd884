use std::sync::Arc;

use cashback_core::form::handler::FormFlow;

use crate::gateway::TelegramGateway;

#[derive(Clone)]
pub struct BotDependencies {
    pub flow: Arc<FormFlow>,
    pub gateway: TelegramGateway,
}
