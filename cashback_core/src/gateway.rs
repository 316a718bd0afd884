//! Narrow outbound interface to the chat platform.
//!
//! The form flow only ever talks to Telegram through [`Gateway`], which keeps
//! the conversation logic testable without a live bot.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Keyboards the flow can attach to a text message. The transport decides
/// how each one is rendered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Keyboard {
    /// One-time reply keyboard with the deposit range labels.
    BracketChoice,
    /// Inline card / crypto buttons.
    PayoutChoice,
    /// Inline confirm / edit buttons under the preview.
    ConfirmOrEdit,
    /// Inline administrator actions for a forwarded submission.
    AdminActions {
        user_id: i64,
        username: Option<String>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageRef {
    Url(String),
    FileId(String),
}

#[async_trait]
pub trait Gateway: Send + Sync {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<(), GatewayError>;

    /// Sends the images as one album, `caption` goes on the first image.
    async fn send_image_batch(
        &self,
        chat_id: i64,
        images: Vec<ImageRef>,
        caption: Option<String>,
    ) -> Result<(), GatewayError>;

    async fn acknowledge_action(
        &self,
        action_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<(), GatewayError>;
}
