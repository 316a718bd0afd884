//! Telegram implementation of the outbound [`Gateway`].

use async_trait::async_trait;
use cashback_core::error::GatewayError;
use cashback_core::form::dto::Submitter;
use cashback_core::form::helpers::contact_link;
use cashback_core::form::wizard::bracket_labels;
use cashback_core::gateway::{Gateway, ImageRef, Keyboard};
use cashback_core::helpers::callback_data::CallbackPayload;
use reqwest::Url;
use teloxide::{
    prelude::*,
    types::{
        CallbackQueryId, FileId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile,
        InputMedia, InputMediaPhoto, KeyboardButton, KeyboardMarkup, ReplyMarkup,
    },
};

/// Telegram rejects albums with more than ten items.
const MAX_ALBUM_SIZE: usize = 10;

#[derive(Clone)]
pub struct TelegramGateway {
    bot: Bot,
}

impl TelegramGateway {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        image: &ImageRef,
        caption: Option<String>,
    ) -> Result<(), GatewayError> {
        let request = self.bot.send_photo(chat_id, input_file(image)?);
        match caption {
            Some(caption) => request.caption(caption).await?,
            None => request.await?,
        };
        Ok(())
    }
}

#[async_trait]
impl Gateway for TelegramGateway {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<(), GatewayError> {
        let request = self.bot.send_message(ChatId(chat_id), text);
        match keyboard {
            Some(keyboard) => request.reply_markup(render_keyboard(&keyboard)?).await?,
            None => request.await?,
        };
        Ok(())
    }

    async fn send_image_batch(
        &self,
        chat_id: i64,
        images: Vec<ImageRef>,
        caption: Option<String>,
    ) -> Result<(), GatewayError> {
        let chat_id = ChatId(chat_id);
        let mut caption = caption;

        if images.is_empty() {
            if let Some(caption) = caption {
                self.bot.send_message(chat_id, caption).await?;
            }
            return Ok(());
        }

        for chunk in images.chunks(MAX_ALBUM_SIZE) {
            // a one-item album is not allowed, fall back to a single photo
            if let [image] = chunk {
                self.send_photo(chat_id, image, caption.take()).await?;
                continue;
            }

            let mut media = Vec::with_capacity(chunk.len());
            for image in chunk {
                let mut photo = InputMediaPhoto::new(input_file(image)?);
                if let Some(caption) = caption.take() {
                    photo = photo.caption(caption);
                }
                media.push(InputMedia::Photo(photo));
            }
            self.bot.send_media_group(chat_id, media).await?;
        }

        Ok(())
    }

    async fn acknowledge_action(
        &self,
        action_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<(), GatewayError> {
        let mut request = self
            .bot
            .answer_callback_query(CallbackQueryId(action_id.to_string()));
        if let Some(text) = text {
            request = request.text(text);
        }
        request.show_alert(show_alert).await?;
        Ok(())
    }
}

fn input_file(image: &ImageRef) -> Result<InputFile, GatewayError> {
    match image {
        ImageRef::Url(url) => Url::parse(url)
            .map(InputFile::url)
            .map_err(|_| GatewayError::InvalidUrl(url.clone())),
        ImageRef::FileId(id) => Ok(InputFile::file_id(FileId(id.clone()))),
    }
}

pub fn render_keyboard(keyboard: &Keyboard) -> Result<ReplyMarkup, GatewayError> {
    let markup: ReplyMarkup = match keyboard {
        Keyboard::BracketChoice => KeyboardMarkup::new(
            bracket_labels()
                .into_iter()
                .map(|label| vec![KeyboardButton::new(label)]),
        )
        .resize_keyboard()
        .one_time_keyboard()
        .into(),
        Keyboard::PayoutChoice => InlineKeyboardMarkup::new(vec![vec![
            InlineKeyboardButton::callback(
                "Карта 💳",
                CallbackPayload::ReturnCard.to_string(),
            ),
            InlineKeyboardButton::callback(
                "Крипта ₿",
                CallbackPayload::ReturnCrypto.to_string(),
            ),
        ]])
        .into(),
        Keyboard::ConfirmOrEdit => InlineKeyboardMarkup::new(vec![vec![
            InlineKeyboardButton::callback(
                "✅ Всё верно",
                CallbackPayload::ConfirmData.to_string(),
            ),
            InlineKeyboardButton::callback(
                "✏ Изменить",
                CallbackPayload::EditData.to_string(),
            ),
        ]])
        .into(),
        Keyboard::AdminActions { user_id, username } => {
            let link = contact_link(&Submitter {
                user_id: *user_id,
                username: username.clone(),
            });
            let url = Url::parse(&link).map_err(|_| GatewayError::InvalidUrl(link.clone()))?;
            InlineKeyboardMarkup::new(vec![
                vec![InlineKeyboardButton::url("Перейти в чат с пользователем", url)],
                vec![InlineKeyboardButton::callback(
                    "Написать пользователю",
                    CallbackPayload::Reply(*user_id).to_string(),
                )],
                vec![InlineKeyboardButton::callback(
                    "Оплатил ✅",
                    CallbackPayload::Paid(*user_id).to_string(),
                )],
            ])
            .into()
        }
    };
    Ok(markup)
}
