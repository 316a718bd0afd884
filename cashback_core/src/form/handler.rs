use crate::admin::dto::AdminAction;
use crate::admin::handler::handle_admin_action;
use crate::config::FlowSettings;
use crate::form::dto::{CompletedSubmission, Effect, FormInput, Submitter};
use crate::form::helpers::{self, contact_link, greeting, render_admin_summary};
use crate::form::storage::FormStore;
use crate::form::wizard::advance;
use crate::gateway::{Gateway, ImageRef, Keyboard};
use crate::helpers::callback_data::CallbackPayload;

/// Drives the cashback form: owns the submissions and turns transitions into
/// gateway calls. Delivery failures are logged and never undo a state change.
pub struct FormFlow {
    store: FormStore,
    settings: FlowSettings,
}

impl FormFlow {
    pub fn new(settings: FlowSettings) -> Self {
        Self {
            store: FormStore::new(),
            settings,
        }
    }

    pub fn store(&self) -> &FormStore {
        &self.store
    }

    /// `/start`: greet the user and open a fresh submission.
    pub async fn start<G: Gateway + ?Sized>(
        &self,
        gateway: &G,
        user_id: i64,
        first_name: &str,
    ) {
        self.store.start(user_id);
        log::info!("User {} started a cashback form", user_id);

        let text = greeting(first_name, self.settings.announcement_channel.as_deref());
        match self.settings.promo_image_url.clone() {
            Some(url) => {
                self.run_effects(
                    gateway,
                    user_id,
                    vec![Effect::SendImages {
                        images: vec![ImageRef::Url(url)],
                        caption: Some(text),
                    }],
                )
                .await
            }
            None => self.run_effects(gateway, user_id, vec![Effect::text(text)]).await,
        }

        self.run_effects(
            gateway,
            user_id,
            vec![Effect::text_with_keyboard(
                helpers::CHOOSE_FROM_MENU,
                Keyboard::BracketChoice,
            )],
        )
        .await;
    }

    /// Feeds a message or form button to the submitter's form. Users without
    /// an active form are ignored.
    pub async fn handle_input<G: Gateway + ?Sized>(
        &self,
        gateway: &G,
        submitter: &Submitter,
        input: FormInput,
    ) {
        let settings = &self.settings;
        let Some(transition) = self
            .store
            .apply(submitter.user_id, |submission| advance(submission, input, settings))
        else {
            log::debug!(
                "Ignoring input from user {} without an active form",
                submitter.user_id
            );
            return;
        };

        self.run_effects(gateway, submitter.user_id, transition.effects)
            .await;

        if let Some(completed) = transition.finalized {
            self.notify_admin(gateway, submitter, &completed).await;
        }
    }

    /// Inline button press. Admin actions go to the admin handler, everything
    /// else is a form step. The press is always acknowledged.
    pub async fn handle_callback<G: Gateway + ?Sized>(
        &self,
        gateway: &G,
        query_id: &str,
        from: &Submitter,
        data: &str,
    ) {
        let payload = match data.parse::<CallbackPayload>() {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("User {} pressed a button with {}", from.user_id, e);
                acknowledge(gateway, query_id, None, false).await;
                return;
            }
        };

        if let Some(action) = AdminAction::from_payload(payload) {
            handle_admin_action(
                gateway,
                self.settings.admin_chat_id,
                query_id,
                from.user_id,
                action,
            )
            .await;
            return;
        }

        let input = match payload {
            CallbackPayload::ConfirmData => FormInput::Confirm,
            CallbackPayload::EditData => FormInput::Edit,
            other => match other.payout_method() {
                Some(method) => FormInput::ChoosePayout(method),
                None => {
                    acknowledge(gateway, query_id, None, false).await;
                    return;
                }
            },
        };

        self.handle_input(gateway, from, input).await;
        acknowledge(gateway, query_id, None, false).await;
    }

    /// Forwards a finished submission to the administrator: proof album with
    /// the summary as caption, then the action keyboard in its own message.
    pub async fn notify_admin<G: Gateway + ?Sized>(
        &self,
        gateway: &G,
        submitter: &Submitter,
        completed: &CompletedSubmission,
    ) {
        let admin = self.settings.admin_chat_id;
        let summary = render_admin_summary(completed);
        let keyboard = Keyboard::AdminActions {
            user_id: submitter.user_id,
            username: submitter.username.clone(),
        };

        log::info!(
            "Forwarding submission of user {} ({}) to admin: {}",
            submitter.user_id,
            contact_link(submitter),
            serde_json::to_string(completed).unwrap_or_default()
        );

        let effects = if completed.proof_images.is_empty() {
            vec![Effect::text_with_keyboard(summary, keyboard)]
        } else {
            vec![
                Effect::SendImages {
                    images: completed
                        .proof_images
                        .iter()
                        .cloned()
                        .map(ImageRef::FileId)
                        .collect(),
                    caption: Some(summary),
                },
                Effect::text_with_keyboard(helpers::SUBMISSION_ABOVE, keyboard),
            ]
        };

        self.run_effects(gateway, admin, effects).await;
    }

    async fn run_effects<G: Gateway + ?Sized>(
        &self,
        gateway: &G,
        chat_id: i64,
        effects: Vec<Effect>,
    ) {
        for effect in effects {
            let result = match effect {
                Effect::Send { text, keyboard } => {
                    gateway.send_text(chat_id, &text, keyboard).await
                }
                Effect::SendImages { images, caption } => {
                    gateway.send_image_batch(chat_id, images, caption).await
                }
            };
            if let Err(e) = result {
                log::error!("Failed to deliver message to chat {}: {}", chat_id, e);
            }
        }
    }
}

pub(crate) async fn acknowledge<G: Gateway + ?Sized>(
    gateway: &G,
    query_id: &str,
    text: Option<&str>,
    show_alert: bool,
) {
    if let Err(e) = gateway.acknowledge_action(query_id, text, show_alert).await {
        log::error!("Failed to answer callback query {}: {}", query_id, e);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::GatewayError;
    use crate::form::dto::Step;
    use async_trait::async_trait;
    use std::sync::Mutex;

    pub const ADMIN: i64 = 1000;
    pub const USER: i64 = 42;

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Sent {
        Text {
            chat_id: i64,
            text: String,
            keyboard: Option<Keyboard>,
        },
        Images {
            chat_id: i64,
            images: Vec<ImageRef>,
            caption: Option<String>,
        },
        Ack {
            action_id: String,
            text: Option<String>,
            show_alert: bool,
        },
    }

    /// Records every outbound call; optionally fails deliveries to one chat.
    /// Oversized texts and captions are rejected the way Telegram does.
    #[derive(Default)]
    pub struct RecordingGateway {
        pub sent: Mutex<Vec<Sent>>,
        pub failing_chat: Option<i64>,
    }

    impl RecordingGateway {
        pub fn take(&self) -> Vec<Sent> {
            std::mem::take(&mut *self.sent.lock().unwrap())
        }

        fn check(&self, chat_id: i64) -> Result<(), GatewayError> {
            if self.failing_chat == Some(chat_id) {
                return Err(GatewayError::Rejected("chat not found".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Gateway for RecordingGateway {
        async fn send_text(
            &self,
            chat_id: i64,
            text: &str,
            keyboard: Option<Keyboard>,
        ) -> Result<(), GatewayError> {
            self.check(chat_id)?;
            if text.chars().count() > 4096 {
                return Err(GatewayError::Rejected("message is too long".to_string()));
            }
            self.sent.lock().unwrap().push(Sent::Text {
                chat_id,
                text: text.to_string(),
                keyboard,
            });
            Ok(())
        }

        async fn send_image_batch(
            &self,
            chat_id: i64,
            images: Vec<ImageRef>,
            caption: Option<String>,
        ) -> Result<(), GatewayError> {
            self.check(chat_id)?;
            if caption.as_deref().is_some_and(|c| c.chars().count() > 1024) {
                return Err(GatewayError::Rejected("caption is too long".to_string()));
            }
            self.sent.lock().unwrap().push(Sent::Images {
                chat_id,
                images,
                caption,
            });
            Ok(())
        }

        async fn acknowledge_action(
            &self,
            action_id: &str,
            text: Option<&str>,
            show_alert: bool,
        ) -> Result<(), GatewayError> {
            self.sent.lock().unwrap().push(Sent::Ack {
                action_id: action_id.to_string(),
                text: text.map(str::to_string),
                show_alert,
            });
            Ok(())
        }
    }

    fn user() -> Submitter {
        Submitter {
            user_id: USER,
            username: Some("referral_user".to_string()),
        }
    }

    fn flow() -> FormFlow {
        FormFlow::new(FlowSettings::new(ADMIN))
    }

    async fn say(flow: &FormFlow, gateway: &RecordingGateway, text: &str) {
        flow.handle_input(gateway, &user(), FormInput::Text(text.to_string()))
            .await;
    }

    async fn press(flow: &FormFlow, gateway: &RecordingGateway, data: &str) {
        flow.handle_callback(gateway, "q1", &user(), data).await;
    }

    fn is_to_admin(sent: &Sent) -> bool {
        matches!(
            sent,
            Sent::Text { chat_id: ADMIN, .. } | Sent::Images { chat_id: ADMIN, .. }
        )
    }

    #[tokio::test]
    async fn test_end_to_end_card_submission() {
        let flow = flow();
        let gateway = RecordingGateway::default();

        flow.start(&gateway, USER, "Ann").await;
        let greeting = gateway.take();
        assert!(matches!(
            &greeting[0],
            Sent::Images { chat_id: USER, caption: Some(c), .. } if c.contains("Ann")
        ));
        assert!(matches!(
            &greeting[1],
            Sent::Text { keyboard: Some(Keyboard::BracketChoice), .. }
        ));

        say(&flow, &gateway, "от 500 до 1000 ₽").await;
        say(&flow, &gateway, "800").await;
        let sent = gateway.take();
        assert!(sent.iter().any(|s| matches!(
            s,
            Sent::Text { text, .. } if text.contains("Кэшбэк составит: 560 ₽")
        )));

        press(&flow, &gateway, "return_card").await;
        say(&flow, &gateway, "1111222233334444").await;
        say(&flow, &gateway, "Sber").await;
        say(&flow, &gateway, "123456").await;
        press(&flow, &gateway, "confirm_data").await;
        flow.handle_input(&gateway, &user(), FormInput::Photo("proof-1".to_string()))
            .await;
        gateway.take();

        flow.handle_input(&gateway, &user(), FormInput::Done).await;
        let sent = gateway.take();

        assert_eq!(
            sent[0],
            Sent::Text {
                chat_id: USER,
                text: helpers::THANK_YOU.to_string(),
                keyboard: None,
            }
        );
        let admin_messages: Vec<&Sent> = sent
            .iter()
            .filter(|s| is_to_admin(s))
            .collect();
        assert_eq!(admin_messages.len(), 2);
        match admin_messages[0] {
            Sent::Images { images, caption, .. } => {
                assert_eq!(images, &vec![ImageRef::FileId("proof-1".to_string())]);
                let caption = caption.as_deref().unwrap();
                assert!(caption.contains("Банк: Sber"));
                assert!(caption.contains("Номер карты: 1111222233334444"));
                assert!(caption.contains("Кэшбэк: 560 ₽"));
            }
            other => panic!("expected album, got {:?}", other),
        }
        assert_eq!(
            admin_messages[1],
            &Sent::Text {
                chat_id: ADMIN,
                text: helpers::SUBMISSION_ABOVE.to_string(),
                keyboard: Some(Keyboard::AdminActions {
                    user_id: USER,
                    username: Some("referral_user".to_string()),
                }),
            }
        );

        assert!(!flow.store().contains(USER));

        // Nothing happens for the same user until a new /start.
        say(&flow, &gateway, "от 500 до 1000 ₽").await;
        flow.handle_input(&gateway, &user(), FormInput::Done).await;
        assert!(gateway.take().is_empty());
    }

    #[tokio::test]
    async fn test_events_without_session_are_dropped() {
        let flow = flow();
        let gateway = RecordingGateway::default();

        say(&flow, &gateway, "800").await;
        flow.handle_input(&gateway, &user(), FormInput::Photo("f".to_string()))
            .await;
        assert!(gateway.take().is_empty());
        assert!(flow.store().is_empty());

        // button presses are still answered so the client stops spinning
        press(&flow, &gateway, "confirm_data").await;
        assert_eq!(
            gateway.take(),
            vec![Sent::Ack {
                action_id: "q1".to_string(),
                text: None,
                show_alert: false,
            }]
        );
        assert!(flow.store().is_empty());
    }

    #[tokio::test]
    async fn test_edit_restarts_from_bracket_keyboard() {
        let flow = flow();
        let gateway = RecordingGateway::default();
        flow.start(&gateway, USER, "Ann").await;
        say(&flow, &gateway, "1500+ ₽").await;
        say(&flow, &gateway, "2000").await;
        press(&flow, &gateway, "return_crypto").await;
        say(&flow, &gateway, "TRC20").await;
        say(&flow, &gateway, "TXabc").await;
        say(&flow, &gateway, "777").await;
        gateway.take();

        press(&flow, &gateway, "edit_data").await;
        let sent = gateway.take();
        assert_eq!(
            sent[0],
            Sent::Text {
                chat_id: USER,
                text: helpers::RESTART.to_string(),
                keyboard: Some(Keyboard::BracketChoice),
            }
        );
        let submission = flow.store().get(USER).unwrap();
        assert_eq!(submission.step, Step::SelectBracket);
        assert_eq!(submission.payout, None);
    }

    #[tokio::test]
    async fn test_failed_admin_delivery_still_clears_submission() {
        let flow = flow();
        let gateway = RecordingGateway {
            failing_chat: Some(ADMIN),
            ..Default::default()
        };
        flow.start(&gateway, USER, "Ann").await;
        for text in ["от 1001 до 1499 ₽", "1200"] {
            say(&flow, &gateway, text).await;
        }
        press(&flow, &gateway, "return_card").await;
        for text in ["1234567890123456", "Tinkoff", "55"] {
            say(&flow, &gateway, text).await;
        }
        press(&flow, &gateway, "confirm_data").await;
        flow.handle_input(&gateway, &user(), FormInput::Photo("p".to_string()))
            .await;
        flow.handle_input(&gateway, &user(), FormInput::Done).await;

        assert!(!flow.store().contains(USER));
        assert!(!gateway.take().iter().any(is_to_admin));
    }

    #[tokio::test]
    async fn test_huge_crypto_answers_never_reach_the_admin_caption() {
        let flow = flow();
        let gateway = RecordingGateway::default();
        let huge = "x".repeat(2100);

        flow.start(&gateway, USER, "Ann").await;
        say(&flow, &gateway, "1500+ ₽").await;
        say(&flow, &gateway, "2000").await;
        press(&flow, &gateway, "return_crypto").await;
        say(&flow, &gateway, &huge).await;
        say(&flow, &gateway, "TRC20").await;
        say(&flow, &gateway, &huge).await;
        say(&flow, &gateway, &"1".repeat(2100)).await;
        assert_eq!(flow.store().get(USER).unwrap().step, Step::EnterExternalId);
        gateway.take();

        say(&flow, &gateway, "1").await;
        let preview = gateway.take();
        assert!(matches!(
            &preview[0],
            Sent::Text { keyboard: Some(Keyboard::ConfirmOrEdit), .. }
        ));

        press(&flow, &gateway, "edit_data").await;
        say(&flow, &gateway, "1500+ ₽").await;
        say(&flow, &gateway, "2000").await;
        press(&flow, &gateway, "return_crypto").await;
        say(&flow, &gateway, &"n".repeat(helpers::MAX_ANSWER_CHARS)).await;
        say(&flow, &gateway, &"a".repeat(helpers::MAX_ANSWER_CHARS)).await;
        say(&flow, &gateway, "1").await;
        press(&flow, &gateway, "confirm_data").await;
        flow.handle_input(&gateway, &user(), FormInput::Photo("p".to_string()))
            .await;
        gateway.take();

        flow.handle_input(&gateway, &user(), FormInput::Done).await;
        let admin: Vec<Sent> = gateway.take().into_iter().filter(is_to_admin).collect();
        assert_eq!(admin.len(), 2);
        assert!(matches!(
            &admin[0],
            Sent::Images { caption: Some(c), .. } if c.contains("Сеть: nnn")
        ));
        assert!(!flow.store().contains(USER));
    }

    #[tokio::test]
    async fn test_start_without_promo_image_sends_plain_greeting() {
        let mut settings = FlowSettings::new(ADMIN);
        settings.promo_image_url = None;
        settings.announcement_channel = Some("@channel".to_string());
        let flow = FormFlow::new(settings);
        let gateway = RecordingGateway::default();

        flow.start(&gateway, USER, "Bob").await;
        let sent = gateway.take();
        assert!(matches!(
            &sent[0],
            Sent::Text { text, keyboard: None, .. } if text.contains("@channel")
        ));
        assert_eq!(sent.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_payload_is_acknowledged() {
        let flow = flow();
        let gateway = RecordingGateway::default();
        press(&flow, &gateway, "delete_file:1").await;
        assert_eq!(gateway.take().len(), 1);
    }
}
