use std::sync::LazyLock;

use regex::Regex;

use crate::calculator::dto::BracketChoice;
use crate::error::FormInputError;
use crate::form::dto::{CompletedSubmission, Payout, PayoutDetails, Submission, Submitter};

// \d matches any Unicode digit in the regex crate, card and ID digits are ASCII only.
static CARD_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{16}$").expect("card number pattern"));
static EXTERNAL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("external id pattern"));

/// Longest free-text answer kept in a submission. Keeps the admin caption
/// under Telegram's 1024 character limit.
pub const MAX_ANSWER_CHARS: usize = 64;

pub const CHOOSE_FROM_MENU: &str = "👇 из меню ниже:";
pub const CHOOSE_PAYOUT: &str = "Куда хотите возврат?";
pub const ENTER_CARD_NUMBER: &str = "Введите номер карты (16 цифр):";
pub const ENTER_BANK_NAME: &str = "Введите название банка:";
pub const ENTER_CRYPTO_NETWORK: &str = "Выберите сеть для USDT (например: TRC20, ERC20, BSC):";
pub const ENTER_CRYPTO_ADDRESS: &str = "Введите адрес кошелька:";
pub const ENTER_EXTERNAL_ID: &str = "Введите ваше ID:";
pub const RESTART: &str = "Хорошо, давайте начнём заново.\nВыберите, какой депозит вы закинули:";
pub const CHOOSE_BRACKET_AGAIN: &str =
    "Пожалуйста, выберите диапазон депозита кнопкой из меню ниже:";
pub const USE_BUTTONS: &str = "Пожалуйста, используйте кнопки под сообщением выше.";
pub const FIRST_PHOTO_RECEIVED: &str =
    "Фото получено! Пришлите ещё или напишите /done, когда закончите.";
pub const NO_PHOTOS: &str = "Вы не отправили ни одного фото.";
pub const PHOTOS_NOT_FILES: &str = "Пожалуйста, отправьте скрины как фото, а не как файл.";
pub const THANK_YOU: &str = "Спасибо! Ваша заявка отправлена на проверку.";
pub const SUBMISSION_ABOVE: &str = "⬆️ Заявка выше";
pub const PROOF_INSTRUCTIONS: &str = "Пришлите 2 скрина:
1. Профиль — где видно ваш ID и баланс.
2. История транзакций — вкладка \"Депозиты\", где отображается пополнение.

Скрины нужны для подтверждения депозита по моей рефке.";

pub fn validate_card_number(text: &str) -> Result<String, FormInputError> {
    if CARD_NUMBER_RE.is_match(text) {
        Ok(text.to_string())
    } else {
        Err(FormInputError::InvalidCardNumber)
    }
}

pub fn validate_external_id(text: &str) -> Result<String, FormInputError> {
    let text = validate_free_text(text)?;
    if EXTERNAL_ID_RE.is_match(&text) {
        Ok(text)
    } else {
        Err(FormInputError::InvalidExternalId)
    }
}

/// Bank name, network, address: anything goes as long as it fits.
pub fn validate_free_text(text: &str) -> Result<String, FormInputError> {
    if text.chars().count() > MAX_ANSWER_CHARS {
        return Err(FormInputError::AnswerTooLong(MAX_ANSWER_CHARS));
    }
    Ok(text.to_string())
}

/// Friendly re-prompt for a rejected answer.
pub fn input_error_message(err: &FormInputError) -> &'static str {
    match err {
        FormInputError::InvalidAmount => "Введите корректную сумму (число).",
        FormInputError::AmountOutOfRange => {
            "Сумма не входит в выбранный диапазон. Введите корректное значение:"
        }
        FormInputError::InvalidCardNumber => "Неверный номер карты. Введите 16 цифр:",
        FormInputError::InvalidExternalId => {
            "❌ ID должен содержать только цифры. Введите корректный ID:"
        }
        FormInputError::UnknownBracket(_) => CHOOSE_BRACKET_AGAIN,
        FormInputError::AnswerTooLong(_) => {
            "Слишком длинный ответ (максимум 64 символа). Попробуйте ещё раз:"
        }
    }
}

pub fn greeting(first_name: &str, announcement_channel: Option<&str>) -> String {
    let mut text = format!(
        "👋Привет {} !\n\nЭто бот для кэшбека моим рефам. Следуй дальнейшим шагам, чтобы завершить проверку.",
        first_name
    );
    if let Some(channel) = announcement_channel {
        text.push_str(&format!("\n\n🎁 анонсы + розыгрыши --> {}", channel));
    }
    text.push_str("\n\nВыберите, какой депозит вы сделали:");
    text
}

pub fn bracket_selected(choice: &BracketChoice) -> String {
    format!(
        "Вы выбрали: {}\nКэшбэк для этого диапазона: {}\n\nВведите точную сумму вашего депозита:",
        choice.label(),
        choice.percent_display()
    )
}

pub fn amount_accepted(cashback: u64) -> String {
    format!(
        "✅ Сумма принята! Кэшбэк составит: {} ₽.\n\nТеперь выберите, куда хотите возврат:",
        cashback
    )
}

/// Preview shown to the user before confirmation.
pub fn render_preview(submission: &Submission) -> String {
    let amount = submission
        .deposit_amount
        .map(|a| a.to_string())
        .unwrap_or_default();
    let bracket = submission
        .bracket
        .as_ref()
        .map(|b| b.label().to_string())
        .unwrap_or_default();
    let cashback = submission.cashback.unwrap_or_default();

    let mut text = format!(
        "Проверьте введённые данные:\n\n💰 Депозит: {} ₽ ({})\n🎁 Кэшбэк: {} ₽\n💳 Тип возврата: ",
        amount, bracket, cashback
    );

    match &submission.payout {
        Some(PayoutDetails::Card {
            card_number,
            bank_name,
        }) => {
            text.push_str(&format!(
                "Карта\n🏦 Банк: {}\n🔢 Номер карты: {}\n",
                bank_name.as_deref().unwrap_or_default(),
                card_number.as_deref().unwrap_or_default()
            ));
        }
        Some(PayoutDetails::Crypto { network, address }) => {
            text.push_str(&format!(
                "Крипта\n🌐 Сеть: {}\n💼 Адрес: {}\n",
                network.as_deref().unwrap_or_default(),
                address.as_deref().unwrap_or_default()
            ));
        }
        None => text.push('\n'),
    }

    text.push_str(&format!(
        "👤 ID: {}\n\nЕсли всё верно — нажмите «Всё верно».\nЕсли нужно исправить — нажмите «Изменить».",
        submission.external_id.as_deref().unwrap_or_default()
    ));
    text
}

/// Summary forwarded to the administrator as the album caption.
pub fn render_admin_summary(submission: &CompletedSubmission) -> String {
    let method = match submission.payout {
        Payout::Card { .. } => "Карта",
        Payout::Crypto { .. } => "Крипта",
    };

    let mut text = format!(
        "Новая заявка:\nДепозит: {} ₽ ({})\nВозврат: {}\nКэшбэк: {} ₽\n",
        submission.deposit_amount,
        submission.bracket.label(),
        method,
        submission.cashback
    );

    match &submission.payout {
        Payout::Card {
            card_number,
            bank_name,
        } => text.push_str(&format!(
            "Банк: {}\nНомер карты: {}\n",
            bank_name, card_number
        )),
        Payout::Crypto { network, address } => {
            text.push_str(&format!("Сеть: {}\nАдрес: {}\n", network, address))
        }
    }

    text.push_str(&format!("ID: {}", submission.external_id));
    text
}

/// Link that opens a private chat with the submitter.
pub fn contact_link(submitter: &Submitter) -> String {
    match submitter.username.as_deref() {
        Some(username) if !username.is_empty() => format!("https://t.me/{}", username),
        _ => format!("tg://user?id={}", submitter.user_id),
    }
}
