use std::fmt;
use std::str::FromStr;

use crate::form::dto::PayoutMethod;

const RETURN_CARD: &str = "return_card";
const RETURN_CRYPTO: &str = "return_crypto";
const CONFIRM_DATA: &str = "confirm_data";
const EDIT_DATA: &str = "edit_data";
const REPLY_PREFIX: &str = "reply_";
const PAID_PREFIX: &str = "paid_";

/// Inline button payloads understood by the bot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackPayload {
    ReturnCard,
    ReturnCrypto,
    ConfirmData,
    EditData,
    Reply(i64),
    Paid(i64),
}

impl CallbackPayload {
    pub fn payout_method(&self) -> Option<PayoutMethod> {
        match self {
            CallbackPayload::ReturnCard => Some(PayoutMethod::Card),
            CallbackPayload::ReturnCrypto => Some(PayoutMethod::Crypto),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPayload(pub String);

impl fmt::Display for UnknownPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown callback payload: {}", self.0)
    }
}

impl std::error::Error for UnknownPayload {}

impl FromStr for CallbackPayload {
    type Err = UnknownPayload;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        match data {
            RETURN_CARD => return Ok(CallbackPayload::ReturnCard),
            RETURN_CRYPTO => return Ok(CallbackPayload::ReturnCrypto),
            CONFIRM_DATA => return Ok(CallbackPayload::ConfirmData),
            EDIT_DATA => return Ok(CallbackPayload::EditData),
            _ => {}
        }

        let parse_id = |raw: &str| {
            raw.parse::<i64>()
                .map_err(|_| UnknownPayload(data.to_string()))
        };

        if let Some(id) = data.strip_prefix(REPLY_PREFIX) {
            return Ok(CallbackPayload::Reply(parse_id(id)?));
        }
        if let Some(id) = data.strip_prefix(PAID_PREFIX) {
            return Ok(CallbackPayload::Paid(parse_id(id)?));
        }

        Err(UnknownPayload(data.to_string()))
    }
}

impl fmt::Display for CallbackPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackPayload::ReturnCard => f.write_str(RETURN_CARD),
            CallbackPayload::ReturnCrypto => f.write_str(RETURN_CRYPTO),
            CallbackPayload::ConfirmData => f.write_str(CONFIRM_DATA),
            CallbackPayload::EditData => f.write_str(EDIT_DATA),
            CallbackPayload::Reply(user_id) => write!(f, "{}{}", REPLY_PREFIX, user_id),
            CallbackPayload::Paid(user_id) => write!(f, "{}{}", PAID_PREFIX, user_id),
        }
    }
}
