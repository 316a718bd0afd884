use thiserror::Error;

/// Malformed answer to a form step. The user is re-prompted and the step stays put.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormInputError {
    #[error("amount is not a positive integer")]
    InvalidAmount,
    #[error("amount is outside of the selected deposit range")]
    AmountOutOfRange,
    #[error("card number must be exactly 16 digits")]
    InvalidCardNumber,
    #[error("external id must contain digits only")]
    InvalidExternalId,
    #[error("unknown deposit range: {0}")]
    UnknownBracket(String),
    #[error("answer is longer than {0} characters")]
    AnswerTooLong(usize),
}

/// Outbound delivery failure. Logged by the caller, never retried.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("telegram request failed: {0}")]
    Request(#[from] teloxide::RequestError),
    #[error("invalid url {0}")]
    InvalidUrl(String),
    #[error("gateway rejected the request: {0}")]
    Rejected(String),
}

/// Startup configuration problem. Fatal, the bot never starts dispatching.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}
