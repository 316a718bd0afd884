use std::env;

use crate::error::ConfigError;

const DEFAULT_PROMO_IMAGE_URL: &str = "https://i.ibb.co/N2VP8zjx/promo.webp";
const DEFAULT_INSTRUCTION_IMAGE_URLS: [&str; 2] = [
    "https://i.ibb.co/JwNNpKVR/trans.webp",
    "https://i.ibb.co/s9t2MBK8/profile.webp",
];

/// Knobs the conversation flow reads at runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowSettings {
    pub admin_chat_id: i64,
    /// Reject deposit ranges that are not one of the keyboard labels instead
    /// of carrying them through as "unknown".
    pub strict_bracket_selection: bool,
    pub promo_image_url: Option<String>,
    pub instruction_image_urls: Vec<String>,
    pub announcement_channel: Option<String>,
}

impl FlowSettings {
    pub fn new(admin_chat_id: i64) -> Self {
        Self {
            admin_chat_id,
            strict_bracket_selection: false,
            promo_image_url: Some(DEFAULT_PROMO_IMAGE_URL.to_string()),
            instruction_image_urls: DEFAULT_INSTRUCTION_IMAGE_URLS
                .iter()
                .map(|u| u.to_string())
                .collect(),
            announcement_channel: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BotConfig {
    pub token: String,
    pub flow: FlowSettings,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = env::var("TELOXIDE_TOKEN")
            .or_else(|_| env::var("TELEGRAM"))
            .map_err(|_| ConfigError::Missing("TELOXIDE_TOKEN"))?;
        if token.trim().is_empty() {
            return Err(ConfigError::Missing("TELOXIDE_TOKEN"));
        }

        let admin_raw =
            env::var("ADMIN_CHAT_ID").map_err(|_| ConfigError::Missing("ADMIN_CHAT_ID"))?;
        let admin_chat_id = admin_raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ConfigError::Invalid {
                name: "ADMIN_CHAT_ID",
                value: admin_raw.clone(),
            })?;

        let mut flow = FlowSettings::new(admin_chat_id);

        if let Ok(raw) = env::var("STRICT_BRACKET_SELECTION") {
            flow.strict_bracket_selection = parse_bool("STRICT_BRACKET_SELECTION", &raw)?;
        }
        if let Ok(url) = env::var("PROMO_IMAGE_URL") {
            flow.promo_image_url = non_empty(url);
        }
        if let Ok(urls) = env::var("INSTRUCTION_IMAGE_URLS") {
            flow.instruction_image_urls = urls
                .split(',')
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(str::to_string)
                .collect();
        }
        flow.announcement_channel = env::var("ANNOUNCEMENT_CHANNEL").ok().and_then(non_empty);

        Ok(Self { token, flow })
    }
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: raw.to_string(),
        }),
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
