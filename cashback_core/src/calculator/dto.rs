use serde::{Deserialize, Serialize};

/// Deposit range a user picks before entering the exact amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bracket {
    Low,
    Mid,
    High,
}

impl Bracket {
    pub const ALL: [Bracket; 3] = [Bracket::Low, Bracket::Mid, Bracket::High];

    /// Button label shown on the reply keyboard. This is also the only text
    /// accepted as a known bracket.
    pub fn label(&self) -> &'static str {
        match self {
            Bracket::Low => "от 500 до 1000 ₽",
            Bracket::Mid => "от 1001 до 1499 ₽",
            Bracket::High => "1500+ ₽",
        }
    }

    pub fn from_label(text: &str) -> Option<Bracket> {
        Bracket::ALL.into_iter().find(|b| b.label() == text.trim())
    }

    pub fn min_amount(&self) -> u64 {
        match self {
            Bracket::Low => 500,
            Bracket::Mid => 1001,
            Bracket::High => 1500,
        }
    }

    /// Inclusive upper bound, `None` for the open-ended top bracket.
    pub fn max_amount(&self) -> Option<u64> {
        match self {
            Bracket::Low => Some(1000),
            Bracket::Mid => Some(1499),
            Bracket::High => None,
        }
    }

    pub fn rate_percent(&self) -> u64 {
        match self {
            Bracket::Low => 70,
            Bracket::Mid => 50,
            Bracket::High => 30,
        }
    }

    pub fn cap(&self) -> Option<u64> {
        match self {
            Bracket::High => Some(1500),
            _ => None,
        }
    }

    pub fn contains(&self, amount: u64) -> bool {
        amount >= self.min_amount() && self.max_amount().map_or(true, |max| amount <= max)
    }

    pub fn percent_display(&self) -> String {
        match self.cap() {
            Some(cap) => format!("{}% (⚠ максимум {}₽)", self.rate_percent(), cap),
            None => format!("{}%", self.rate_percent()),
        }
    }
}

/// What the user actually answered at the bracket step. Unrecognised labels
/// are kept verbatim when strict selection is off.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BracketChoice {
    Known(Bracket),
    Unknown(String),
}

impl BracketChoice {
    pub fn parse(text: &str) -> Self {
        match Bracket::from_label(text) {
            Some(bracket) => BracketChoice::Known(bracket),
            None => BracketChoice::Unknown(text.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            BracketChoice::Known(bracket) => bracket.label(),
            BracketChoice::Unknown(text) => text,
        }
    }

    pub fn percent_display(&self) -> String {
        match self {
            BracketChoice::Known(bracket) => bracket.percent_display(),
            BracketChoice::Unknown(_) => "неизвестно".to_string(),
        }
    }
}
