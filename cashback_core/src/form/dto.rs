use serde::{Deserialize, Serialize};

use crate::calculator::dto::BracketChoice;
use crate::gateway::{ImageRef, Keyboard};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    SelectBracket,
    EnterAmount,
    SelectPayoutMethod,
    EnterCardNumber,
    EnterBankName,
    EnterCryptoNetwork,
    EnterCryptoAddress,
    EnterExternalId,
    AwaitConfirmation,
    CollectProofImages,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayoutMethod {
    Card,
    Crypto,
}

/// Payout destination while it is being collected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayoutDetails {
    Card {
        card_number: Option<String>,
        bank_name: Option<String>,
    },
    Crypto {
        network: Option<String>,
        address: Option<String>,
    },
}

impl PayoutDetails {
    pub fn empty(method: PayoutMethod) -> Self {
        match method {
            PayoutMethod::Card => PayoutDetails::Card {
                card_number: None,
                bank_name: None,
            },
            PayoutMethod::Crypto => PayoutDetails::Crypto {
                network: None,
                address: None,
            },
        }
    }
}

/// One user's in-progress answers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub step: Step,
    pub bracket: Option<BracketChoice>,
    pub deposit_amount: Option<u64>,
    pub cashback: Option<u64>,
    pub payout: Option<PayoutDetails>,
    pub external_id: Option<String>,
    pub proof_images: Vec<String>,
}

impl Default for Submission {
    fn default() -> Self {
        Self {
            step: Step::SelectBracket,
            bracket: None,
            deposit_amount: None,
            cashback: None,
            payout: None,
            external_id: None,
            proof_images: Vec::new(),
        }
    }
}

impl Submission {
    /// Freezes the answers into a [`CompletedSubmission`]. `None` while any
    /// field demanded by the payout variant is missing or no proof image has
    /// been collected yet.
    pub fn complete(&self) -> Option<CompletedSubmission> {
        let payout = match self.payout.as_ref()? {
            PayoutDetails::Card {
                card_number,
                bank_name,
            } => Payout::Card {
                card_number: card_number.clone()?,
                bank_name: bank_name.clone()?,
            },
            PayoutDetails::Crypto { network, address } => Payout::Crypto {
                network: network.clone()?,
                address: address.clone()?,
            },
        };

        if self.proof_images.is_empty() {
            return None;
        }

        Some(CompletedSubmission {
            bracket: self.bracket.clone()?,
            deposit_amount: self.deposit_amount?,
            cashback: self.cashback?,
            payout,
            external_id: self.external_id.clone()?,
            proof_images: self.proof_images.clone(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payout {
    Card {
        card_number: String,
        bank_name: String,
    },
    Crypto {
        network: String,
        address: String,
    },
}

/// A fully validated submission, the only shape the admin notifier accepts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedSubmission {
    pub bracket: BracketChoice,
    pub deposit_amount: u64,
    pub cashback: u64,
    pub payout: Payout,
    pub external_id: String,
    pub proof_images: Vec<String>,
}

/// Who filled the form, used for the admin's contact link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submitter {
    pub user_id: i64,
    pub username: Option<String>,
}

/// An inbound event already mapped out of the transport's message types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormInput {
    Text(String),
    /// File id of the largest size of a photo.
    Photo(String),
    /// The `/done` command.
    Done,
    /// Anything else: documents, stickers, voice, ...
    Other,
    ChoosePayout(PayoutMethod),
    Confirm,
    Edit,
}

/// Side effect requested by a transition, executed after the store entry is
/// released.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Send {
        text: String,
        keyboard: Option<Keyboard>,
    },
    SendImages {
        images: Vec<ImageRef>,
        caption: Option<String>,
    },
}

impl Effect {
    pub fn text(text: impl Into<String>) -> Self {
        Effect::Send {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn text_with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Effect::Send {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

/// Result of feeding one input to a submission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transition {
    pub effects: Vec<Effect>,
    /// Set when the form is complete and must leave the store.
    pub finalized: Option<CompletedSubmission>,
}

impl Transition {
    pub fn effects(effects: Vec<Effect>) -> Self {
        Self {
            effects,
            finalized: None,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}
