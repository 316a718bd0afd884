//! Pure step transitions of the cashback form.
//!
//! [`advance`] mutates a [`Submission`] in place and describes what should be
//! sent back, without touching the network.

use crate::calculator::dto::{Bracket, BracketChoice};
use crate::calculator::handler::{calculate_cashback, parse_amount};
use crate::config::FlowSettings;
use crate::error::FormInputError;
use crate::form::dto::{
    Effect, FormInput, PayoutDetails, PayoutMethod, Step, Submission, Transition,
};
use crate::form::helpers::{
    self, amount_accepted, bracket_selected, input_error_message, render_preview,
    validate_card_number, validate_external_id, validate_free_text,
};
use crate::gateway::{ImageRef, Keyboard};

pub fn advance(
    submission: &mut Submission,
    input: FormInput,
    settings: &FlowSettings,
) -> Transition {
    match (submission.step, input) {
        (Step::SelectBracket, FormInput::Text(text)) => {
            select_bracket(submission, &text, settings)
        }
        (Step::EnterAmount, FormInput::Text(text)) => enter_amount(submission, &text),
        (Step::EnterCardNumber, FormInput::Text(text)) => match validate_card_number(&text) {
            Ok(card_number) => {
                let payout = submission.payout.as_mut();
                if let Some(PayoutDetails::Card { card_number: slot, .. }) = payout {
                    *slot = Some(card_number);
                }
                submission.step = Step::EnterBankName;
                Transition::effects(vec![Effect::text(helpers::ENTER_BANK_NAME)])
            }
            Err(err) => reject(&err),
        },
        (Step::EnterBankName, FormInput::Text(text)) => match validate_free_text(&text) {
            Ok(name) => {
                if let Some(PayoutDetails::Card { bank_name, .. }) = submission.payout.as_mut() {
                    *bank_name = Some(name);
                }
                submission.step = Step::EnterExternalId;
                Transition::effects(vec![Effect::text(helpers::ENTER_EXTERNAL_ID)])
            }
            Err(err) => reject(&err),
        },
        (Step::EnterCryptoNetwork, FormInput::Text(text)) => match validate_free_text(&text) {
            Ok(value) => {
                if let Some(PayoutDetails::Crypto { network, .. }) = submission.payout.as_mut() {
                    *network = Some(value);
                }
                submission.step = Step::EnterCryptoAddress;
                Transition::effects(vec![Effect::text(helpers::ENTER_CRYPTO_ADDRESS)])
            }
            Err(err) => reject(&err),
        },
        (Step::EnterCryptoAddress, FormInput::Text(text)) => match validate_free_text(&text) {
            Ok(value) => {
                if let Some(PayoutDetails::Crypto { address, .. }) = submission.payout.as_mut() {
                    *address = Some(value);
                }
                submission.step = Step::EnterExternalId;
                Transition::effects(vec![Effect::text(helpers::ENTER_EXTERNAL_ID)])
            }
            Err(err) => reject(&err),
        },
        (Step::EnterExternalId, FormInput::Text(text)) => match validate_external_id(&text) {
            Ok(id) => {
                submission.external_id = Some(id);
                submission.step = Step::AwaitConfirmation;
                Transition::effects(vec![Effect::text_with_keyboard(
                    render_preview(submission),
                    Keyboard::ConfirmOrEdit,
                )])
            }
            Err(err) => reject(&err),
        },

        (Step::SelectPayoutMethod, FormInput::ChoosePayout(method)) => {
            choose_payout(submission, method)
        }
        (Step::AwaitConfirmation, FormInput::Confirm) => {
            submission.step = Step::CollectProofImages;
            Transition::effects(vec![instructions(settings)])
        }
        (Step::AwaitConfirmation, FormInput::Edit) => {
            *submission = Submission::default();
            Transition::effects(vec![Effect::text_with_keyboard(
                helpers::RESTART,
                Keyboard::BracketChoice,
            )])
        }

        (Step::CollectProofImages, FormInput::Photo(file_id)) => {
            submission.proof_images.push(file_id);
            if submission.proof_images.len() == 1 {
                Transition::effects(vec![Effect::text(helpers::FIRST_PHOTO_RECEIVED)])
            } else {
                Transition::none()
            }
        }
        (Step::CollectProofImages, FormInput::Done) => match submission.complete() {
            Some(completed) => Transition {
                effects: vec![Effect::text(helpers::THANK_YOU)],
                finalized: Some(completed),
            },
            None if submission.proof_images.is_empty() => {
                Transition::effects(vec![Effect::text(helpers::NO_PHOTOS)])
            }
            None => {
                log::error!(
                    "Submission reached the proof step with missing fields: {:?}",
                    submission
                );
                Transition::none()
            }
        },

        // Buttons from an old message that no longer match the current step.
        (_, FormInput::ChoosePayout(_) | FormInput::Confirm | FormInput::Edit) => {
            Transition::none()
        }

        (Step::CollectProofImages, _) => {
            Transition::effects(vec![Effect::text(helpers::PHOTOS_NOT_FILES)])
        }
        (Step::SelectPayoutMethod, _) => Transition::effects(vec![Effect::text_with_keyboard(
            helpers::CHOOSE_PAYOUT,
            Keyboard::PayoutChoice,
        )]),
        (Step::AwaitConfirmation, _) => {
            Transition::effects(vec![Effect::text(helpers::USE_BUTTONS)])
        }

        // Photos, stickers or /done where a typed answer is expected.
        (step, _) => Transition::effects(vec![current_prompt(submission, step)]),
    }
}

fn select_bracket(submission: &mut Submission, text: &str, settings: &FlowSettings) -> Transition {
    let choice = BracketChoice::parse(text);

    if let BracketChoice::Unknown(label) = &choice {
        if settings.strict_bracket_selection || validate_free_text(label).is_err() {
            let err = FormInputError::UnknownBracket(label.clone());
            return Transition::effects(vec![Effect::text_with_keyboard(
                input_error_message(&err),
                Keyboard::BracketChoice,
            )]);
        }
        log::warn!("Accepting unknown deposit range label: {:?}", label);
    }

    let reply = bracket_selected(&choice);
    submission.bracket = Some(choice);
    submission.step = Step::EnterAmount;
    Transition::effects(vec![Effect::text(reply)])
}

fn enter_amount(submission: &mut Submission, text: &str) -> Transition {
    let Some(choice) = submission.bracket.as_ref() else {
        return reject(&FormInputError::AmountOutOfRange);
    };

    let result = parse_amount(text).and_then(|amount| {
        calculate_cashback(choice, amount).map(|cashback| (amount, cashback))
    });

    match result {
        Ok((amount, cashback)) => {
            submission.deposit_amount = Some(amount);
            submission.cashback = Some(cashback);
            submission.step = Step::SelectPayoutMethod;
            Transition::effects(vec![
                Effect::text(amount_accepted(cashback)),
                Effect::text_with_keyboard(helpers::CHOOSE_PAYOUT, Keyboard::PayoutChoice),
            ])
        }
        Err(err) => reject(&err),
    }
}

fn choose_payout(submission: &mut Submission, method: PayoutMethod) -> Transition {
    submission.payout = Some(PayoutDetails::empty(method));
    let prompt = match method {
        PayoutMethod::Card => {
            submission.step = Step::EnterCardNumber;
            helpers::ENTER_CARD_NUMBER
        }
        PayoutMethod::Crypto => {
            submission.step = Step::EnterCryptoNetwork;
            helpers::ENTER_CRYPTO_NETWORK
        }
    };
    Transition::effects(vec![Effect::text(prompt)])
}

fn instructions(settings: &FlowSettings) -> Effect {
    if settings.instruction_image_urls.is_empty() {
        return Effect::text(helpers::PROOF_INSTRUCTIONS);
    }
    Effect::SendImages {
        images: settings
            .instruction_image_urls
            .iter()
            .cloned()
            .map(ImageRef::Url)
            .collect(),
        caption: Some(helpers::PROOF_INSTRUCTIONS.to_string()),
    }
}

fn reject(err: &FormInputError) -> Transition {
    Transition::effects(vec![Effect::text(input_error_message(err))])
}

fn current_prompt(submission: &Submission, step: Step) -> Effect {
    match step {
        Step::SelectBracket => {
            Effect::text_with_keyboard(helpers::CHOOSE_FROM_MENU, Keyboard::BracketChoice)
        }
        Step::EnterAmount => match submission.bracket.as_ref() {
            Some(choice) => Effect::text(bracket_selected(choice)),
            None => Effect::text(input_error_message(&FormInputError::InvalidAmount)),
        },
        Step::EnterCardNumber => Effect::text(helpers::ENTER_CARD_NUMBER),
        Step::EnterBankName => Effect::text(helpers::ENTER_BANK_NAME),
        Step::EnterCryptoNetwork => Effect::text(helpers::ENTER_CRYPTO_NETWORK),
        Step::EnterCryptoAddress => Effect::text(helpers::ENTER_CRYPTO_ADDRESS),
        Step::EnterExternalId => Effect::text(helpers::ENTER_EXTERNAL_ID),
        Step::SelectPayoutMethod | Step::AwaitConfirmation => Effect::text(helpers::USE_BUTTONS),
        Step::CollectProofImages => Effect::text(helpers::PHOTOS_NOT_FILES),
    }
}

/// Labels for the bracket reply keyboard, in display order.
pub fn bracket_labels() -> Vec<&'static str> {
    Bracket::ALL.iter().map(|b| b.label()).collect()
}
