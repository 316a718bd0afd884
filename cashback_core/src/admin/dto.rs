use crate::helpers::callback_data::CallbackPayload;

/// Buttons under a forwarded submission. Both carry the submitter's user id
/// and never touch form state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdminAction {
    Reply(i64),
    MarkPaid(i64),
}

impl AdminAction {
    pub fn from_payload(payload: CallbackPayload) -> Option<Self> {
        match payload {
            CallbackPayload::Reply(user_id) => Some(AdminAction::Reply(user_id)),
            CallbackPayload::Paid(user_id) => Some(AdminAction::MarkPaid(user_id)),
            _ => None,
        }
    }

    pub fn target_user(&self) -> i64 {
        match self {
            AdminAction::Reply(user_id) | AdminAction::MarkPaid(user_id) => *user_id,
        }
    }
}
