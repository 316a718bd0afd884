use dashmap::DashMap;

use crate::form::dto::{Submission, Transition};

/// In-memory submissions keyed by Telegram user id. Nothing survives a restart.
#[derive(Default)]
pub struct FormStore {
    forms: DashMap<i64, Submission>,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh submission, dropping whatever the user had in progress.
    pub fn start(&self, user_id: i64) {
        self.forms.insert(user_id, Submission::default());
    }

    /// Runs `f` against the user's submission while holding its entry lock,
    /// so events from one user never interleave. A finalized transition drops
    /// the entry inside the same critical section. `None` when the user has no
    /// active submission.
    pub fn apply(
        &self,
        user_id: i64,
        f: impl FnOnce(&mut Submission) -> Transition,
    ) -> Option<Transition> {
        let mut outcome = None;
        self.forms.remove_if_mut(&user_id, |_, submission| {
            let transition = f(submission);
            let finished = transition.finalized.is_some();
            outcome = Some(transition);
            finished
        });
        outcome
    }

    pub fn get(&self, user_id: i64) -> Option<Submission> {
        self.forms.get(&user_id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, user_id: i64) -> bool {
        self.forms.contains_key(&user_id)
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}
