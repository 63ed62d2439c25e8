use std::sync::Arc;

use crate::domain::{Outcome, SubmissionState, WaitlistEmail};
use crate::store::{StoreError, WaitlistStore};

pub type SharedStore = Arc<dyn WaitlistStore + Send + Sync>;

/// Runs a form submission against the store and turns whatever happens
/// into one of the fixed user-facing outcomes.
#[derive(Clone)]
pub struct WaitlistHandler {
    store: SharedStore,
    unique_violation_code: String,
}

impl WaitlistHandler {
    pub fn new(store: SharedStore, unique_violation_code: impl Into<String>) -> Self {
        Self {
            store,
            unique_violation_code: unique_violation_code.into(),
        }
    }

    /// One attempt, one call to the store. `loading` is back to false
    /// whichever way this returns.
    #[tracing::instrument(
        name = "Submitting a waitlist entry",
        skip(self, state),
        fields(waitlist_email = %state.email())
    )]
    pub async fn submit(&self, state: &mut SubmissionState) -> Outcome {
        let mut submission = state.begin();
        let outcome = match WaitlistEmail::parse(submission.email()) {
            Ok(email) => match self.store.insert_waitlist_entry(&email).await {
                Ok(()) => Outcome::Joined,
                Err(e) => self.classify(&e),
            },
            Err(e) => {
                tracing::warn!("Refusing to submit: {}", e);
                Outcome::Rejected
            }
        };
        submission.settle(outcome);
        outcome
    }

    fn classify(&self, err: &StoreError) -> Outcome {
        if err.code() == Some(self.unique_violation_code.as_str()) {
            tracing::info!("Address is already on the waitlist");
            Outcome::AlreadyJoined
        } else {
            tracing::error!(error.cause_chain = ?err, "Failed to add address to the waitlist");
            Outcome::Failed
        }
    }
}
