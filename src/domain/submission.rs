pub const JOINED_MESSAGE: &str = "Success! You are on the waitlist. We will notify you at launch.";
pub const ALREADY_JOINED_MESSAGE: &str = "You are already on the waitlist!";
pub const FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// How a single submission resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Joined,
    AlreadyJoined,
    /// The address never reached the store.
    Rejected,
    Failed,
}

impl Outcome {
    pub fn message(self) -> &'static str {
        match self {
            Self::Joined => JOINED_MESSAGE,
            Self::AlreadyJoined => ALREADY_JOINED_MESSAGE,
            Self::Rejected | Self::Failed => FAILURE_MESSAGE,
        }
    }
}

/// Form-local state for one waitlist form: what is typed in the field,
/// whether a submission is in flight and the message from the last attempt.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SubmissionState {
    email: String,
    loading: bool,
    message: String,
}

impl SubmissionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Label of the submit control, which is disabled while loading.
    pub fn submit_label(&self) -> &'static str {
        if self.loading {
            "Joining..."
        } else {
            "Join the Waitlist"
        }
    }

    /// Marks a submission as in flight until the returned guard is dropped.
    pub fn begin(&mut self) -> LoadingGuard<'_> {
        self.loading = true;
        self.message.clear();
        LoadingGuard { state: self }
    }
}

/// Holds `loading` high for as long as it lives. Dropping it, on any path
/// including unwinding, puts the form back to idle.
#[derive(Debug)]
pub struct LoadingGuard<'a> {
    state: &'a mut SubmissionState,
}

impl LoadingGuard<'_> {
    pub fn state(&self) -> &SubmissionState {
        self.state
    }

    pub fn email(&self) -> &str {
        &self.state.email
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    /// Records the outcome. A successful join resets the field for a fresh entry.
    pub fn settle(&mut self, outcome: Outcome) {
        self.state.message = outcome.message().to_string();
        if outcome == Outcome::Joined {
            self.state.email.clear();
        }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.loading = false;
    }
}
