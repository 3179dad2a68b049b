use crate::validate::{validate_batch, ValidationError};

pub const GENERIC_SUBMIT_ERROR: &str = "Network error. Please try again.";
pub const SUBMIT_SUCCESS_MESSAGE: &str = "Campaign submitted successfully.";

/// `Idle -> Validating -> Submitting -> {Succeeded, Failed} -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

/// What the service answered to a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub remaining_credits: i64,
    pub new_token: Option<String>,
    pub message: Option<String>,
}

/// A failed submission; `message` is the service's user-facing text, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmitFailure {
    pub message: Option<String>,
}

impl SubmitFailure {
    /// Server text verbatim when it supplied some, the generic fallback otherwise.
    pub fn user_message(&self) -> String {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .unwrap_or(GENERIC_SUBMIT_ERROR)
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeginOutcome {
    /// A submission is already in flight; the trigger is ignored.
    Busy,
    /// The guard failed; the machine is back in `Idle`.
    Rejected(ValidationError),
    /// The machine is in `Submitting`; these URLs go out.
    Accepted(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionMachine {
    phase: SubmissionPhase,
}

impl SubmissionMachine {
    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase == SubmissionPhase::Submitting
    }

    /// Runs the entry guard against the raw URL text. Only `Idle` accepts a trigger.
    pub fn begin(&mut self, urls_text: &str) -> BeginOutcome {
        if self.phase != SubmissionPhase::Idle {
            return BeginOutcome::Busy;
        }
        self.phase = SubmissionPhase::Validating;
        match validate_batch(urls_text) {
            Ok(urls) => {
                self.phase = SubmissionPhase::Submitting;
                BeginOutcome::Accepted(urls)
            }
            Err(err) => {
                self.phase = SubmissionPhase::Idle;
                BeginOutcome::Rejected(err)
            }
        }
    }

    /// `Submitting -> Succeeded | Failed`. Returns false when nothing was in flight.
    pub fn finish(&mut self, succeeded: bool) -> bool {
        if self.phase != SubmissionPhase::Submitting {
            return false;
        }
        self.phase = if succeeded {
            SubmissionPhase::Succeeded
        } else {
            SubmissionPhase::Failed
        };
        true
    }

    pub fn settle(&mut self) {
        if matches!(
            self.phase,
            SubmissionPhase::Succeeded | SubmissionPhase::Failed
        ) {
            self.phase = SubmissionPhase::Idle;
        }
    }
}
