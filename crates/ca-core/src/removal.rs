//! Staged confirmation for destructive roster removal.
//!
//! Removal cannot be undone, so it sits behind three caller-supplied
//! decisions: an intent answer, a typed verification code, and a final
//! `CONFIRM`. The machine holds no I/O; the CLI feeds it whatever the
//! operator typed, which keeps every path testable without a terminal.

/// Stage of the removal confirmation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationStage {
    /// No decision accepted yet.
    Unconfirmed,
    /// Intent given and the verification code typed correctly.
    CodeVerified,
    /// The final `CONFIRM` was typed; removal may begin.
    FinalConfirmed,
    /// Removal is in progress.
    Executing,
    /// Any wrong answer lands here. Terminal.
    Cancelled,
}

/// Confirmation state for removing `count` controllers from `facility`.
#[derive(Debug, Clone)]
pub struct RemovalConfirmation {
    facility: String,
    count: usize,
    stage: ConfirmationStage,
    intent_confirmed: bool,
}

impl RemovalConfirmation {
    #[must_use]
    pub fn new(facility: impl Into<String>, count: usize) -> Self {
        Self {
            facility: facility.into(),
            count,
            stage: ConfirmationStage::Unconfirmed,
            intent_confirmed: false,
        }
    }

    #[must_use]
    pub const fn stage(&self) -> ConfirmationStage {
        self.stage
    }

    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn facility(&self) -> &str {
        &self.facility
    }

    /// The code the operator must type back, e.g. `ZJX-REMOVE-4`.
    #[must_use]
    pub fn verification_code(&self) -> String {
        format!("{}-REMOVE-{}", self.facility, self.count)
    }

    /// First decision: a case-insensitive "yes" to continue. Anything else
    /// cancels.
    pub fn confirm_intent(&mut self, answer: &str) -> bool {
        if self.stage != ConfirmationStage::Unconfirmed || self.intent_confirmed {
            self.stage = ConfirmationStage::Cancelled;
            return false;
        }
        if answer.trim().eq_ignore_ascii_case("yes") {
            self.intent_confirmed = true;
            true
        } else {
            self.stage = ConfirmationStage::Cancelled;
            false
        }
    }

    /// Second decision: the verification code, matched exactly.
    pub fn verify_code(&mut self, input: &str) -> bool {
        if self.stage != ConfirmationStage::Unconfirmed || !self.intent_confirmed {
            self.stage = ConfirmationStage::Cancelled;
            return false;
        }
        if input.trim() == self.verification_code() {
            self.stage = ConfirmationStage::CodeVerified;
            true
        } else {
            self.stage = ConfirmationStage::Cancelled;
            false
        }
    }

    /// Final decision: `CONFIRM`, case-insensitive as typed by the operator
    /// but compared in upper case.
    pub fn confirm_final(&mut self, input: &str) -> bool {
        if self.stage != ConfirmationStage::CodeVerified {
            self.stage = ConfirmationStage::Cancelled;
            return false;
        }
        if input.trim().to_uppercase() == "CONFIRM" {
            self.stage = ConfirmationStage::FinalConfirmed;
            true
        } else {
            self.stage = ConfirmationStage::Cancelled;
            false
        }
    }

    /// Marks removal as started. Only valid once fully confirmed.
    pub fn begin_execution(&mut self) -> bool {
        if self.stage == ConfirmationStage::FinalConfirmed {
            self.stage = ConfirmationStage::Executing;
            true
        } else {
            self.stage = ConfirmationStage::Cancelled;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_reaches_executing() {
        let mut confirmation = RemovalConfirmation::new("ZJX", 4);
        assert_eq!(confirmation.verification_code(), "ZJX-REMOVE-4");

        assert!(confirmation.confirm_intent("yes"));
        assert!(confirmation.verify_code("ZJX-REMOVE-4"));
        assert_eq!(confirmation.stage(), ConfirmationStage::CodeVerified);
        assert!(confirmation.confirm_final("CONFIRM"));
        assert_eq!(confirmation.stage(), ConfirmationStage::FinalConfirmed);
        assert!(confirmation.begin_execution());
        assert_eq!(confirmation.stage(), ConfirmationStage::Executing);
    }

    #[test]
    fn intent_is_case_insensitive() {
        let mut confirmation = RemovalConfirmation::new("ZJX", 1);
        assert!(confirmation.confirm_intent("YES"));
    }

    #[test]
    fn declined_intent_cancels() {
        let mut confirmation = RemovalConfirmation::new("ZJX", 2);
        assert!(!confirmation.confirm_intent("no"));
        assert_eq!(confirmation.stage(), ConfirmationStage::Cancelled);
        // Nothing works after cancellation.
        assert!(!confirmation.verify_code("ZJX-REMOVE-2"));
    }

    #[test]
    fn wrong_code_cancels() {
        let mut confirmation = RemovalConfirmation::new("ZJX", 3);
        assert!(confirmation.confirm_intent("yes"));
        assert!(!confirmation.verify_code("ZJX-REMOVE-99"));
        assert_eq!(confirmation.stage(), ConfirmationStage::Cancelled);
    }

    #[test]
    fn code_before_intent_cancels() {
        let mut confirmation = RemovalConfirmation::new("ZJX", 3);
        assert!(!confirmation.verify_code("ZJX-REMOVE-3"));
        assert_eq!(confirmation.stage(), ConfirmationStage::Cancelled);
    }

    #[test]
    fn wrong_final_word_cancels() {
        let mut confirmation = RemovalConfirmation::new("ZJX", 3);
        assert!(confirmation.confirm_intent("yes"));
        assert!(confirmation.verify_code("ZJX-REMOVE-3"));
        assert!(!confirmation.confirm_final("ok"));
        assert_eq!(confirmation.stage(), ConfirmationStage::Cancelled);
    }

    #[test]
    fn final_word_accepts_lower_case() {
        let mut confirmation = RemovalConfirmation::new("ZJX", 3);
        assert!(confirmation.confirm_intent("yes"));
        assert!(confirmation.verify_code("ZJX-REMOVE-3"));
        assert!(confirmation.confirm_final("confirm"));
    }

    #[test]
    fn execution_requires_full_confirmation() {
        let mut confirmation = RemovalConfirmation::new("ZJX", 3);
        assert!(!confirmation.begin_execution());
        assert_eq!(confirmation.stage(), ConfirmationStage::Cancelled);
    }
}
