//! Confirm/alert seam between the workflows and whatever UI hosts them.
//!
//! Destructive actions ask the user before any remote call is issued, and
//! validation failures surface as alerts.  The workflows only see this
//! trait; the shell decides how the dialogs actually look.

use std::cell::RefCell;

pub trait Prompt {
    /// Ask the user to confirm; `false` aborts the action.
    fn confirm(&self, message: &str) -> bool;

    /// Show a blocking informational message.
    fn alert(&self, message: &str);
}

/// Confirms everything and drops alerts.  For headless embedding where the
/// shell renders its own dialogs before invoking the workflow.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl Prompt for AutoConfirm {
    fn confirm(&self, _message: &str) -> bool {
        true
    }

    fn alert(&self, _message: &str) {}
}

/// Scripted prompt that records every dialog, for tests.
#[derive(Debug, Default)]
pub struct RecordingPrompt {
    accept: bool,
    confirms: RefCell<Vec<String>>,
    alerts: RefCell<Vec<String>>,
}

impl RecordingPrompt {
    /// Answers "yes" to every confirmation.
    pub fn accepting() -> Self {
        Self {
            accept: true,
            ..Self::default()
        }
    }

    /// Answers "no" to every confirmation.
    pub fn declining() -> Self {
        Self {
            accept: false,
            ..Self::default()
        }
    }

    pub fn confirms(&self) -> Vec<String> {
        self.confirms.borrow().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl Prompt for RecordingPrompt {
    fn confirm(&self, message: &str) -> bool {
        self.confirms.borrow_mut().push(message.to_string());
        self.accept
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_prompt_scripts_answers() {
        let yes = RecordingPrompt::accepting();
        assert!(yes.confirm("sure?"));
        yes.alert("heads up");
        assert_eq!(yes.confirms(), vec!["sure?"]);
        assert_eq!(yes.alerts(), vec!["heads up"]);

        let no = RecordingPrompt::declining();
        assert!(!no.confirm("sure?"));
    }
}
