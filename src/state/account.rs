//! Two-step "delete account" dialog state.
//!
//! DESIGN
//! ======
//! The destructive call is only reachable from `Confirm` with a non-empty
//! password. Closing from any step discards the typed password.

#[cfg(test)]
#[path = "account_test.rs"]
mod account_test;

/// Step of the account deletion dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DeleteAccountFlow {
    #[default]
    Closed,
    /// Explains what will be lost; the user must opt in to continue.
    Warning,
    Confirm {
        password: String,
        pending: bool,
        error: Option<String>,
    },
}

impl DeleteAccountFlow {
    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn open(&mut self) {
        *self = Self::Warning;
    }

    pub fn close(&mut self) {
        *self = Self::Closed;
    }

    /// Move from the warning to the password step. No-op elsewhere.
    pub fn proceed(&mut self) {
        if matches!(self, Self::Warning) {
            *self = Self::Confirm { password: String::new(), pending: false, error: None };
        }
    }

    pub fn set_password(&mut self, value: &str) {
        if let Self::Confirm { password, error, .. } = self {
            value.clone_into(password);
            *error = None;
        }
    }

    /// Password to submit, if the flow is ready for the destructive call.
    ///
    /// Marks the step pending so repeated clicks are ignored until
    /// [`Self::finish`] runs.
    pub fn begin_submit(&mut self) -> Option<String> {
        match self {
            Self::Confirm { password, pending, error } if !*pending => {
                if password.is_empty() {
                    *error = Some("Enter your password to confirm.".to_owned());
                    return None;
                }
                *pending = true;
                *error = None;
                Some(password.clone())
            }
            _ => None,
        }
    }

    /// Apply the outcome of the delete call. Success closes the dialog;
    /// failure stays on the password step with the message shown.
    pub fn finish(&mut self, result: Result<(), String>) {
        match result {
            Ok(()) => self.close(),
            Err(message) => {
                if let Self::Confirm { pending, error, .. } = self {
                    *pending = false;
                    *error = Some(message);
                }
            }
        }
    }
}
