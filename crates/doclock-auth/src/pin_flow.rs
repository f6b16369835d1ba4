//! Two-step MPIN entry and confirmation state machine.
//!
//! Setting or changing an MPIN requires the user to type it twice. The
//! flow holds the first entry until the confirming entry arrives; a
//! mismatch resets the flow so the user starts over.

use crate::mpin::validate_mpin_format;
use doclock_core::error::AppError;

/// State of one MPIN set/change flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinConfirmation {
    /// Waiting for the first entry.
    AwaitingFirstEntry,
    /// First entry received, waiting for the confirming entry.
    AwaitingConfirmation {
        /// The first entry, held until confirmed.
        first: String,
    },
}

/// Result of submitting one entry to the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinOutcome {
    /// First entry accepted; ask the user to type it again.
    NeedsConfirmation,
    /// Both entries matched; the confirmed MPIN is ready to hash.
    Confirmed(String),
    /// Entries did not match; the flow has reset.
    Mismatch,
}

impl PinConfirmation {
    /// Starts a fresh flow.
    pub fn new() -> Self {
        Self::AwaitingFirstEntry
    }

    /// Submits one MPIN entry and advances the flow.
    ///
    /// Format validation applies to the first entry only; the confirming
    /// entry is compared verbatim so a typo surfaces as a mismatch.
    pub fn submit(&mut self, entry: &str) -> Result<PinOutcome, AppError> {
        match self {
            Self::AwaitingFirstEntry => {
                validate_mpin_format(entry)?;
                *self = Self::AwaitingConfirmation {
                    first: entry.to_string(),
                };
                Ok(PinOutcome::NeedsConfirmation)
            }
            Self::AwaitingConfirmation { first } => {
                if first == entry {
                    let confirmed = first.clone();
                    *self = Self::AwaitingFirstEntry;
                    Ok(PinOutcome::Confirmed(confirmed))
                } else {
                    *self = Self::AwaitingFirstEntry;
                    Ok(PinOutcome::Mismatch)
                }
            }
        }
    }
}

impl Default for PinConfirmation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_entries_confirm() {
        let mut flow = PinConfirmation::new();
        assert_eq!(flow.submit("4821").unwrap(), PinOutcome::NeedsConfirmation);
        assert_eq!(
            flow.submit("4821").unwrap(),
            PinOutcome::Confirmed("4821".to_string())
        );
        assert_eq!(flow, PinConfirmation::AwaitingFirstEntry);
    }

    #[test]
    fn mismatch_resets_the_flow() {
        let mut flow = PinConfirmation::new();
        flow.submit("4821").unwrap();
        assert_eq!(flow.submit("4822").unwrap(), PinOutcome::Mismatch);

        // The flow accepts a fresh first entry after the reset.
        assert_eq!(flow.submit("9000").unwrap(), PinOutcome::NeedsConfirmation);
        assert_eq!(
            flow.submit("9000").unwrap(),
            PinOutcome::Confirmed("9000".to_string())
        );
    }

    #[test]
    fn invalid_first_entry_is_rejected_without_advancing() {
        let mut flow = PinConfirmation::new();
        assert!(flow.submit("12").is_err());
        assert_eq!(flow, PinConfirmation::AwaitingFirstEntry);
    }
}
