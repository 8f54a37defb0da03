//! Interactive confirmation

use mockall::automock;

/// Asks the user to confirm a destructive action.
#[automock]
pub trait Confirm: Send + Sync {
    /// `true` to go ahead.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Confirms everything; for callers that already asked (e.g. `--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AlreadyConfirmed;

impl Confirm for AlreadyConfirmed {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}
