//! Payment status

use std::fmt;

use serde::{Deserialize, Serialize};

/// Payment state reported by the backend. Read-only on the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Not yet paid
    #[default]
    Pending,

    /// Paid in full
    Paid,

    /// Payment attempt failed
    Failed,

    /// Paid and returned
    Refunded,
}

impl PaymentStatus {
    /// Wire name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
