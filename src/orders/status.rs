//! Order status state machine

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, awaiting confirmation
    Pending,

    /// Accepted by the farm
    Confirmed,

    /// Being picked and packed
    Processing,

    /// Handed to the courier
    Shipped,

    /// Received by the customer
    Delivered,

    /// Withdrawn before delivery
    Cancelled,
}

/// The forward path, in order.
const FORWARD_PATH: [OrderStatus; 5] = [
    OrderStatus::Pending,
    OrderStatus::Confirmed,
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
];

impl OrderStatus {
    /// Every status, forward path first.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Wire name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Statuses this one may move to.
    pub const fn allowed_targets(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Confirmed, Self::Cancelled],
            Self::Confirmed => &[Self::Processing, Self::Cancelled],
            Self::Processing => &[Self::Shipped, Self::Cancelled],
            Self::Shipped => &[Self::Delivered, Self::Cancelled],
            Self::Delivered | Self::Cancelled => &[],
        }
    }

    /// The single forward step from this status, if any.
    pub const fn next_forward(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::Processing),
            Self::Processing => Some(Self::Shipped),
            Self::Shipped => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    /// Whether no further transitions exist.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Position on the forward path; `None` for `Cancelled`.
    pub fn stage(self) -> Option<usize> {
        FORWARD_PATH.iter().position(|status| *status == self)
    }

    /// Whether `target` is reachable in one step.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.allowed_targets().contains(&target)
    }

    /// Validate a transition against the table.
    ///
    /// # Errors
    ///
    /// - [`InvalidTransition::Terminal`]: this status is final.
    /// - [`InvalidTransition::NotAllowed`]: `target` is not one step away.
    pub fn check_transition(self, target: Self) -> Result<(), InvalidTransition> {
        if self.is_terminal() {
            return Err(InvalidTransition::Terminal(self));
        }

        if !self.can_transition_to(target) {
            return Err(InvalidTransition::NotAllowed {
                from: self,
                to: target,
            });
        }

        Ok(())
    }

    /// Actions an operator may take from this status: the forward action
    /// first, then cancellation. Empty for terminal statuses.
    pub fn available_actions(self) -> OrderActions {
        let mut actions = OrderActions::new();

        if let Some(forward) = OrderAction::forward_from(self) {
            actions.push(forward);
        }

        if !self.is_terminal() {
            actions.push(OrderAction::Cancel);
        }

        actions
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised status name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalised = value.trim().to_ascii_lowercase();

        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalised)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// A status change the table does not permit.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum InvalidTransition {
    /// The order is delivered or cancelled.
    #[error("order is already {0}; its status can no longer change")]
    Terminal(OrderStatus),

    /// The target is not one step away.
    #[error("cannot move an order from {from} to {to}")]
    NotAllowed {
        /// Current status
        from: OrderStatus,

        /// Requested status
        to: OrderStatus,
    },
}

/// At most one forward action plus cancel.
pub type OrderActions = SmallVec<[OrderAction; 2]>;

/// An operator action exposed by the admin console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderAction {
    /// pending -> confirmed
    Confirm,

    /// confirmed -> processing
    StartProcessing,

    /// processing -> shipped
    Ship,

    /// shipped -> delivered
    MarkDelivered,

    /// any non-terminal -> cancelled
    Cancel,
}

impl OrderAction {
    /// The forward action available from `status`.
    pub const fn forward_from(status: OrderStatus) -> Option<Self> {
        match status {
            OrderStatus::Pending => Some(Self::Confirm),
            OrderStatus::Confirmed => Some(Self::StartProcessing),
            OrderStatus::Processing => Some(Self::Ship),
            OrderStatus::Shipped => Some(Self::MarkDelivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    /// Status the action moves the order to.
    pub const fn target(self) -> OrderStatus {
        match self {
            Self::Confirm => OrderStatus::Confirmed,
            Self::StartProcessing => OrderStatus::Processing,
            Self::Ship => OrderStatus::Shipped,
            Self::MarkDelivered => OrderStatus::Delivered,
            Self::Cancel => OrderStatus::Cancelled,
        }
    }

    /// Button label
    pub const fn label(self) -> &'static str {
        match self {
            Self::Confirm => "Confirm order",
            Self::StartProcessing => "Start processing",
            Self::Ship => "Mark as shipped",
            Self::MarkDelivered => "Mark as delivered",
            Self::Cancel => "Cancel order",
        }
    }
}
