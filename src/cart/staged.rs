//! Staged quantity changes

use crate::{cart::CartItemId, money::Amount};

/// A quantity change applied to the local cart but not yet confirmed by the
/// backend.
///
/// Returned by [`CartSnapshot::stage_quantity`](crate::cart::CartSnapshot::stage_quantity)
/// and consumed by exactly one of `commit` or `rollback`.
#[derive(Debug, PartialEq)]
#[must_use = "a staged change must be committed or rolled back"]
pub struct StagedQuantity {
    pub(super) item: CartItemId,
    pub(super) previous_quantity: u32,
    pub(super) previous_line_total: Amount,
    pub(super) quantity: u32,
    pub(super) line_total: Amount,
    pub(super) revision: u64,
}

impl StagedQuantity {
    /// Line item being changed
    pub fn item(&self) -> CartItemId {
        self.item
    }

    /// Quantity before the change
    pub fn previous_quantity(&self) -> u32 {
        self.previous_quantity
    }

    /// Quantity after the change
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Line total after the change
    pub fn line_total(&self) -> Amount {
        self.line_total
    }
}
