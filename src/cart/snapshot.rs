//! Cart snapshot

use rusty_money::iso::Currency;

use crate::{
    cart::{CartError, CartItemId, CartLineItem, StagedQuantity},
    money::{self, Amount},
};

/// The cart as last confirmed by the backend, plus any staged changes.
#[derive(Debug, Clone)]
pub struct CartSnapshot {
    items: Vec<CartLineItem>,
    grand_total: Amount,
    currency: &'static Currency,
    /// Bumped whenever `grand_total` is replaced wholesale rather than
    /// shifted by a staged change.
    revision: u64,
}

impl PartialEq for CartSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
            && self.grand_total == other.grand_total
            && self.currency == other.currency
    }
}

impl CartSnapshot {
    /// An empty cart.
    pub fn empty(currency: &'static Currency) -> Self {
        Self {
            items: Vec::new(),
            grand_total: money::zero(currency),
            currency,
            revision: 0,
        }
    }

    /// Build a snapshot from backend data.
    ///
    /// `grand_total` is the backend's total when it sent one; otherwise the
    /// sum of the line totals is used.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Amount`] if any amount is in a different currency
    /// or the sum overflows.
    pub fn with_items(
        items: impl Into<Vec<CartLineItem>>,
        grand_total: Option<Amount>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let items = items.into();

        items
            .iter()
            .try_for_each(|item| money::ensure_currency(&item.unit_price(), currency))?;

        let mut snapshot = Self {
            items,
            grand_total: money::zero(currency),
            currency,
            revision: 0,
        };

        snapshot.settle_total(grand_total)?;

        Ok(snapshot)
    }

    /// Line items in the order they were added.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Look up a line item.
    pub fn item(&self, id: CartItemId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Grand total: the backend's figure after each confirmed mutation.
    pub fn grand_total(&self) -> Amount {
        self.grand_total
    }

    /// Currency every amount in this cart is priced in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines.
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Sum of the current line totals.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Amount`] if the sum overflows.
    pub fn computed_total(&self) -> Result<Amount, CartError> {
        Ok(money::sum(
            self.items.iter().map(CartLineItem::line_total),
            self.currency,
        )?)
    }

    /// Merge a line item confirmed by the backend.
    ///
    /// The line with the same id, or failing that the first line for the same
    /// product, is replaced by the backend's version and any other line for
    /// that product is dropped. Otherwise the item is appended.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Amount`] on a currency mismatch. The snapshot is
    /// unchanged on error.
    pub fn upsert(
        &mut self,
        item: CartLineItem,
        server_total: Option<Amount>,
    ) -> Result<(), CartError> {
        money::ensure_currency(&item.unit_price(), self.currency)?;

        let (id, product) = (item.id(), item.product_id());

        let slot = self
            .items
            .iter()
            .position(|line| line.id() == id)
            .or_else(|| self.items.iter().position(|line| line.product_id() == product));

        let mut item = Some(item);
        let mut next = Vec::with_capacity(self.items.len() + 1);

        for (index, line) in self.items.iter().enumerate() {
            if Some(index) == slot {
                next.extend(item.take());
            } else if line.id() != id && line.product_id() != product {
                next.push(line.clone());
            }
        }

        next.extend(item);

        self.replace_items(next, server_total)
    }

    /// Drop a line item after the backend confirmed its deletion.
    ///
    /// The grand total becomes `server_total` when present, otherwise the sum
    /// of the lines that remain.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownLineItem`] if the id is not in the cart.
    pub fn remove(
        &mut self,
        id: CartItemId,
        server_total: Option<Amount>,
    ) -> Result<CartLineItem, CartError> {
        let position = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or(CartError::UnknownLineItem(id))?;

        let mut next = self.items.clone();
        let removed = next.remove(position);

        self.replace_items(next, server_total)?;

        Ok(removed)
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.grand_total = money::zero(self.currency);
        self.revision = self.revision.wrapping_add(1);
    }

    /// Tentatively set a line item's quantity.
    ///
    /// The line total is recomputed and the grand total is shifted by the
    /// difference, so the two stay consistent while the backend is asked to
    /// confirm.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero.
    /// - [`CartError::UnknownLineItem`]: the id is not in the cart.
    /// - [`CartError::Amount`]: the new totals overflow.
    pub fn stage_quantity(
        &mut self,
        id: CartItemId,
        quantity: u32,
    ) -> Result<StagedQuantity, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }

        let item = self
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or(CartError::UnknownLineItem(id))?;

        let previous_quantity = item.quantity();
        let previous_line_total = item.line_total();
        let line_total = money::line_total(item.unit_price(), quantity)?;
        let grand_total = money::swap(self.grand_total, previous_line_total, line_total)?;

        item.set_quantity(quantity)?;
        self.grand_total = grand_total;

        Ok(StagedQuantity {
            item: id,
            previous_quantity,
            previous_line_total,
            quantity,
            line_total,
            revision: self.revision,
        })
    }

    /// Keep a staged change once the backend has accepted it.
    ///
    /// `server_total` replaces the provisional grand total. Without it the
    /// provisional total stands, unless the total was replaced after staging,
    /// in which case it is rebuilt from the lines.
    ///
    /// # Errors
    ///
    /// - [`CartError::StaleStage`]: the line changed or vanished since staging.
    /// - [`CartError::Amount`]: `server_total` is in another currency.
    pub fn commit(
        &mut self,
        staged: StagedQuantity,
        server_total: Option<Amount>,
    ) -> Result<(), CartError> {
        self.staged_line(&staged)?;

        match server_total {
            Some(total) => self.settle_total(Some(total)),
            None if staged.revision != self.revision => self.settle_total(None),
            None => Ok(()),
        }
    }

    /// Undo a staged change the backend refused or never answered.
    ///
    /// When the grand total was replaced after staging it no longer contains
    /// this change, so it is rebuilt from the lines instead of shifted back.
    ///
    /// # Errors
    ///
    /// - [`CartError::StaleStage`]: the line changed or vanished since staging.
    /// - [`CartError::Amount`]: restoring the totals overflows.
    pub fn rollback(&mut self, staged: StagedQuantity) -> Result<(), CartError> {
        self.staged_line(&staged)?;

        let shifted = if staged.revision == self.revision {
            Some(money::swap(
                self.grand_total,
                staged.line_total,
                staged.previous_line_total,
            )?)
        } else {
            None
        };

        let item = self
            .items
            .iter_mut()
            .find(|item| item.id() == staged.item)
            .ok_or(CartError::StaleStage(staged.item))?;

        item.set_quantity(staged.previous_quantity)?;

        match shifted {
            Some(total) => {
                self.grand_total = total;

                Ok(())
            }
            None => self.settle_total(None),
        }
    }

    fn staged_line(&self, staged: &StagedQuantity) -> Result<&CartLineItem, CartError> {
        self.item(staged.item)
            .filter(|item| item.quantity() == staged.quantity)
            .ok_or(CartError::StaleStage(staged.item))
    }

    fn replace_items(
        &mut self,
        items: Vec<CartLineItem>,
        server_total: Option<Amount>,
    ) -> Result<(), CartError> {
        let previous = std::mem::replace(&mut self.items, items);

        if let Err(error) = self.settle_total(server_total) {
            self.items = previous;

            return Err(error);
        }

        Ok(())
    }

    fn settle_total(&mut self, server_total: Option<Amount>) -> Result<(), CartError> {
        let total = match server_total {
            Some(total) => {
                money::ensure_currency(&total, self.currency)?;

                total
            }
            None => self.computed_total()?,
        };

        self.grand_total = total;
        self.revision = self.revision.wrapping_add(1);

        Ok(())
    }
}
