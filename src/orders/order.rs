//! Orders

use jiff::Timestamp;

use crate::{
    ids::TypedId,
    money::Amount,
    orders::{InvalidTransition, OrderStatus, PaymentStatus},
    products::ProductId,
};

/// Order Id
pub type OrderId = TypedId<Order>;

/// A line of an order, frozen at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    /// Product ordered
    pub product_id: ProductId,

    /// Product name at checkout
    pub name: String,

    /// Units ordered
    pub quantity: u32,

    /// Unit price at checkout
    pub unit_price: Amount,

    /// `quantity * unit_price`
    pub line_total: Amount,
}

/// Everything needed to build an [`Order`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetails {
    /// Order id
    pub id: OrderId,

    /// Human-facing order number
    pub order_number: String,

    /// Current status
    pub status: OrderStatus,

    /// Payment status
    pub payment_status: PaymentStatus,

    /// Order total
    pub total_amount: Amount,

    /// Ordered lines
    pub items: Vec<OrderItem>,

    /// Checkout time
    pub created_at: Timestamp,

    /// When the order was handed to the courier
    pub shipped_at: Option<Timestamp>,

    /// When the order was received
    pub delivered_at: Option<Timestamp>,
}

/// An order. Only the status and its timestamps change after checkout, and
/// only through [`Order::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    details: OrderDetails,
}

/// A transition validated against an order's current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct PlannedTransition {
    order: OrderId,
    from: OrderStatus,
    to: OrderStatus,
}

impl PlannedTransition {
    /// Order the transition belongs to
    pub fn order(&self) -> OrderId {
        self.order
    }

    /// Status before
    pub fn from(&self) -> OrderStatus {
        self.from
    }

    /// Status after
    pub fn to(&self) -> OrderStatus {
        self.to
    }
}

impl Order {
    /// Wrap order details received from the backend.
    pub fn new(details: OrderDetails) -> Self {
        Self { details }
    }

    /// Order id
    pub fn id(&self) -> OrderId {
        self.details.id
    }

    /// Human-facing order number
    pub fn order_number(&self) -> &str {
        &self.details.order_number
    }

    /// Current status
    pub fn status(&self) -> OrderStatus {
        self.details.status
    }

    /// Payment status
    pub fn payment_status(&self) -> PaymentStatus {
        self.details.payment_status
    }

    /// Order total
    pub fn total_amount(&self) -> Amount {
        self.details.total_amount
    }

    /// Ordered lines
    pub fn items(&self) -> &[OrderItem] {
        &self.details.items
    }

    /// Checkout time
    pub fn created_at(&self) -> Timestamp {
        self.details.created_at
    }

    /// Shipping time, once shipped
    pub fn shipped_at(&self) -> Option<Timestamp> {
        self.details.shipped_at
    }

    /// Delivery time, once delivered
    pub fn delivered_at(&self) -> Option<Timestamp> {
        self.details.delivered_at
    }

    /// Validate a move to `target` without changing anything.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] when the table does not allow it.
    pub fn plan_transition(&self, target: OrderStatus) -> Result<PlannedTransition, InvalidTransition> {
        self.status().check_transition(target)?;

        Ok(PlannedTransition {
            order: self.id(),
            from: self.status(),
            to: target,
        })
    }

    /// Plan the single forward step from the current status.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition::Terminal`] for delivered or cancelled
    /// orders.
    pub fn plan_advance(&self) -> Result<PlannedTransition, InvalidTransition> {
        let target = self
            .status()
            .next_forward()
            .ok_or(InvalidTransition::Terminal(self.status()))?;

        self.plan_transition(target)
    }

    /// Apply a planned transition once the backend has accepted it.
    ///
    /// Shipping records `shipped_at` and delivery records `delivered_at`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition::NotAllowed`] if the plan was made for a
    /// different order or the status has moved since it was planned. The
    /// order is unchanged on error.
    pub fn apply(&mut self, planned: PlannedTransition, at: Timestamp) -> Result<(), InvalidTransition> {
        if planned.order != self.id() || planned.from != self.status() {
            return Err(InvalidTransition::NotAllowed {
                from: self.status(),
                to: planned.to,
            });
        }

        self.status().check_transition(planned.to)?;

        match planned.to {
            OrderStatus::Shipped => self.details.shipped_at = Some(at),
            OrderStatus::Delivered => self.details.delivered_at = Some(at),
            _ => {}
        }

        self.details.status = planned.to;

        Ok(())
    }
}

impl From<OrderDetails> for Order {
    fn from(details: OrderDetails) -> Self {
        Self::new(details)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::KES};
    use testresult::TestResult;

    use super::*;

    fn order(status: OrderStatus) -> Order {
        Order::new(OrderDetails {
            id: OrderId::new(42),
            order_number: "ORD-0042".to_string(),
            status,
            payment_status: PaymentStatus::Paid,
            total_amount: Money::from_minor(54_000, KES),
            items: Vec::new(),
            created_at: Timestamp::UNIX_EPOCH,
            shipped_at: None,
            delivered_at: None,
        })
    }

    #[test]
    fn shipping_records_shipped_at() -> TestResult {
        let mut order = order(OrderStatus::Processing);
        let at = Timestamp::from_second(1_700_000_000)?;

        let planned = order.plan_advance()?;
        order.apply(planned, at)?;

        assert_eq!(order.status(), OrderStatus::Shipped);
        assert_eq!(order.shipped_at(), Some(at));
        assert_eq!(order.delivered_at(), None);

        Ok(())
    }

    #[test]
    fn delivery_records_delivered_at_and_ends_the_workflow() -> TestResult {
        let mut order = order(OrderStatus::Shipped);
        let at = Timestamp::from_second(1_700_000_000)?;

        let planned = order.plan_transition(OrderStatus::Delivered)?;
        order.apply(planned, at)?;

        assert_eq!(order.status(), OrderStatus::Delivered);
        assert_eq!(order.delivered_at(), Some(at));
        assert!(order.status().available_actions().is_empty());

        Ok(())
    }

    #[test]
    fn cancelled_order_rejects_every_transition() {
        let order = order(OrderStatus::Cancelled);

        for target in OrderStatus::ALL {
            assert_eq!(
                order.plan_transition(target),
                Err(InvalidTransition::Terminal(OrderStatus::Cancelled))
            );
        }

        assert!(order.plan_advance().is_err());
    }

    #[test]
    fn stale_plan_is_rejected_without_mutation() -> TestResult {
        let mut order = order(OrderStatus::Pending);

        let stale = order.plan_transition(OrderStatus::Cancelled)?;
        let confirm = order.plan_advance()?;
        order.apply(confirm, Timestamp::UNIX_EPOCH)?;

        let before = order.clone();
        let result = order.apply(stale, Timestamp::UNIX_EPOCH);

        assert!(matches!(result, Err(InvalidTransition::NotAllowed { .. })));
        assert_eq!(order, before);

        Ok(())
    }

    #[test]
    fn plan_for_another_order_is_rejected() -> TestResult {
        let other = Order::new(OrderDetails {
            id: OrderId::new(7),
            ..order(OrderStatus::Pending).details
        });
        let mut order = order(OrderStatus::Pending);

        let planned = other.plan_advance()?;

        assert!(order.apply(planned, Timestamp::UNIX_EPOCH).is_err());
        assert_eq!(order.status(), OrderStatus::Pending);

        Ok(())
    }
}
