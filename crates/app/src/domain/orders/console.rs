//! Order console
//!
//! Status changes for orders the admin has open. A change is checked against
//! the transition table before anything is sent, and only applied locally
//! once the backend accepts it.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use tracing::{info, instrument, warn};

use mavuno::{
    display::status_label,
    orders::{InvalidTransition, Order, OrderActions, OrderId, OrderStatus, PlannedTransition},
};

use crate::{
    domain::orders::OrdersService,
    errors::{StorefrontError, ValidationError},
    http::bounded,
    in_flight::InFlight,
    notices::Notice,
};

type Orders = FxHashMap<OrderId, Order>;

/// Loaded orders and the status changes requested for them.
pub struct OrderConsole {
    service: Arc<dyn OrdersService>,
    orders: Mutex<Orders>,
    in_flight: InFlight<OrderId>,
    timeout: Duration,
}

impl fmt::Debug for OrderConsole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderConsole")
            .field("orders", &lock(&self.orders).len())
            .field("in_flight", &self.in_flight)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl OrderConsole {
    /// An empty console; orders are added by [`OrderConsole::load`].
    #[must_use]
    pub fn new(service: Arc<dyn OrdersService>, timeout: Duration) -> Self {
        Self {
            service,
            orders: Mutex::new(Orders::default()),
            in_flight: InFlight::new(),
            timeout,
        }
    }

    /// Copy of a loaded order.
    pub fn order(&self, id: OrderId) -> Option<Order> {
        lock(&self.orders).get(&id).cloned()
    }

    /// Whether the order's action buttons are disabled by an outstanding
    /// request.
    pub fn is_busy(&self, id: OrderId) -> bool {
        self.in_flight.is_busy(&id)
    }

    /// Actions on offer for a loaded order.
    ///
    /// # Errors
    ///
    /// [`ValidationError::OrderNotLoaded`] for an order this console has not
    /// fetched.
    pub fn available_actions(&self, id: OrderId) -> Result<OrderActions, StorefrontError> {
        self.with_order(id, |order| order.status().available_actions())
    }

    /// Fetch an order, replacing any copy already held.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::InFlight`]: the order has a status change out.
    /// - Network and decoding failures.
    #[instrument(skip(self))]
    pub async fn load(&self, id: OrderId) -> Result<Order, StorefrontError> {
        let _guard = self
            .in_flight
            .try_acquire(id)
            .ok_or_else(|| StorefrontError::InFlight(format!("order {id}")))?;

        let order = bounded(self.timeout, self.service.get_order(id)).await?;

        lock(&self.orders).insert(id, order.clone());

        info!(%id, status = %order.status(), "order loaded");

        Ok(order)
    }

    /// Move the order one step along the forward path.
    ///
    /// # Errors
    ///
    /// See [`OrderConsole::transition`].
    pub async fn advance(&self, id: OrderId) -> Result<Notice, StorefrontError> {
        self.change(id, Order::plan_advance).await
    }

    /// Cancel the order.
    ///
    /// # Errors
    ///
    /// See [`OrderConsole::transition`].
    pub async fn cancel(&self, id: OrderId) -> Result<Notice, StorefrontError> {
        self.transition(id, OrderStatus::Cancelled).await
    }

    /// Move the order to `target`.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::Validation`]: the order has not been loaded.
    /// - [`StorefrontError::InvalidTransition`]: the table does not allow the
    ///   move. No request is sent.
    /// - [`StorefrontError::InFlight`]: the order already has a request out.
    /// - Network failures and backend rejections. The order is unchanged.
    pub async fn transition(
        &self,
        id: OrderId,
        target: OrderStatus,
    ) -> Result<Notice, StorefrontError> {
        self.change(id, |order| order.plan_transition(target)).await
    }

    #[instrument(skip(self, plan))]
    async fn change(
        &self,
        id: OrderId,
        plan: impl FnOnce(&Order) -> Result<PlannedTransition, InvalidTransition>,
    ) -> Result<Notice, StorefrontError> {
        let _guard = self
            .in_flight
            .try_acquire(id)
            .ok_or_else(|| StorefrontError::InFlight(format!("order {id}")))?;

        let planned = self
            .with_order(id, |order| plan(order))?
            .inspect_err(|error| warn!(%id, "status change refused: {error}"))?;

        let (from, to) = (planned.from(), planned.to());

        let updated = bounded(self.timeout, self.service.update_status(id, to))
            .await
            .inspect_err(|error| warn!(%id, %from, %to, "status change failed: {error}"))?;

        let number = self.with_order(id, |order| {
            order
                .apply(planned, Timestamp::now())
                .map(|()| order.order_number().to_string())
        })??;

        info!(%id, %from, %to, "order status changed");

        Ok(Notice::success_or(
            updated.message,
            format!("Order {number} is now {}", status_label(to)),
        ))
    }

    fn with_order<T>(
        &self,
        id: OrderId,
        f: impl FnOnce(&mut Order) -> T,
    ) -> Result<T, StorefrontError> {
        lock(&self.orders)
            .get_mut(&id)
            .map(f)
            .ok_or_else(|| ValidationError::OrderNotLoaded(id).into())
    }
}

fn lock(orders: &Mutex<Orders>) -> MutexGuard<'_, Orders> {
    orders.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use testresult::TestResult;

    use mavuno::orders::OrderAction;

    use crate::{
        domain::orders::{MockOrdersService, OrdersServiceError, models::StatusUpdated},
        http::HttpError,
        test::order,
    };

    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(10);

    /// A console holding `loaded`, fetched through `service`.
    async fn console_with(
        mut service: MockOrdersService,
        loaded: Order,
    ) -> Result<OrderConsole, StorefrontError> {
        let id = loaded.id();

        service
            .expect_get_order()
            .once()
            .withf(move |requested| *requested == id)
            .return_once(move |_| Ok(loaded));

        let console = OrderConsole::new(Arc::new(service), TIMEOUT);

        console.load(id).await?;

        Ok(console)
    }

    #[tokio::test]
    async fn delivering_a_shipped_order_records_the_time() -> TestResult {
        let mut service = MockOrdersService::new();

        service
            .expect_update_status()
            .once()
            .withf(|id, status| *id == OrderId::new(42) && *status == OrderStatus::Delivered)
            .return_once(|_, _| Ok(StatusUpdated::default()));

        let console = console_with(service, order(42, OrderStatus::Shipped)).await?;

        let notice = console.advance(OrderId::new(42)).await?;
        let delivered = console.order(OrderId::new(42)).ok_or("order missing")?;

        assert_eq!(delivered.status(), OrderStatus::Delivered);
        assert!(delivered.delivered_at().is_some());
        assert!(console.available_actions(OrderId::new(42))?.is_empty());
        assert_eq!(notice, Notice::success("Order ORD-0042 is now Delivered"));
        assert!(!console.is_busy(OrderId::new(42)));

        Ok(())
    }

    #[tokio::test]
    async fn cancelled_order_sends_nothing() -> TestResult {
        let mut service = MockOrdersService::new();

        service.expect_update_status().never();

        let console = console_with(service, order(7, OrderStatus::Cancelled)).await?;
        let id = OrderId::new(7);

        let results = [
            console.advance(id).await,
            console.cancel(id).await,
            console.transition(id, OrderStatus::Processing).await,
        ];

        for result in results {
            assert!(
                matches!(
                    result,
                    Err(StorefrontError::InvalidTransition(InvalidTransition::Terminal(
                        OrderStatus::Cancelled
                    )))
                ),
                "expected a terminal refusal, got {result:?}"
            );
        }

        assert_eq!(console.order(id).map(|o| o.status()), Some(OrderStatus::Cancelled));

        Ok(())
    }

    #[tokio::test]
    async fn skipping_a_step_is_refused_locally() -> TestResult {
        let mut service = MockOrdersService::new();

        service.expect_update_status().never();

        let console = console_with(service, order(3, OrderStatus::Pending)).await?;

        let result = console
            .transition(OrderId::new(3), OrderStatus::Shipped)
            .await;

        assert!(matches!(
            result,
            Err(StorefrontError::InvalidTransition(InvalidTransition::NotAllowed {
                from: OrderStatus::Pending,
                to: OrderStatus::Shipped,
            }))
        ));

        Ok(())
    }

    #[tokio::test]
    async fn backend_rejection_keeps_the_status() -> TestResult {
        let mut service = MockOrdersService::new();

        service.expect_update_status().once().return_once(|_, _| {
            Err(OrdersServiceError::Http(HttpError::Rejected {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: "Order has already been shipped".to_string(),
            }))
        });

        let console = console_with(service, order(9, OrderStatus::Processing)).await?;

        let error = console
            .cancel(OrderId::new(9))
            .await
            .err()
            .ok_or("cancel should fail")?;

        let unchanged = console.order(OrderId::new(9)).ok_or("order missing")?;

        assert_eq!(error.user_message(), "Order has already been shipped");
        assert_eq!(unchanged.status(), OrderStatus::Processing);
        assert!(unchanged.shipped_at().is_none());

        Ok(())
    }

    #[tokio::test]
    async fn shipping_offers_delivery_then_cancel() -> TestResult {
        let mut service = MockOrdersService::new();

        service
            .expect_update_status()
            .once()
            .return_once(|_, _| Ok(StatusUpdated {
                message: Some("Shipped with Fargo".to_string()),
            }));

        let console = console_with(service, order(5, OrderStatus::Processing)).await?;

        let notice = console.advance(OrderId::new(5)).await?;
        let actions = console.available_actions(OrderId::new(5))?;

        assert_eq!(notice.message, "Shipped with Fargo");
        assert_eq!(
            actions.as_slice(),
            [OrderAction::MarkDelivered, OrderAction::Cancel]
        );
        assert!(
            console
                .order(OrderId::new(5))
                .and_then(|o| o.shipped_at())
                .is_some()
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_order_is_not_loaded() -> TestResult {
        let mut service = MockOrdersService::new();

        service.expect_update_status().never();

        let console = OrderConsole::new(Arc::new(service), TIMEOUT);

        let result = console.advance(OrderId::new(404)).await;

        assert!(matches!(
            result,
            Err(StorefrontError::Validation(ValidationError::OrderNotLoaded(id))) if id == OrderId::new(404)
        ));
        assert!(console.available_actions(OrderId::new(404)).is_err());

        Ok(())
    }
}
