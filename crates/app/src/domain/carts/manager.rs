//! Cart manager
//!
//! Holds the session's cart. Quantity changes are applied locally first and
//! confirmed or undone once the backend answers; every other mutation waits
//! for the backend before touching local state.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use rusty_money::iso::Currency;
use tracing::{info, instrument, warn};

use mavuno::{
    cart::{CartError, CartItemId, CartSnapshot, StagedQuantity},
    money::Amount,
    products::{Product, ProductId},
};

use crate::{
    domain::carts::{CartsService, Confirm, models::NewCartItem},
    errors::{StorefrontError, ValidationError},
    http::bounded,
    in_flight::{InFlight, InFlightGuard},
    notices::Notice,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CartTarget {
    Line(CartItemId),
    Product(ProductId),
}

impl fmt::Display for CartTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(id) => write!(f, "cart line {id}"),
            Self::Product(id) => write!(f, "product {id}"),
        }
    }
}

/// The session's cart and the requests that change it.
pub struct CartManager {
    service: Arc<dyn CartsService>,
    snapshot: Mutex<CartSnapshot>,
    in_flight: InFlight<CartTarget>,
    timeout: Duration,
}

impl fmt::Debug for CartManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartManager")
            .field("snapshot", &*lock(&self.snapshot))
            .field("in_flight", &self.in_flight)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl CartManager {
    /// A manager with an empty cart; call [`CartManager::load`] to fetch it.
    #[must_use]
    pub fn new(
        service: Arc<dyn CartsService>,
        currency: &'static Currency,
        timeout: Duration,
    ) -> Self {
        Self::with_snapshot(service, CartSnapshot::empty(currency), timeout)
    }

    /// A manager seeded with a cart already fetched elsewhere.
    #[must_use]
    pub fn with_snapshot(
        service: Arc<dyn CartsService>,
        snapshot: CartSnapshot,
        timeout: Duration,
    ) -> Self {
        Self {
            service,
            snapshot: Mutex::new(snapshot),
            in_flight: InFlight::new(),
            timeout,
        }
    }

    /// Copy of the cart for rendering.
    pub fn snapshot(&self) -> CartSnapshot {
        self.apply(|cart| cart.clone())
    }

    /// Whether the line's controls are disabled by an outstanding request.
    pub fn is_busy(&self, line: CartItemId) -> bool {
        self.in_flight.is_busy(&CartTarget::Line(line))
    }

    /// Replace the local cart with the backend's.
    ///
    /// Waits for outstanding cart requests first, so no staged change is
    /// overwritten while its answer is pending.
    ///
    /// # Errors
    ///
    /// Network and decoding failures. The local cart is unchanged on error.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<CartSnapshot, StorefrontError> {
        let _guard = self.in_flight.acquire_exclusive().await;

        self.reload().await
    }

    /// Add a catalogue product, checking its listed stock first.
    ///
    /// # Errors
    ///
    /// See [`CartManager::add_item`]; additionally a validation error when
    /// the product is out of stock.
    pub async fn add_product(
        &self,
        product: &Product,
        quantity: i64,
    ) -> Result<Notice, StorefrontError> {
        let units = validate_quantity(quantity)?;

        product
            .ensure_purchasable(units)
            .map_err(ValidationError::from)?;

        self.add_item(product.id, quantity).await
    }

    /// Add `quantity` units of a product.
    ///
    /// The backend's line item replaces any line for the same product. When
    /// the backend does not return the line, the whole cart is reloaded once
    /// other cart requests have finished.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::Validation`]: `quantity` is below one.
    /// - [`StorefrontError::InFlight`]: this product is already being added.
    /// - Network failures and backend rejections. The cart is unchanged.
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Notice, StorefrontError> {
        let quantity = validate_quantity(quantity)?;
        let guard = self.acquire(CartTarget::Product(product_id))?;

        let added = bounded(
            self.timeout,
            self.service.add_item(NewCartItem {
                product_id,
                quantity,
            }),
        )
        .await
        .inspect_err(|error| warn!("add to cart failed: {error}"))?;

        match added.item {
            Some(item) => self
                .apply(|cart| cart.upsert(item, added.total))
                .map_err(unexpected)?,
            None => {
                drop(guard);

                let _whole = self.in_flight.acquire_exclusive().await;

                self.reload().await?;
            }
        }

        info!(%product_id, quantity, "item added to cart");

        Ok(Notice::success_or(added.message, "Added to cart"))
    }

    /// Change a line's quantity.
    ///
    /// The new line total and a provisional grand total are visible at once.
    /// When the backend confirms, its grand total replaces the provisional
    /// one; on failure, timeout or cancellation both totals revert.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::Validation`]: `quantity` is below one or the line
    ///   is not in the cart. No request is sent.
    /// - [`StorefrontError::InFlight`]: the line already has a request out.
    /// - Network failures and backend rejections, after rolling back.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        line: CartItemId,
        quantity: i64,
    ) -> Result<Notice, StorefrontError> {
        let quantity = validate_quantity(quantity)?;
        let _guard = self.acquire(CartTarget::Line(line))?;

        let staged = self
            .apply(|cart| cart.stage_quantity(line, quantity))
            .map_err(ValidationError::from)?;

        let pending = PendingStage {
            snapshot: &self.snapshot,
            staged: Some(staged),
        };

        let ack = bounded(self.timeout, self.service.update_quantity(line, quantity))
            .await
            .inspect_err(|error| warn!(%line, "quantity update failed, rolling back: {error}"))?;

        pending.commit(ack.total).map_err(unexpected)?;

        info!(%line, quantity, "quantity updated");

        Ok(Notice::success_or(ack.message, "Cart updated"))
    }

    /// Remove a line.
    ///
    /// The grand total becomes the backend's figure, or the sum of the lines
    /// left when it sends none.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::Validation`]: the line is not in the cart.
    /// - [`StorefrontError::InFlight`]: the line already has a request out.
    /// - Network failures and backend rejections. The cart is unchanged.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, line: CartItemId) -> Result<Notice, StorefrontError> {
        let _guard = self.acquire(CartTarget::Line(line))?;

        if self.apply(|cart| cart.item(line).is_none()) {
            return Err(ValidationError::from(CartError::UnknownLineItem(line)).into());
        }

        let ack = bounded(self.timeout, self.service.remove_item(line))
            .await
            .inspect_err(|error| warn!(%line, "remove failed: {error}"))?;

        self.apply(|cart| cart.remove(line, ack.total))
            .map_err(unexpected)?;

        info!(%line, "item removed from cart");

        Ok(Notice::success_or(ack.message, "Item removed from cart"))
    }

    /// Empty the cart after asking the user.
    ///
    /// Clearing an empty cart succeeds without asking or sending anything.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::ConfirmationDeclined`]: the user said no.
    /// - [`StorefrontError::InFlight`]: another cart request is out.
    /// - Network failures and backend rejections. The cart is unchanged.
    #[instrument(skip(self, confirm))]
    pub async fn clear_cart(&self, confirm: &dyn Confirm) -> Result<Notice, StorefrontError> {
        if self.apply(|cart| cart.is_empty()) {
            return Ok(Notice::info("Your cart is already empty"));
        }

        let _guard = self
            .in_flight
            .try_acquire_exclusive()
            .ok_or_else(|| StorefrontError::InFlight("cart".to_string()))?;

        if !confirm.confirm("Remove every item from your cart?") {
            return Err(ValidationError::ConfirmationDeclined.into());
        }

        let ack = bounded(self.timeout, self.service.clear_cart())
            .await
            .inspect_err(|error| warn!("clear cart failed: {error}"))?;

        self.apply(CartSnapshot::clear);

        info!("cart cleared");

        Ok(Notice::success_or(ack.message, "Cart cleared"))
    }

    /// Fetch the cart and replace the local one. Callers hold the exclusive
    /// guard.
    async fn reload(&self) -> Result<CartSnapshot, StorefrontError> {
        let snapshot = bounded(self.timeout, self.service.get_cart()).await?;

        self.apply(|cart| *cart = snapshot.clone());

        info!(lines = snapshot.len(), "cart loaded");

        Ok(snapshot)
    }

    fn acquire(&self, target: CartTarget) -> Result<InFlightGuard<CartTarget>, StorefrontError> {
        self.in_flight
            .try_acquire(target)
            .ok_or_else(|| StorefrontError::InFlight(target.to_string()))
    }

    fn apply<T>(&self, change: impl FnOnce(&mut CartSnapshot) -> T) -> T {
        change(&mut lock(&self.snapshot))
    }
}

/// A staged quantity change that is rolled back unless committed, including
/// when the owning future is dropped mid-request.
struct PendingStage<'a> {
    snapshot: &'a Mutex<CartSnapshot>,
    staged: Option<StagedQuantity>,
}

impl PendingStage<'_> {
    fn commit(mut self, total: Option<Amount>) -> Result<(), CartError> {
        match self.staged.take() {
            Some(staged) => lock(self.snapshot).commit(staged, total),
            None => Ok(()),
        }
    }
}

impl Drop for PendingStage<'_> {
    fn drop(&mut self) {
        if let Some(staged) = self.staged.take() {
            let line = staged.item();

            match lock(self.snapshot).rollback(staged) {
                Ok(()) => info!(%line, "staged quantity rolled back"),
                Err(error) => warn!(%line, "could not roll back staged quantity: {error}"),
            }
        }
    }
}

fn lock(snapshot: &Mutex<CartSnapshot>) -> MutexGuard<'_, CartSnapshot> {
    snapshot.lock().unwrap_or_else(PoisonError::into_inner)
}

fn validate_quantity(quantity: i64) -> Result<u32, ValidationError> {
    u32::try_from(quantity)
        .ok()
        .filter(|units| *units >= 1)
        .ok_or(ValidationError::Cart(CartError::InvalidQuantity(quantity)))
}

fn unexpected(error: CartError) -> StorefrontError {
    StorefrontError::UnexpectedResponse(error.to_string())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use rusty_money::iso::KES;
    use testresult::TestResult;
    use tokio::sync::Notify;

    use crate::{
        domain::carts::{
            CartsServiceError, MockCartsService, MockConfirm,
            models::{AddedCartItem, CartAck},
        },
        http::HttpError,
        test::{eggs_and_honey, kes, line, single_eggs_line},
    };

    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(10);

    fn manager(service: impl CartsService + 'static, cart: CartSnapshot) -> CartManager {
        CartManager::with_snapshot(Arc::new(service), cart, TIMEOUT)
    }

    #[tokio::test]
    async fn update_quantity_commits_the_backend_total() -> TestResult {
        let mut service = MockCartsService::new();

        service
            .expect_update_quantity()
            .once()
            .withf(|item, quantity| *item == CartItemId::new(1) && *quantity == 3)
            .return_once(|_, _| {
                Ok(CartAck {
                    message: None,
                    total: Some(kes(52_000)),
                })
            });

        let manager = manager(service, single_eggs_line()?);

        let notice = manager.update_quantity(CartItemId::new(1), 3).await?;
        let cart = manager.snapshot();
        let line = cart.item(CartItemId::new(1)).ok_or("line missing")?;

        assert_eq!(line.quantity(), 3);
        assert_eq!(line.line_total(), kes(54_000));
        assert_eq!(cart.grand_total(), kes(52_000));
        assert_eq!(notice, Notice::success("Cart updated"));
        assert!(!manager.is_busy(CartItemId::new(1)));

        Ok(())
    }

    #[tokio::test]
    async fn rejected_update_rolls_back_line_and_grand_total() -> TestResult {
        let mut service = MockCartsService::new();

        service.expect_update_quantity().once().return_once(|_, _| {
            Err(CartsServiceError::Http(HttpError::Rejected {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: "Only 2 trays left".to_string(),
            }))
        });

        let cart = eggs_and_honey()?;
        let manager = manager(service, cart.clone());

        let result = manager.update_quantity(CartItemId::new(1), 5).await;

        assert!(
            matches!(
                &result,
                Err(StorefrontError::BackendRejection { message, .. }) if message == "Only 2 trays left"
            ),
            "expected a backend rejection, got {result:?}"
        );
        assert_eq!(manager.snapshot(), cart);

        Ok(())
    }

    #[tokio::test]
    async fn zero_or_negative_quantity_sends_nothing() -> TestResult {
        let mut service = MockCartsService::new();

        service.expect_update_quantity().never();

        let cart = single_eggs_line()?;
        let manager = manager(service, cart.clone());

        for quantity in [0, -2] {
            let result = manager.update_quantity(CartItemId::new(1), quantity).await;

            assert!(
                matches!(
                    result,
                    Err(StorefrontError::Validation(ValidationError::Cart(
                        CartError::InvalidQuantity(q)
                    ))) if q == quantity
                ),
                "quantity {quantity} should be rejected"
            );
        }

        assert_eq!(manager.snapshot(), cart);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_line_is_rejected_before_any_request() -> TestResult {
        let mut service = MockCartsService::new();

        service.expect_update_quantity().never();
        service.expect_remove_item().never();

        let manager = manager(service, single_eggs_line()?);

        let update = manager.update_quantity(CartItemId::new(99), 2).await;
        let remove = manager.remove_item(CartItemId::new(99)).await;

        for result in [update, remove] {
            assert!(
                matches!(
                    result,
                    Err(StorefrontError::Validation(ValidationError::Cart(
                        CartError::UnknownLineItem(_)
                    )))
                ),
                "expected unknown line item"
            );
        }

        Ok(())
    }

    /// Answers quantity updates only after `sleep`, or once `release` is
    /// notified.
    struct SlowCarts {
        sleep: Duration,
        release: Notify,
    }

    #[async_trait]
    impl CartsService for SlowCarts {
        async fn get_cart(&self) -> Result<CartSnapshot, CartsServiceError> {
            Err(CartsServiceError::Rejected("not used".to_string()))
        }

        async fn add_item(&self, _item: NewCartItem) -> Result<AddedCartItem, CartsServiceError> {
            Err(CartsServiceError::Rejected("not used".to_string()))
        }

        async fn update_quantity(
            &self,
            _item: CartItemId,
            _quantity: u32,
        ) -> Result<CartAck, CartsServiceError> {
            tokio::select! {
                () = tokio::time::sleep(self.sleep) => {}
                () = self.release.notified() => {}
            }

            Ok(CartAck::default())
        }

        async fn remove_item(&self, _item: CartItemId) -> Result<CartAck, CartsServiceError> {
            Err(CartsServiceError::Rejected("not used".to_string()))
        }

        async fn clear_cart(&self) -> Result<CartAck, CartsServiceError> {
            Err(CartsServiceError::Rejected("not used".to_string()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_update_rolls_back() -> TestResult {
        let cart = eggs_and_honey()?;
        let manager = manager(
            SlowCarts {
                sleep: Duration::from_secs(60),
                release: Notify::new(),
            },
            cart.clone(),
        );

        let result = manager.update_quantity(CartItemId::new(1), 4).await;

        assert!(
            matches!(result, Err(StorefrontError::Network(HttpError::Timeout(_)))),
            "expected a timeout, got {result:?}"
        );
        assert_eq!(manager.snapshot(), cart);
        assert!(!manager.is_busy(CartItemId::new(1)));

        Ok(())
    }

    #[tokio::test]
    async fn second_update_for_a_busy_line_is_refused() -> TestResult {
        let service = Arc::new(SlowCarts {
            sleep: Duration::from_secs(3_600),
            release: Notify::new(),
        });

        let manager = CartManager::with_snapshot(
            Arc::clone(&service) as Arc<dyn CartsService>,
            single_eggs_line()?,
            TIMEOUT,
        );

        let first = manager.update_quantity(CartItemId::new(1), 3);

        let second = async {
            tokio::task::yield_now().await;

            let busy = manager.is_busy(CartItemId::new(1));
            let provisional = manager.snapshot().grand_total();
            let refused = manager.update_quantity(CartItemId::new(1), 4).await;

            service.release.notify_one();

            (busy, provisional, refused)
        };

        let (first, (busy, provisional, refused)) = tokio::join!(first, second);

        assert!(busy, "line should be busy while its update is in flight");
        assert_eq!(provisional, kes(54_000));
        assert!(
            matches!(refused, Err(StorefrontError::InFlight(_))),
            "expected in-flight refusal, got {refused:?}"
        );
        assert!(first.is_ok(), "first update should succeed: {first:?}");
        assert_eq!(
            manager.snapshot().item(CartItemId::new(1)).map(|l| l.quantity()),
            Some(3)
        );

        Ok(())
    }

    /// A backend that applies quantity updates to its own copy of the cart.
    /// Updates for `held` wait for `release` and are refused when
    /// `refuse_held` is set.
    struct BackendCart {
        cart: Mutex<CartSnapshot>,
        held: CartItemId,
        refuse_held: bool,
        release: Notify,
    }

    impl BackendCart {
        fn new(cart: CartSnapshot, held: CartItemId, refuse_held: bool) -> Self {
            Self {
                cart: Mutex::new(cart),
                held,
                refuse_held,
                release: Notify::new(),
            }
        }
    }

    #[async_trait]
    impl CartsService for BackendCart {
        async fn get_cart(&self) -> Result<CartSnapshot, CartsServiceError> {
            Ok(lock(&self.cart).clone())
        }

        async fn add_item(&self, _item: NewCartItem) -> Result<AddedCartItem, CartsServiceError> {
            Ok(AddedCartItem {
                message: None,
                item: None,
                total: None,
            })
        }

        async fn update_quantity(
            &self,
            item: CartItemId,
            quantity: u32,
        ) -> Result<CartAck, CartsServiceError> {
            if item == self.held {
                self.release.notified().await;

                if self.refuse_held {
                    return Err(CartsServiceError::Rejected("Only 1 jar left".to_string()));
                }
            }

            let mut cart = lock(&self.cart);
            let staged = cart.stage_quantity(item, quantity)?;

            cart.commit(staged, None)?;

            Ok(CartAck {
                message: None,
                total: Some(cart.computed_total()?),
            })
        }

        async fn remove_item(&self, _item: CartItemId) -> Result<CartAck, CartsServiceError> {
            Err(CartsServiceError::Rejected("not used".to_string()))
        }

        async fn clear_cart(&self) -> Result<CartAck, CartsServiceError> {
            Err(CartsServiceError::Rejected("not used".to_string()))
        }
    }

    #[tokio::test]
    async fn refused_update_after_another_lines_confirmation_keeps_totals_consistent() -> TestResult {
        let service = Arc::new(BackendCart::new(eggs_and_honey()?, CartItemId::new(2), true));

        let manager = CartManager::with_snapshot(
            Arc::clone(&service) as Arc<dyn CartsService>,
            eggs_and_honey()?,
            TIMEOUT,
        );

        let honey = manager.update_quantity(CartItemId::new(2), 3);

        let eggs = async {
            tokio::task::yield_now().await;

            let eggs = manager.update_quantity(CartItemId::new(1), 3).await;

            service.release.notify_one();

            eggs
        };

        let (honey, eggs) = tokio::join!(honey, eggs);

        assert!(eggs.is_ok(), "eggs update should succeed: {eggs:?}");
        assert!(
            matches!(honey, Err(StorefrontError::BackendRejection { .. })),
            "honey update should be refused, got {honey:?}"
        );

        let cart = manager.snapshot();

        assert_eq!(cart.item(CartItemId::new(2)).map(|l| l.quantity()), Some(1));
        assert_eq!(cart.grand_total(), kes(149_000));
        assert_eq!(cart.grand_total(), cart.computed_total()?);

        Ok(())
    }

    #[tokio::test]
    async fn reloading_add_waits_for_pending_quantity_update() -> TestResult {
        let service = Arc::new(BackendCart::new(eggs_and_honey()?, CartItemId::new(2), false));

        let manager = CartManager::with_snapshot(
            Arc::clone(&service) as Arc<dyn CartsService>,
            eggs_and_honey()?,
            TIMEOUT,
        );

        let update = manager.update_quantity(CartItemId::new(2), 3);

        let add = async {
            tokio::task::yield_now().await;

            manager.add_item(ProductId::new(13), 1).await
        };

        let release = async {
            for _ in 0..5 {
                tokio::task::yield_now().await;
            }

            service.release.notify_one();
        };

        let (update, add, ()) = tokio::join!(update, add, release);

        assert!(update.is_ok(), "update should commit: {update:?}");
        assert!(add.is_ok(), "add should succeed: {add:?}");

        let cart = manager.snapshot();

        assert_eq!(cart.item(CartItemId::new(2)).map(|l| l.quantity()), Some(3));
        assert_eq!(cart.grand_total(), cart.computed_total()?);
        assert!(manager.in_flight.is_idle(), "no guard should outlive its request");

        Ok(())
    }

    #[tokio::test]
    async fn removal_without_backend_total_sums_remaining_lines() -> TestResult {
        let mut service = MockCartsService::new();

        service
            .expect_remove_item()
            .once()
            .withf(|item| *item == CartItemId::new(2))
            .return_once(|_| {
                Ok(CartAck {
                    message: Some("Honey removed".to_string()),
                    total: None,
                })
            });

        let manager = manager(service, eggs_and_honey()?);

        let notice = manager.remove_item(CartItemId::new(2)).await?;
        let cart = manager.snapshot();

        assert!(cart.item(CartItemId::new(2)).is_none());
        assert_eq!(cart.grand_total(), kes(36_000));
        assert_eq!(notice.message, "Honey removed");

        Ok(())
    }

    #[tokio::test]
    async fn failed_removal_keeps_the_line() -> TestResult {
        let mut service = MockCartsService::new();

        service.expect_remove_item().once().return_once(|_| {
            Err(CartsServiceError::Http(HttpError::Timeout(TIMEOUT)))
        });

        let cart = eggs_and_honey()?;
        let manager = manager(service, cart.clone());

        let result = manager.remove_item(CartItemId::new(2)).await;

        assert!(matches!(result, Err(StorefrontError::Network(_))));
        assert_eq!(manager.snapshot(), cart);

        Ok(())
    }

    #[tokio::test]
    async fn clearing_twice_asks_and_sends_once() -> TestResult {
        let mut service = MockCartsService::new();
        let mut confirm = MockConfirm::new();

        confirm.expect_confirm().once().return_const(true);
        service
            .expect_clear_cart()
            .once()
            .return_once(|| Ok(CartAck::default()));

        let manager = manager(service, eggs_and_honey()?);

        let first = manager.clear_cart(&confirm).await?;
        let second = manager.clear_cart(&confirm).await?;

        assert_eq!(first, Notice::success("Cart cleared"));
        assert_eq!(second, Notice::info("Your cart is already empty"));
        assert!(manager.snapshot().is_empty());
        assert_eq!(manager.snapshot().grand_total(), kes(0));

        Ok(())
    }

    #[tokio::test]
    async fn declined_clear_sends_nothing() -> TestResult {
        let mut service = MockCartsService::new();
        let mut confirm = MockConfirm::new();

        confirm.expect_confirm().once().return_const(false);
        service.expect_clear_cart().never();

        let cart = eggs_and_honey()?;
        let manager = manager(service, cart.clone());

        let result = manager.clear_cart(&confirm).await;

        assert!(matches!(
            result,
            Err(StorefrontError::Validation(ValidationError::ConfirmationDeclined))
        ));
        assert_eq!(manager.snapshot(), cart);

        Ok(())
    }

    #[tokio::test]
    async fn added_line_for_the_same_product_replaces_the_existing_one() -> TestResult {
        let mut service = MockCartsService::new();
        let merged = line(1, 7, 5, 18_000)?;

        service
            .expect_add_item()
            .once()
            .withf(|item| {
                *item
                    == NewCartItem {
                        product_id: ProductId::new(7),
                        quantity: 3,
                    }
            })
            .return_once(move |_| {
                Ok(AddedCartItem {
                    message: None,
                    item: Some(merged),
                    total: Some(kes(185_000)),
                })
            });
        service.expect_get_cart().never();

        let manager = manager(service, eggs_and_honey()?);

        manager.add_item(ProductId::new(7), 3).await?;

        let cart = manager.snapshot();

        assert_eq!(cart.len(), 2);
        assert_eq!(
            cart.item(CartItemId::new(1)).map(|l| l.quantity()),
            Some(5)
        );
        assert_eq!(cart.grand_total(), kes(185_000));

        Ok(())
    }

    #[tokio::test]
    async fn add_without_returned_line_reloads_the_cart() -> TestResult {
        let mut service = MockCartsService::new();
        let reloaded = eggs_and_honey()?;
        let expected = reloaded.clone();

        service.expect_add_item().once().return_once(|_| {
            Ok(AddedCartItem {
                message: Some("Honey added".to_string()),
                item: None,
                total: None,
            })
        });
        service
            .expect_get_cart()
            .once()
            .return_once(move || Ok(reloaded));

        let manager = manager(service, single_eggs_line()?);

        let notice = manager.add_item(ProductId::new(11), 1).await?;

        assert_eq!(notice, Notice::success("Honey added"));
        assert_eq!(manager.snapshot(), expected);

        Ok(())
    }

    #[tokio::test]
    async fn refused_add_leaves_the_cart_alone() -> TestResult {
        let mut service = MockCartsService::new();

        service
            .expect_add_item()
            .once()
            .return_once(|_| Err(CartsServiceError::Rejected("Out of stock".to_string())));

        let cart = single_eggs_line()?;
        let manager = manager(service, cart.clone());

        let error = manager
            .add_item(ProductId::new(11), 1)
            .await
            .err()
            .ok_or("add should fail")?;

        assert_eq!(error.user_message(), "Out of stock");
        assert_eq!(manager.snapshot(), cart);

        Ok(())
    }

    #[tokio::test]
    async fn out_of_stock_product_is_not_requested() -> TestResult {
        let mut service = MockCartsService::new();

        service.expect_add_item().never();

        let manager = manager(service, CartSnapshot::empty(KES));
        let product = Product {
            id: ProductId::new(11),
            name: "Wildflower honey".to_string(),
            unit_price: kes(95_000),
            stock: 0,
            unit: Some("jar".to_string()),
        };

        let result = manager.add_product(&product, 1).await;

        assert!(matches!(
            result,
            Err(StorefrontError::Validation(ValidationError::Cart(CartError::OutOfStock(_))))
        ));

        Ok(())
    }
}
