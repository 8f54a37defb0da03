//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use rusty_money::iso::Currency;
use tracing::instrument;

use mavuno::cart::{CartItemId, CartSnapshot};

use crate::{
    domain::carts::{
        errors::CartsServiceError,
        models::{AddedCartItem, CartAck, NewCartItem},
        records::{AddToCartRequest, AddToCartResponse, CartAckRecord, CartRecord, QuantityRequest},
    },
    http::StorefrontHttp,
};

/// Carts service backed by the storefront JSON API.
#[derive(Debug, Clone)]
pub struct HttpCartsService {
    http: StorefrontHttp,
    currency: &'static Currency,
}

impl HttpCartsService {
    /// Prices are read in `currency`.
    #[must_use]
    pub fn new(http: StorefrontHttp, currency: &'static Currency) -> Self {
        Self { http, currency }
    }
}

#[async_trait]
impl CartsService for HttpCartsService {
    #[instrument(skip(self))]
    async fn get_cart(&self) -> Result<CartSnapshot, CartsServiceError> {
        let record: CartRecord = self.http.get("cart").await?;

        record.into_snapshot(self.currency)
    }

    #[instrument(skip(self))]
    async fn add_item(&self, item: NewCartItem) -> Result<AddedCartItem, CartsServiceError> {
        let response: AddToCartResponse = self
            .http
            .post("cart/add", &AddToCartRequest::from(item))
            .await?;

        response.into_added(self.currency)
    }

    #[instrument(skip(self))]
    async fn update_quantity(
        &self,
        item: CartItemId,
        quantity: u32,
    ) -> Result<CartAck, CartsServiceError> {
        let response: CartAckRecord = self
            .http
            .put(&format!("cart/{item}"), &QuantityRequest { quantity })
            .await?;

        response.into_ack(self.currency)
    }

    #[instrument(skip(self))]
    async fn remove_item(&self, item: CartItemId) -> Result<CartAck, CartsServiceError> {
        let response: CartAckRecord = self.http.delete(&format!("cart/{item}")).await?;

        response.into_ack(self.currency)
    }

    #[instrument(skip(self))]
    async fn clear_cart(&self) -> Result<CartAck, CartsServiceError> {
        let response: CartAckRecord = self.http.delete("cart").await?;

        response.into_ack(self.currency)
    }
}

#[automock]
#[async_trait]
/// Cart endpoints of the storefront backend.
pub trait CartsService: Send + Sync {
    /// Fetch the whole cart.
    async fn get_cart(&self) -> Result<CartSnapshot, CartsServiceError>;

    /// Add units of a product.
    async fn add_item(&self, item: NewCartItem) -> Result<AddedCartItem, CartsServiceError>;

    /// Set a line item's quantity.
    async fn update_quantity(
        &self,
        item: CartItemId,
        quantity: u32,
    ) -> Result<CartAck, CartsServiceError>;

    /// Delete a line item.
    async fn remove_item(&self, item: CartItemId) -> Result<CartAck, CartsServiceError>;

    /// Delete every line item.
    async fn clear_cart(&self) -> Result<CartAck, CartsServiceError>;
}
