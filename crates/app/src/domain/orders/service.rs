//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use rusty_money::iso::Currency;
use tracing::instrument;

use mavuno::orders::{Order, OrderId, OrderStatus};

use crate::{
    domain::orders::{
        errors::OrdersServiceError,
        models::StatusUpdated,
        records::{OrderRecord, StatusUpdateRequest, StatusUpdatedRecord},
    },
    http::StorefrontHttp,
};

/// Orders service backed by the storefront JSON API.
#[derive(Debug, Clone)]
pub struct HttpOrdersService {
    http: StorefrontHttp,
    currency: &'static Currency,
}

impl HttpOrdersService {
    /// Prices are read in `currency`.
    #[must_use]
    pub fn new(http: StorefrontHttp, currency: &'static Currency) -> Self {
        Self { http, currency }
    }
}

#[async_trait]
impl OrdersService for HttpOrdersService {
    #[instrument(skip(self))]
    async fn get_order(&self, order: OrderId) -> Result<Order, OrdersServiceError> {
        let record: OrderRecord = self.http.get(&format!("orders/{order}")).await?;

        record.into_order(self.currency)
    }

    #[instrument(skip(self))]
    async fn update_status(
        &self,
        order: OrderId,
        status: OrderStatus,
    ) -> Result<StatusUpdated, OrdersServiceError> {
        let record: StatusUpdatedRecord = self
            .http
            .put(
                &format!("orders/{order}/status"),
                &StatusUpdateRequest { status },
            )
            .await?;

        Ok(record.into())
    }
}

#[automock]
#[async_trait]
/// Order endpoints of the storefront backend.
pub trait OrdersService: Send + Sync {
    /// Retrieve a single order.
    async fn get_order(&self, order: OrderId) -> Result<Order, OrdersServiceError>;

    /// Move an order to `status`.
    async fn update_status(
        &self,
        order: OrderId,
        status: OrderStatus,
    ) -> Result<StatusUpdated, OrdersServiceError>;
}
