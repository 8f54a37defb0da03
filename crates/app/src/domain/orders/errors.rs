//! Orders service errors.

use thiserror::Error;

use mavuno::money::AmountError;

use crate::{errors::StorefrontError, http::HttpError};

/// Failures of an order endpoint call.
#[derive(Debug, Error)]
pub enum OrdersServiceError {
    /// Transport, decoding or non-2xx failure.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// An amount could not be represented.
    #[error("invalid amount")]
    InvalidAmount(#[from] AmountError),
}

impl From<OrdersServiceError> for StorefrontError {
    fn from(error: OrdersServiceError) -> Self {
        match error {
            OrdersServiceError::Http(source) => source.into(),
            OrdersServiceError::InvalidAmount(source) => {
                Self::UnexpectedResponse(source.to_string())
            }
        }
    }
}
