//! Carts service errors.

use thiserror::Error;

use mavuno::{cart::CartError, money::AmountError};

use crate::{errors::StorefrontError, http::HttpError};

/// Failures of a cart endpoint call.
#[derive(Debug, Error)]
pub enum CartsServiceError {
    /// Transport, decoding or non-2xx failure.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The backend answered 2xx but refused the change (`ok: false`).
    #[error("{0}")]
    Rejected(String),

    /// The returned cart does not hold together.
    #[error("invalid cart data")]
    InvalidData(#[from] CartError),

    /// An amount could not be represented.
    #[error("invalid amount")]
    InvalidAmount(#[from] AmountError),
}

impl From<CartsServiceError> for StorefrontError {
    fn from(error: CartsServiceError) -> Self {
        match error {
            CartsServiceError::Http(source) => source.into(),
            CartsServiceError::Rejected(message) => Self::rejected(message),
            CartsServiceError::InvalidData(source) => Self::UnexpectedResponse(source.to_string()),
            CartsServiceError::InvalidAmount(source) => {
                Self::UnexpectedResponse(source.to_string())
            }
        }
    }
}
