//! Storefront errors.

use thiserror::Error;

use mavuno::{cart::CartError, orders::InvalidTransition, orders::OrderId};

use crate::{http::HttpError, notices::Notice};

/// Problems caught locally, before any request is sent.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Bad quantity, unknown line or out-of-stock product.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The user declined the confirmation prompt.
    #[error("action cancelled")]
    ConfirmationDeclined,

    /// The order has to be fetched before it can be changed.
    #[error("order {0} has not been loaded")]
    OrderNotLoaded(OrderId),
}

/// Outcome of a failed storefront action.
///
/// None of these are fatal. Local state is consistent afterwards and the
/// action may be retried.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Caught locally; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Transport failure or timeout.
    #[error("network error: {0}")]
    Network(#[source] HttpError),

    /// The order cannot move to the requested status.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    /// The backend refused the action.
    #[error("{message}")]
    BackendRejection {
        /// HTTP status, when the refusal came as one
        status: Option<u16>,

        /// Backend message, shown as is
        message: String,
    },

    /// The entity already has a request out.
    #[error("{0} is busy, please wait for the current request to finish")]
    InFlight(String),

    /// The backend answered with data that does not fit the cart or order.
    #[error("unexpected response from the storefront: {0}")]
    UnexpectedResponse(String),
}

impl StorefrontError {
    pub(crate) fn rejected(message: impl Into<String>) -> Self {
        Self::BackendRejection {
            status: None,
            message: message.into(),
        }
    }

    /// Text to show the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(HttpError::Timeout(_)) => {
                "The storefront took too long to respond. Please try again.".to_string()
            }
            Self::Network(_) => {
                "Could not reach the storefront. Check your connection and try again.".to_string()
            }
            Self::UnexpectedResponse(_) => {
                "The storefront sent a response we could not understand.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// The error as a notice.
    pub fn notice(&self) -> Notice {
        Notice::error(self.user_message())
    }
}

impl From<HttpError> for StorefrontError {
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::Rejected { status, message } => Self::BackendRejection {
                status: Some(status.as_u16()),
                message,
            },
            HttpError::Decode(source) => Self::UnexpectedResponse(source.to_string()),
            other => Self::Network(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn backend_rejection_keeps_the_message_verbatim() {
        let error = StorefrontError::from(HttpError::Rejected {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "Only 3 trays left".to_string(),
        });

        assert!(matches!(
            &error,
            StorefrontError::BackendRejection { status: Some(422), .. }
        ));
        assert_eq!(error.user_message(), "Only 3 trays left");
    }

    #[test]
    fn timeout_is_a_network_error() {
        let error = StorefrontError::from(HttpError::Timeout(Duration::from_secs(10)));

        assert!(matches!(error, StorefrontError::Network(HttpError::Timeout(_))));
        assert!(error.notice().is_error());
    }
}
