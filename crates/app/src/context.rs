//! App Context

use std::{fmt, sync::Arc, time::Duration};

use reqwest::Url;
use rusty_money::iso::Currency;
use zeroize::Zeroize;

use crate::{
    domain::{
        carts::{CartManager, CartsService, HttpCartsService},
        orders::{HttpOrdersService, OrderConsole, OrdersService},
    },
    http::{HttpError, StorefrontHttp},
};

/// Default bound on every backend call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Anti-forgery token issued with the page. Sent on every mutating request.
#[derive(Clone)]
pub struct CsrfToken(String);

impl CsrfToken {
    /// Wrap the token read from the page.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the request header only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CsrfToken(**redacted**)")
    }
}

impl Drop for CsrfToken {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Read-only page context shared by every backend call.
#[derive(Debug, Clone)]
pub struct SessionContext {
    base_url: Url,
    csrf_token: CsrfToken,
    currency: &'static Currency,
    request_timeout: Duration,
}

impl SessionContext {
    /// Build a session for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidUrl`] if `base_url` is not an absolute
    /// http(s) URL.
    pub fn new(
        base_url: &str,
        csrf_token: CsrfToken,
        currency: &'static Currency,
    ) -> Result<Self, HttpError> {
        let mut base_url =
            Url::parse(base_url).map_err(|source| HttpError::InvalidUrl(format!("{base_url}: {source}")))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(HttpError::InvalidUrl(base_url.to_string()));
        }

        // Url::join drops the last path segment unless it ends in a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());

            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            csrf_token,
            currency,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Override [`DEFAULT_REQUEST_TIMEOUT`].
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Backend root; always ends in a slash.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Token sent on mutating requests.
    pub fn csrf_token(&self) -> &CsrfToken {
        &self.csrf_token
    }

    /// Currency prices are quoted in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Bound on each backend call.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

/// Backend services for one session, from which managers are built.
#[derive(Clone)]
pub struct AppContext {
    /// Cart endpoints.
    pub carts: Arc<dyn CartsService>,

    /// Order endpoints.
    pub orders: Arc<dyn OrdersService>,

    /// Page context the services were built from.
    pub session: Arc<SessionContext>,
}

impl AppContext {
    /// Build application context backed by the storefront HTTP API.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn from_session(session: SessionContext) -> Result<Self, HttpError> {
        let http = StorefrontHttp::new(&session)?;

        Ok(Self {
            carts: Arc::new(HttpCartsService::new(http.clone(), session.currency())),
            orders: Arc::new(HttpOrdersService::new(http, session.currency())),
            session: Arc::new(session),
        })
    }

    /// A cart manager for this session.
    #[must_use]
    pub fn cart_manager(&self) -> CartManager {
        CartManager::new(
            Arc::clone(&self.carts),
            self.session.currency(),
            self.session.request_timeout(),
        )
    }

    /// An order console for this session.
    #[must_use]
    pub fn order_console(&self) -> OrderConsole {
        OrderConsole::new(Arc::clone(&self.orders), self.session.request_timeout())
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
