//! Storefront backend HTTP client.
//!
//! Every request accepts JSON and carries an `x-request-id`. Mutating
//! requests (`POST`, `PUT`, `DELETE`) also carry the page's anti-forgery
//! token in `X-CSRF-TOKEN`.

use std::{future::Future, time::Duration};

use reqwest::{
    Client, Method, RequestBuilder, StatusCode, Url,
    header::{ACCEPT, HeaderValue},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, error};
use uuid::Uuid;

use crate::context::{CsrfToken, SessionContext};

mod errors;

pub use errors::HttpError;

/// Anti-forgery header name.
pub const CSRF_HEADER: &str = "X-CSRF-TOKEN";

/// Correlation header name.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP client for the storefront JSON API.
#[derive(Debug, Clone)]
pub struct StorefrontHttp {
    http: Client,
    base_url: Url,
    csrf_token: CsrfToken,
    timeout: Duration,
}

impl StorefrontHttp {
    /// Create a client from the session context.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Transport`] if the TLS backend cannot be
    /// initialised.
    pub fn new(session: &SessionContext) -> Result<Self, HttpError> {
        let http = Client::builder()
            .timeout(session.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: session.base_url().clone(),
            csrf_token: session.csrf_token().clone(),
            timeout: session.request_timeout(),
        })
    }

    /// Start a request to `path`, relative to the base URL, with the standard
    /// headers attached.
    ///
    /// # Errors
    ///
    /// - [`HttpError::InvalidUrl`]: `path` does not form a valid URL.
    /// - [`HttpError::InvalidToken`]: the CSRF token is not a legal header.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, HttpError> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|source| HttpError::InvalidUrl(format!("{path}: {source}")))?;

        let mut builder = self
            .http
            .request(method.clone(), url)
            .header(ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, Uuid::now_v7().to_string());

        if is_mutating(&method) {
            let mut token =
                HeaderValue::from_str(self.csrf_token.expose()).map_err(HttpError::InvalidToken)?;

            token.set_sensitive(true);

            builder = builder.header(CSRF_HEADER, token);
        }

        Ok(builder)
    }

    /// `GET path`
    ///
    /// # Errors
    ///
    /// See [`StorefrontHttp::send`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, HttpError> {
        self.send(self.request(Method::GET, path)?).await
    }

    /// `POST path` with a JSON body
    ///
    /// # Errors
    ///
    /// See [`StorefrontHttp::send`].
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::POST, path)?.json(body)).await
    }

    /// `PUT path` with a JSON body
    ///
    /// # Errors
    ///
    /// See [`StorefrontHttp::send`].
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::PUT, path)?.json(body)).await
    }

    /// `DELETE path`
    ///
    /// # Errors
    ///
    /// See [`StorefrontHttp::send`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, HttpError> {
        self.send(self.request(Method::DELETE, path)?).await
    }

    /// Send a prepared request and decode its JSON response.
    ///
    /// # Errors
    ///
    /// - [`HttpError::Timeout`] / [`HttpError::Transport`]: no usable response.
    /// - [`HttpError::Rejected`]: non-2xx status.
    /// - [`HttpError::Decode`]: the body is not the expected JSON.
    pub async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, HttpError> {
        let request = builder.build()?;
        let method = request.method().clone();
        let url = request.url().clone();

        debug!(%method, %url, "sending storefront request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|source| self.transport_error(source))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| self.transport_error(source))?;

        debug!(%method, %url, %status, "storefront response received");

        decode(status, &body)
    }

    fn transport_error(&self, source: reqwest::Error) -> HttpError {
        if source.is_timeout() {
            return HttpError::Timeout(self.timeout);
        }

        error!("storefront request failed: {source}");

        HttpError::Transport(source)
    }
}

/// Decode a response body, turning non-2xx statuses into
/// [`HttpError::Rejected`]. An empty 2xx body decodes as `{}`.
///
/// # Errors
///
/// Returns [`HttpError::Rejected`] or [`HttpError::Decode`].
pub fn decode<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, HttpError> {
    if !status.is_success() {
        return Err(HttpError::Rejected {
            status,
            message: rejection_message(status, body),
        });
    }

    let body = if body.trim().is_empty() { "{}" } else { body };

    serde_json::from_str(body).map_err(HttpError::Decode)
}

/// Run a backend call with a deadline.
///
/// # Errors
///
/// Returns [`HttpError::Timeout`] if `call` does not finish within `timeout`,
/// otherwise whatever `call` returns.
pub async fn bounded<T, E>(
    timeout: Duration,
    call: impl Future<Output = Result<T, E>>,
) -> Result<T, E>
where
    E: From<HttpError>,
{
    tokio::time::timeout(timeout, call)
        .await
        .unwrap_or_else(|_elapsed| Err(HttpError::Timeout(timeout).into()))
}

/// Error body shapes the backend uses: `{"message": ..}` or `{"error": ..}`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

fn rejection_message(status: StatusCode, body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

    parsed
        .message
        .or(parsed.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| match status.canonical_reason() {
            Some(reason) => format!("request failed: {} {reason}", status.as_u16()),
            None => format!("request failed with status {}", status.as_u16()),
        })
}

fn is_mutating(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE)
}
