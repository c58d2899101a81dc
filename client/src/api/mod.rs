//! HTTP Client Adapter.
//!
//! [`ApiClient`] prefixes every path with the configured base URL, attaches
//! the stored credential as a bearer header and folds every failure into
//! [`ApiError::RequestFailed`]. The wire itself sits behind [`Transport`].

pub mod endpoints;
pub mod hyper_transport;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderValue, Method, Request, Response, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use shared::types::ErrorResponse;

use crate::error::ApiError;
use crate::store::SessionStore;

pub use self::hyper_transport::HyperTransport;

// ---------------------------------------------------------------------------
// Transport seam
// ---------------------------------------------------------------------------

/// Sends a fully built request and returns the buffered response.
///
/// Implementations report only transport failures as errors; any status code
/// the server answered with comes back as an `Ok` response.
pub trait Transport: Send + Sync + 'static {
    fn send(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>, ApiError>> + Send;
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

pub struct ApiClient<T> {
    base_url: Arc<str>,
    transport: Arc<T>,
    store: Arc<dyn SessionStore>,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            base_url: Arc::clone(&self.base_url),
            transport: Arc::clone(&self.transport),
            store: Arc::clone(&self.store),
        }
    }
}

impl<T> fmt::Debug for ApiClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("store", &self.store)
            .finish()
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(base_url: impl Into<String>, transport: T, store: Arc<dyn SessionStore>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').into(),
            transport: Arc::new(transport),
            store,
        }
    }

    /// `GET path`, decoding the JSON body.
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let response = self.execute(Method::GET, path, None).await?;
        decode_body(path, response)
    }

    /// `POST path` with a JSON body, decoding the JSON response.
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self.execute(Method::POST, path, Some(encode_body(body)?)).await?;
        decode_body(path, response)
    }

    /// `POST path` for endpoints whose response body the client ignores.
    pub async fn post_unit<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + Sync,
    {
        self.execute(Method::POST, path, Some(encode_body(body)?))
            .await
            .map(|_| ())
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
    ) -> Result<Response<Bytes>, ApiError> {
        let request = self.build_request(method.clone(), path, body)?;

        debug!("{} {}", method, request.uri());

        let response = self.transport.send(request).await.map_err(|e| {
            error!("{} {} failed before a response: {}", method, path, e);
            e
        })?;

        let status = response.status();
        if status.is_success() {
            debug!("{} {} -> {}", method, path, status.as_u16());
            return Ok(response);
        }

        let message = serde_json::from_slice::<ErrorResponse>(response.body())
            .ok()
            .and_then(|body| body.summary())
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| "unexpected status".to_string());

        warn!("{} {} -> {}: {}", method, path, status.as_u16(), message);

        Err(ApiError::with_status(status, message))
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
    ) -> Result<Request<Bytes>, ApiError> {
        let url = join_url(&self.base_url, path);

        let mut builder = Request::builder()
            .method(method)
            .uri(url.as_str())
            .header(header::ACCEPT, "application/json");

        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }

        if let Some(credential) = self.store.credential() {
            let value = HeaderValue::from_str(&format!("Bearer {}", credential.trim()))
                .map_err(|_| ApiError::network("stored credential is not a valid header value"))?;
            builder = builder.header(header::AUTHORIZATION, value);
        }

        builder
            .body(body.unwrap_or_default())
            .map_err(|e| ApiError::network(format!("invalid request for {}: {}", url, e)))
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url, path.trim_start_matches('/'))
}

fn encode_body<B: Serialize>(body: &B) -> Result<Bytes, ApiError> {
    serde_json::to_vec(body)
        .map(Bytes::from)
        .map_err(|e| ApiError::network(format!("failed to encode request body: {}", e)))
}

fn decode_body<R: DeserializeOwned>(path: &str, response: Response<Bytes>) -> Result<R, ApiError> {
    let status = response.status();
    serde_json::from_slice(response.body()).map_err(|e| {
        error!("Undecodable response from {}: {}", path, e);
        ApiError::with_status(status, format!("invalid response body: {}", e))
    })
}
