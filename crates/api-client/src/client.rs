//! Blocking HTTP client for the mapping services

use crate::config::ClientConfig;
use crate::endpoints::{OverpassApi, PlacesApi, StreetViewApi};
use crate::error::{ApiError, ApiResult};
use crate::rate_limit::RateLimiter;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;
use uuid::Uuid;

/// Fresh id for each request
const X_REQUEST_ID: &str = "X-Request-ID";

/// Run-wide id shared by every request of one client
const X_SESSION_ID: &str = "X-Session-ID";

/// Client for Street View, Places and Overpass
///
/// This client wraps `reqwest::blocking` and adds:
/// - Per-endpoint rate limiting
/// - A session id shared by the run and a fresh id per request
/// - Uniform mapping of non-success responses
///
/// Requests are never retried; failures go back to the caller.
#[derive(Clone)]
pub struct MapsClient {
    inner: Client,
    config: Arc<ClientConfig>,
    rate_limiter: Arc<RateLimiter>,
    session_id: String,
}

impl MapsClient {
    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let session_id = config
            .session_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(concat!("stopscan/", env!("CARGO_PKG_VERSION"))));
        if let Ok(value) = HeaderValue::from_str(&session_id) {
            default_headers.insert(X_SESSION_ID, value);
        }

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));

        Ok(Self {
            inner,
            config: Arc::new(config),
            rate_limiter,
            session_id,
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Session id sent with every request
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access Street View metadata and image endpoints
    #[must_use]
    pub fn streetview(&self) -> StreetViewApi {
        StreetViewApi::new(self.clone())
    }

    /// Access the Places nearby search endpoint
    #[must_use]
    pub fn places(&self) -> PlacesApi {
        PlacesApi::new(self.clone())
    }

    /// Access the Overpass road network endpoint
    #[must_use]
    pub fn overpass(&self) -> OverpassApi {
        OverpassApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Low-level HTTP methods
    // -------------------------------------------------------------------------

    /// URL under the Maps base, e.g. `streetview/metadata`
    pub(crate) fn maps_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.maps_base_url.trim_end_matches('/'), path)
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.config.api_key
    }

    /// GET a Maps endpoint and decode its JSON body
    pub(crate) fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        context: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let request = self.inner.get(self.maps_url(path)).query(query);
        let response = self.send(endpoint, context, request)?;
        Ok(response.json()?)
    }

    /// GET a Maps endpoint and return the raw body
    pub(crate) fn get_bytes(
        &self,
        endpoint: &str,
        context: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<Vec<u8>> {
        let request = self.inner.get(self.maps_url(path)).query(query);
        let response = self.send(endpoint, context, request)?;
        Ok(response.bytes()?.to_vec())
    }

    /// POST a form to an absolute URL and decode its JSON body
    pub(crate) fn post_form_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        context: &str,
        url: &str,
        form: &[(&str, &str)],
    ) -> ApiResult<T> {
        let request = self.inner.post(url).form(form);
        let response = self.send(endpoint, context, request)?;
        Ok(response.json()?)
    }

    /// Throttle, send and check the status of one request
    fn send(&self, endpoint: &str, context: &str, request: RequestBuilder) -> ApiResult<Response> {
        self.rate_limiter.acquire(endpoint);

        let (request, request_id) = tag_request(request);
        let start = Instant::now();
        debug!(session = %self.session_id, request_id = %request_id, endpoint, context, "sending request");
        let response = request.send()?;
        let status = response.status();
        debug!(
            request_id = %request_id,
            endpoint,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "response received"
        );

        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().unwrap_or_default();
            Err(ApiError::api_response(status.as_u16(), body))
        }
    }
}

/// Attach a new `X-Request-ID`, returning it for logging
fn tag_request(request: RequestBuilder) -> (RequestBuilder, String) {
    let id = Uuid::new_v4().to_string();
    (request.header(X_REQUEST_ID, id.as_str()), id)
}
