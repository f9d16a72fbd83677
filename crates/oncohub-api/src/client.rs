// e-OncoHub HTTP client
//
// Wraps `reqwest::Client` with base-origin URL construction and uniform
// response handling. Endpoint groups (auth, patients, doctor, ...) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::{Error, ErrorBody};
use crate::models::MessageResponse;
use crate::transport::TransportConfig;

/// Raw HTTP client for the e-OncoHub REST API.
///
/// Every request carries the session cookie from the shared jar. Non-2xx
/// responses come back as [`Error::Api`] with the decoded error body;
/// 2xx bodies are decoded into the endpoint's typed response.
pub struct OncoHubClient {
    http: reqwest::Client,
    base_url: Url,
    /// Origin of the e-mail confirmation service, which is served apart
    /// from the main API gateway.
    confirm_url: Url,
    cookie_jar: Option<Arc<Jar>>,
}

impl OncoHubClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (session auth requires cookies).
    pub fn new(base_url: Url, confirm_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let cookie_jar = config.cookie_jar.clone();
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url,
            confirm_url,
            cookie_jar,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// The caller is responsible for cookie handling on `http`.
    pub fn with_client(http: reqwest::Client, base_url: Url, confirm_url: Url) -> Self {
        Self {
            http,
            base_url,
            confirm_url,
            cookie_jar: None,
        }
    }

    /// The API base origin.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The e-mail confirmation origin.
    pub fn confirm_url(&self) -> &Url {
        &self.confirm_url
    }

    /// Whether the jar currently holds any cookie for the API origin.
    ///
    /// Diagnostic only: session validity is decided by the server through
    /// `check_session`, never by inspecting the cookie.
    pub fn has_session_cookie(&self) -> bool {
        self.cookie_jar
            .as_ref()
            .and_then(|jar| jar.cookies(&self.base_url))
            .is_some()
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/{path}`.
    ///
    /// Any path prefix on the base URL is preserved, so a gateway mounted
    /// under `/oncohub/` works the same as one at the root.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        Self::join(&self.base_url, path)
    }

    /// Build a URL on the confirmation origin.
    pub(crate) fn confirm_service_url(&self, path: &str) -> Result<Url, Error> {
        Self::join(&self.confirm_url, path)
    }

    fn join(base: &Url, path: &str) -> Result<Url, Error> {
        let base = base.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");
        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        debug!("GET {url} params={params:?}");
        let resp = self.http.get(url).query(params).send().await?;
        Self::handle_response(resp).await
    }

    /// GET expecting only an acknowledgement (any 2xx body is accepted).
    pub(crate) async fn get_ack(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<MessageResponse, Error> {
        debug!("GET {url}");
        let resp = self.http.get(url).query(params).send().await?;
        Self::handle_ack(resp).await
    }

    pub(crate) async fn post(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<MessageResponse, Error> {
        debug!("POST {url}");
        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_ack(resp).await
    }

    /// POST without a request body, expecting an acknowledgement.
    pub(crate) async fn post_empty(&self, url: Url) -> Result<MessageResponse, Error> {
        debug!("POST {url}");
        let resp = self.http.post(url).send().await?;
        Self::handle_ack(resp).await
    }

    pub(crate) async fn put(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<MessageResponse, Error> {
        debug!("PUT {url}");
        let resp = self.http.put(url).json(body).send().await?;
        Self::handle_ack(resp).await
    }

    pub(crate) async fn delete(&self, url: Url) -> Result<MessageResponse, Error> {
        debug!("DELETE {url}");
        let resp = self.http.delete(url).send().await?;
        Self::handle_ack(resp).await
    }

    pub(crate) async fn post_multipart(
        &self,
        url: Url,
        form: reqwest::multipart::Form,
    ) -> Result<MessageResponse, Error> {
        debug!("POST {url} (multipart)");
        let resp = self.http.post(url).multipart(form).send().await?;
        Self::handle_ack(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    /// Map non-2xx into `Error::Api`, otherwise decode the body as `T`.
    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let body = Self::read_success_body(resp).await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview = body
                .char_indices()
                .nth(200)
                .map_or(body.as_str(), |(end, _)| &body[..end]);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    /// Like `handle_response`, but any 2xx body is a valid acknowledgement.
    /// Bodies that aren't `{"message": ...}` JSON yield an empty message.
    async fn handle_ack(resp: reqwest::Response) -> Result<MessageResponse, Error> {
        let body = Self::read_success_body(resp).await?;
        if body.trim().is_empty() {
            return Ok(MessageResponse::default());
        }
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    async fn read_success_body(resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        let body = resp.text().await?;
        trace!(%status, len = body.len(), "response received");

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body: ErrorBody::from_text(&body),
            });
        }
        Ok(body)
    }
}
