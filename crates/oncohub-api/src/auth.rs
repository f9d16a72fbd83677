// Authentication endpoints
//
// Cookie-based session: `POST /auth/login` sets the session cookie in the
// client's jar, every later request carries it, `POST /auth/api/logout`
// clears it server-side. The client never reads the cookie itself.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::OncoHubClient;
use crate::error::Error;
use crate::models::{MessageResponse, RegisterRequest, SessionCheck};

impl OncoHubClient {
    /// Ask the server whether the current cookie is a valid session.
    ///
    /// `GET /auth/api/check`
    pub async fn check_session(&self) -> Result<SessionCheck, Error> {
        let url = self.api_url("/auth/api/check")?;
        self.get(url).await
    }

    /// Submit credentials.
    ///
    /// `POST /auth/login` with `{"email", "password"}`. The acknowledgement
    /// body is returned untouched; deciding whether it denotes a successful
    /// login is up to the caller.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<MessageResponse, Error> {
        let url = self.api_url("/auth/login")?;
        debug!(email, "logging in");
        self.post(
            url,
            &json!({
                "email": email,
                "password": password.expose_secret(),
            }),
        )
        .await
    }

    /// End the current session.
    ///
    /// `POST /auth/api/logout`
    pub async fn logout(&self) -> Result<MessageResponse, Error> {
        let url = self.api_url("/auth/api/logout")?;
        debug!("logging out");
        self.post_empty(url).await
    }

    /// Register a new doctor account.
    ///
    /// `POST /auth/register`. The server sends a confirmation e-mail; the
    /// account can't log in until [`confirm_email`](Self::confirm_email)
    /// succeeds.
    pub async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, Error> {
        let url = self.api_url("/auth/register")?;
        debug!(email = %request.person.virtual_address.email, "registering doctor");
        self.post(url, request).await
    }

    /// Confirm an e-mail address with the token from the confirmation link.
    ///
    /// `GET {confirm_url}/confirm?token=...` on the confirmation origin.
    pub async fn confirm_email(&self, token: &str) -> Result<MessageResponse, Error> {
        let url = self.confirm_service_url("/confirm")?;
        debug!("confirming e-mail");
        self.get_ack(url, &[("token", token.to_owned())]).await
    }
}
