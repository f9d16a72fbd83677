//! Async client for the e-OncoHub clinical records API.
//!
//! All traffic is JSON (one multipart endpoint) against a REST backend
//! reachable at a fixed base origin. Authentication is a server-managed
//! session cookie: [`OncoHubClient`] keeps it in a shared cookie jar and
//! never inspects it, so session state is only ever inferred from
//! response outcomes.
//!
//! Endpoint groups live in their own modules as inherent methods on
//! [`OncoHubClient`]:
//!
//! - [`auth`]: session check, login, logout, registration, e-mail confirmation
//! - [`patients`]: the doctor's patient roster (list / get / create / update / delete)
//! - [`doctor`]: the signed-in doctor's profile
//! - [`consultations`]: consultation history and multipart consultation upload
//! - [`guidelines`]: treatment-guideline lookup for a diagnostic

pub mod auth;
pub mod client;
pub mod consultations;
pub mod doctor;
pub mod error;
pub mod guidelines;
pub mod models;
pub mod patients;
pub mod transport;

pub use client::OncoHubClient;
pub use error::{Error, ErrorBody};
pub use models::*;
pub use transport::{TlsMode, TransportConfig};
