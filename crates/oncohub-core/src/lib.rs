//! Client-side state for e-OncoHub, between `oncohub-api` and the views.
//!
//! - **[`Hub`]**: dependency container passed to every view. Owns the API
//!   client, the [`AppStore`], the [`SessionStore`] and a root
//!   cancellation token; every resource operation is a `Hub` method.
//!
//! - **[`SessionStore`]**: login/logout and the resulting [`Session`],
//!   observable through `watch` channels. Returns [`Route`] navigation
//!   signals instead of navigating itself.
//!
//! - **[`RouteGuard`]**: one server-side session check per protected view
//!   mount, yielding a [`GuardState`].
//!
//! - **[`Slice<T>`]**: a remote collection or document as a three-state
//!   value (`data`, `loading`, `error`). Responses are sequenced per
//!   operation kind; see [`ResponseOrdering`].
//!
//! - **[`ViewScope`] / [`OperationBounds`]**: every remote call has a
//!   deadline and is cancelled when its view goes away.
//!
//! - **[`validation`]**: form checks that run before anything is sent.

pub mod bounds;
pub mod config;
pub mod error;
pub mod guard;
pub mod hub;
pub mod route;
pub mod session;
pub mod slice;
pub mod store;
pub mod validation;

pub use bounds::{OperationBounds, ViewScope};
pub use config::{Credentials, HubConfig, TlsVerification};
pub use error::CoreError;
pub use guard::{GuardState, RedirectReason, RouteGuard};
pub use hub::Hub;
pub use route::Route;
pub use session::{LOGIN_SUCCESS_MARKER, Session, SessionStore};
pub use slice::{OperationKind, ResponseOrdering, Slice, SliceState, Ticket};
pub use store::AppStore;
pub use validation::{ConsultationDraft, DocumentSet, KpiForm, RegistrationForm, ValidationErrors};

// Wire types views work with directly.
pub use oncohub_api::{
    Consultation, Doctor, DocumentKind, GuidelineQuery, GuidelineSection, Guidelines, Patient,
    PatientId, Person, UploadDocument,
};
