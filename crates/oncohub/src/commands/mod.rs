//! Command dispatch: CLI args -> hub operations -> rendered slice snapshots.

pub mod account;
pub mod config_cmd;
pub mod consultations;
pub mod doctor;
pub mod guidelines;
pub mod patients;
pub mod session;
pub mod util;

use oncohub_core::{GuardState, Hub, RedirectReason, ViewScope};
use tracing::debug;

use crate::cli::{Command, GlobalOpts};
use crate::config::Target;
use crate::error::CliError;

/// Dispatch a server-bound command. Each command runs in its own view
/// scope; protected ones log in and pass the route guard first.
pub async fn dispatch(
    cmd: Command,
    hub: &Hub,
    target: &Target,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let scope = hub.mount();

    if cmd.is_protected() {
        enter(hub, &scope, target).await?;
    }

    match cmd {
        Command::Login => session::login(hub, &scope, target, global).await,
        Command::Logout => session::logout(hub, &scope, target, global).await,
        Command::Session(args) => session::status(hub, &scope, target, args, global).await,
        Command::Register(args) => account::register(hub, &scope, args, global).await,
        Command::Confirm(args) => account::confirm(hub, &scope, args, global).await,
        Command::Patients(args) => patients::handle(hub, &scope, args, global).await,
        Command::Doctor(args) => doctor::handle(hub, &scope, args, global).await,
        Command::Consultations(args) => consultations::handle(hub, &scope, args, global).await,
        Command::Guidelines(args) => guidelines::handle(hub, &scope, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}

/// Log in with the profile credentials and run the route guard once.
async fn enter(hub: &Hub, scope: &ViewScope, target: &Target) -> Result<(), CliError> {
    session::authenticate(hub, scope, target).await?;

    let state = hub.guard().check(scope).await;
    debug!(?state, "route guard settled");
    match state {
        GuardState::Render => Ok(()),
        GuardState::Redirect { reason, .. } => Err(CliError::SessionRejected {
            reason: describe_redirect(&reason),
        }),
        GuardState::Pending => Err(CliError::SessionRejected {
            reason: "session check did not complete".into(),
        }),
    }
}

pub(crate) fn describe_redirect(reason: &RedirectReason) -> String {
    match reason {
        RedirectReason::NotAuthenticated => "the server reports no active session".into(),
        RedirectReason::CheckFailed(detail) => format!("session check failed: {detail}"),
    }
}
