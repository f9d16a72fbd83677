//! Login, logout and session status.

use oncohub_core::{GuardState, Hub, ViewScope};
use serde::Serialize;

use crate::cli::{GlobalOpts, SessionArgs};
use crate::config::Target;
use crate::error::CliError;
use crate::output;

use super::describe_redirect;

#[derive(Serialize)]
struct SessionStatus {
    profile: String,
    api_url: String,
    authenticated: bool,
    route: &'static str,
    detail: Option<String>,
}

/// Log in with the target's credentials, surfacing the stored message on
/// failure.
pub(crate) async fn authenticate(hub: &Hub, scope: &ViewScope, target: &Target) -> Result<(), CliError> {
    let credentials = target.credentials()?;
    if hub.login(&credentials, scope).await.is_some() {
        return Ok(());
    }
    Err(CliError::AuthFailed {
        message: hub
            .session()
            .snapshot()
            .last_error
            .unwrap_or_else(|| "Login failed. Please try again.".into()),
        profile: target.profile_name.clone(),
    })
}

pub async fn login(hub: &Hub, scope: &ViewScope, target: &Target, global: &GlobalOpts) -> Result<(), CliError> {
    authenticate(hub, scope, target).await?;
    let email = target.profile.email.clone().unwrap_or_default();
    output::print_notice(&format!("Logged in as {email}"), global.quiet);
    Ok(())
}

/// Each invocation holds its own cookie jar, so there is only the session
/// opened here to end.
pub async fn logout(hub: &Hub, scope: &ViewScope, target: &Target, global: &GlobalOpts) -> Result<(), CliError> {
    authenticate(hub, scope, target).await?;
    if hub.logout(scope).await.is_some() {
        output::print_notice("Logged out", global.quiet);
        return Ok(());
    }
    Err(CliError::Rejected {
        message: hub
            .session()
            .snapshot()
            .last_error
            .unwrap_or_else(|| "An error occurred during logout. Please try again.".into()),
    })
}

pub async fn status(
    hub: &Hub,
    scope: &ViewScope,
    target: &Target,
    args: SessionArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !args.anonymous {
        authenticate(hub, scope, target).await?;
    }

    let state = hub.guard().check(scope).await;
    let status = SessionStatus {
        profile: target.profile_name.clone(),
        api_url: target.profile.api_url.clone(),
        authenticated: state.allows_render(),
        route: state.redirect_target().map_or("(current page)", |r| r.path()),
        detail: match &state {
            GuardState::Redirect { reason, .. } => Some(describe_redirect(reason)),
            _ => None,
        },
    };

    let out = output::render_single(
        &global.output,
        &status,
        |s| {
            output::detail_lines(&[
                ("Profile", s.profile.clone()),
                ("API", s.api_url.clone()),
                ("Session", if s.authenticated { "active" } else { "none" }.into()),
                ("Route", s.route.into()),
                ("Detail", s.detail.clone().unwrap_or_default()),
            ])
        },
        |s| s.authenticated.to_string(),
    );
    output::print_output(&out, global.quiet);

    if state.allows_render() {
        Ok(())
    } else {
        Err(CliError::SessionRejected {
            reason: status.detail.unwrap_or_default(),
        })
    }
}
