//! Registration and e-mail confirmation (public pages, no login).

use oncohub_core::{Hub, RegistrationForm, ViewScope};

use crate::cli::{ConfirmArgs, GlobalOpts, RegisterArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn register(
    hub: &Hub,
    scope: &ViewScope,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let form: RegistrationForm = util::read_json_file(&args.from_file)?;
    let slice = hub.store().registration();
    util::settled(hub.register(&form, scope).await, slice)?;
    output::print_notice(
        "Registration submitted. Check your e-mail for the confirmation link.",
        global.quiet,
    );
    Ok(())
}

pub async fn confirm(
    hub: &Hub,
    scope: &ViewScope,
    args: ConfirmArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let slice = hub.store().confirmation();
    util::settled(hub.confirm_email(args.token.as_deref(), scope).await, slice)?;
    output::print_notice("E-mail confirmed. You can now log in.", global.quiet);
    Ok(())
}
