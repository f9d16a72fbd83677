//! Doctor profile command handlers.

use oncohub_core::{Doctor, Hub, ViewScope};

use crate::cli::{DoctorArgs, DoctorCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(d: &Doctor) -> String {
    let person = &d.person;
    output::detail_lines(&[
        ("Name", person.full_name()),
        ("Parafa", d.parafa.clone()),
        ("Hospital", d.hospital.clone()),
        ("E-mail", person.virtual_address.email.clone()),
        ("Phone", person.virtual_address.phone_number.clone()),
        ("City", person.address.loc.name.clone()),
        ("County", person.address.loc.jud.name.clone()),
    ])
}

pub async fn handle(
    hub: &Hub,
    scope: &ViewScope,
    args: DoctorArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let slice = hub.store().doctor();
    match args.command {
        DoctorCommand::Show => {
            let state = util::settled(hub.fetch_doctor(scope).await, slice)?;
            let doctor = state.data.ok_or_else(|| CliError::NotFound {
                message: "No doctor profile for this account".into(),
            })?;
            let out = output::render_single(&global.output, &doctor, detail, |d| d.parafa.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DoctorCommand::Update { from_file } => {
            let doctor: Doctor = util::read_json_file(&from_file)?;
            let state = util::settled(hub.update_doctor(&doctor, scope).await, slice)?;
            output::print_notice(
                state.notice.as_deref().unwrap_or("Profile updated"),
                global.quiet,
            );
            Ok(())
        }
    }
}
