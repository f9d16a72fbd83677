//! Patient roster command handlers.

use tabled::Tabled;

use oncohub_core::{Hub, Patient, Person, ViewScope};

use crate::cli::{GlobalOpts, PatientsArgs, PatientsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PatientRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "CNP")]
    cnp: String,
    #[tabled(rename = "Born")]
    born: String,
    #[tabled(rename = "Sex")]
    sex: String,
    #[tabled(rename = "Phone")]
    phone: String,
}

impl From<&Patient> for PatientRow {
    fn from(p: &Patient) -> Self {
        Self {
            id: p.id_patient,
            name: p.person.full_name(),
            cnp: p.person.cnp.clone(),
            born: short_date(&p.person.born_date),
            sex: p.person.sex.clone(),
            phone: p.person.virtual_address.phone_number.clone(),
        }
    }
}

/// `1970-01-01T00:00:00Z` → `1970-01-01`.
fn short_date(raw: &str) -> String {
    raw.split('T').next().unwrap_or_default().to_owned()
}

fn detail(p: &Patient) -> String {
    let person = &p.person;
    output::detail_lines(&[
        ("ID", p.id_patient.to_string()),
        ("Name", person.full_name()),
        ("CNP", person.cnp.clone()),
        ("Born", short_date(&person.born_date)),
        ("Sex", person.sex.clone()),
        ("Address", person.address.address.clone()),
        ("City", person.address.loc.name.clone()),
        ("County", person.address.loc.jud.name.clone()),
        ("E-mail", person.virtual_address.email.clone()),
        ("Phone", person.virtual_address.phone_number.clone()),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    hub: &Hub,
    scope: &ViewScope,
    args: PatientsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let roster = hub.store().patients();
    match args.command {
        PatientsCommand::List => {
            let state = util::settled(hub.fetch_patients(scope).await, roster)?;
            let out = output::render_list(
                &global.output,
                &state.data,
                |p| PatientRow::from(p),
                |p| p.id_patient.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PatientsCommand::Get { id } => {
            let slice = hub.store().patient();
            let state = util::settled(hub.fetch_patient(id, scope).await, slice)?;
            let patient = state.data.ok_or_else(|| CliError::NotFound {
                message: format!("Patient {id} not found"),
            })?;
            let out = output::render_single(&global.output, &patient, detail, |p| {
                p.id_patient.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PatientsCommand::Create { from_file } => {
            let person: Person = util::read_json_file(&from_file)?;
            let state = util::settled(hub.create_patient(&person, scope).await, roster)?;
            output::print_notice(
                state.notice.as_deref().unwrap_or("Patient created"),
                global.quiet,
            );
            Ok(())
        }

        PatientsCommand::Update { id, from_file } => {
            let person: Person = util::read_json_file(&from_file)?;
            let state = util::settled(hub.update_patient(id, &person, scope).await, roster)?;
            output::print_notice(
                state.notice.as_deref().unwrap_or("Patient updated"),
                global.quiet,
            );
            Ok(())
        }

        PatientsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete patient {id}? This cannot be undone."), global.yes)? {
                return Ok(());
            }
            let state = util::settled(hub.delete_patient(id, scope).await, roster)?;
            output::print_notice(
                state.notice.as_deref().unwrap_or("Patient deleted"),
                global.quiet,
            );
            Ok(())
        }
    }
}
