//! Consultation command handlers.

use chrono::{DateTime, Utc};
use tabled::Tabled;

use oncohub_core::validation::consultation_from_kpis;
use oncohub_core::{Consultation, ConsultationDraft, CoreError, DocumentKind, DocumentSet, Hub, KpiForm, ViewScope};

use crate::cli::{ConsultationsArgs, ConsultationsCommand, CreateConsultationArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ConsultationRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Stage")]
    stage: String,
    #[tabled(rename = "TNM")]
    tnm: String,
    #[tabled(rename = "ER")]
    er: i64,
    #[tabled(rename = "PR")]
    pr: i64,
    #[tabled(rename = "HER2")]
    her2: i64,
    #[tabled(rename = "Ki67")]
    ki67: i64,
    #[tabled(rename = "Diagnostic")]
    diagnostic: String,
}

fn appointment(c: &Consultation) -> String {
    c.appointment_date
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

impl From<&Consultation> for ConsultationRow {
    fn from(c: &Consultation) -> Self {
        Self {
            date: appointment(c),
            stage: c.stage.clone(),
            tnm: c.tnm.clone(),
            er: c.er,
            pr: c.pr,
            her2: c.her2,
            ki67: c.ki67,
            diagnostic: c.diagnostic.clone(),
        }
    }
}

fn detail(c: &Consultation) -> String {
    output::detail_lines(&[
        ("Appointment", appointment(c)),
        ("Diagnostic", c.diagnostic.clone()),
        ("ER / PR", format!("{} / {}", c.er, c.pr)),
        ("HER2", c.her2.to_string()),
        ("Ki67", c.ki67.to_string()),
        ("TNM", c.tnm.clone()),
        ("Stage", c.stage.clone()),
        ("Histologic type", c.histologic_type.clone()),
        ("Histologic grade", c.histologic_grade.to_string()),
        ("Carcinoma in situ", c.carcinoma_in_situ.clone()),
        ("Cytostatic", c.cytostatic_treatment.clone()),
        ("Sessions", c.recommended_sessions.to_string()),
        ("Organ failure risk", if c.organ_failure_risk == 0 { "no" } else { "yes" }.into()),
        ("Notes", c.notes.clone()),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    hub: &Hub,
    scope: &ViewScope,
    args: ConsultationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ConsultationsCommand::Last { patient } => {
            let slice = hub.store().last_consultation();
            let state = util::settled(hub.fetch_last_consultation(patient, scope).await, slice)?;
            let consultation = state.data.ok_or_else(|| CliError::NotFound {
                message: format!("No consultations for patient {patient}"),
            })?;
            let out = output::render_single(&global.output, &consultation, detail, appointment);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConsultationsCommand::History { patient } => {
            let slice = hub.store().consultations();
            let state = util::settled(hub.fetch_consultations(patient, scope).await, slice)?;
            let out = output::render_list(&global.output, &state.data, |c| ConsultationRow::from(c), appointment);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConsultationsCommand::Create(args) => create(hub, scope, args, global).await,
    }
}

async fn create(
    hub: &Hub,
    scope: &ViewScope,
    args: CreateConsultationArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let form: KpiForm = util::read_json_file(&args.kpis)?;
    let appointment = match args.appointment {
        Some(ref raw) => DateTime::parse_from_rfc3339(raw)
            .map_err(|e| CliError::Validation {
                field: "appointment".into(),
                reason: e.to_string(),
            })?
            .with_timezone(&Utc),
        None => Utc::now(),
    };
    let payload = consultation_from_kpis(args.patient, &form, appointment).map_err(CoreError::from)?;

    let mut documents = DocumentSet::default();
    for (kind, path) in [
        (DocumentKind::Protocol, &args.protocol),
        (DocumentKind::Report, &args.report),
        (DocumentKind::Rmn, &args.rmn),
        (DocumentKind::Blood, &args.blood),
    ] {
        if let Some(path) = path {
            documents.set(kind, util::read_document(path)?);
        }
    }

    let slice = hub.store().consultations();
    let result = hub
        .create_consultation(ConsultationDraft { payload, documents }, scope)
        .await;
    let state = util::settled(result, slice)?;
    output::print_notice(state.notice.as_deref().unwrap_or_default(), global.quiet);
    Ok(())
}
