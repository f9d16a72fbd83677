// ── Client-side validation ──
//
// Form checks that run before anything is sent. A form with any error is
// never submitted; the errors go back to the caller as a list, in field
// order, and as a single `CoreError::Validation`.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use oncohub_api::{
    Address, Consultation, ConsultationUpload, County, DocumentKind, Locality, PatientId, Person,
    RegisterRequest, UploadDocument, VirtualAddress,
};
use regex::Regex;
use serde::Deserialize;
use strum::IntoEnumIterator;

use crate::error::CoreError;

/// Largest accepted consultation document.
pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

static DOCUMENT_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(application/pdf|image/.+)$").expect("valid regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));
static CNP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{13}$").expect("valid regex"));
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{10}$").expect("valid regex"));
static UPPERCASE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z]").expect("valid regex"));
static SPECIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[!@#$%^&*()_+\-=\[\]{};':"\\|,.<>/?]"#).expect("valid regex")
});

// ── Error collection ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.message.as_str()).collect()
    }

    /// Errors for one field.
    pub fn field(&self, field: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        CoreError::Validation {
            message: errors.to_string(),
        }
    }
}

// ── Consultation documents ───────────────────────────────────────────

/// The four consultation documents as picked so far; any may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSet {
    pub protocol: Option<UploadDocument>,
    pub report: Option<UploadDocument>,
    pub rmn: Option<UploadDocument>,
    pub blood: Option<UploadDocument>,
}

impl DocumentSet {
    pub fn get(&self, kind: DocumentKind) -> Option<&UploadDocument> {
        match kind {
            DocumentKind::Protocol => self.protocol.as_ref(),
            DocumentKind::Report => self.report.as_ref(),
            DocumentKind::Rmn => self.rmn.as_ref(),
            DocumentKind::Blood => self.blood.as_ref(),
        }
    }

    pub fn set(&mut self, kind: DocumentKind, document: UploadDocument) {
        let slot = match kind {
            DocumentKind::Protocol => &mut self.protocol,
            DocumentKind::Report => &mut self.report,
            DocumentKind::Rmn => &mut self.rmn,
            DocumentKind::Blood => &mut self.blood,
        };
        *slot = Some(document);
    }
}

/// Every document present, PDF or image, at most [`MAX_DOCUMENT_BYTES`].
pub fn validate_documents(documents: &DocumentSet) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    for kind in DocumentKind::iter() {
        let field = kind.field_name();
        let label = kind.label();
        let Some(doc) = documents.get(kind) else {
            errors.push(field, format!("{label} file is required"));
            continue;
        };
        if !DOCUMENT_TYPE_RE.is_match(&doc.content_type) {
            errors.push(field, format!("{label} must be a PDF or image file"));
        }
        if doc.bytes.len() > MAX_DOCUMENT_BYTES {
            errors.push(field, format!("{label} must be less than 10MB"));
        }
    }
    errors.into_result(())
}

/// A consultation ready for upload once its documents check out.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsultationDraft {
    pub payload: Consultation,
    pub documents: DocumentSet,
}

impl ConsultationDraft {
    pub fn into_upload(self) -> Result<ConsultationUpload, ValidationErrors> {
        validate_documents(&self.documents)?;
        let DocumentSet {
            protocol: Some(protocol),
            report: Some(report),
            rmn: Some(rmn),
            blood: Some(blood),
        } = self.documents
        else {
            // validate_documents reported every missing file already
            return Err(ValidationErrors::default());
        };
        Ok(ConsultationUpload {
            payload: self.payload,
            protocol,
            report,
            rmn,
            blood,
        })
    }
}

// ── Consultation KPIs ────────────────────────────────────────────────

/// Indicators as typed into the consultation form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KpiForm {
    pub er: String,
    pub pr: String,
    pub her2: String,
    pub ki67: String,
    pub tnm: String,
    pub histologic_type: String,
    pub histologic_grade: String,
    pub carcinoma_in_situ: String,
    pub nuclear_histologic_grade: String,
    pub stage: String,
    pub organ_failure_risk: bool,
    pub cytostatic_treatment: String,
    pub recommended_sessions: String,
    pub notes: String,
}

fn required_number(errors: &mut ValidationErrors, field: &'static str, label: &str, value: &str) -> i64 {
    let value = value.trim();
    if value.is_empty() {
        errors.push(field, format!("{label} is required"));
        return 0;
    }
    optional_number(errors, field, label, value)
}

fn optional_number(errors: &mut ValidationErrors, field: &'static str, label: &str, value: &str) -> i64 {
    let value = value.trim();
    if value.is_empty() {
        return 0;
    }
    value.parse().unwrap_or_else(|_| {
        errors.push(field, format!("{label} must be a whole number"));
        0
    })
}

fn required_text(errors: &mut ValidationErrors, field: &'static str, label: &str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.push(field, format!("{label} is required"));
    }
    value.to_owned()
}

/// Check the indicators and build the consultation record.
pub fn consultation_from_kpis(
    patient: PatientId,
    form: &KpiForm,
    appointment: DateTime<Utc>,
) -> Result<Consultation, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let e = &mut errors;
    let consultation = Consultation {
        appointment_date: Some(appointment),
        er: required_number(e, "er", "ER (Estrogen Receptor)", &form.er),
        pr: required_number(e, "pr", "PR (Progesterone Receptor)", &form.pr),
        her2: required_number(e, "her2", "HER2", &form.her2),
        ki67: required_number(e, "ki67", "Ki67", &form.ki67),
        tnm: required_text(e, "tnm", "TNM", &form.tnm),
        histologic_type: required_text(e, "histologic_type", "Histologic Type", &form.histologic_type),
        histologic_grade: required_number(e, "histologic_grade", "Histologic Grade", &form.histologic_grade),
        carcinoma_in_situ: form.carcinoma_in_situ.trim().to_owned(),
        nuclear_histologic_grade: optional_number(
            e,
            "nuclear_histologic_grade",
            "Nuclear Histologic Grade",
            &form.nuclear_histologic_grade,
        ),
        stage: required_text(e, "stage", "Stage", &form.stage),
        organ_failure_risk: i64::from(form.organ_failure_risk),
        cytostatic_treatment: form.cytostatic_treatment.trim().to_owned(),
        recommended_sessions: optional_number(
            e,
            "recommended_sessions",
            "Recommended number of sessions",
            &form.recommended_sessions,
        ),
        patient_id: patient,
        notes: form.notes.clone(),
        ..Consultation::default()
    };
    errors.into_result(consultation)
}

// ── Registration ─────────────────────────────────────────────────────

/// Doctor sign-up form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub cod_parafa: String,
    pub hospital: String,
    pub cnp: String,
    /// Derived from the CNP when absent.
    pub born_date: Option<NaiveDate>,
    pub sex: String,
    pub address: String,
    pub loc_name: String,
    pub jud_name: String,
    pub phone_number: String,
    pub password: String,
    pub confirm_password: String,
}

/// Check the sign-up form and build the registration request.
pub fn validate_registration(form: &RegistrationForm) -> Result<RegisterRequest, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let e = &mut errors;

    let name = required_text(e, "name", "Name", &form.name);
    let surname = required_text(e, "surname", "Surname", &form.surname);

    let email = form.email.trim();
    if email.is_empty() {
        e.push("email", "Email is required");
    } else if !EMAIL_RE.is_match(email) {
        e.push("email", "Enter a valid email");
    }

    let parafa = required_text(e, "codParafa", "Cod Parafa", &form.cod_parafa);
    let hospital = required_text(e, "hospital", "Hospital", &form.hospital);

    let cnp = form.cnp.trim();
    if cnp.is_empty() {
        e.push("cnp", "CNP is required");
    } else if !CNP_RE.is_match(cnp) {
        e.push("cnp", "CNP must be exactly 13 digits");
    }

    let born_date = form.born_date.or_else(|| birth_date_from_cnp(cnp));
    if born_date.is_none() {
        e.push("bornDate", "Date of birth is required");
    }

    let sex = form.sex.trim();
    if sex.is_empty() {
        e.push("sex", "Sex is required");
    } else if sex != "M" && sex != "F" {
        e.push("sex", "Invalid sex");
    }

    let address = required_text(e, "address", "Address", &form.address);
    let city = required_text(e, "locName", "City", &form.loc_name);
    let county = required_text(e, "judName", "County", &form.jud_name);

    let phone = form.phone_number.trim();
    if phone.is_empty() {
        e.push("phoneNumber", "Phone number is required");
    } else if !PHONE_RE.is_match(phone) {
        e.push("phoneNumber", "Phone number must be exactly 10 digits");
    }

    let password = &form.password;
    if password.is_empty() {
        e.push("password", "Password is required");
    } else {
        if password.chars().count() < 8 {
            e.push("password", "Password should be of minimum 8 characters length");
        }
        if !UPPERCASE_RE.is_match(password) {
            e.push("password", "Password should contain at least one uppercase letter");
        }
        if !SPECIAL_RE.is_match(password) {
            e.push("password", "Password should contain at least one special character");
        }
    }
    if form.confirm_password.is_empty() {
        e.push("confirmPassword", "Confirm Password is required");
    } else if form.confirm_password != *password {
        e.push("confirmPassword", "Passwords must match");
    }

    let request = RegisterRequest {
        person: Person {
            id_person: None,
            f_name: name,
            l_name: surname,
            cnp: cnp.to_owned(),
            born_date: born_date
                .map(|d| format!("{}T00:00:00Z", d.format("%Y-%m-%d")))
                .unwrap_or_default(),
            sex: sex.to_owned(),
            address: Address {
                address,
                loc: Locality {
                    name: city,
                    jud: County { name: county },
                },
            },
            virtual_address: VirtualAddress {
                email: email.to_owned(),
                phone_number: phone.to_owned(),
            },
        },
        parafa,
        hospital,
        password: password.clone(),
    };
    errors.into_result(request)
}

/// Birth date encoded in a Romanian personal numeric code.
///
/// Century from the first digit: 1/2 → 1900s, 3/4 → 1800s, 5/6 → 2000s.
/// Any other digit, a malformed code or an impossible date gives `None`.
pub fn birth_date_from_cnp(cnp: &str) -> Option<NaiveDate> {
    if !CNP_RE.is_match(cnp) {
        return None;
    }
    let digit = |range: std::ops::Range<usize>| cnp.get(range)?.parse::<u32>().ok();
    let century = match digit(0..1)? {
        1 | 2 => 1900,
        3 | 4 => 1800,
        5 | 6 => 2000,
        _ => return None,
    };
    let year = century + i32::try_from(digit(1..3)?).ok()?;
    NaiveDate::from_ymd_opt(year, digit(3..5)?, digit(5..7)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pdf(size: usize) -> UploadDocument {
        UploadDocument {
            file_name: "doc.pdf".into(),
            content_type: "application/pdf".into(),
            bytes: vec![0; size],
        }
    }

    fn full_set() -> DocumentSet {
        DocumentSet {
            protocol: Some(pdf(10)),
            report: Some(pdf(10)),
            rmn: Some(pdf(10)),
            blood: Some(pdf(10)),
        }
    }

    fn valid_form() -> RegistrationForm {
        RegistrationForm {
            name: "Elena".into(),
            surname: "Popa".into(),
            email: "elena.popa@iro-iasi.ro".into(),
            cod_parafa: "B45123".into(),
            hospital: "IRO Iasi".into(),
            cnp: "2850412226789".into(),
            born_date: None,
            sex: "F".into(),
            address: "Str. General Berthelot 2".into(),
            loc_name: "Iasi".into(),
            jud_name: "Iasi".into(),
            phone_number: "0744123456".into(),
            password: "Onco#2025".into(),
            confirm_password: "Onco#2025".into(),
        }
    }

    #[test]
    fn missing_rmn_is_reported_by_label() {
        let mut docs = full_set();
        docs.rmn = None;
        let errors = validate_documents(&docs).unwrap_err();
        assert_eq!(errors.messages(), vec!["Rmn file is required"]);
        assert_eq!(CoreError::from(errors).to_string(), "Rmn file is required");
    }

    #[test]
    fn document_type_and_size_are_checked() {
        let mut docs = full_set();
        docs.protocol = Some(UploadDocument {
            content_type: "application/zip".into(),
            ..pdf(10)
        });
        docs.blood = Some(pdf(MAX_DOCUMENT_BYTES + 1));
        docs.report = Some(UploadDocument {
            content_type: "image/png".into(),
            ..pdf(MAX_DOCUMENT_BYTES)
        });
        let errors = validate_documents(&docs).unwrap_err();
        assert_eq!(
            errors.messages(),
            vec!["Protocol must be a PDF or image file", "Blood must be less than 10MB"]
        );
    }

    #[test]
    fn draft_with_all_documents_becomes_upload() {
        let draft = ConsultationDraft {
            payload: Consultation::default(),
            documents: full_set(),
        };
        let upload = draft.into_upload().unwrap();
        assert_eq!(upload.rmn.bytes.len(), 10);
    }

    #[test]
    fn kpis_require_core_indicators() {
        let form = KpiForm {
            er: "20".into(),
            pr: "abc".into(),
            ..KpiForm::default()
        };
        let errors = consultation_from_kpis(3, &form, Utc::now()).unwrap_err();
        assert_eq!(errors.field("pr"), vec!["PR (Progesterone Receptor) must be a whole number"]);
        assert_eq!(errors.field("stage"), vec!["Stage is required"]);
        assert!(errors.field("er").is_empty());
        assert!(errors.field("carcinoma_in_situ").is_empty());
    }

    #[test]
    fn kpis_build_consultation() {
        let form = KpiForm {
            er: "20".into(),
            pr: "30".into(),
            her2: "-17".into(),
            ki67: "14".into(),
            tnm: "T2N0M1".into(),
            histologic_type: "Invasive Lobular Carcinoma".into(),
            histologic_grade: "3".into(),
            stage: "Early".into(),
            organ_failure_risk: true,
            recommended_sessions: "6".into(),
            ..KpiForm::default()
        };
        let c = consultation_from_kpis(3, &form, Utc::now()).unwrap();
        assert_eq!((c.er, c.pr, c.her2, c.ki67), (20, 30, -17, 14));
        assert_eq!(c.organ_failure_risk, 1);
        assert_eq!(c.nuclear_histologic_grade, 0);
        assert_eq!(c.patient_id, 3);
    }

    #[test]
    fn cnp_century_codes() {
        assert_eq!(birth_date_from_cnp("1850412226789"), NaiveDate::from_ymd_opt(1985, 4, 12));
        assert_eq!(birth_date_from_cnp("3850412226789"), NaiveDate::from_ymd_opt(1885, 4, 12));
        assert_eq!(birth_date_from_cnp("6050101226789"), NaiveDate::from_ymd_opt(2005, 1, 1));
        assert_eq!(birth_date_from_cnp("7850412226789"), None);
        assert_eq!(birth_date_from_cnp("1851332226789"), None);
        assert_eq!(birth_date_from_cnp("18504122267"), None);
    }

    #[test]
    fn registration_builds_request_with_derived_birth_date() {
        let request = validate_registration(&valid_form()).unwrap();
        assert_eq!(request.person.born_date, "1985-04-12T00:00:00Z");
        assert_eq!(request.person.address.loc.jud.name, "Iasi");
        assert_eq!(request.parafa, "B45123");
    }

    #[test]
    fn registration_rules() {
        let form = RegistrationForm {
            email: "not-an-email".into(),
            cnp: "12345".into(),
            sex: "X".into(),
            phone_number: "07441".into(),
            password: "short".into(),
            confirm_password: "other".into(),
            ..valid_form()
        };
        let errors = validate_registration(&form).unwrap_err();
        assert_eq!(errors.field("email"), vec!["Enter a valid email"]);
        assert_eq!(errors.field("cnp"), vec!["CNP must be exactly 13 digits"]);
        assert_eq!(errors.field("bornDate"), vec!["Date of birth is required"]);
        assert_eq!(errors.field("sex"), vec!["Invalid sex"]);
        assert_eq!(errors.field("phoneNumber"), vec!["Phone number must be exactly 10 digits"]);
        assert_eq!(errors.field("password").len(), 3);
        assert_eq!(errors.field("confirmPassword"), vec!["Passwords must match"]);
    }
}
