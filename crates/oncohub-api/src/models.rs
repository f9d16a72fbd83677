// Wire types for the e-OncoHub API.
//
// Field names follow the backend services exactly (snake_case for the
// person/patient/doctor services, the consultation service's mixed
// spelling included). Payloads are parsed here, at the boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

pub type PatientId = i64;

// ── Auth ────────────────────────────────────────────────────────────

/// Response of `GET /auth/api/check`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCheck {
    #[serde(rename = "isLoggedIn", default)]
    pub is_logged_in: bool,
    /// Whatever the auth service put in the token claims; opaque here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>,
}

/// The `{ "message": ... }` acknowledgement most mutating endpoints return.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub person: Person,
    pub parafa: String,
    pub hospital: String,
    pub password: String,
}

// ── People ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct County {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locality {
    pub name: String,
    pub jud: County,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub address: String,
    pub loc: Locality,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualAddress {
    pub email: String,
    pub phone_number: String,
}

/// A person record, shared by patients and doctors.
///
/// `id_person` is assigned by the server and omitted from request bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_person: Option<i64>,
    pub f_name: String,
    pub l_name: String,
    pub cnp: String,
    /// ISO date or RFC 3339 timestamp, depending on the service.
    pub born_date: String,
    pub sex: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub virtual_address: VirtualAddress,
}

impl Person {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.f_name, self.l_name)
    }
}

// ── Patients ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id_patient: PatientId,
    pub person: Person,
}

/// The `{ "patient": ... }` wrapper used by the list and get endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientEnvelope {
    pub patient: Patient,
}

/// Body of the patient create / update endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRequest {
    pub person: Person,
}

// ── Doctor ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(default)]
    pub id_doctor: i64,
    #[serde(default)]
    pub parafa: String,
    #[serde(default)]
    pub hospital: String,
    pub person: Person,
}

// ── Consultations ───────────────────────────────────────────────────

/// A consultation record, as stored and as submitted.
///
/// The document URL fields are filled in by the server after upload and
/// are empty on submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Consultation {
    #[serde(rename = "Appointment_Date")]
    pub appointment_date: Option<DateTime<Utc>>,
    #[serde(rename = "ER")]
    pub er: i64,
    #[serde(rename = "PR")]
    pub pr: i64,
    #[serde(rename = "HER2")]
    pub her2: i64,
    #[serde(rename = "Ki67")]
    pub ki67: i64,
    #[serde(rename = "TNM")]
    pub tnm: String,
    #[serde(rename = "Histologic Type")]
    pub histologic_type: String,
    #[serde(rename = "Histologic Grade")]
    pub histologic_grade: i64,
    #[serde(rename = "Carcinoma in situ")]
    pub carcinoma_in_situ: String,
    #[serde(rename = "Nuclear Histologic Grade")]
    pub nuclear_histologic_grade: i64,
    #[serde(rename = "Stage")]
    pub stage: String,
    #[serde(rename = "SLT_Organ_Failure")]
    pub organ_failure_risk: i64,
    #[serde(rename = "Treatement_Cytostatic")]
    pub cytostatic_treatment: String,
    #[serde(rename = "Recommended_Nr_Of_Sessions")]
    pub recommended_sessions: i64,
    #[serde(rename = "Id_patient")]
    pub patient_id: PatientId,
    #[serde(rename = "Notes")]
    pub notes: String,
    #[serde(rename = "Protocol_Document", skip_serializing_if = "String::is_empty")]
    pub protocol_document: String,
    #[serde(rename = "Report_Document", skip_serializing_if = "String::is_empty")]
    pub report_document: String,
    #[serde(rename = "RMN_Document", skip_serializing_if = "String::is_empty")]
    pub rmn_document: String,
    #[serde(rename = "Blood_Document", skip_serializing_if = "String::is_empty")]
    pub blood_document: String,
    #[serde(rename = "Diagnostic", skip_serializing_if = "String::is_empty")]
    pub diagnostic: String,
}

/// The four documents attached to every consultation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum DocumentKind {
    Protocol,
    Report,
    Rmn,
    Blood,
}

impl DocumentKind {
    /// Multipart field name for this document.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Protocol => "protocol",
            Self::Report => "report",
            Self::Rmn => "rmn",
            Self::Blood => "blood",
        }
    }

    /// Capitalized label used in user-facing messages ("Rmn file is required").
    pub fn label(self) -> &'static str {
        match self {
            Self::Protocol => "Protocol",
            Self::Report => "Report",
            Self::Rmn => "Rmn",
            Self::Blood => "Blood",
        }
    }
}

/// One file to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDocument {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A validated consultation submission: the JSON payload plus all four
/// documents. Built by `oncohub-core` after client-side validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsultationUpload {
    pub payload: Consultation,
    pub protocol: UploadDocument,
    pub report: UploadDocument,
    pub rmn: UploadDocument,
    pub blood: UploadDocument,
}

impl ConsultationUpload {
    pub fn document(&self, kind: DocumentKind) -> &UploadDocument {
        match kind {
            DocumentKind::Protocol => &self.protocol,
            DocumentKind::Report => &self.report,
            DocumentKind::Rmn => &self.rmn,
            DocumentKind::Blood => &self.blood,
        }
    }
}

// ── Guidelines ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidelineItem {
    pub title_item: String,
    pub indication: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_indication: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidelineSection {
    pub title: String,
    #[serde(default)]
    pub items: Vec<GuidelineItem>,
}

/// Treatment guidelines for one diagnostic and receptor profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guidelines {
    pub first_line_treatment: GuidelineSection,
    pub disease_progression: GuidelineSection,
}

/// Lookup key for [`Guidelines`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuidelineQuery {
    pub diagnostic: String,
    pub er: i64,
    pub pr: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn consultation_uses_wire_field_names() {
        let raw = json!({
            "Appointment_Date": "2025-03-01T10:00:00Z",
            "ER": 20,
            "PR": 30,
            "HER2": -17,
            "Ki67": 14,
            "TNM": "T2N0M1",
            "Histologic Type": "Invasive Lobular Carcinoma",
            "Histologic Grade": 3,
            "Carcinoma in situ": "Yes",
            "Nuclear Histologic Grade": 2,
            "Stage": "Early",
            "SLT_Organ_Failure": 1,
            "Treatement_Cytostatic": "Paclitaxel",
            "Recommended_Nr_Of_Sessions": 6,
            "Id_patient": 7,
            "Notes": "",
            "RMN_Document": "https://files/rmn.pdf",
            "Diagnostic": "Luminal A"
        });
        let consultation: Consultation = serde_json::from_value(raw).unwrap();
        assert_eq!(consultation.her2, -17);
        assert_eq!(consultation.histologic_type, "Invasive Lobular Carcinoma");
        assert_eq!(consultation.patient_id, 7);
        assert_eq!(consultation.rmn_document, "https://files/rmn.pdf");
        assert!(consultation.protocol_document.is_empty());
    }

    #[test]
    fn submission_omits_server_filled_fields() {
        let consultation = Consultation {
            patient_id: 3,
            ..Consultation::default()
        };
        let value = serde_json::to_value(&consultation).unwrap();
        assert!(value.get("Protocol_Document").is_none());
        assert!(value.get("Diagnostic").is_none());
        assert_eq!(value["Id_patient"], 3);
    }

    #[test]
    fn person_request_omits_server_id() {
        let person = Person {
            f_name: "Ana".into(),
            l_name: "Pop".into(),
            ..Person::default()
        };
        let value = serde_json::to_value(PatientRequest { person }).unwrap();
        assert!(value["person"].get("id_person").is_none());
        assert_eq!(value["person"]["address"]["loc"]["jud"]["name"], "");
    }

    #[test]
    fn session_check_reads_camel_case_flag() {
        let check: SessionCheck =
            serde_json::from_str(r#"{"isLoggedIn":true,"user":"12"}"#).unwrap();
        assert!(check.is_logged_in);
        assert_eq!(check.user, Some(json!("12")));
    }
}
