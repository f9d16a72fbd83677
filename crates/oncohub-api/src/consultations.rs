// Consultation endpoints
//
// Reads are plain JSON. Creation is a multipart upload: the consultation
// record as a `json` text field plus one file part per document kind.

use reqwest::multipart::{Form, Part};
use strum::IntoEnumIterator;
use tracing::debug;

use crate::client::OncoHubClient;
use crate::error::Error;
use crate::models::{Consultation, ConsultationUpload, DocumentKind, MessageResponse, PatientId};

impl OncoHubClient {
    /// Most recent consultation for a patient.
    ///
    /// `GET /consultation/api/{id}/get-last`
    pub async fn get_last_consultation(&self, patient: PatientId) -> Result<Consultation, Error> {
        let url = self.api_url(&format!("/consultation/api/{patient}/get-last"))?;
        debug!(patient, "fetching last consultation");
        self.get(url).await
    }

    /// Full consultation history for a patient, oldest first as stored.
    ///
    /// `GET /consultation/api/{id}/get-all`
    pub async fn list_consultations(&self, patient: PatientId) -> Result<Vec<Consultation>, Error> {
        let url = self.api_url(&format!("/consultation/api/{patient}/get-all"))?;
        debug!(patient, "listing consultations");
        let list: Option<Vec<Consultation>> = self.get(url).await?;
        Ok(list.unwrap_or_default())
    }

    /// `POST /consultation/api/create` (multipart/form-data)
    pub async fn create_consultation(
        &self,
        upload: &ConsultationUpload,
    ) -> Result<MessageResponse, Error> {
        let url = self.api_url("/consultation/api/create")?;
        debug!(patient = upload.payload.patient_id, "creating consultation");
        let form = consultation_form(upload)?;
        self.post_multipart(url, form).await
    }
}

fn consultation_form(upload: &ConsultationUpload) -> Result<Form, Error> {
    let payload = serde_json::to_string(&upload.payload).map_err(|e| Error::Deserialization {
        message: format!("failed to encode consultation: {e}"),
        body: String::new(),
    })?;

    let mut form = Form::new().text("json", payload);
    for kind in DocumentKind::iter() {
        let doc = upload.document(kind);
        let part = Part::bytes(doc.bytes.clone())
            .file_name(doc.file_name.clone())
            .mime_str(&doc.content_type)
            .map_err(|e| Error::ClientSetup(format!("invalid content type for {kind}: {e}")))?;
        form = form.part(kind.field_name(), part);
    }
    Ok(form)
}
