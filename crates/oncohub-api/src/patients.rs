// Patient roster endpoints
//
// The patient service wraps every record in `{"patient": ...}` on reads
// and takes a bare `{"person": ...}` on writes.

use tracing::debug;

use crate::client::OncoHubClient;
use crate::error::Error;
use crate::models::{MessageResponse, Patient, PatientEnvelope, PatientId, PatientRequest, Person};

impl OncoHubClient {
    /// List every patient of the logged-in doctor.
    ///
    /// `GET /patient/api/patients`. The service answers `null` for an empty
    /// roster, which comes back as an empty list.
    pub async fn list_patients(&self) -> Result<Vec<Patient>, Error> {
        let url = self.api_url("/patient/api/patients")?;
        debug!("listing patients");
        let envelopes: Option<Vec<PatientEnvelope>> = self.get(url).await?;
        Ok(envelopes
            .unwrap_or_default()
            .into_iter()
            .map(|e| e.patient)
            .collect())
    }

    /// `POST /patient/api/patient/create`
    pub async fn create_patient(&self, person: &Person) -> Result<MessageResponse, Error> {
        let url = self.api_url("/patient/api/patient/create")?;
        debug!(cnp = %person.cnp, "creating patient");
        self.post(
            url,
            &PatientRequest {
                person: person.clone(),
            },
        )
        .await
    }

    /// `GET /patient/api/patient/{id}`
    pub async fn get_patient(&self, id: PatientId) -> Result<Patient, Error> {
        let url = self.api_url(&format!("/patient/api/patient/{id}"))?;
        debug!(id, "fetching patient");
        let envelope: PatientEnvelope = self.get(url).await?;
        Ok(envelope.patient)
    }

    /// `PUT /patient/api/patient/update/{id}`
    pub async fn update_patient(
        &self,
        id: PatientId,
        person: &Person,
    ) -> Result<MessageResponse, Error> {
        let url = self.api_url(&format!("/patient/api/patient/update/{id}"))?;
        debug!(id, "updating patient");
        self.put(
            url,
            &PatientRequest {
                person: person.clone(),
            },
        )
        .await
    }

    /// `DELETE /patient/api/patient/delete/{id}`
    pub async fn delete_patient(&self, id: PatientId) -> Result<MessageResponse, Error> {
        let url = self.api_url(&format!("/patient/api/patient/delete/{id}"))?;
        debug!(id, "deleting patient");
        self.delete(url).await
    }
}
