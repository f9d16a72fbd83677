// Consultation operations.

use oncohub_api::PatientId;
use tracing::debug;

use super::{Hub, settle};
use crate::bounds::ViewScope;
use crate::error::CoreError;
use crate::slice::OperationKind;
use crate::validation::ConsultationDraft;

const FETCH_LAST_FAILED: &str = "Failed to fetch consultation.";
const FETCH_ALL_FAILED: &str = "Failed to fetch consultations.";
const CREATE_FAILED: &str = "Failed to create consultation.";
const CREATED: &str = "Consultation created successfully!";

impl Hub {
    pub async fn fetch_last_consultation(
        &self,
        patient: PatientId,
        scope: &ViewScope,
    ) -> Result<(), CoreError> {
        let slice = self.store().last_consultation();
        let ticket = slice.begin(OperationKind::FetchOne);
        settle(
            slice,
            ticket,
            &self.bounds(scope),
            FETCH_LAST_FAILED,
            self.client().get_last_consultation(patient),
            |state, consultation| state.data = Some(consultation),
        )
        .await
    }

    pub async fn fetch_consultations(
        &self,
        patient: PatientId,
        scope: &ViewScope,
    ) -> Result<(), CoreError> {
        let slice = self.store().consultations();
        let ticket = slice.begin(OperationKind::FetchAll);
        settle(
            slice,
            ticket,
            &self.bounds(scope),
            FETCH_ALL_FAILED,
            self.client().list_consultations(patient),
            |state, list| state.data = list,
        )
        .await
    }

    /// Validate and upload a new consultation.
    ///
    /// Validation failures come back as [`CoreError::Validation`] and
    /// nothing is dispatched: the slice isn't touched and no request is
    /// made.
    pub async fn create_consultation(
        &self,
        draft: ConsultationDraft,
        scope: &ViewScope,
    ) -> Result<(), CoreError> {
        let upload = draft.into_upload().map_err(|errors| {
            debug!(%errors, "consultation rejected before upload");
            CoreError::from(errors)
        })?;

        let slice = self.store().consultations();
        let ticket = slice.begin(OperationKind::Create);
        settle(
            slice,
            ticket,
            &self.bounds(scope),
            CREATE_FAILED,
            self.client().create_consultation(&upload),
            |state, _| state.notice = Some(CREATED.to_owned()),
        )
        .await
    }
}
