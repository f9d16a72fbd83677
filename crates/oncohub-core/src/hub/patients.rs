// Patient roster operations.

use oncohub_api::{PatientId, Person};

use super::{Hub, settle};
use crate::bounds::ViewScope;
use crate::error::CoreError;
use crate::slice::OperationKind;

const FETCH_ALL_FAILED: &str = "Failed to fetch patients.";
const CREATE_FAILED: &str = "Unknown error occurred while creating patient";
const FETCH_ONE_FAILED: &str = "Failed to fetch patient.";
const DELETE_FAILED: &str = "Unknown error occurred while deleting patient";
const UPDATE_FAILED: &str = "Failed to update patient";

impl Hub {
    /// Replace the roster with the server's list.
    pub async fn fetch_patients(&self, scope: &ViewScope) -> Result<(), CoreError> {
        let slice = self.store().patients();
        let ticket = slice.begin(OperationKind::FetchAll);
        settle(
            slice,
            ticket,
            &self.bounds(scope),
            FETCH_ALL_FAILED,
            self.client().list_patients(),
            |state, patients| state.data = patients,
        )
        .await
    }

    /// Load one patient into the `patient` slice.
    pub async fn fetch_patient(&self, id: PatientId, scope: &ViewScope) -> Result<(), CoreError> {
        let slice = self.store().patient();
        let ticket = slice.begin(OperationKind::FetchOne);
        settle(
            slice,
            ticket,
            &self.bounds(scope),
            FETCH_ONE_FAILED,
            self.client().get_patient(id),
            |state, patient| state.data = Some(patient),
        )
        .await
    }

    /// Create a patient. The roster isn't refreshed; call
    /// [`fetch_patients`](Self::fetch_patients) afterwards.
    pub async fn create_patient(&self, person: &Person, scope: &ViewScope) -> Result<(), CoreError> {
        let slice = self.store().patients();
        let ticket = slice.begin(OperationKind::Create);
        settle(
            slice,
            ticket,
            &self.bounds(scope),
            CREATE_FAILED,
            self.client().create_patient(person),
            |state, ack| state.notice = ack.message,
        )
        .await
    }

    pub async fn update_patient(
        &self,
        id: PatientId,
        person: &Person,
        scope: &ViewScope,
    ) -> Result<(), CoreError> {
        let slice = self.store().patients();
        let ticket = slice.begin(OperationKind::Update);
        settle(
            slice,
            ticket,
            &self.bounds(scope),
            UPDATE_FAILED,
            self.client().update_patient(id, person),
            |state, ack| state.notice = ack.message,
        )
        .await
    }

    /// Delete a patient and drop exactly that entry from the roster.
    pub async fn delete_patient(&self, id: PatientId, scope: &ViewScope) -> Result<(), CoreError> {
        let slice = self.store().patients();
        let ticket = slice.begin(OperationKind::Delete);
        settle(
            slice,
            ticket,
            &self.bounds(scope),
            DELETE_FAILED,
            self.client().delete_patient(id),
            |state, ack| {
                state.data.retain(|p| p.id_patient != id);
                state.notice = ack.message;
            },
        )
        .await
    }
}
