// Doctor profile operations.

use oncohub_api::Doctor;

use super::{Hub, settle};
use crate::bounds::ViewScope;
use crate::error::CoreError;
use crate::slice::OperationKind;

const FETCH_FAILED: &str = "Failed to load doctor profile";
const UPDATE_FAILED: &str = "Failed to update doctor profile";

impl Hub {
    pub async fn fetch_doctor(&self, scope: &ViewScope) -> Result<(), CoreError> {
        let slice = self.store().doctor();
        let ticket = slice.begin(OperationKind::FetchOne);
        settle(
            slice,
            ticket,
            &self.bounds(scope),
            FETCH_FAILED,
            self.client().get_doctor_profile(),
            |state, doctor| state.data = Some(doctor),
        )
        .await
    }

    /// Save profile changes. The server answers with a message only, so
    /// the held profile is left as is until the next fetch.
    pub async fn update_doctor(&self, doctor: &Doctor, scope: &ViewScope) -> Result<(), CoreError> {
        let slice = self.store().doctor();
        let ticket = slice.begin(OperationKind::Update);
        settle(
            slice,
            ticket,
            &self.bounds(scope),
            UPDATE_FAILED,
            self.client().update_doctor_profile(doctor),
            |state, ack| state.notice = ack.message,
        )
        .await
    }
}
