// Treatment guideline lookup.

use oncohub_api::GuidelineQuery;

use super::{Hub, settle};
use crate::bounds::ViewScope;
use crate::error::CoreError;
use crate::slice::OperationKind;

const FETCH_FAILED: &str = "Failed to load guidelines";

impl Hub {
    /// Load guidelines for a diagnostic; `data` is `None` when the service
    /// has none for the combination.
    pub async fn fetch_guidelines(&self, query: &GuidelineQuery, scope: &ViewScope) -> Result<(), CoreError> {
        let slice = self.store().guidelines();
        let ticket = slice.begin(OperationKind::FetchOne);
        settle(
            slice,
            ticket,
            &self.bounds(scope),
            FETCH_FAILED,
            self.client().get_guidelines(query),
            |state, guidelines| state.data = guidelines,
        )
        .await
    }
}
