// Treatment guideline lookup
//
// Served by the consultation stack, keyed by diagnostic and hormone
// receptor scores. The service answers `{"esmo_guidelines": null}` when it
// has nothing for the combination.

use serde::Deserialize;
use tracing::debug;

use crate::client::OncoHubClient;
use crate::error::Error;
use crate::models::{GuidelineQuery, Guidelines};

#[derive(Deserialize)]
struct GuidelinesEnvelope {
    #[serde(default)]
    esmo_guidelines: Option<Guidelines>,
}

impl OncoHubClient {
    /// `GET /api/guidelines?diagnostic=&ER=&PR=`
    pub async fn get_guidelines(&self, query: &GuidelineQuery) -> Result<Option<Guidelines>, Error> {
        let url = self.api_url("/api/guidelines")?;
        debug!(diagnostic = %query.diagnostic, er = query.er, pr = query.pr, "fetching guidelines");
        let envelope: GuidelinesEnvelope = self
            .get_with_params(
                url,
                &[
                    ("diagnostic", query.diagnostic.clone()),
                    ("ER", query.er.to_string()),
                    ("PR", query.pr.to_string()),
                ],
            )
            .await?;
        Ok(envelope.esmo_guidelines)
    }
}
