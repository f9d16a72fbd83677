// Doctor profile endpoints (the profile of the logged-in account)

use tracing::debug;

use crate::client::OncoHubClient;
use crate::error::Error;
use crate::models::{Doctor, MessageResponse};

impl OncoHubClient {
    /// `GET /doctor/api/doctor`
    pub async fn get_doctor_profile(&self) -> Result<Doctor, Error> {
        let url = self.api_url("/doctor/api/doctor")?;
        debug!("fetching doctor profile");
        self.get(url).await
    }

    /// `PUT /doctor/api/doctor/update`
    ///
    /// The service acknowledges with a message only; fetch the profile
    /// again to see the stored result.
    pub async fn update_doctor_profile(&self, doctor: &Doctor) -> Result<MessageResponse, Error> {
        let url = self.api_url("/doctor/api/doctor/update")?;
        debug!(id = doctor.id_doctor, "updating doctor profile");
        self.put(url, doctor).await
    }
}
