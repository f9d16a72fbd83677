// Registration and e-mail confirmation.

use super::{Hub, settle};
use crate::bounds::ViewScope;
use crate::error::CoreError;
use crate::slice::OperationKind;
use crate::validation::{RegistrationForm, validate_registration};

const REGISTRATION_FAILED: &str = "An error occurred during registration.";
const CONFIRMATION_FAILED: &str = "An error occurred during email confirmation.";
const INVALID_LINK: &str = "Invalid confirmation link.";

impl Hub {
    /// Validate the form and register a doctor account.
    pub async fn register(&self, form: &RegistrationForm, scope: &ViewScope) -> Result<(), CoreError> {
        let request = validate_registration(form)?;

        let slice = self.store().registration();
        let ticket = slice.begin_with(OperationKind::Submit, |state| state.data = false);
        settle(
            slice,
            ticket,
            &self.bounds(scope),
            REGISTRATION_FAILED,
            self.client().register(&request),
            |state, _| state.data = true,
        )
        .await
    }

    /// Confirm an e-mail address. A missing or blank token fails at once
    /// without contacting the server.
    pub async fn confirm_email(&self, token: Option<&str>, scope: &ViewScope) -> Result<(), CoreError> {
        let slice = self.store().confirmation();
        let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
            slice.fail(INVALID_LINK);
            return Err(CoreError::Validation {
                message: INVALID_LINK.to_owned(),
            });
        };

        let ticket = slice.begin_with(OperationKind::Submit, |state| state.data = false);
        settle(
            slice,
            ticket,
            &self.bounds(scope),
            CONFIRMATION_FAILED,
            self.client().confirm_email(token),
            |state, _| state.data = true,
        )
        .await
    }
}
