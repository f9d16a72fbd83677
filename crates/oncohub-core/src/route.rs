// Navigation targets the core can ask the front-end to move to.

use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Route {
    /// Public entry view.
    Login,
    /// Patient roster, the home view after login.
    Patients,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Patients => "/patients",
        }
    }
}
