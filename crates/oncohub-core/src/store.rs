// ── Application store ──
//
// Owns every resource slice. Views get read access through the accessors
// and change state only by calling `Hub` operations.

use oncohub_api::{Consultation, Doctor, Guidelines, Patient};

use crate::slice::{ResponseOrdering, Slice};

pub struct AppStore {
    patients: Slice<Vec<Patient>>,
    patient: Slice<Option<Patient>>,
    doctor: Slice<Option<Doctor>>,
    last_consultation: Slice<Option<Consultation>>,
    consultations: Slice<Vec<Consultation>>,
    registration: Slice<bool>,
    confirmation: Slice<bool>,
    guidelines: Slice<Option<Guidelines>>,
}

impl AppStore {
    pub fn new(ordering: ResponseOrdering) -> Self {
        Self {
            patients: Slice::new("patients", ordering),
            patient: Slice::new("patient", ordering),
            doctor: Slice::new("doctor", ordering),
            last_consultation: Slice::new("last_consultation", ordering),
            consultations: Slice::new("consultations", ordering),
            registration: Slice::new("registration", ordering),
            confirmation: Slice::new("confirmation", ordering),
            guidelines: Slice::new("guidelines", ordering),
        }
    }

    /// The doctor's patient roster.
    pub fn patients(&self) -> &Slice<Vec<Patient>> {
        &self.patients
    }

    /// The patient currently open.
    pub fn patient(&self) -> &Slice<Option<Patient>> {
        &self.patient
    }

    pub fn doctor(&self) -> &Slice<Option<Doctor>> {
        &self.doctor
    }

    pub fn last_consultation(&self) -> &Slice<Option<Consultation>> {
        &self.last_consultation
    }

    pub fn consultations(&self) -> &Slice<Vec<Consultation>> {
        &self.consultations
    }

    /// `data` is `true` once registration went through.
    pub fn registration(&self) -> &Slice<bool> {
        &self.registration
    }

    /// `data` is `true` once the e-mail address is confirmed.
    pub fn confirmation(&self) -> &Slice<bool> {
        &self.confirmation
    }

    pub fn guidelines(&self) -> &Slice<Option<Guidelines>> {
        &self.guidelines
    }

    /// Reset the consultation slices (leaving a patient's profile).
    pub fn reset_consultation(&self) {
        self.last_consultation.reset();
        self.consultations.reset();
    }

    /// Reset every slice, e.g. after logout.
    pub fn reset_all(&self) {
        self.patients.reset();
        self.patient.reset();
        self.doctor.reset();
        self.reset_consultation();
        self.registration.reset();
        self.confirmation.reset();
        self.guidelines.reset();
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new(ResponseOrdering::default())
    }
}
