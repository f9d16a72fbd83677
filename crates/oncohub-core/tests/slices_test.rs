#![allow(clippy::unwrap_used)]
// Resource slice lifecycle through `Hub` operations against a mock API.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use strum::IntoEnumIterator;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use oncohub_core::{
    Consultation, ConsultationDraft, CoreError, Doctor, DocumentKind, DocumentSet, GuidelineQuery, Hub,
    HubConfig, Person, RegistrationForm, ResponseOrdering, UploadDocument,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup_with(timeout: Duration, ordering: ResponseOrdering) -> (MockServer, Hub) {
    let server = MockServer::start().await;
    let url = Url::parse(&server.uri()).unwrap();
    let config = HubConfig::new(url.clone(), url)
        .with_timeout(timeout)
        .with_ordering(ordering);
    (server, Hub::new(config).unwrap())
}

async fn setup() -> (MockServer, Hub) {
    setup_with(Duration::from_secs(5), ResponseOrdering::LatestRequest).await
}

fn patient(id: i64, first: &str) -> serde_json::Value {
    json!({
        "patient": {
            "id_patient": id,
            "person": {
                "f_name": first,
                "l_name": "Stan",
                "cnp": "1700101123456",
                "born_date": "1970-01-01T00:00:00Z",
                "sex": "M"
            }
        }
    })
}

fn roster(ids: &[i64]) -> serde_json::Value {
    json!(ids.iter().map(|id| patient(*id, &format!("P{id}"))).collect::<Vec<_>>())
}

fn ids(hub: &Hub) -> Vec<i64> {
    hub.store()
        .patients()
        .snapshot()
        .data
        .iter()
        .map(|p| p.id_patient)
        .collect()
}

fn pdf(name: &str) -> UploadDocument {
    UploadDocument {
        file_name: name.into(),
        content_type: "application/pdf".into(),
        bytes: b"%PDF-1.7".to_vec(),
    }
}

async fn wait_for_requests(server: &MockServer, n: usize) {
    loop {
        let seen = server.received_requests().await.map_or(0, |r| r.len());
        if seen >= n {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_sets_loading_and_clears_error_before_response() {
    let (server, hub) = setup().await;
    hub.store().patients().fail("stale failure");

    Mock::given(method("GET"))
        .and(path("/patient/api/patients"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(roster(&[1]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let scope = hub.mount();
    let (result, during) = tokio::join!(hub.fetch_patients(&scope), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        hub.store().patients().snapshot()
    });

    result.unwrap();
    assert!(during.loading);
    assert_eq!(during.error, None);

    let after = hub.store().patients().snapshot();
    assert!(!after.loading);
    assert_eq!(ids(&hub), vec![1]);
}

#[tokio::test]
async fn test_failed_refetch_keeps_previous_roster() {
    let (server, hub) = setup().await;

    Mock::given(method("GET"))
        .and(path("/patient/api/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(roster(&[1, 2])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/patient/api/patients"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let scope = hub.mount();
    hub.fetch_patients(&scope).await.unwrap();
    let err = hub.fetch_patients(&scope).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    let state = hub.store().patients().snapshot();
    assert_eq!(ids(&hub), vec![1, 2]);
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Failed to fetch patients."));
}

#[tokio::test]
async fn test_rejection_prefers_server_text() {
    let (server, hub) = setup().await;
    Mock::given(method("POST"))
        .and(path("/patient/api/patient/create"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "CNP already exists"})))
        .mount(&server)
        .await;

    let scope = hub.mount();
    hub.create_patient(&Person::default(), &scope).await.unwrap_err();
    assert_eq!(
        hub.store().patients().snapshot().error.as_deref(),
        Some("CNP already exists")
    );
}

#[tokio::test]
async fn test_delete_removes_only_matching_patient() {
    let (server, hub) = setup().await;
    Mock::given(method("GET"))
        .and(path("/patient/api/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(roster(&[4, 7, 9, 12])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/patient/api/patient/delete/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Patient successfully deleted"})))
        .mount(&server)
        .await;

    let scope = hub.mount();
    hub.fetch_patients(&scope).await.unwrap();
    hub.delete_patient(9, &scope).await.unwrap();

    assert_eq!(ids(&hub), vec![4, 7, 12]);
    assert_eq!(
        hub.store().patients().snapshot().notice.as_deref(),
        Some("Patient successfully deleted")
    );
}

#[tokio::test]
async fn test_failed_delete_keeps_roster() {
    let (server, hub) = setup().await;
    Mock::given(method("GET"))
        .and(path("/patient/api/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(roster(&[1, 2])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/patient/api/patient/delete/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let scope = hub.mount();
    hub.fetch_patients(&scope).await.unwrap();
    hub.delete_patient(2, &scope).await.unwrap_err();

    assert_eq!(ids(&hub), vec![1, 2]);
    assert_eq!(
        hub.store().patients().snapshot().error.as_deref(),
        Some("Unknown error occurred while deleting patient")
    );
}

#[tokio::test]
async fn test_fetch_patient_fills_patient_slice() {
    let (server, hub) = setup().await;
    Mock::given(method("GET"))
        .and(path("/patient/api/patient/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(patient(7, "Radu")))
        .mount(&server)
        .await;

    let scope = hub.mount();
    hub.fetch_patient(7, &scope).await.unwrap();
    let held = hub.store().patient().snapshot().data.unwrap();
    assert_eq!(held.person.full_name(), "Radu Stan");
}

// ── Ordering ────────────────────────────────────────────────────────

/// Two overlapping roster fetches: the first issued answers last.
async fn overlapping_fetches(ordering: ResponseOrdering) -> Vec<i64> {
    let (server, hub) = setup_with(Duration::from_secs(5), ordering).await;
    Mock::given(method("GET"))
        .and(path("/patient/api/patients"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(roster(&[1]))
                .set_delay(Duration::from_millis(400)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/patient/api/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(roster(&[2])))
        .mount(&server)
        .await;

    let scope = hub.mount();
    let (first, second) = tokio::join!(hub.fetch_patients(&scope), async {
        wait_for_requests(&server, 1).await;
        hub.fetch_patients(&scope).await
    });
    first.unwrap();
    second.unwrap();
    assert!(!hub.store().patients().snapshot().loading);
    ids(&hub)
}

#[tokio::test]
async fn test_latest_request_discards_superseded_response() {
    assert_eq!(overlapping_fetches(ResponseOrdering::LatestRequest).await, vec![2]);
}

#[tokio::test]
async fn test_last_resolution_lets_late_response_win() {
    assert_eq!(overlapping_fetches(ResponseOrdering::LastResolution).await, vec![1]);
}

// ── Bounds ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_hanging_request_times_out() {
    let (server, hub) = setup_with(Duration::from_millis(200), ResponseOrdering::LatestRequest).await;
    Mock::given(method("GET"))
        .and(path("/doctor/api/doctor"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let scope = hub.mount();
    let err = hub.fetch_doctor(&scope).await.unwrap_err();

    assert!(matches!(err, CoreError::Timeout { .. }), "got: {err:?}");
    let state = hub.store().doctor().snapshot();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Request timed out after 200ms"));
}

#[tokio::test]
async fn test_view_teardown_cancels_request() {
    let (server, hub) = setup().await;
    Mock::given(method("GET"))
        .and(path("/consultation/api/3/get-all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let scope = hub.mount();
    let (result, ()) = tokio::join!(hub.fetch_consultations(3, &scope), async {
        wait_for_requests(&server, 1).await;
        scope.cancel();
    });

    assert_eq!(result.unwrap_err(), CoreError::Cancelled);
    let state = hub.store().consultations().snapshot();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Request cancelled"));
}

#[tokio::test]
async fn test_shutdown_cancels_new_scopes() {
    let (_server, hub) = setup().await;
    hub.shutdown();
    let scope = hub.mount();
    assert!(scope.is_cancelled());
    assert_eq!(hub.fetch_patients(&scope).await.unwrap_err(), CoreError::Cancelled);
}

// ── Consultations ───────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_rmn_blocks_upload() {
    let (server, hub) = setup().await;
    Mock::given(method("POST"))
        .and(path("/consultation/api/create"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let draft = ConsultationDraft {
        payload: Consultation {
            patient_id: 3,
            ..Consultation::default()
        },
        documents: DocumentSet {
            protocol: Some(pdf("protocol.pdf")),
            report: Some(pdf("report.pdf")),
            rmn: None,
            blood: Some(pdf("blood.pdf")),
        },
    };

    let scope = hub.mount();
    let err = hub.create_consultation(draft, &scope).await.unwrap_err();

    assert_eq!(
        err,
        CoreError::Validation {
            message: "Rmn file is required".into()
        }
    );
    let state = hub.store().consultations().snapshot();
    assert!(!state.loading);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_consultation_created_notice() {
    let (server, hub) = setup().await;
    Mock::given(method("POST"))
        .and(path("/consultation/api/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut documents = DocumentSet::default();
    for kind in DocumentKind::iter() {
        documents.set(kind, pdf(&format!("{kind}.pdf")));
    }

    let scope = hub.mount();
    hub.create_consultation(
        ConsultationDraft {
            payload: Consultation::default(),
            documents,
        },
        &scope,
    )
    .await
    .unwrap();

    assert_eq!(
        hub.store().consultations().snapshot().notice.as_deref(),
        Some("Consultation created successfully!")
    );
}

#[tokio::test]
async fn test_last_consultation_and_reset() {
    let (server, hub) = setup().await;
    Mock::given(method("GET"))
        .and(path("/consultation/api/3/get-last"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Id_patient": 3, "Stage": "Early"})))
        .mount(&server)
        .await;

    let scope = hub.mount();
    hub.fetch_last_consultation(3, &scope).await.unwrap();
    assert_eq!(
        hub.store().last_consultation().snapshot().data.unwrap().stage,
        "Early"
    );

    hub.store().reset_consultation();
    assert_eq!(hub.store().last_consultation().snapshot().data, None);
}

// ── Doctor ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_doctor_update_keeps_profile() {
    let (server, hub) = setup().await;
    Mock::given(method("GET"))
        .and(path("/doctor/api/doctor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id_doctor": 1,
            "parafa": "A1",
            "hospital": "IRO Iasi",
            "person": {"f_name": "Ioana", "l_name": "Marin", "cnp": "", "born_date": "", "sex": "F"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/doctor/api/doctor/update"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Doctor updated successfully"})))
        .mount(&server)
        .await;

    let scope = hub.mount();
    hub.fetch_doctor(&scope).await.unwrap();
    let mut edited: Doctor = hub.store().doctor().snapshot().data.unwrap();
    edited.hospital = "Spitalul Sf. Spiridon".into();
    hub.update_doctor(&edited, &scope).await.unwrap();

    let state = hub.store().doctor().snapshot();
    assert_eq!(state.data.unwrap().hospital, "IRO Iasi");
    assert_eq!(state.notice.as_deref(), Some("Doctor updated successfully"));
}

// ── Account ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_confirmation_without_token_makes_no_request() {
    let (server, hub) = setup().await;
    Mock::given(method("GET"))
        .and(path("/confirm"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let scope = hub.mount();
    hub.confirm_email(None, &scope).await.unwrap_err();
    hub.confirm_email(Some("  "), &scope).await.unwrap_err();

    assert_eq!(
        hub.store().confirmation().snapshot().error.as_deref(),
        Some("Invalid confirmation link.")
    );
}

#[tokio::test]
async fn test_confirmation_failure_uses_fallback() {
    let (server, hub) = setup().await;
    Mock::given(method("GET"))
        .and(path("/confirm"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let scope = hub.mount();
    hub.confirm_email(Some("expired"), &scope).await.unwrap_err();
    let state = hub.store().confirmation().snapshot();
    assert!(!state.data);
    assert_eq!(
        state.error.as_deref(),
        Some("An error occurred during email confirmation.")
    );
}

#[tokio::test]
async fn test_registration_success_and_server_rejection() {
    let (server, hub) = setup().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "Check your e-mail"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"error": "User already exists"})))
        .mount(&server)
        .await;

    let form = RegistrationForm {
        name: "Elena".into(),
        surname: "Popa".into(),
        email: "elena.popa@iro-iasi.ro".into(),
        cod_parafa: "B45123".into(),
        hospital: "IRO Iasi".into(),
        cnp: "2850412226789".into(),
        sex: "F".into(),
        address: "Str. General Berthelot 2".into(),
        loc_name: "Iasi".into(),
        jud_name: "Iasi".into(),
        phone_number: "0744123456".into(),
        password: "Onco#2025".into(),
        confirm_password: "Onco#2025".into(),
        ..RegistrationForm::default()
    };

    let scope = hub.mount();
    hub.register(&form, &scope).await.unwrap();
    assert!(hub.store().registration().snapshot().data);

    hub.register(&form, &scope).await.unwrap_err();
    let state = hub.store().registration().snapshot();
    assert!(!state.data);
    assert_eq!(state.error.as_deref(), Some("User already exists"));
}

#[tokio::test]
async fn test_invalid_registration_is_not_sent() {
    let (server, hub) = setup().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let scope = hub.mount();
    let err = hub
        .register(&RegistrationForm::default(), &scope)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));
}

// ── Guidelines ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_guidelines_absent_is_none() {
    let (server, hub) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/guidelines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"esmo_guidelines": null})))
        .mount(&server)
        .await;

    let scope = hub.mount();
    let query = GuidelineQuery {
        diagnostic: "Triple negative".into(),
        er: 0,
        pr: 0,
    };
    hub.fetch_guidelines(&query, &scope).await.unwrap();
    let state = hub.store().guidelines().snapshot();
    assert_eq!(state.data, None);
    assert!(!state.loading);
    assert_eq!(state.error, None);
}
