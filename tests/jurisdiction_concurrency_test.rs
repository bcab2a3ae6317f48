// Concurrency tests for the single-admin-per-jurisdiction invariant

mod common;

use citizenly_backend::errors::internal::RegistrationError;
use citizenly_backend::types::dto::signup::SignupRequest;
use citizenly_backend::types::internal::context::RequestContext;

use common::setup_full_stack;

fn admin_request(email: &str, code: &str) -> SignupRequest {
    SignupRequest {
        email: email.to_string(),
        password: "Str0ng!pw".to_string(),
        first_name: "Juan".to_string(),
        last_name: "Cruz".to_string(),
        role_name: "barangay_admin".to_string(),
        jurisdiction_code: Some(code.to_string()),
    }
}

#[tokio::test]
async fn test_concurrent_signups_for_same_jurisdiction_have_one_winner() {
    let (coordinator, _app_data) = setup_full_stack().await;

    let mut handles = Vec::new();
    for i in 0..4 {
        let coordinator = coordinator.clone();
        handles.push(tokio::spawn(async move {
            coordinator
                .register(
                    &RequestContext::new(),
                    &admin_request(&format!("admin{}@example.ph", i), "097332001"),
                    None,
                )
                .await
        }));
    }

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(profile) => {
                assert_eq!(profile.jurisdiction_code.as_deref(), Some("097332001"));
                successes += 1;
            }
            Err(RegistrationError::JurisdictionAlreadyAdministered(code)) => {
                assert_eq!(code, "097332001");
                conflicts += 1;
            }
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(successes, 1, "exactly one signup may win the admin slot");
    assert_eq!(conflicts, 3);
}

#[tokio::test]
async fn test_concurrent_signups_for_different_jurisdictions_all_win() {
    let (coordinator, _app_data) = setup_full_stack().await;

    let codes = ["097332001", "097332002", "097332003"];
    let mut handles = Vec::new();
    for (i, code) in codes.iter().enumerate() {
        let coordinator = coordinator.clone();
        let code = code.to_string();
        handles.push(tokio::spawn(async move {
            coordinator
                .register(
                    &RequestContext::new(),
                    &admin_request(&format!("admin{}@example.ph", i), &code),
                    None,
                )
                .await
        }));
    }

    for handle in handles {
        assert!(handle.await.expect("task panicked").is_ok());
    }
}

#[tokio::test]
async fn test_advisory_status_tracks_reservation() {
    let (coordinator, app_data) = setup_full_stack().await;

    assert!(!app_data
        .profile_store
        .jurisdiction_admin_status("097332001")
        .await
        .unwrap());

    coordinator
        .register(
            &RequestContext::new(),
            &admin_request("admin@example.ph", "097332001"),
            None,
        )
        .await
        .unwrap();

    assert!(app_data
        .profile_store
        .jurisdiction_admin_status("097332001")
        .await
        .unwrap());

    // A different jurisdiction is unaffected
    assert!(!app_data
        .profile_store
        .jurisdiction_admin_status("097332002")
        .await
        .unwrap());
}
