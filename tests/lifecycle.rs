//! Appointment lifecycle: booking, ownership gates, reschedule bookkeeping,
//! and clinic status transitions, exercised against the service layer over
//! an in-memory database.

mod common;

use chrono::{Duration, Local};
use clinichub_backend::models::{AppointmentPatch, AppointmentStatus, RescheduleRequest};
use clinichub_backend::ApiError;
use common::{booking, caller, create_clinic, register, register_clinic_staff, test_app};

fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

fn yesterday() -> String {
    (Local::now().date_naive() - Duration::days(1))
        .format("%Y-%m-%d")
        .to_string()
}

#[tokio::test]
async fn booking_starts_pending_with_fresh_id() {
    let app = test_app().await;

    let first = app
        .appointments
        .book(booking("City Clinic", "2099-01-01"), None)
        .await
        .unwrap();
    let second = app
        .appointments
        .book(booking("City Clinic", "2099-01-02"), None)
        .await
        .unwrap();

    assert_eq!(first.status, AppointmentStatus::Pending);
    assert_eq!(second.status, AppointmentStatus::Pending);
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn booking_resolves_clinic_by_exact_name() {
    let app = test_app().await;
    let clinic_id = create_clinic(&app, "Acme Dental", "Dental").await;

    let matched = app
        .appointments
        .book(booking("Acme Dental", "2099-01-01"), None)
        .await
        .unwrap();
    assert_eq!(matched.clinic_id, Some(clinic_id));
    assert_eq!(matched.clinic, "Acme Dental");

    // No exact match: clinic_id stays null, the literal text is stored, and
    // the booking still succeeds.
    let unmatched = app
        .appointments
        .book(booking("acme dental", "2099-01-01"), None)
        .await
        .unwrap();
    assert_eq!(unmatched.clinic_id, None);
    assert_eq!(unmatched.clinic, "acme dental");
}

#[tokio::test]
async fn authenticated_booking_binds_owner() {
    let app = test_app().await;
    create_clinic(&app, "City Clinic", "General").await;
    let alice = register(&app, "Alice", "alice@example.com").await;

    let appointment = app
        .appointments
        .book(booking("City Clinic", "2099-01-01"), Some(&caller(&alice)))
        .await
        .unwrap();

    assert_eq!(appointment.user_id, Some(alice.id));
    assert_eq!(appointment.status, AppointmentStatus::Pending);
}

#[tokio::test]
async fn booking_rejects_missing_fields() {
    let app = test_app().await;
    let mut request = booking("City Clinic", "2099-01-01");
    request.email = "not-an-email".to_string();
    request.area = "  ".to_string();

    let err = app.appointments.book(request, None).await.unwrap_err();
    match err {
        ApiError::Validation(errors) => {
            let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
            assert!(fields.contains(&"email"));
            assert!(fields.contains(&"area"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn anonymous_appointment_has_no_ownership_barrier() {
    let app = test_app().await;
    let anonymous = app
        .appointments
        .book(booking("City Clinic", "2099-01-01"), None)
        .await
        .unwrap();

    let stranger = register(&app, "Bob", "bob@example.com").await;
    let fetched = app
        .appointments
        .get(anonymous.id, &caller(&stranger))
        .await
        .unwrap();
    assert_eq!(fetched.id, anonymous.id);
    assert_eq!(fetched.user_id, None);
}

#[tokio::test]
async fn owned_appointment_is_forbidden_to_other_users() {
    let app = test_app().await;
    let alice = register(&app, "Alice", "alice@example.com").await;
    let bob = register(&app, "Bob", "bob@example.com").await;

    let appointment = app
        .appointments
        .book(booking("City Clinic", "2099-01-01"), Some(&caller(&alice)))
        .await
        .unwrap();

    let read = app.appointments.get(appointment.id, &caller(&bob)).await;
    assert!(matches!(read, Err(ApiError::Forbidden(_))));

    let update = app
        .appointments
        .update(
            appointment.id,
            AppointmentPatch {
                area: Some("Uptown".to_string()),
                ..AppointmentPatch::default()
            },
            &caller(&bob),
        )
        .await;
    assert!(matches!(update, Err(ApiError::Forbidden(_))));

    let cancel = app.appointments.cancel(appointment.id, &caller(&bob)).await;
    assert!(matches!(cancel, Err(ApiError::Forbidden(_))));

    // Still there for the owner.
    let fetched = app
        .appointments
        .get(appointment.id, &caller(&alice))
        .await
        .unwrap();
    assert_eq!(fetched.id, appointment.id);
}

#[tokio::test]
async fn elevated_role_bypasses_ownership() {
    let app = test_app().await;
    let clinic_id = create_clinic(&app, "City Clinic", "General").await;
    let alice = register(&app, "Alice", "alice@example.com").await;
    let staff = register_clinic_staff(&app, "Staff", "staff@example.com", clinic_id).await;

    let appointment = app
        .appointments
        .book(booking("City Clinic", "2099-01-01"), Some(&caller(&alice)))
        .await
        .unwrap();

    let fetched = app
        .appointments
        .get(appointment.id, &caller(&staff))
        .await
        .unwrap();
    assert_eq!(fetched.id, appointment.id);
}

#[tokio::test]
async fn missing_appointment_is_not_found() {
    let app = test_app().await;
    let alice = register(&app, "Alice", "alice@example.com").await;
    let result = app.appointments.get(9999, &caller(&alice)).await;
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn empty_patch_is_a_noop() {
    let app = test_app().await;
    let alice = register(&app, "Alice", "alice@example.com").await;
    let appointment = app
        .appointments
        .book(booking("City Clinic", "2099-01-01"), Some(&caller(&alice)))
        .await
        .unwrap();

    let unchanged = app
        .appointments
        .update(appointment.id, AppointmentPatch::default(), &caller(&alice))
        .await
        .unwrap();
    assert_eq!(unchanged.area, appointment.area);
    assert_eq!(unchanged.date, appointment.date);
    assert_eq!(unchanged.status, appointment.status);
}

#[tokio::test]
async fn general_update_does_not_validate_dates() {
    let app = test_app().await;
    let alice = register(&app, "Alice", "alice@example.com").await;
    let appointment = app
        .appointments
        .book(booking("City Clinic", "2099-01-01"), Some(&caller(&alice)))
        .await
        .unwrap();

    // The update path leaves dates unchecked; only reschedule validates.
    let updated = app
        .appointments
        .update(
            appointment.id,
            AppointmentPatch {
                date: Some("whenever works".to_string()),
                ..AppointmentPatch::default()
            },
            &caller(&alice),
        )
        .await
        .unwrap();
    assert_eq!(updated.date, "whenever works");
}

#[tokio::test]
async fn reschedule_appends_one_audit_row_and_reconfirms() {
    let app = test_app().await;
    let alice = register(&app, "Alice", "alice@example.com").await;
    let appointment = app
        .appointments
        .book(booking("City Clinic", "2099-01-01"), Some(&caller(&alice)))
        .await
        .unwrap();

    // Force a non-default status first: reschedule reconfirms from anywhere.
    app.ledger
        .update(
            appointment.id,
            &AppointmentPatch {
                status: Some(AppointmentStatus::Completed),
                ..AppointmentPatch::default()
            },
        )
        .await
        .unwrap();

    let updated = app
        .appointments
        .reschedule(
            appointment.id,
            RescheduleRequest {
                date: "2099-02-01".to_string(),
                reason: Some("travel".to_string()),
            },
            &caller(&alice),
        )
        .await
        .unwrap();

    assert_eq!(updated.date, "2099-02-01");
    assert_eq!(updated.status, AppointmentStatus::Confirmed);

    let history = app.ledger.reschedules(appointment.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].old_date, "2099-01-01");
    assert_eq!(history[0].new_date, "2099-02-01");
    assert_eq!(history[0].reason.as_deref(), Some("travel"));
}

#[tokio::test]
async fn reschedule_to_today_accepted_yesterday_rejected() {
    let app = test_app().await;
    let alice = register(&app, "Alice", "alice@example.com").await;
    let appointment = app
        .appointments
        .book(booking("City Clinic", "2099-01-01"), Some(&caller(&alice)))
        .await
        .unwrap();

    let rejected = app
        .appointments
        .reschedule(
            appointment.id,
            RescheduleRequest {
                date: yesterday(),
                reason: None,
            },
            &caller(&alice),
        )
        .await;
    assert!(matches!(rejected, Err(ApiError::Validation(_))));

    let accepted = app
        .appointments
        .reschedule(
            appointment.id,
            RescheduleRequest {
                date: today(),
                reason: None,
            },
            &caller(&alice),
        )
        .await
        .unwrap();
    assert_eq!(accepted.date, today());
    assert_eq!(accepted.status, AppointmentStatus::Confirmed);

    // The rejected attempt left no audit row.
    let history = app.ledger.reschedules(appointment.id).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn reschedule_rejects_unparseable_dates() {
    let app = test_app().await;
    let alice = register(&app, "Alice", "alice@example.com").await;
    let appointment = app
        .appointments
        .book(booking("City Clinic", "2099-01-01"), Some(&caller(&alice)))
        .await
        .unwrap();

    for bad in ["", "soon", "2099-13-01"] {
        let result = app
            .appointments
            .reschedule(
                appointment.id,
                RescheduleRequest {
                    date: bad.to_string(),
                    reason: None,
                },
                &caller(&alice),
            )
            .await;
        assert!(
            matches!(result, Err(ApiError::Validation(_))),
            "expected validation failure for {bad:?}"
        );
    }
}

#[tokio::test]
async fn cancel_removes_row_and_history() {
    let app = test_app().await;
    let alice = register(&app, "Alice", "alice@example.com").await;
    let appointment = app
        .appointments
        .book(booking("City Clinic", "2099-01-01"), Some(&caller(&alice)))
        .await
        .unwrap();
    app.appointments
        .reschedule(
            appointment.id,
            RescheduleRequest {
                date: "2099-03-01".to_string(),
                reason: None,
            },
            &caller(&alice),
        )
        .await
        .unwrap();

    app.appointments
        .cancel(appointment.id, &caller(&alice))
        .await
        .unwrap();

    assert!(app
        .ledger
        .find_by_id(appointment.id)
        .await
        .unwrap()
        .is_none());
    // Cascade removed the audit trail too.
    assert!(app.ledger.reschedules(appointment.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn status_update_requires_matching_clinic() {
    let app = test_app().await;
    let ours = create_clinic(&app, "City Clinic", "General").await;
    let theirs = create_clinic(&app, "Riverside Clinic", "General").await;

    let appointment = app
        .appointments
        .book(booking("City Clinic", "2099-01-01"), None)
        .await
        .unwrap();
    assert_eq!(appointment.clinic_id, Some(ours));

    // Right role, wrong clinic: forbidden.
    let rival = register_clinic_staff(&app, "Rival", "rival@example.com", theirs).await;
    let result = app
        .appointments
        .update_status(appointment.id, AppointmentStatus::Confirmed, &caller(&rival))
        .await;
    assert!(matches!(result, Err(ApiError::Forbidden(_))));

    // Plain users never pass the role gate.
    let user = register(&app, "Alice", "alice@example.com").await;
    let result = app
        .appointments
        .update_status(appointment.id, AppointmentStatus::Confirmed, &caller(&user))
        .await;
    assert!(matches!(result, Err(ApiError::Forbidden(_))));

    // Matching clinic succeeds.
    let staff = register_clinic_staff(&app, "Staff", "staff@example.com", ours).await;
    let updated = app
        .appointments
        .update_status(appointment.id, AppointmentStatus::Confirmed, &caller(&staff))
        .await
        .unwrap();
    assert_eq!(updated.status, AppointmentStatus::Confirmed);
}

#[tokio::test]
async fn status_transitions_are_unconstrained() {
    let app = test_app().await;
    let clinic_id = create_clinic(&app, "City Clinic", "General").await;
    let staff = register_clinic_staff(&app, "Staff", "staff@example.com", clinic_id).await;
    let appointment = app
        .appointments
        .book(booking("City Clinic", "2099-01-01"), None)
        .await
        .unwrap();

    // No transition graph: completed can go straight back to pending.
    for status in [
        AppointmentStatus::Completed,
        AppointmentStatus::Pending,
        AppointmentStatus::Cancelled,
        AppointmentStatus::Confirmed,
    ] {
        let updated = app
            .appointments
            .update_status(appointment.id, status, &caller(&staff))
            .await
            .unwrap();
        assert_eq!(updated.status, status);
    }
}

#[tokio::test]
async fn listings_are_scoped_to_user_and_clinic() {
    let app = test_app().await;
    let clinic_id = create_clinic(&app, "City Clinic", "General").await;
    let alice = register(&app, "Alice", "alice@example.com").await;

    let first = app
        .appointments
        .book(booking("City Clinic", "2099-01-01"), Some(&caller(&alice)))
        .await
        .unwrap();
    let anonymous = app
        .appointments
        .book(booking("City Clinic", "2099-01-02"), None)
        .await
        .unwrap();

    let own = app.appointments.list_for_user(alice.id).await.unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].id, first.id);

    let by_clinic = app.appointments.list_for_clinic(clinic_id).await.unwrap();
    assert_eq!(by_clinic.len(), 2);

    let all = app.appointments.list_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|a| a.id == anonymous.id));
}

#[tokio::test]
async fn ledger_totals_report_all_and_pending() {
    let app = test_app().await;
    let clinic_id = create_clinic(&app, "City Clinic", "General").await;
    let staff = register_clinic_staff(&app, "Staff", "staff@example.com", clinic_id).await;

    app.appointments
        .book(booking("City Clinic", "2099-01-01"), None)
        .await
        .unwrap();
    let confirmed = app
        .appointments
        .book(booking("City Clinic", "2099-01-02"), None)
        .await
        .unwrap();
    app.appointments
        .update_status(confirmed.id, AppointmentStatus::Confirmed, &caller(&staff))
        .await
        .unwrap();

    let (total, pending) = app.appointments.ledger_totals().await.unwrap();
    assert_eq!(total, 2);
    assert_eq!(pending, 1);
}
