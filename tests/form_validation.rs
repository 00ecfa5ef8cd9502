//! Ticket form validation against a real embedded database
//!
//! Run: cargo test --test form_validation

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};
use tokio::sync::mpsc;

use ticket_server::audit::{AuditHandle, LogLevel, LogRequest};
use ticket_server::db::define_schema;
use ticket_server::db::models::{Priority, Status, TicketCreate};
use ticket_server::db::repository::TicketRepository;
use ticket_server::forms::{
    FieldSanitizer, TicketCreatePayload, TicketEditPayload, Validated, validate_create,
    validate_edit,
};

async fn test_db() -> (Surreal<Db>, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let db: Surreal<Db> = Surreal::new::<RocksDb>(tmp.path()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    define_schema(&db).await.unwrap();
    (db, tmp)
}

fn audit_channel() -> (AuditHandle, mpsc::Receiver<LogRequest>) {
    let (tx, rx) = mpsc::channel(16);
    (AuditHandle::new(tx), rx)
}

fn payload(title: &str, description: &str, priority: &str) -> TicketCreatePayload {
    TicketCreatePayload {
        title: Some(title.to_string()),
        description: Some(description.to_string()),
        priority: Some(priority.to_string()),
        status: None,
    }
}

#[tokio::test]
async fn script_in_description_rejects_and_audits_without_persisting() {
    let (db, _tmp) = test_db().await;
    let tickets = TicketRepository::new(db);
    let (handle, mut rx) = audit_channel();
    let sanitizer = FieldSanitizer::new(&handle, "mallory");

    let result = validate_create(
        &payload("Broken build", "<script>alert(1)</script>", "High"),
        &sanitizer,
        &tickets,
    )
    .await
    .unwrap();

    let form = match result {
        Validated::Rejected(form) => form,
        Validated::Accepted(_) => panic!("expected rejection"),
    };

    assert!(!form.accepted);
    let outcome = &form.outcomes["description"];
    assert!(outcome.rejected);
    assert_eq!(outcome.error.as_deref(), Some("Invalid description"));
    // Rejected value is still the escaped form
    assert_eq!(outcome.value, "&lt;script&gt;alert(1)&lt;/script&gt;");
    // Title passed its checks
    assert!(!form.outcomes["title"].rejected);

    let event = rx.try_recv().unwrap();
    assert_eq!(event.level, LogLevel::Warning);
    assert_eq!(event.message, "Cross-Site Scripting attempt detected");
    assert_eq!(event.username, "mallory");
    assert!(rx.try_recv().is_err());

    assert!(tickets.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn sql_keyword_in_title_rejects_with_field_error() {
    let (db, _tmp) = test_db().await;
    let tickets = TicketRepository::new(db);
    let (handle, mut rx) = audit_channel();
    let sanitizer = FieldSanitizer::new(&handle, "mallory");

    let result = validate_create(
        &payload("DROP TABLE tickets", "Nothing works", "Low"),
        &sanitizer,
        &tickets,
    )
    .await
    .unwrap();

    let form = match result {
        Validated::Rejected(form) => form,
        Validated::Accepted(_) => panic!("expected rejection"),
    };

    assert!(form.outcomes["title"].rejected);
    assert_eq!(form.outcomes["title"].error.as_deref(), Some("Invalid title"));
    assert!(!form.outcomes["description"].rejected);

    let event = rx.try_recv().unwrap();
    assert_eq!(event.message, "SQL Injection attempt detected");
}

#[tokio::test]
async fn clean_submission_is_escaped_and_accepted() {
    let (db, _tmp) = test_db().await;
    let tickets = TicketRepository::new(db);
    let (handle, mut rx) = audit_channel();
    let sanitizer = FieldSanitizer::new(&handle, "alice");

    let result = validate_create(
        &payload("Printer's down", "Paper jam & error light", "Medium"),
        &sanitizer,
        &tickets,
    )
    .await
    .unwrap();

    let valid = match result {
        Validated::Accepted(v) => v,
        Validated::Rejected(form) => panic!("unexpected rejection: {:?}", form),
    };

    assert_eq!(valid.title, "Printer&#x27;s down");
    assert_eq!(valid.description, "Paper jam &amp; error light");
    assert_eq!(valid.priority, Priority::Medium);
    assert_eq!(valid.status, Status::ToDo);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn duplicate_title_is_rejected() {
    let (db, _tmp) = test_db().await;
    let tickets = TicketRepository::new(db);
    let (handle, _rx) = audit_channel();
    let sanitizer = FieldSanitizer::new(&handle, "alice");

    tickets
        .create(TicketCreate {
            title: "Server down".to_string(),
            description: "Rack 3".to_string(),
            priority: Priority::High,
            status: Status::ToDo,
            created: chrono::Utc::now(),
            reporter: "engineer_user:alice".parse().unwrap(),
            reporter_name: "alice".to_string(),
        })
        .await
        .unwrap();

    let result = validate_create(
        &payload("Server down", "Again", "High"),
        &sanitizer,
        &tickets,
    )
    .await
    .unwrap();

    let form = match result {
        Validated::Rejected(form) => form,
        Validated::Accepted(_) => panic!("expected rejection"),
    };

    assert_eq!(
        form.outcomes["title"].error.as_deref(),
        Some("A ticket with this title already exists.")
    );
}

#[tokio::test]
async fn duplicate_title_does_not_short_circuit_sanitization() {
    let (db, _tmp) = test_db().await;
    let tickets = TicketRepository::new(db);
    let (handle, mut rx) = audit_channel();
    let sanitizer = FieldSanitizer::new(&handle, "mallory");

    tickets
        .create(TicketCreate {
            title: "Server down".to_string(),
            description: "Rack 3".to_string(),
            priority: Priority::High,
            status: Status::ToDo,
            created: chrono::Utc::now(),
            reporter: "engineer_user:alice".parse().unwrap(),
            reporter_name: "alice".to_string(),
        })
        .await
        .unwrap();

    let result = validate_create(
        &payload("Server down", "<script>alert(1)</script>", "High"),
        &sanitizer,
        &tickets,
    )
    .await
    .unwrap();

    let form = match result {
        Validated::Rejected(form) => form,
        Validated::Accepted(_) => panic!("expected rejection"),
    };

    // Every field went through the sanitizer before the uniqueness lookup,
    // so both errors are reported and the script still raised its event
    assert_eq!(
        form.outcomes["title"].error.as_deref(),
        Some("A ticket with this title already exists.")
    );
    assert_eq!(
        form.outcomes["description"].error.as_deref(),
        Some("Invalid description")
    );

    let event = rx.try_recv().unwrap();
    assert_eq!(event.message, "Cross-Site Scripting attempt detected");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn missing_required_fields_reject_every_field() {
    let (db, _tmp) = test_db().await;
    let tickets = TicketRepository::new(db);
    let (handle, mut rx) = audit_channel();
    let sanitizer = FieldSanitizer::new(&handle, "alice");

    let empty = TicketCreatePayload {
        title: None,
        description: Some("   ".to_string()),
        priority: None,
        status: None,
    };

    let result = validate_create(&empty, &sanitizer, &tickets).await.unwrap();

    let form = match result {
        Validated::Rejected(form) => form,
        Validated::Accepted(_) => panic!("expected rejection"),
    };

    for field in ["title", "description", "priority"] {
        assert!(form.outcomes[field].rejected, "{field} should be rejected");
        assert_eq!(
            form.outcomes[field].error.as_deref(),
            Some("This field is required.")
        );
    }
    // Missing fields never reach the sanitizer, so no security events
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn invalid_priority_choice_is_rejected() {
    let (db, _tmp) = test_db().await;
    let tickets = TicketRepository::new(db);
    let (handle, _rx) = audit_channel();
    let sanitizer = FieldSanitizer::new(&handle, "alice");

    let result = validate_create(
        &payload("Build broken", "CI red", "Urgent"),
        &sanitizer,
        &tickets,
    )
    .await
    .unwrap();

    let form = match result {
        Validated::Rejected(form) => form,
        Validated::Accepted(_) => panic!("expected rejection"),
    };

    assert_eq!(
        form.outcomes["priority"].error.as_deref(),
        Some("Select a valid choice.")
    );
}

#[tokio::test]
async fn edit_with_script_description_is_rejected() {
    let (handle, mut rx) = audit_channel();
    let sanitizer = FieldSanitizer::new(&handle, "mallory");

    let result = validate_edit(
        &TicketEditPayload {
            description: Some("<script>steal()</script>".to_string()),
            priority: Some("Low".to_string()),
            status: Some("Done".to_string()),
        },
        &sanitizer,
    );

    match result {
        Validated::Rejected(form) => {
            assert!(form.outcomes["description"].rejected);
        }
        Validated::Accepted(_) => panic!("expected rejection"),
    }

    let event = rx.try_recv().unwrap();
    assert_eq!(event.message, "Cross-Site Scripting attempt detected");
}

#[tokio::test]
async fn edit_without_status_keeps_it_unset() {
    let (handle, _rx) = audit_channel();
    let sanitizer = FieldSanitizer::new(&handle, "alice");

    let result = validate_edit(
        &TicketEditPayload {
            description: Some("Replaced the fuser".to_string()),
            priority: Some("Low".to_string()),
            status: None,
        },
        &sanitizer,
    );

    match result {
        Validated::Accepted(valid) => {
            assert_eq!(valid.status, None);
            assert_eq!(valid.priority, Priority::Low);
        }
        Validated::Rejected(form) => panic!("unexpected rejection: {:?}", form),
    }
}
