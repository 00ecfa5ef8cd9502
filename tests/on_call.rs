//! On-call singleton invariant
//!
//! Run: cargo test --test on_call

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use ticket_server::db::define_schema;
use ticket_server::db::models::{EngineerUser, UserCreate, UserUpdate};
use ticket_server::db::repository::{RepoError, UserRepository};

async fn test_db() -> (Surreal<Db>, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let db: Surreal<Db> = Surreal::new::<RocksDb>(tmp.path()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    define_schema(&db).await.unwrap();
    (db, tmp)
}

async fn create_engineer(users: &UserRepository, username: &str) -> EngineerUser {
    users
        .create(UserCreate {
            username: username.to_string(),
            first_name: username.to_string(),
            last_name: "Test".to_string(),
            email: format!("{username}@example.com"),
            hash_pass: "not-a-real-hash".to_string(),
            is_admin: false,
            is_on_call: false,
        })
        .await
        .unwrap()
}

async fn on_call_usernames(users: &UserRepository) -> Vec<String> {
    users
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .filter(|u| u.is_on_call)
        .map(|u| u.username)
        .collect()
}

#[tokio::test]
async fn set_on_call_hands_over_the_flag() {
    let (db, _tmp) = test_db().await;
    let users = UserRepository::new(db);

    let alice = create_engineer(&users, "alice").await;
    let bob = create_engineer(&users, "bob").await;

    let alice_id = alice.id.unwrap().to_string();
    let bob_id = bob.id.unwrap().to_string();

    users.set_on_call(&alice_id).await.unwrap();
    assert_eq!(on_call_usernames(&users).await, vec!["alice"]);

    users.set_on_call(&bob_id).await.unwrap();
    assert_eq!(on_call_usernames(&users).await, vec!["bob"]);
}

#[tokio::test]
async fn admin_edit_false_to_true_clears_previous_holder() {
    let (db, _tmp) = test_db().await;
    let users = UserRepository::new(db);

    let alice = create_engineer(&users, "alice").await;
    let bob = create_engineer(&users, "bob").await;

    let alice_id = alice.id.unwrap().to_string();
    let bob_id = bob.id.unwrap().to_string();

    users.set_on_call(&alice_id).await.unwrap();

    let outcome = users
        .update(
            &bob_id,
            UserUpdate {
                is_on_call: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(outcome.user.is_on_call);
    assert!(outcome.went_on_call);
    assert_eq!(on_call_usernames(&users).await, vec!["bob"]);
}

#[tokio::test]
async fn reassigning_the_current_holder_is_a_noop() {
    let (db, _tmp) = test_db().await;
    let users = UserRepository::new(db);

    let alice = create_engineer(&users, "alice").await;
    let _bob = create_engineer(&users, "bob").await;
    let alice_id = alice.id.unwrap().to_string();

    users.set_on_call(&alice_id).await.unwrap();
    users.set_on_call(&alice_id).await.unwrap();

    assert_eq!(on_call_usernames(&users).await, vec!["alice"]);

    // true-to-true through the admin edit path also keeps the flag and
    // does not count as a handover
    let outcome = users
        .update(
            &alice_id,
            UserUpdate {
                is_on_call: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!outcome.went_on_call);
    assert_eq!(on_call_usernames(&users).await, vec!["alice"]);
}

#[tokio::test]
async fn unknown_engineer_leaves_assignment_untouched() {
    let (db, _tmp) = test_db().await;
    let users = UserRepository::new(db);

    let alice = create_engineer(&users, "alice").await;
    let alice_id = alice.id.unwrap().to_string();

    users.set_on_call(&alice_id).await.unwrap();

    let err = users.set_on_call("engineer_user:missing").await.unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));

    assert_eq!(on_call_usernames(&users).await, vec!["alice"]);
}

#[tokio::test]
async fn partial_update_keeps_unmentioned_fields() {
    let (db, _tmp) = test_db().await;
    let users = UserRepository::new(db);

    let alice = create_engineer(&users, "alice").await;
    let alice_id = alice.id.unwrap().to_string();

    let outcome = users
        .update(
            &alice_id,
            UserUpdate {
                first_name: Some("Alicia".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.user.first_name, "Alicia");
    assert_eq!(outcome.user.last_name, "Test");
    assert_eq!(outcome.user.email, "alice@example.com");
    assert!(!outcome.user.is_on_call);
    assert!(!outcome.went_on_call);
}

#[tokio::test]
async fn clearing_the_flag_directly_leaves_nobody_on_call() {
    let (db, _tmp) = test_db().await;
    let users = UserRepository::new(db);

    let alice = create_engineer(&users, "alice").await;
    let alice_id = alice.id.unwrap().to_string();

    users.set_on_call(&alice_id).await.unwrap();
    let outcome = users
        .update(
            &alice_id,
            UserUpdate {
                is_on_call: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!outcome.went_on_call);

    assert!(on_call_usernames(&users).await.is_empty());
    assert!(users.find_on_call().await.unwrap().is_none());
}
