use std::sync::Arc;

use probya::domain::{Outcome, SubmissionState, WaitlistEmail, ALREADY_JOINED_MESSAGE};
use probya::store::{PostgresWaitlistStore, WaitlistStore};
use probya::waitlist::WaitlistHandler;

use crate::helpers::{configure_database, spawn_app_with_database, test_database_settings};

#[tokio::test]
async fn a_second_insert_of_the_same_address_reports_the_unique_violation() {
    let db_pool = configure_database(&test_database_settings()).await;
    let store = PostgresWaitlistStore::new(db_pool.clone(), "waitlist").unwrap();
    let email = WaitlistEmail::parse("dup@example.com").unwrap();

    store.insert_waitlist_entry(&email).await.unwrap();
    let err = store.insert_waitlist_entry(&email).await.unwrap_err();

    assert_eq!(err.code(), Some("23505"));
    let saved: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM waitlist")
        .fetch_one(&db_pool)
        .await
        .expect("Failed to count waitlist entries");
    assert_eq!(saved, 1);
}

#[tokio::test]
async fn the_handler_reports_already_joined_for_a_duplicate_row() {
    let db_pool = configure_database(&test_database_settings()).await;
    let store = PostgresWaitlistStore::new(db_pool, "waitlist").unwrap();
    let handler = WaitlistHandler::new(Arc::new(store), "23505");

    let mut state = SubmissionState::with_email("dup@example.com");
    assert_eq!(handler.submit(&mut state).await, Outcome::Joined);

    state.set_email("dup@example.com");
    assert_eq!(handler.submit(&mut state).await, Outcome::AlreadyJoined);
    assert_eq!(state.message(), ALREADY_JOINED_MESSAGE);
    assert_eq!(state.email(), "dup@example.com");
    assert!(!state.is_loading());
}

#[tokio::test]
async fn joining_twice_through_the_form_keeps_one_row() {
    let (app, db_pool) = spawn_app_with_database().await;

    let first = app.post_waitlist("email=dup%40example.com".into()).await;
    assert_eq!(first.status().as_u16(), 200);

    let second = app.post_waitlist("email=dup%40example.com".into()).await;
    assert_eq!(second.status().as_u16(), 409);
    assert!(second.text().await.unwrap().contains(ALREADY_JOINED_MESSAGE));

    let saved: (String,) = sqlx::query_as("SELECT email FROM waitlist")
        .fetch_one(&db_pool)
        .await
        .expect("Failed to fetch the saved entry");
    assert_eq!(saved.0, "dup@example.com");
}
