//! End-to-end tests of the user JSON API driven through `UsersClient`.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use roster_admin::client::{ClientError, Operation, UsersClient};
use roster_core::{NewUser, UserId};
use roster_integration_tests::{TestServer, unused_addr};

#[tokio::test]
async fn test_seed_create_delete_scenario() {
    let server = TestServer::spawn().await;

    let users = server.api.fetch_users().await.unwrap();
    let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(users[0].full_name(), "John Doe");

    let created = server.api.add_user(&NewUser::placeholder()).await.unwrap();
    assert_eq!(created.id.as_str(), "3");
    assert_eq!(created.email, "new.user@example.com");

    let outcome = server.api.delete_user(&UserId::new("1")).await.unwrap();
    assert!(outcome.success);
    assert!(outcome.deleted);

    let ids: Vec<String> = server
        .api
        .fetch_users()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.id.into_inner())
        .collect();
    assert_eq!(ids, vec!["2".to_string(), "3".to_string()]);
}

#[tokio::test]
async fn test_update_replaces_whole_record() {
    let server = TestServer::spawn().await;
    let mut jane = server.api.fetch_users().await.unwrap().remove(1);
    jane.age = 26;
    jane.alternate_email = "jane.new@example.com".to_string();

    let stored = server.api.update_user(&jane).await.unwrap();
    assert_eq!(stored, jane);

    let users = server.api.fetch_users().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[1], jane);
}

#[tokio::test]
async fn test_update_missing_record_is_not_found() {
    let server = TestServer::spawn().await;
    let ghost = NewUser::placeholder().with_id(UserId::new("42"));

    let err = server.api.update_user(&ghost).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.operation(), Some(Operation::UpdateUser));
    assert_eq!(server.api.fetch_users().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_repeated_delete_is_a_noop() {
    let server = TestServer::spawn().await;
    let id = UserId::new("2");

    assert!(server.api.delete_user(&id).await.unwrap().deleted);
    let second = server.api.delete_user(&id).await.unwrap();

    assert!(second.success);
    assert!(!second.deleted);
    assert_eq!(server.api.fetch_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_ids_are_not_reused_after_delete() {
    let server = TestServer::spawn().await;

    let third = server.api.add_user(&NewUser::placeholder()).await.unwrap();
    server.api.delete_user(&third.id).await.unwrap();
    let fourth = server.api.add_user(&NewUser::placeholder()).await.unwrap();

    assert_eq!(third.id.as_str(), "3");
    assert_eq!(fourth.id.as_str(), "4");
}

#[tokio::test]
async fn test_unseeded_store_starts_empty() {
    let server = TestServer::spawn_with(&[("ROSTER_SEED", "false")]).await;

    assert!(server.api.fetch_users().await.unwrap().is_empty());
    let first = server.api.add_user(&NewUser::placeholder()).await.unwrap();
    assert_eq!(first.id.as_str(), "1");
}

#[tokio::test]
async fn test_uuid_strategy_assigns_distinct_ids() {
    let server = TestServer::spawn_with(&[("ROSTER_ID_STRATEGY", "uuid")]).await;

    let a = server.api.add_user(&NewUser::placeholder()).await.unwrap();
    let b = server.api.add_user(&NewUser::placeholder()).await.unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(a.id.as_str().len(), 36);
}

#[tokio::test]
async fn test_unreachable_server_fails_with_operation_message() {
    let addr = unused_addr().await;
    let client = UsersClient::from_base(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();

    let err = client.fetch_users().await.unwrap_err();

    assert!(matches!(err, ClientError::Http { .. }));
    assert!(err.to_string().starts_with("Failed to fetch users"));
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::spawn().await;

    let resp = server.http.get(server.url("/health")).send().await.unwrap();

    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}
