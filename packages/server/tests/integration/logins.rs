use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

use server::entity::login;

use crate::common::{TestApp, routes};

fn sample_batch() -> serde_json::Value {
    json!([
        {
            "id": "rec-1",
            "site": "https://example.com",
            "username": "alice",
            "password": "hunter2",
            "strength": "Weak"
        },
        {
            "id": "rec-2",
            "site": "https://other.example",
            "username": "alice",
            "password": "correct-horse-battery-staple"
        }
    ])
}

#[tokio::test]
async fn batch_create_and_list_round_trip() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("u1", "a@b.com").await;

    let res = app
        .post_with_token(routes::LOGINS, &sample_batch(), &token)
        .await;
    assert_eq!(res.status, 201, "body: {}", res.text);
    assert_eq!(res.body, json!({"success": true, "insertedCount": 2}));

    let list = app.get_with_token(routes::LOGINS, &token).await;
    assert_eq!(list.status, 200);
    let records = list.body.as_array().unwrap();
    assert_eq!(records.len(), 2);

    let first = records
        .iter()
        .find(|r| r["id"] == "rec-1")
        .expect("rec-1 missing from list");
    assert_eq!(first["userId"], "u1");
    assert_eq!(first["site"], "https://example.com");
    assert_eq!(first["username"], "alice");
    assert_eq!(first["password"], "hunter2");
    assert_eq!(first["strength"], "Weak");

    // Absent strength is omitted, not null.
    let second = records.iter().find(|r| r["id"] == "rec-2").unwrap();
    assert!(second.get("strength").is_none());
}

#[tokio::test]
async fn record_without_id_gets_one_generated() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("u1", "a@b.com").await;

    let res = app
        .post_with_token(
            routes::LOGINS,
            &json!([{"site": "x.com", "username": "u", "password": "p"}]),
            &token,
        )
        .await;
    assert_eq!(res.status, 201, "body: {}", res.text);

    let list = app.get_with_token(routes::LOGINS, &token).await;
    let records = list.body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["userId"], "u1");
    assert_eq!(records[0]["site"], "x.com");
    assert!(!records[0]["id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn empty_batch_is_rejected_and_writes_nothing() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("u1", "a@b.com").await;

    let res = app.post_with_token(routes::LOGINS, &json!([]), &token).await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "INVALID_INPUT");

    let count = login::Entity::find().count(&app.db).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn non_array_body_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("u1", "a@b.com").await;

    let res = app
        .post_with_token(
            routes::LOGINS,
            &json!({"id": "rec-1", "site": "s", "username": "u", "password": "p"}),
            &token,
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn listing_is_scoped_to_the_owner() {
    let app = TestApp::spawn().await;
    let alice = app.create_authenticated_user("u1", "a@b.com").await;
    let bob = app.create_authenticated_user("u2", "b@b.com").await;

    app.post_with_token(routes::LOGINS, &sample_batch(), &alice)
        .await;

    let res = app.get_with_token(routes::LOGINS, &bob).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!([]));
}

#[tokio::test]
async fn partial_update_merges_fields() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("u1", "a@b.com").await;
    app.post_with_token(routes::LOGINS, &sample_batch(), &token)
        .await;

    let res = app
        .put_with_token(
            &routes::login("rec-1"),
            &json!({"password": "n3w-p4ss", "strength": "Strong"}),
            &token,
        )
        .await;
    assert_eq!(res.status, 200, "body: {}", res.text);
    assert_eq!(res.body, json!({"success": true, "modifiedCount": 1}));

    let list = app.get_with_token(routes::LOGINS, &token).await;
    let records = list.body.as_array().unwrap();
    let updated = records.iter().find(|r| r["id"] == "rec-1").unwrap();
    assert_eq!(updated["password"], "n3w-p4ss");
    assert_eq!(updated["strength"], "Strong");
    // Untouched fields survive.
    assert_eq!(updated["site"], "https://example.com");
    assert_eq!(updated["username"], "alice");
}

#[tokio::test]
async fn empty_update_body_modifies_nothing() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("u1", "a@b.com").await;
    app.post_with_token(routes::LOGINS, &sample_batch(), &token)
        .await;

    let res = app
        .put_with_token(&routes::login("rec-1"), &json!({}), &token)
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!({"success": true, "modifiedCount": 0}));
}

#[tokio::test]
async fn zero_match_update_reports_zero_and_succeeds() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("u1", "a@b.com").await;

    let res = app
        .put_with_token(
            &routes::login("no-such-record"),
            &json!({"password": "x"}),
            &token,
        )
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!({"success": true, "modifiedCount": 0}));
}

#[tokio::test]
async fn update_cannot_touch_another_owners_record() {
    let app = TestApp::spawn().await;
    let alice = app.create_authenticated_user("u1", "a@b.com").await;
    let bob = app.create_authenticated_user("u2", "b@b.com").await;
    app.post_with_token(routes::LOGINS, &sample_batch(), &alice)
        .await;

    let res = app
        .put_with_token(&routes::login("rec-1"), &json!({"password": "stolen"}), &bob)
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!({"success": true, "modifiedCount": 0}));

    let list = app.get_with_token(routes::LOGINS, &alice).await;
    let records = list.body.as_array().unwrap();
    let untouched = records.iter().find(|r| r["id"] == "rec-1").unwrap();
    assert_eq!(untouched["password"], "hunter2");
}

#[tokio::test]
async fn delete_removes_only_the_owners_record() {
    let app = TestApp::spawn().await;
    let alice = app.create_authenticated_user("u1", "a@b.com").await;
    let bob = app.create_authenticated_user("u2", "b@b.com").await;
    app.post_with_token(routes::LOGINS, &sample_batch(), &alice)
        .await;

    // Another owner's delete is a silent no-op.
    let res = app.delete_with_token(&routes::login("rec-1"), &bob).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!({"success": true, "deletedCount": 0}));

    let res = app.delete_with_token(&routes::login("rec-1"), &alice).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!({"success": true, "deletedCount": 1}));

    let count = login::Entity::find().count(&app.db).await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn zero_match_delete_reports_zero_and_succeeds() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("u1", "a@b.com").await;

    let res = app
        .delete_with_token(&routes::login("no-such-record"), &token)
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!({"success": true, "deletedCount": 0}));
}
