//! Integration tests for the `/api/v1/emergency-alerts` endpoints.

mod common;

use std::time::{Duration, Instant};

use axum::http::{Method, StatusCode};
use common::{body_json, build_test_app, user_token, ScriptedNotifier, TestApp};
use serde_json::json;

const ALERTS: &str = "/api/v1/emergency-alerts";

async fn app_with_two_contacts(notifier: ScriptedNotifier) -> TestApp {
    let app = build_test_app(notifier);
    app.with_contacts(
        1,
        &[(10, "Alice", "alice@example.com"), (11, "Bob", "bob@example.com")],
    )
    .await;
    app
}

async fn submit(app: &TestApp, token: &str) -> i64 {
    let response = app
        .post_json(ALERTS, token, json!({ "latitude": 25.28, "longitude": 51.53 }))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["alert"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_returns_201_and_records_each_outcome() {
    let app = app_with_two_contacts(ScriptedNotifier::default().failing_for("bob@example.com")).await;
    let token = user_token(1);

    let response = app
        .post_json(
            ALERTS,
            &token,
            json!({
                "latitude": 25.2854,
                "longitude": 51.531,
                "address": "Doha",
                "notes": "Car broke down"
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Emergency alert sent successfully");
    assert_eq!(json["alert"]["status"], "active");
    assert_eq!(json["alert"]["contactsNotified"], 2);
    assert_eq!(json["alert"]["location"]["address"], "Doha");
    let id = json["alert"]["id"].as_i64().unwrap();

    app.settle().await;

    let response = app.get(&format!("{ALERTS}/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let alert = body_json(response).await;
    assert_eq!(alert["status"], "active");
    assert_eq!(alert["notes"], "Car broke down");

    let records = alert["contactsNotified"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    let status_of = |email: &str| {
        records
            .iter()
            .find(|r| r["email"] == email)
            .map(|r| r["notificationStatus"].clone())
            .unwrap()
    };
    assert_eq!(status_of("alice@example.com"), "delivered");
    assert_eq!(status_of("bob@example.com"), "failed");

    let confirmations = app.confirmer.sent.lock().unwrap().clone();
    assert_eq!(confirmations, vec![(1, id, 2)]);
}

#[tokio::test]
async fn submit_does_not_wait_for_slow_delivery() {
    let app =
        app_with_two_contacts(ScriptedNotifier::default().with_delay(Duration::from_secs(2))).await;
    let token = user_token(1);

    let started = Instant::now();
    let id = submit(&app, &token).await;
    assert!(started.elapsed() < Duration::from_millis(1500));

    let alert = body_json(app.get(&format!("{ALERTS}/{id}"), &token).await).await;
    for record in alert["contactsNotified"].as_array().unwrap() {
        assert_eq!(record["notificationStatus"], "sent");
    }
}

#[tokio::test]
async fn submit_accepts_numeric_strings_and_zero() {
    let app = app_with_two_contacts(ScriptedNotifier::default()).await;
    let token = user_token(1);

    let response = app
        .post_json(ALERTS, &token, json!({ "latitude": "0", "longitude": 0 }))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["alert"]["location"]["latitude"], 0.0);
    app.settle().await;
}

#[tokio::test]
async fn submit_without_coordinates_is_rejected() {
    let app = app_with_two_contacts(ScriptedNotifier::default()).await;

    let response = app
        .post_json(ALERTS, &user_token(1), json!({ "latitude": 25.28 }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["message"], "Location coordinates are required");
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn submit_with_out_of_range_latitude_is_rejected() {
    let app = app_with_two_contacts(ScriptedNotifier::default()).await;

    let response = app
        .post_json(ALERTS, &user_token(1), json!({ "latitude": 91, "longitude": 0 }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn submit_without_contacts_is_rejected() {
    let app = build_test_app(ScriptedNotifier::default());

    let response = app
        .post_json(ALERTS, &user_token(7), json!({ "latitude": 1.0, "longitude": 2.0 }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NO_CONTACTS");
    assert_eq!(
        json["message"],
        "No emergency contacts found. Please add contacts first."
    );
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn submit_with_non_numeric_coordinate_type_is_a_validation_error() {
    let app = app_with_two_contacts(ScriptedNotifier::default()).await;

    let response = app
        .post_json(ALERTS, &user_token(1), json!({ "latitude": true, "longitude": 51.53 }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["message"], "Location coordinates must be numeric");
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn malformed_requests_get_json_error_bodies() {
    let app = app_with_two_contacts(ScriptedNotifier::default()).await;
    let token = user_token(1);

    let cases = [
        (Method::POST, ALERTS.to_string(), Some("application/json"), r#"{"latitude": 1,"#),
        (Method::POST, ALERTS.to_string(), None, r#"{"latitude": 1, "longitude": 2}"#),
        (Method::POST, ALERTS.to_string(), Some("application/json"), "42"),
        (Method::GET, format!("{ALERTS}/abc"), None, ""),
        (Method::GET, format!("{ALERTS}?page=first"), None, ""),
        (Method::PATCH, format!("{ALERTS}/1"), Some("application/json"), "{not json"),
    ];

    for (method, uri, content_type, body) in cases {
        let response = app
            .request_raw(method.clone(), &uri, &token, content_type, body)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{method} {uri}");

        let json = body_json(response).await;
        assert_eq!(json["code"], "BAD_REQUEST", "{method} {uri}");
        assert!(json["message"].as_str().is_some_and(|m| !m.is_empty()));
    }
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn requests_without_a_token_are_unauthorized() {
    let app = build_test_app(ScriptedNotifier::default());

    let response = app.request(Method::GET, ALERTS, None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");

    let response = app.get(ALERTS, "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid or expired token");
}

// ---------------------------------------------------------------------------
// List / get
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_is_newest_first_and_paginated() {
    let app = app_with_two_contacts(ScriptedNotifier::default()).await;
    let token = user_token(1);
    let first = submit(&app, &token).await;
    let second = submit(&app, &token).await;
    let third = submit(&app, &token).await;
    app.settle().await;

    let page1 = body_json(app.get(&format!("{ALERTS}?limit=2"), &token).await).await;
    let ids: Vec<i64> = page1["alerts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![third, second]);
    assert_eq!(
        page1["pagination"],
        json!({ "current": 1, "total": 2, "hasNext": true, "hasPrev": false })
    );

    let page2 = body_json(app.get(&format!("{ALERTS}?limit=2&page=2"), &token).await).await;
    assert_eq!(page2["alerts"][0]["id"], first);
    assert_eq!(page2["pagination"]["hasNext"], false);
    assert_eq!(page2["pagination"]["hasPrev"], true);
}

#[tokio::test]
async fn list_filters_by_status() {
    let app = app_with_two_contacts(ScriptedNotifier::default()).await;
    let token = user_token(1);
    let resolved = submit(&app, &token).await;
    submit(&app, &token).await;
    app.settle().await;

    let response = app
        .request(Method::PATCH, &format!("{ALERTS}/{resolved}"), Some(&token), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(app.get(&format!("{ALERTS}?status=resolved"), &token).await).await;
    let alerts = json["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["id"], resolved);

    let response = app.get(&format!("{ALERTS}?status=closed"), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn other_users_alerts_are_not_found() {
    let app = app_with_two_contacts(ScriptedNotifier::default()).await;
    let id = submit(&app, &user_token(1)).await;
    app.settle().await;

    let response = app.get(&format!("{ALERTS}/{id}"), &user_token(2)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["message"], "Alert not found");

    let listed = body_json(app.get(ALERTS, &user_token(2)).await).await;
    assert_eq!(listed["alerts"], json!([]));
    assert_eq!(listed["pagination"]["total"], 0);
}

// ---------------------------------------------------------------------------
// Resolve / stats
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolving_twice_is_an_invalid_transition() {
    let app = app_with_two_contacts(ScriptedNotifier::default()).await;
    let token = user_token(1);
    let id = submit(&app, &token).await;
    app.settle().await;
    let uri = format!("{ALERTS}/{id}");

    let response = app
        .patch_json(&uri, &token, json!({ "status": "false_alarm", "notes": "Pocket dial" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Alert resolved successfully");
    assert_eq!(json["alert"]["status"], "false_alarm");
    assert_eq!(json["alert"]["notes"], "Pocket dial");
    assert_eq!(json["alert"]["resolvedBy"], 1);
    assert!(json["alert"]["resolvedAt"].is_string());

    let response = app.patch_json(&uri, &token, json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_TRANSITION");
    assert_eq!(json["message"], "Alert is already resolved");

    let alert = body_json(app.get(&uri, &token).await).await;
    assert_eq!(alert["status"], "false_alarm");
    assert_eq!(alert["notes"], "Pocket dial");
}

#[tokio::test]
async fn resolving_to_active_is_rejected() {
    let app = app_with_two_contacts(ScriptedNotifier::default()).await;
    let token = user_token(1);
    let id = submit(&app, &token).await;
    app.settle().await;

    let response = app
        .patch_json(&format!("{ALERTS}/{id}"), &token, json!({ "status": "active" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["message"], "Status must be either resolved or false_alarm");
}

#[tokio::test]
async fn resolving_another_users_alert_is_not_found() {
    let app = app_with_two_contacts(ScriptedNotifier::default()).await;
    let id = submit(&app, &user_token(1)).await;
    app.settle().await;

    let response = app
        .patch_json(&format!("{ALERTS}/{id}"), &user_token(2), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let alert = body_json(app.get(&format!("{ALERTS}/{id}"), &user_token(1)).await).await;
    assert_eq!(alert["status"], "active");
}

#[tokio::test]
async fn stats_count_each_status() {
    let app = app_with_two_contacts(ScriptedNotifier::default()).await;
    let token = user_token(1);
    let a = submit(&app, &token).await;
    let b = submit(&app, &token).await;
    submit(&app, &token).await;
    app.settle().await;

    app.patch_json(&format!("{ALERTS}/{a}"), &token, json!({})).await;
    app.patch_json(&format!("{ALERTS}/{b}"), &token, json!({ "status": "false_alarm" }))
        .await;

    let response = app.get(&format!("{ALERTS}/stats"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "total": 3, "active": 1, "resolved": 1, "falseAlarm": 1 })
    );

    let empty = body_json(app.get(&format!("{ALERTS}/stats"), &user_token(2)).await).await;
    assert_eq!(
        empty,
        json!({ "total": 0, "active": 0, "resolved": 0, "falseAlarm": 0 })
    );
}
