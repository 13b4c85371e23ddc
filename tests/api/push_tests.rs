//! Producer Endpoint Tests
//!
//! Drive the internal push route the way the marketplace backend does
//! after a durable write, and observe what reaches the fake sockets.

use axum::http::StatusCode;

use realtime_gateway::gateway::Outbound;

use crate::common::TestApp;

#[tokio::test]
async fn push_fans_out_to_every_connection_of_the_user() {
    let app = TestApp::new();
    let (_a1, mut rx1) = app.register_connection(5);
    let (_a2, mut rx2) = app.register_connection(5);

    let response = app
        .post_json(
            "/internal/push",
            r#"{"userId":5,"event":{"type":"NEW_MESSAGE","message":{"id":1,"content":"hi"}}}"#,
        )
        .await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    for rx in [&mut rx1, &mut rx2] {
        match rx.try_recv().unwrap() {
            Outbound::Event(payload) => {
                assert!(payload.contains(r#""type":"NEW_MESSAGE""#));
            }
            other => panic!("expected event frame, got {:?}", other),
        }
        // Exactly one delivery per connection.
        assert!(rx.try_recv().is_err());
    }
}

#[tokio::test]
async fn push_to_offline_user_is_accepted_and_silent() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/internal/push",
            r#"{"userId":999,"event":{"type":"NOTIFICATIONS_UNREAD_COUNT","data":{"unreadCount":4}}}"#,
        )
        .await;

    // Best-effort contract: the producer never sees a delivery outcome.
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert!(!app.registry.contains_user(999));
}

#[tokio::test]
async fn push_does_not_reach_other_users() {
    let app = TestApp::new();
    let (_a, mut rx_a) = app.register_connection(5);
    let (_b, mut rx_b) = app.register_connection(6);

    app.post_json(
        "/internal/push",
        r#"{"userId":5,"event":{"type":"NOTIFICATIONS_UNREAD_COUNT","data":{"unreadCount":1}}}"#,
    )
    .await;

    assert!(rx_a.try_recv().is_ok());
    assert!(rx_b.try_recv().is_err());
}

#[tokio::test]
async fn unknown_event_kind_is_rejected() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/internal/push",
            r#"{"userId":5,"event":{"type":"BOOKING_EXPLODED","data":{}}}"#,
        )
        .await;

    assert!(response.status().is_client_error());
}
