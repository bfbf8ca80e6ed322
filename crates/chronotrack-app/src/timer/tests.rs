//! Timer controller tests against a mocked remote store

use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use mockito::Matcher;
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tokio::time::Duration;
use uuid::Uuid;

use chronotrack_store::StoreClient;

use super::controller::TimerController;
use super::events::{TimerEvent, TimerEventType};
use crate::activity::ActivityLogger;

async fn controller(server: &mockito::ServerGuard, user_id: Uuid) -> TimerController {
    let store = Arc::new(StoreClient::new(server.url(), "anon-key"));
    let activity = Arc::new(ActivityLogger::new(store.clone()));
    let controller = TimerController::new(store, activity);
    controller.bind(user_id).await;
    controller
}

fn entry_json(
    id: Uuid,
    user_id: Uuid,
    project_id: Uuid,
    start: DateTime<Utc>,
    running: bool,
    duration: i64,
) -> Value {
    json!({
        "id": id,
        "user_id": user_id,
        "project_id": project_id,
        "description": "",
        "start_time": start,
        "end_time": if running { Value::Null } else { json!(start) },
        "duration": duration,
        "is_running": running,
        "created_at": start,
        "updated_at": start,
    })
}

/// Put the controller into Running state by reviving a known entry through
/// a body-matched PATCH mock; the mock keeps matching resume-shaped bodies
/// only, so later stop/pause PATCHes are not swallowed by it.
async fn seed_running(
    server: &mut mockito::ServerGuard,
    controller: &TimerController,
    user_id: Uuid,
    start: DateTime<Utc>,
) -> Uuid {
    let entry_id = Uuid::new_v4();
    let project_id = Uuid::new_v4();
    let _m = server
        .mock("PATCH", "/rest/v1/time_entries")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({"is_running": true})))
        .with_status(200)
        .with_body(entry_json(entry_id, user_id, project_id, start, true, 0).to_string())
        .create_async()
        .await;

    controller.resume(entry_id).await.unwrap();
    assert!(controller.is_running().await);
    entry_id
}

fn audit_mock(server: &mut mockito::ServerGuard) -> mockito::Mock {
    server
        .mock("POST", "/rest/v1/rpc/log_activity")
        .with_status(204)
}

async fn wait_for_event<F>(rx: &mut broadcast::Receiver<TimerEvent>, matches: F) -> TimerEvent
where
    F: Fn(&TimerEventType) -> bool,
{
    tokio::time::timeout(Duration::from_secs(3), async {
        loop {
            let event = rx.recv().await.expect("event channel closed");
            if matches(&event.event_type) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

#[tokio::test]
async fn test_start_creates_running_entry() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();
    let project_id = Uuid::new_v4();
    let entry_id = Uuid::new_v4();

    let insert = server
        .mock("POST", "/rest/v1/time_entries")
        .match_body(Matcher::PartialJson(json!({
            "user_id": user_id,
            "project_id": project_id,
            "description": "writing spec",
            "is_running": true,
        })))
        .with_status(201)
        .with_body(entry_json(entry_id, user_id, project_id, Utc::now(), true, 0).to_string())
        .create_async()
        .await;
    let audit = audit_mock(&mut server)
        .match_body(Matcher::PartialJson(json!({"p_action": "started_timer"})))
        .create_async()
        .await;

    let controller = controller(&server, user_id).await;
    let mut rx = controller.subscribe();

    controller
        .start(Some(project_id), Some("writing spec".to_string()))
        .await
        .unwrap();

    assert!(controller.is_running().await);
    let active = controller.active_entry().await.unwrap();
    assert_eq!(active.id, entry_id);
    assert_eq!(active.project_id, project_id);
    assert!(active.is_running);
    assert_eq!(controller.elapsed_seconds(), 0);

    let event = wait_for_event(&mut rx, |e| matches!(e, TimerEventType::Started { .. })).await;
    assert_eq!(event.entry_id, Some(entry_id));

    insert.assert_async().await;
    audit.assert_async().await;
}

#[tokio::test]
async fn test_start_without_project_is_noop() {
    let mut server = mockito::Server::new_async().await;
    let insert = server
        .mock("POST", "/rest/v1/time_entries")
        .expect(0)
        .create_async()
        .await;

    let controller = controller(&server, Uuid::new_v4()).await;
    controller.start(None, None).await.unwrap();

    assert!(!controller.is_running().await);
    insert.assert_async().await;
}

#[tokio::test]
async fn test_start_unbound_is_noop() {
    let mut server = mockito::Server::new_async().await;
    let insert = server
        .mock("POST", "/rest/v1/time_entries")
        .expect(0)
        .create_async()
        .await;

    let store = Arc::new(StoreClient::new(server.url(), "anon-key"));
    let activity = Arc::new(ActivityLogger::new(store.clone()));
    let controller = TimerController::new(store, activity);

    controller.start(Some(Uuid::new_v4()), None).await.unwrap();

    assert!(!controller.is_running().await);
    insert.assert_async().await;
}

#[tokio::test]
async fn test_stop_records_floored_duration() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();
    let controller = controller(&server, user_id).await;
    let start = Utc::now() - ChronoDuration::seconds(125);
    let entry_id = seed_running(&mut server, &controller, user_id, start).await;

    let stop = server
        .mock("PATCH", "/rest/v1/time_entries")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({"is_running": false})))
        .with_status(200)
        .with_body(entry_json(entry_id, user_id, Uuid::new_v4(), start, false, 125).to_string())
        .create_async()
        .await;
    let audit = audit_mock(&mut server)
        .match_body(Matcher::PartialJson(json!({"p_action": "stopped_timer"})))
        .create_async()
        .await;

    let mut rx = controller.subscribe();
    controller.stop().await.unwrap();

    assert!(!controller.is_running().await);
    assert!(controller.active_entry().await.is_none());
    assert_eq!(controller.elapsed_seconds(), 0);

    let event = wait_for_event(&mut rx, |e| matches!(e, TimerEventType::Stopped { .. })).await;
    match event.event_type {
        TimerEventType::Stopped { duration_seconds } => {
            assert!((125..=126).contains(&duration_seconds));
        }
        _ => unreachable!(),
    }

    stop.assert_async().await;
    audit.assert_async().await;
}

#[tokio::test]
async fn test_zero_duration_session_records_zero() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();
    let controller = controller(&server, user_id).await;
    let start = Utc::now();
    let entry_id = seed_running(&mut server, &controller, user_id, start).await;

    let stop = server
        .mock("PATCH", "/rest/v1/time_entries")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({
            "is_running": false,
            "duration": 0,
        })))
        .with_status(200)
        .with_body(entry_json(entry_id, user_id, Uuid::new_v4(), start, false, 0).to_string())
        .create_async()
        .await;
    let _audit = audit_mock(&mut server).create_async().await;

    controller.stop().await.unwrap();

    assert!(!controller.is_running().await);
    stop.assert_async().await;
}

#[tokio::test]
async fn test_stop_without_active_is_noop() {
    let mut server = mockito::Server::new_async().await;
    let patch = server
        .mock("PATCH", "/rest/v1/time_entries")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let controller = controller(&server, Uuid::new_v4()).await;
    controller.stop().await.unwrap();
    controller.pause().await.unwrap();

    patch.assert_async().await;
}

#[tokio::test]
async fn test_pause_persists_stop_shape_without_audit() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();
    let controller = controller(&server, user_id).await;
    let start = Utc::now() - ChronoDuration::seconds(60);
    let entry_id = seed_running(&mut server, &controller, user_id, start).await;

    let pause = server
        .mock("PATCH", "/rest/v1/time_entries")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({"is_running": false})))
        .with_status(200)
        .with_body(entry_json(entry_id, user_id, Uuid::new_v4(), start, false, 60).to_string())
        .create_async()
        .await;
    let audit = audit_mock(&mut server).expect(0).create_async().await;

    let mut rx = controller.subscribe();
    controller.pause().await.unwrap();

    assert!(!controller.is_running().await);
    let event = wait_for_event(&mut rx, |e| matches!(e, TimerEventType::Paused { .. })).await;
    assert_eq!(event.entry_id, Some(entry_id));

    pause.assert_async().await;
    audit.assert_async().await;
}

#[tokio::test]
async fn test_start_while_running_stops_previous_first() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();
    let controller = controller(&server, user_id).await;
    let first_id = seed_running(&mut server, &controller, user_id, Utc::now()).await;

    let second_project = Uuid::new_v4();
    let second_id = Uuid::new_v4();

    let stop = server
        .mock("PATCH", "/rest/v1/time_entries")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({
            "is_running": false,
            "duration": 0,
        })))
        .with_status(200)
        .with_body(entry_json(first_id, user_id, Uuid::new_v4(), Utc::now(), false, 0).to_string())
        .create_async()
        .await;
    let insert = server
        .mock("POST", "/rest/v1/time_entries")
        .match_body(Matcher::PartialJson(json!({"project_id": second_project})))
        .with_status(201)
        .with_body(
            entry_json(second_id, user_id, second_project, Utc::now(), true, 0).to_string(),
        )
        .create_async()
        .await;
    let _audit = audit_mock(&mut server).expect(2).create_async().await;

    controller.start(Some(second_project), None).await.unwrap();

    // Exactly one entry running afterwards: the new one
    assert!(controller.is_running().await);
    let active = controller.active_entry().await.unwrap();
    assert_eq!(active.id, second_id);
    assert_eq!(active.project_id, second_project);

    stop.assert_async().await;
    insert.assert_async().await;
}

#[tokio::test]
async fn test_resume_rewrites_start_and_resets_elapsed() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();
    let entry_id = Uuid::new_v4();
    let now = Utc::now();

    let patch = server
        .mock("PATCH", "/rest/v1/time_entries")
        .match_query(Matcher::UrlEncoded("id".into(), format!("eq.{}", entry_id)))
        .match_body(Matcher::PartialJson(json!({
            "end_time": null,
            "is_running": true,
        })))
        .with_status(200)
        .with_body(entry_json(entry_id, user_id, Uuid::new_v4(), now, true, 0).to_string())
        .create_async()
        .await;

    let controller = controller(&server, user_id).await;
    controller.resume(entry_id).await.unwrap();

    assert!(controller.is_running().await);
    let active = controller.active_entry().await.unwrap();
    assert_eq!(active.id, entry_id);
    assert!(active.end_time.is_none());
    assert_eq!(controller.elapsed_seconds(), 0);

    patch.assert_async().await;
}

#[tokio::test]
async fn test_refresh_reconstructs_elapsed_from_start_timestamp() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();
    let entry_id = Uuid::new_v4();
    let start = Utc::now() - ChronoDuration::seconds(5);

    let _m = server
        .mock("GET", "/rest/v1/time_entries")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("user_id".into(), format!("eq.{}", user_id)),
            Matcher::UrlEncoded("is_running".into(), "eq.true".into()),
        ]))
        .with_status(200)
        .with_body(
            json!([entry_json(entry_id, user_id, Uuid::new_v4(), start, true, 0)]).to_string(),
        )
        .create_async()
        .await;

    let controller = controller(&server, user_id).await;
    controller.refresh().await.unwrap();

    assert!(controller.is_running().await);
    // The tick loop may land one more recomputation before the assert
    assert!((5..=6).contains(&controller.elapsed_seconds()));
}

#[tokio::test]
async fn test_refresh_no_rows_clears_to_idle() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();
    let controller = controller(&server, user_id).await;
    seed_running(&mut server, &controller, user_id, Utc::now()).await;

    let _m = server
        .mock("GET", "/rest/v1/time_entries")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    controller.refresh().await.unwrap();

    assert!(!controller.is_running().await);
    assert!(controller.active_entry().await.is_none());
    assert_eq!(controller.elapsed_seconds(), 0);
}

#[tokio::test]
async fn test_refresh_is_idempotent() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();
    let entry_id = Uuid::new_v4();
    let start = Utc::now() - ChronoDuration::seconds(30);

    let _m = server
        .mock("GET", "/rest/v1/time_entries")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!([entry_json(entry_id, user_id, Uuid::new_v4(), start, true, 0)]).to_string(),
        )
        .expect(2)
        .create_async()
        .await;

    let controller = controller(&server, user_id).await;
    controller.refresh().await.unwrap();
    let first = controller.active_entry().await.unwrap();

    controller.refresh().await.unwrap();
    let second = controller.active_entry().await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.start_time, second.start_time);
    assert!(controller.is_running().await);
}

#[tokio::test]
async fn test_stop_failure_leaves_running_state_unchanged() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();
    let controller = controller(&server, user_id).await;
    let start = Utc::now() - ChronoDuration::seconds(10);
    let entry_id = seed_running(&mut server, &controller, user_id, start).await;

    let _m = server
        .mock("PATCH", "/rest/v1/time_entries")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({"is_running": false})))
        .with_status(500)
        .with_body("service unavailable")
        .create_async()
        .await;
    let audit = audit_mock(&mut server).expect(0).create_async().await;

    let result = controller.stop().await;

    assert!(result.is_err());
    assert!(controller.is_running().await);
    let active = controller.active_entry().await.unwrap();
    assert_eq!(active.id, entry_id);
    assert_eq!(active.start_time, start);

    audit.assert_async().await;
}

#[tokio::test]
async fn test_refresh_failure_leaves_state_unchanged() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();
    let controller = controller(&server, user_id).await;
    let entry_id = seed_running(&mut server, &controller, user_id, Utc::now()).await;

    let _m = server
        .mock("GET", "/rest/v1/time_entries")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("service unavailable")
        .create_async()
        .await;

    let result = controller.refresh().await;

    assert!(result.is_err());
    assert!(controller.is_running().await);
    assert_eq!(controller.active_entry().await.unwrap().id, entry_id);
}

#[tokio::test]
async fn test_tick_recomputes_from_wall_clock() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();
    let controller = controller(&server, user_id).await;
    let mut rx = controller.subscribe();

    // Adopted with elapsed = 0, but the loop derives from start_time, so the
    // first recomputation lands at 30 regardless of missed ticks
    let start = Utc::now() - ChronoDuration::seconds(30);
    seed_running(&mut server, &controller, user_id, start).await;

    let event = wait_for_event(&mut rx, |e| matches!(e, TimerEventType::Tick { .. })).await;
    match event.event_type {
        TimerEventType::Tick { elapsed_seconds } => assert!(elapsed_seconds >= 30),
        _ => unreachable!(),
    }
    assert!(controller.elapsed_seconds() >= 30);
}

#[tokio::test]
async fn test_reset_tears_down() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();
    let controller = controller(&server, user_id).await;
    seed_running(&mut server, &controller, user_id, Utc::now()).await;

    controller.reset().await;

    assert!(!controller.is_running().await);
    assert!(controller.active_entry().await.is_none());
    assert_eq!(controller.elapsed_seconds(), 0);

    // Unbound now: operations are silent no-ops
    let patch = server
        .mock("PATCH", "/rest/v1/time_entries")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({"is_running": false})))
        .expect(0)
        .create_async()
        .await;
    controller.stop().await.unwrap();
    patch.assert_async().await;
}
