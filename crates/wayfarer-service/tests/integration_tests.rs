//! Integration tests for wayfarer-service
//!
//! These run the store actor on a tokio runtime and talk to it the way UI
//! surfaces do.

use serde_json::{json, Value};
use wayfarer_domain::traits::PlaceSource;
use wayfarer_domain::{Coordinates, PlaceObservation, PlaceRecord};
use wayfarer_service::{serve, spawn_store_actor, ImportReport, Request, Response, ServiceError, StoreHandle};
use wayfarer_store::{MemoryBackend, PlaceStats, PlaceStore, SqliteBackend};

fn memory_actor() -> StoreHandle {
    let store = PlaceStore::open(MemoryBackend::new()).unwrap();
    let (handle, _task) = spawn_store_actor(store, 16);
    handle
}

fn cafe_luna() -> PlaceObservation {
    PlaceObservation::new("Cafe Luna")
        .with_address("1 Main St")
        .with_coordinates(Coordinates::new(10.0, 20.0))
}

#[tokio::test]
async fn test_concurrent_adds_insert_once() {
    let handle = memory_actor();

    let mut tasks = Vec::new();
    for _ in 0..20 {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            handle.send(Request::AddTodoPlace { place: cafe_luna() }).await
        }));
    }

    let mut inserted = 0;
    for task in tasks {
        let response = task.await.unwrap();
        assert!(response.success);
        if response.data == Some(Value::Bool(true)) {
            inserted += 1;
        }
    }

    assert_eq!(inserted, 1);
    let stats: PlaceStats = handle.call(Request::GetStats).await.unwrap();
    assert_eq!(stats.todo_count, 1);
}

#[tokio::test]
async fn test_full_lifecycle_over_json() {
    let handle = memory_actor();

    let added = handle
        .send_json(r#"{"action":"addTodoPlace","place":{"name":"Blue Bottle Coffee","placeId":"Blue+Bottle"}}"#)
        .await;
    assert_eq!(added.data, Some(json!(true)));

    let check = handle
        .send_json(r#"{"action":"checkPlace","place":{"name":"Blue Bottle Coffee"}}"#)
        .await;
    let data = check.data.unwrap();
    assert_eq!(data["isTodo"], json!(true));
    assert_eq!(data["shouldPrompt"], json!(true));

    // The provider identifier works as a placeId
    let marked = handle
        .send_json(r#"{"action":"markAsVisited","placeId":"Blue+Bottle"}"#)
        .await;
    assert_eq!(marked.data, Some(json!(true)));

    let check = handle
        .send_json(r#"{"action":"checkPlace","place":{"name":"Blue Bottle Coffee"}}"#)
        .await;
    let data = check.data.unwrap();
    assert_eq!(data["isTodo"], json!(false));
    assert_eq!(data["isVisited"], json!(true));
    assert_eq!(data["shouldPrompt"], json!(false));

    let visited: Vec<PlaceRecord> = handle.call(Request::GetVisitedPlaces).await.unwrap();
    assert_eq!(visited.len(), 1);
    assert!(visited[0].visited_at.is_some());
}

#[tokio::test]
async fn test_invalid_requests_are_reported() {
    let handle = memory_actor();

    let response = handle.send_json(r#"{"action":"dropTables"}"#).await;
    assert!(!response.success);
    assert!(response.error.unwrap().starts_with("Invalid request"));

    let response = handle.send_json("not json").await;
    assert!(!response.success);

    // The actor keeps serving after a bad request
    assert!(handle.send(Request::GetStats).await.success);
}

#[tokio::test]
async fn test_export_import_is_idempotent() {
    let handle = memory_actor();
    for place in [
        cafe_luna(),
        PlaceObservation::new("Museum"),
        PlaceObservation::new("Harbour Bridge"),
    ] {
        handle.send(Request::AddTodoPlace { place }).await;
    }
    let todo: Vec<PlaceRecord> = handle.call(Request::GetTodoPlaces).await.unwrap();
    let place_id = todo[1].id.to_string();
    handle.send(Request::MarkAsVisited { place_id }).await;

    let exported: Value = handle.call(Request::ExportData).await.unwrap();
    assert_eq!(exported["version"], json!("1.0"));

    let report: ImportReport = handle
        .call(Request::ImportData { data: exported })
        .await
        .unwrap();
    assert_eq!(report.todo_added, 0);
    assert_eq!(report.todo_skipped, 2);
    assert_eq!(report.visited_added, 0);
    assert_eq!(report.visited_skipped, 1);

    let stats: PlaceStats = handle.call(Request::GetStats).await.unwrap();
    assert_eq!(stats, PlaceStats { todo_count: 2, visited_count: 1 });
}

#[tokio::test]
async fn test_import_rejects_bad_document_without_changes() {
    let handle = memory_actor();

    let result = handle
        .call::<ImportReport>(Request::ImportData {
            data: json!({ "todoPlaces": [{ "name": "Zoo" }], "version": "9.9" }),
        })
        .await;
    assert!(matches!(result, Err(ServiceError::Remote(_))));

    let stats: PlaceStats = handle.call(Request::GetStats).await.unwrap();
    assert_eq!(stats.todo_count, 0);
}

#[tokio::test]
async fn test_import_into_fresh_sqlite_store() {
    let source = memory_actor();
    source.send(Request::AddTodoPlace { place: cafe_luna() }).await;
    source
        .send(Request::AddTodoPlace {
            place: PlaceObservation::new("Museum"),
        })
        .await;
    let exported: Value = source.call(Request::ExportData).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("places.db");

    {
        let store = PlaceStore::open(SqliteBackend::open(&path).unwrap()).unwrap();
        let (handle, task) = spawn_store_actor(store, 4);
        let report: ImportReport = handle
            .call(Request::ImportData { data: exported })
            .await
            .unwrap();
        assert_eq!(report.todo_added, 2);
        drop(handle);
        task.await.unwrap();
    }

    let store = PlaceStore::open(SqliteBackend::open(&path).unwrap()).unwrap();
    let names: Vec<&str> = store.todo_places().iter().map(|r| r.place.name.as_str()).collect();
    assert_eq!(names, vec!["Cafe Luna", "Museum"]);
}

#[tokio::test]
async fn test_serve_answers_each_line() {
    let handle = memory_actor();

    let input = concat!(
        r#"{"action":"addTodoPlace","place":{"name":"Cafe Luna","lat":10.0,"lng":20.0}}"#,
        "\n",
        "\n",
        r#"{"action":"addTodoPlace","place":{"name":"Cafe Luna","lat":10.0005,"lng":20.0005}}"#,
        "\n",
        r#"{"action":"getStats"}"#,
        "\n",
        "garbage\n",
    );
    let mut output = Vec::new();

    serve(handle, input.as_bytes(), &mut output).await.unwrap();

    let responses: Vec<Response> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(responses.len(), 4);
    assert_eq!(responses[0].data, Some(json!(true)));
    assert_eq!(responses[1].data, Some(json!(false)));
    assert_eq!(responses[2].data, Some(json!({ "todoCount": 1, "visitedCount": 0 })));
    assert!(!responses[3].success);
}

struct FixedSource(Option<PlaceObservation>);

impl PlaceSource for FixedSource {
    fn current_place(&self) -> Option<PlaceObservation> {
        self.0.clone()
    }
}

#[tokio::test]
async fn test_check_source() {
    let handle = memory_actor();
    handle.send(Request::AddTodoPlace { place: cafe_luna() }).await;

    assert!(handle.check_source(&FixedSource(None)).await.is_none());

    let response = handle
        .check_source(&FixedSource(Some(cafe_luna())))
        .await
        .unwrap();
    assert_eq!(response.data.unwrap()["isTodo"], json!(true));
}

#[tokio::test]
async fn test_stopped_actor_reports_error() {
    let store = PlaceStore::open(MemoryBackend::new()).unwrap();
    let (handle, task) = spawn_store_actor(store, 4);
    assert!(handle.is_running());

    handle.shutdown().await;
    task.await.unwrap();

    assert!(!handle.is_running());
    let response = handle.send(Request::GetStats).await;
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("Store is not running"));
    assert!(matches!(
        handle.call::<PlaceStats>(Request::GetStats).await,
        Err(ServiceError::Remote(_))
    ));
}

#[tokio::test]
async fn test_shutdown_returns_store_and_stops_clones() {
    let store = PlaceStore::open(MemoryBackend::new()).unwrap();
    let (handle, task) = spawn_store_actor(store, 8);
    let other = handle.clone();

    assert!(handle.send(Request::AddTodoPlace { place: cafe_luna() }).await.success);

    handle.shutdown().await;
    let store = task.await.unwrap();
    assert_eq!(store.todo_places().len(), 1);

    // A surviving clone sees the actor as stopped
    assert!(!other.is_running());
    assert!(!other.send(Request::GetStats).await.success);
}
