use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use route_progress::config::environment::EnvironmentConfig;
use route_progress::create_app;
use route_progress::state::AppState;

fn create_test_app() -> Router {
    create_app(AppState::new(EnvironmentConfig::default()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(json) => Body::from(json.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn route_definition(id: i64) -> Value {
    json!({
        "id": id,
        "Name": "Planta - Patio",
        "steps": [
            {
                "idgeo": 1, "Name": "Planta", "ShortName": "P1", "IsFinal": false,
                "Config": { "MinutesToDestination": 50, "tolerance": { "SectionTime": 10 } },
                "Transit": {
                    "Name": "Traslado a Báscula", "ShortName": "Traslado a P2",
                    "MinutesToDestination": 40,
                    "tolerance": { "SectionTime": 20 }
                }
            },
            {
                "idgeo": 2, "Name": "Báscula", "ShortName": "P2", "IsFinal": false,
                "Config": { "MinutesToDestination": 20, "tolerance": { "SectionTime": 5 } },
                "Transit": {
                    "Name": "Traslado a Patio", "ShortName": "Traslado a P3",
                    "MinutesToDestination": 15,
                    "tolerance": { "SectionTime": 15 }
                }
            },
            { "idgeo": 3, "Name": "Patio", "ShortName": "P3", "IsFinal": true, "Transit": {} }
        ]
    })
}

fn snapshot(route_id: i64) -> Value {
    json!({
        "events": [
            {
                "imei": 1001,
                "routeId": route_id,
                "short_name": "T-01",
                "status": { "currentStep": "P1", "routeStatus": "Tarde" },
                "recentEvents": [ { "type": "ENTRY", "geofenceShortName": "P1" } ]
            },
            {
                "imei": 1002,
                "routeId": route_id,
                "status": { "currentStep": "P2" },
                "recentEvents": [ { "type": "EXIT", "geofenceShortName": "P1" } ]
            }
        ]
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["routes"], 0);
}

#[tokio::test]
async fn test_project_without_registering() {
    let app = create_test_app();
    let mut request = snapshot(7);
    request["route"] = route_definition(7);
    request["now"] = json!("2024-03-01T12:00:00Z");

    let (status, body) = send(&app, Method::POST, "/api/progress/project", Some(request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let steps = &body["data"]["progress"]["steps"];
    assert_eq!(steps[0]["vehicles_in_step"][0]["unit_key"], "UNIT#1001");
    assert_eq!(steps[0]["vehicles_in_transit"][0]["unit_key"], "UNIT#1002");
    assert_eq!(steps[0]["step_status"], "late");
    assert_eq!(body["data"]["badges"][0]["step_badge"]["color"], "#F14854");
}

#[tokio::test]
async fn test_project_rejects_invalid_route() {
    let app = create_test_app();
    let mut route = route_definition(7);
    route["steps"][2]["IsFinal"] = json!(false);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/progress/project",
        Some(json!({ "route": route, "events": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_route_lifecycle() {
    let app = create_test_app();

    let (status, body) = send(&app, Method::PUT, "/api/routes/12", Some(route_definition(12))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["steps_count"], 3);

    let (status, body) = send(&app, Method::PUT, "/api/routes/12/snapshot", Some(snapshot(12))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["badges"][0]["vehicles_in_step"], 1);
    assert_eq!(body["data"]["badges"][0]["vehicles_in_transit"], 1);

    let (status, body) = send(&app, Method::GET, "/api/routes/12/progress", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["progress"]["route_id"], 12);

    let (_, body) = send(&app, Method::GET, "/api/routes", None).await;
    assert_eq!(body["data"][0]["vehicles_count"], 2);

    let (status, _) = send(&app, Method::DELETE, "/api/routes/12", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/api/routes/12/progress", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_register_rejects_mismatched_id() {
    let app = create_test_app();
    let (status, body) = send(&app, Method::PUT, "/api/routes/99", Some(route_definition(12))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_snapshot_for_unknown_route() {
    let app = create_test_app();
    let (status, _) = send(&app, Method::PUT, "/api/routes/404/snapshot", Some(snapshot(404))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_build_route_from_stops() {
    let app = create_test_app();
    let request = json!({
        "id": 3,
        "name": "Planta - Patio",
        "stops": [
            { "id": 1, "name": "Planta", "short_name": "P1", "section_time": 10, "transit_section_time": 20 },
            { "id": 2, "name": "Patio", "short_name": "P3" }
        ],
        "thresholds": { "on_time": -10, "delay": 10 }
    });

    let (status, body) = send(&app, Method::POST, "/api/routes/build", Some(request)).await;
    assert_eq!(status, StatusCode::OK);

    let steps = &body["data"]["route"]["steps"];
    assert_eq!(steps[0]["Transit"]["ShortName"], "Traslado a P3");
    assert_eq!(steps[0]["Transit"]["tolerance"]["OnTime"], -10.0);
    assert_eq!(steps[1]["IsFinal"], true);

    // la definición armada se registra tal cual
    let (status, _) = send(&app, Method::PUT, "/api/routes/3", Some(body["data"]["route"].clone())).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_build_route_requires_two_stops() {
    let app = create_test_app();
    let request = json!({
        "id": 3,
        "name": "Corta",
        "stops": [ { "id": 1, "name": "Planta", "section_time": 10, "transit_section_time": 20 } ]
    });

    let (status, body) = send(&app, Method::POST, "/api/routes/build", Some(request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_snapshot_tolerates_malformed_units() {
    let app = create_test_app();
    send(&app, Method::PUT, "/api/routes/12", Some(route_definition(12))).await;

    let mut request = snapshot(12);
    let events = request["events"].as_array_mut().unwrap();
    events.push(json!({ "imei": 1003, "routeId": 12, "status": null, "recentEvents": null }));
    events.push(json!({
        "imei": 1004,
        "routeId": 12,
        "status": { "currentStep": "P2", "eta": true, "exceededTime": "3" },
        "recentEvents": [ { "geofenceShortName": "P2" } ]
    }));
    events.push(json!(null));
    events.push(json!("T-05"));

    let (status, body) = send(&app, Method::PUT, "/api/routes/12/snapshot", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["badges"][0]["vehicles_in_step"], 1);
    assert_eq!(body["data"]["badges"][0]["vehicles_in_transit"], 1);
    assert_eq!(body["data"]["badges"][1]["vehicles_in_step"], 0);

    let (_, body) = send(&app, Method::GET, "/api/routes", None).await;
    assert_eq!(body["data"][0]["vehicles_count"], 4);
}
