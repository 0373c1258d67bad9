mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::{json, Value};

fn kayak_payload() -> Value {
    json!({
        "name": "Kayak Tour",
        "description": "Half-day tour on the lake",
        "category": "water",
        "place": "Lake Louise",
        "availableDates": [
            { "date": "2030-05-01", "startTime": "09:00", "endTime": "17:00" }
        ],
        "price": 25.0,
        "totalPlaces": 10
    })
}

async fn setup_admin(app: &TestApp) -> String {
    app.seed_admin("admin@example.com", "adminpw").await;
    app.login("admin@example.com", "adminpw").await
}

#[tokio::test]
async fn test_create_activity_requires_admin() {
    let app = TestApp::new().await;
    app.register("Bob", "bob@example.com", "pw123456").await;
    let token = app.login("bob@example.com", "pw123456").await;

    let res = app.send("POST", "/activities", Some(&token), Some(kayak_payload())).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body = parse_body(res).await;
    assert_eq!(body["error"], "Access denied. Admin privileges required.");

    let res = app.send("POST", "/activities", None, Some(kayak_payload())).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_creates_activity() {
    let app = TestApp::new().await;
    let token = setup_admin(&app).await;

    let res = app.send("POST", "/activities", Some(&token), Some(kayak_payload())).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = parse_body(res).await;

    assert_eq!(body["name"], "Kayak Tour");
    assert_eq!(body["totalPlaces"], 10);
    assert_eq!(body["availableDates"][0]["date"], "2030-05-01");
    assert_eq!(body["availableDates"][0]["startTime"], "09:00");
    assert!(body["id"].as_str().is_some());
}

#[tokio::test]
async fn test_create_activity_validates_fields() {
    let app = TestApp::new().await;
    let token = setup_admin(&app).await;

    let mut payload = kayak_payload();
    payload["price"] = json!(-1.0);
    let res = app.send("POST", "/activities", Some(&token), Some(payload)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let mut payload = kayak_payload();
    payload["totalPlaces"] = json!(0);
    let res = app.send("POST", "/activities", Some(&token), Some(payload)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let mut payload = kayak_payload();
    payload["availableDates"][0]["startTime"] = json!("morning");
    let res = app.send("POST", "/activities", Some(&token), Some(payload)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let mut payload = kayak_payload();
    payload["availableDates"][0]["endTime"] = json!("17:99");
    let res = app.send("POST", "/activities", Some(&token), Some(payload)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let mut payload = kayak_payload();
    payload["availableDates"][0]["startTime"] = json!("9:00");
    let res = app.send("POST", "/activities", Some(&token), Some(payload)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_activities_are_publicly_listed() {
    let app = TestApp::new().await;
    let token = setup_admin(&app).await;
    app.send("POST", "/activities", Some(&token), Some(kayak_payload())).await;

    let res = app.send("GET", "/activities", None, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Kayak Tour");
}

#[tokio::test]
async fn test_get_activity_by_id() {
    let app = TestApp::new().await;
    let token = setup_admin(&app).await;
    let created = parse_body(app.send("POST", "/activities", Some(&token), Some(kayak_payload())).await).await;
    let id = created["id"].as_str().unwrap();

    let res = app.send("GET", &format!("/activities/{id}"), None, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["place"], "Lake Louise");

    let res = app.send("GET", "/activities/missing-id", None, None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = parse_body(res).await;
    assert_eq!(body["error"], "Activity not found");
}

#[tokio::test]
async fn test_partial_update_keeps_omitted_fields() {
    let app = TestApp::new().await;
    let token = setup_admin(&app).await;
    let created = parse_body(app.send("POST", "/activities", Some(&token), Some(kayak_payload())).await).await;
    let id = created["id"].as_str().unwrap();

    let res = app
        .send(
            "PUT",
            &format!("/activities/{id}"),
            Some(&token),
            Some(json!({ "price": 30.0 })),
        )
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["price"], 30.0);
    assert_eq!(body["name"], "Kayak Tour");
    assert_eq!(body["totalPlaces"], 10);
}

#[tokio::test]
async fn test_update_requires_admin() {
    let app = TestApp::new().await;
    let admin_token = setup_admin(&app).await;
    let created = parse_body(app.send("POST", "/activities", Some(&admin_token), Some(kayak_payload())).await).await;
    let id = created["id"].as_str().unwrap();

    app.register("Bob", "bob@example.com", "pw123456").await;
    let user_token = app.login("bob@example.com", "pw123456").await;

    let res = app
        .send(
            "PUT",
            &format!("/activities/{id}"),
            Some(&user_token),
            Some(json!({ "price": 1.0 })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_missing_activity_is_404() {
    let app = TestApp::new().await;
    let token = setup_admin(&app).await;

    let res = app.send("DELETE", "/activities/missing-id", Some(&token), None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
