//! Integration tests for API endpoints.
//!
//! The full router runs over the in-memory Unit of Work; the database handle
//! is disconnected and only reached by the health check.

mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt;

use parking_permits::api::{create_router, AppState};
use parking_permits::domain::UserRole;
use parking_permits::infra::Database;
use parking_permits::services::Services;

use common::{at, test_config, MemoryUnitOfWork};

struct TestApp {
    router: Router,
    uow: MemoryUnitOfWork,
}

impl TestApp {
    fn new() -> Self {
        let uow = MemoryUnitOfWork::new();
        let services = Services::from_unit_of_work(Arc::new(uow.clone()), test_config());
        let database = Arc::new(Database::from_connection(DatabaseConnection::default()));
        let router = create_router(AppState::from_services(&services, database));
        Self { router, uow }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// Seed an account and return its `Authorization` header value.
    async fn token_for(&self, email: &str, role: UserRole) -> String {
        self.uow.add_user(email, "Secret123", role);
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": "Secret123" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["token"].as_str().unwrap().to_string()
    }
}

fn permit_form(location_id: i32, plate: &str, duration: Value) -> Value {
    json!({
        "location": location_id,
        "unit": "12B",
        "duration": duration,
        "firstName": "Sam",
        "lastName": "Guest",
        "email": "sam@example.com",
        "defaultPhone": "(555) 123-4567",
        "vplate": plate,
        "vmake": "Honda",
    })
}

// =============================================================================
// Permits
// =============================================================================

#[tokio::test]
async fn test_anonymous_permit_request() {
    let app = TestApp::new();
    let location = app.uow.add_location("Maple Court", 31);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/permits",
            None,
            Some(permit_form(location.id, "abc123", json!("3"))),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], json!(["Permit was created"]));
    assert_eq!(body["createdPermit"]["vplate"], "ABC123");
    assert_eq!(body["createdPermit"]["duration"], 3);
    assert_eq!(body["createdPermit"]["location"]["name"], "Maple Court");
    assert_eq!(body["createdPermit"]["phone"], "(555) 123-4567");
}

#[tokio::test]
async fn test_permit_form_validation_errors() {
    let app = TestApp::new();
    let location = app.uow.add_location("Maple Court", 31);

    let mut form = permit_form(location.id, "", json!(2));
    form["email"] = json!("not-an-email");
    form["defaultPhone"] = json!("123");

    let (status, body) = app.send(Method::POST, "/api/permits", None, Some(form)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    let params: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["param"].as_str())
        .collect();
    assert!(params.contains(&"email"));
    assert!(params.contains(&"defaultPhone"));
    assert!(params.contains(&"vplate"));
}

#[tokio::test]
async fn test_values_longer_than_columns_rejected() {
    let app = TestApp::new();
    let location = app.uow.add_location("Maple Court", 31);

    let mut form = permit_form(location.id, "ABC123", json!(2));
    form["defaultPhone"] = json!("+44 (0) 20 7946 0958 12");
    let domain = format!("{}.", "b".repeat(60)).repeat(3);
    form["email"] = json!(format!("{}@{domain}example.com", "a".repeat(64)));

    let (status, body) = app.send(Method::POST, "/api/permits", None, Some(form)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    let params: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["param"].as_str())
        .collect();
    assert!(params.contains(&"defaultPhone"));
    assert!(params.contains(&"email"));
    assert_eq!(app.uow.permit_count(), 0);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "firstName": "Sam",
                "lastName": "Resident",
                "email": "sam@example.com",
                "password": "Secret123",
                "confirmPassword": "Secret123",
                "defaultPhone": "+44 (0) 20 7946 0958 12"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["param"], "defaultPhone");
}

#[tokio::test]
async fn test_non_numeric_duration_rejected() {
    let app = TestApp::new();
    let location = app.uow.add_location("Maple Court", 31);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/permits",
            None,
            Some(permit_form(location.id, "ABC123", json!("a week"))),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["param"], "duration");
}

#[tokio::test]
async fn test_active_plate_conflict() {
    let app = TestApp::new();
    let location = app.uow.add_location("Maple Court", 31);
    app.uow
        .add_permit("ABC123", location.id, 2, at("2999-01-01 23:59:59"), 0);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/permits",
            None,
            Some(permit_form(location.id, "ABC123", json!(1))),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert!(body["errors"][0]["msg"]
        .as_str()
        .unwrap()
        .contains("already has an active permit"));
}

#[tokio::test]
async fn test_unknown_location_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Method::POST,
            "/api/permits",
            None,
            Some(permit_form(404, "ABC123", json!(1))),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_admin_routes_require_admin_role() {
    let app = TestApp::new();

    let (status, _) = app.send(Method::GET, "/api/permits", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let resident = app.token_for("res@example.com", UserRole::Resident).await;
    let (status, _) = app
        .send(Method::GET, "/api/permits", Some(&resident), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(Method::GET, "/api/permits", Some("Bearer not.a.jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin = app.token_for("admin@example.com", UserRole::Admin).await;
    let (status, body) = app
        .send(Method::GET, "/api/permits", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["permits"], json!([]));
}

#[tokio::test]
async fn test_admin_permit_lifecycle() {
    let app = TestApp::new();
    let location = app.uow.add_location("Maple Court", 31);
    let admin = app.token_for("root@example.com", UserRole::SuperAdmin).await;

    let (_, created) = app
        .send(
            Method::POST,
            "/api/permits",
            None,
            Some(permit_form(location.id, "LIFE01", json!(2))),
        )
        .await;
    let id = created["createdPermit"]["id"].as_i64().unwrap();

    let (status, body) = app
        .send(Method::GET, &format!("/api/permits/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["permit"]["vplate"], "LIFE01");

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/permits/update/{id}"),
            Some(&admin),
            Some(json!({ "duration": 0, "expDate": "2024-05-01T23:59:59", "vcolor": "Red" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], json!(["Permit was updated"]));
    assert_eq!(body["updatedPermit"]["duration"], 0);
    assert_eq!(body["updatedPermit"]["expDate"], "2024-05-01T23:59:59");
    assert_eq!(body["updatedPermit"]["vcolor"], "Red");

    let (status, body) = app
        .send(
            Method::DELETE,
            "/api/permits/delete",
            Some(&admin),
            Some(json!([id])),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 1);

    let (status, _) = app
        .send(Method::GET, &format!("/api/permits/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_current_user_permits() {
    let app = TestApp::new();
    let location = app.uow.add_location("Maple Court", 31);
    let token = app.token_for("res@example.com", UserRole::Resident).await;

    let (_, me) = app.send(Method::GET, "/api/auth", Some(&token), None).await;
    let user_id = me["user"]["id"].clone();
    assert!(me["user"].get("passwordHash").is_none());

    let mut form = permit_form(location.id, "MINE01", json!(1));
    form["userId"] = user_id;
    let (status, _) = app.send(Method::POST, "/api/permits", None, Some(form)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(Method::GET, "/api/permits/current-user", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["permits"][0]["vplate"], "MINE01");
}

// =============================================================================
// Auth & users
// =============================================================================

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "firstName": "Jane",
                "lastName": "Doe",
                "email": "jane@example.com",
                "password": "Secret123",
                "confirmPassword": "Secret123"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["user"]["role"], 4);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "jane@example.com", "password": "Secret123" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!(["Login Successful"]));
    assert_eq!(body["tokenType"], "Bearer");
    assert!(body["token"].as_str().unwrap().starts_with("Bearer "));
}

#[tokio::test]
async fn test_register_weak_password_and_duplicate_email() {
    let app = TestApp::new();
    app.uow
        .add_user("taken@example.com", "Secret123", UserRole::Resident);

    let register = |email: &str, password: &str| {
        json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "email": email,
            "password": password,
            "confirmPassword": password
        })
    };

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(register("new@example.com", "weakpass")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(register("taken@example.com", "Secret123")),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_bad_login_is_unauthorized() {
    let app = TestApp::new();
    app.uow
        .add_user("jane@example.com", "Secret123", UserRole::Resident);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "jane@example.com", "password": "Wrong1234" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new();
    let token = app.token_for("jane@example.com", UserRole::Resident).await;

    let change = |old: &str, new: &str| {
        json!({ "oldPassword": old, "newPassword": new, "confirmNewPassword": new })
    };

    let (status, _) = app
        .send(
            Method::PUT,
            "/api/users/change-password",
            Some(&token),
            Some(change("Wrong1234", "Changed123")),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(
            Method::PUT,
            "/api/users/change-password",
            Some(&token),
            Some(change("Secret123", "Secret123")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            Method::PUT,
            "/api/users/change-password",
            Some(&token),
            Some(change("Secret123", "Changed123")),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!(["Password was changed"]));
}

#[tokio::test]
async fn test_admin_user_management() {
    let app = TestApp::new();
    let admin = app.token_for("admin@example.com", UserRole::Admin).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/users",
            Some(&admin),
            Some(json!({
                "firstName": "Alex",
                "lastName": "Manager",
                "email": "alex@example.com",
                "password": "Secret123",
                "role": 3
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["param"], "role");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/users",
            Some(&admin),
            Some(json!({
                "firstName": "Alex",
                "lastName": "Manager",
                "email": "alex@example.com",
                "password": "Secret123",
                "role": 2
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let id = body["user"]["id"].as_i64().unwrap();

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/users/update/{id}"),
            Some(&admin),
            Some(json!({ "lastName": "Director", "role": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["lastName"], "Director");
    assert_eq!(body["user"]["role"], 1);

    let (status, body) = app.send(Method::GET, "/api/users", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"].as_array().unwrap().len(), 2);

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/users/delete/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(Method::GET, &format!("/api/users/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_profile_update_keeps_role() {
    let app = TestApp::new();
    let token = app.token_for("res@example.com", UserRole::Resident).await;

    let (status, body) = app
        .send(
            Method::PUT,
            "/api/users/update/current-user",
            Some(&token),
            Some(json!({ "firstName": "Renamed", "role": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["user"]["firstName"], "Renamed");
    assert_eq!(body["user"]["role"], 4);
}

#[tokio::test]
async fn test_token_follows_stored_role_and_account() {
    let app = TestApp::new();
    let owner = app.token_for("owner@example.com", UserRole::SuperAdmin).await;
    let staff = app.token_for("staff@example.com", UserRole::Admin).await;

    let (status, body) = app.send(Method::GET, "/api/auth", Some(&staff), None).await;
    assert_eq!(status, StatusCode::OK);
    let staff_id = body["user"]["id"].as_i64().unwrap();

    let (status, _) = app.send(Method::GET, "/api/users", Some(&staff), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/users/update/{staff_id}"),
            Some(&owner),
            Some(json!({ "role": 4 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(Method::GET, "/api/users", Some(&staff), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, body) = app.send(Method::GET, "/api/auth", Some(&staff), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], 4);

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/users/delete/{staff_id}"),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send(Method::GET, "/api/auth", Some(&staff), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    let (status, _) = app
        .send(Method::GET, "/api/permits/current-user", Some(&staff), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Locations
// =============================================================================

#[tokio::test]
async fn test_location_management() {
    let app = TestApp::new();
    let admin = app.token_for("admin@example.com", UserRole::Admin).await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/locations",
            None,
            Some(json!({ "name": "Maple Court" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/locations",
            Some(&admin),
            Some(json!({ "name": "Maple Court", "curfewReset": "22:00:00" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["location"]["maxMonthlyDuration"], 31);
    assert_eq!(body["location"]["curfewReset"], "22:00:00");
    let location_id = body["location"]["id"].as_i64().unwrap();

    let (status, _) = app
        .send(
            Method::POST,
            "/api/locations",
            Some(&admin),
            Some(json!({ "name": "Maple Court" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/sublocations",
            Some(&admin),
            Some(json!({ "name": "Building B", "location": location_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (status, body) = app.send(Method::GET, "/api/locations", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["locations"][0]["sublocations"][0]["name"], "Building B");

    let (status, body) = app
        .send(
            Method::DELETE,
            "/api/locations/delete",
            Some(&admin),
            Some(json!([location_id])),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 1);

    let (status, body) = app.send(Method::GET, "/api/sublocations", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sublocations"], json!([]));
}

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"]["status"], "unhealthy");
}
