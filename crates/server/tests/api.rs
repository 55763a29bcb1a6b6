use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceExt;

use registry_server::app_state::AppState;
use registry_server::auth::hash_password;
use registry_server::handlers;
use registry_server::schema::execute_schema;

const SCHEMA: &str = include_str!("../res/sql/sqlite/schema.sql");

async fn test_state() -> AppState {
    let options = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    execute_schema(&pool, SCHEMA).await.unwrap();
    AppState {
        db: pool,
        session_ttl_seconds: 3600,
    }
}

async fn insert_user(state: &AppState, email: &str, password: &str, is_admin: bool) {
    let hash = hash_password(password).unwrap();
    sqlx::query("INSERT INTO users (email, name, password_hash, is_admin) VALUES (?1, ?2, ?3, ?4)")
        .bind(email)
        .bind("Test User")
        .bind(&hash)
        .bind(is_admin)
        .execute(&state.db)
        .await
        .unwrap();
}

fn request(method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Logs in and returns the session cookie pair (`session=<token>`).
async fn login(app: &Router, email: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": email, "password": password})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login sets a session cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

async fn admin_app() -> (Router, String) {
    let state = test_state().await;
    insert_user(&state, "admin@example.com", "secret", true).await;
    let app = handlers::router(state);
    let cookie = login(&app, "admin@example.com", "secret").await;
    (app, cookie)
}

fn company_payload(name: &str, registration_number: &str) -> Value {
    json!({
        "name": name,
        "registration_number": registration_number,
        "registration_date": "2020-03-15",
        "status": "ACTIVE",
        "company_type": "Private Limited",
        "nominal_capital": 100000.0,
        "shares_issued": 1000,
    })
}

async fn create_company(app: &Router, cookie: &str, name: &str, reg: &str) -> i64 {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/api/companies",
            Some(cookie),
            Some(company_payload(name, reg)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let app = handlers::router(test_state().await);
    let (status, body) = send(&app, request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn empty_search_query_returns_empty_results() {
    let app = handlers::router(test_state().await);

    let (status, body) = send(&app, request("GET", "/api/companies/search", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["results"], json!([]));

    let (status, body) =
        send(&app, request("GET", "/api/companies/quick-search?q=", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!([]));

    let (status, body) = send(&app, request("GET", "/api/search?q=", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn search_matches_name_number_and_director() {
    let (app, cookie) = admin_app().await;
    let id = create_company(&app, &cookie, "Acme Holdings", "RC-1001").await;
    create_company(&app, &cookie, "Beta Industries", "RC-2002").await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/api/companies/{id}/directors"),
            Some(&cookie),
            Some(json!({"name": "Grace Okafor", "role": "Chairman"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // by name, case-insensitive
    let (status, body) = send(&app, request("GET", "/api/companies/search?q=acme", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["name"], "Acme Holdings");

    // by registration number
    let (_, body) = send(&app, request("GET", "/api/companies/search?q=RC-2002", None, None)).await;
    assert_eq!(body["results"][0]["name"], "Beta Industries");

    // by director name, directors included in the hit
    let (_, body) = send(&app, request("GET", "/api/companies/search?q=okafor", None, None)).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["directors"][0]["name"], "Grace Okafor");
}

#[tokio::test]
async fn admin_routes_reject_unauthenticated_and_non_admin() {
    let state = test_state().await;
    insert_user(&state, "viewer@example.com", "secret", false).await;
    let app = handlers::router(state);

    let (status, _) = send(&app, request("GET", "/api/admin/stats", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/companies",
            None,
            Some(company_payload("Acme", "RC-1")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let cookie = login(&app, "viewer@example.com", "secret").await;
    let (status, _) = send(&app, request("GET", "/api/admin/stats", Some(&cookie), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn login_me_logout_round_trip() {
    let state = test_state().await;
    insert_user(&state, "admin@example.com", "secret", true).await;
    let app = handlers::router(state);

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "admin@example.com", "password": "wrong"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let cookie = login(&app, "admin@example.com", "secret").await;

    let (status, body) = send(&app, request("GET", "/api/auth/me", Some(&cookie), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "admin@example.com");
    assert_eq!(body["is_admin"], true);

    let (status, _) = send(&app, request("POST", "/api/auth/logout", Some(&cookie), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, request("GET", "/api/auth/me", Some(&cookie), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn company_round_trips_through_update() {
    let (app, cookie) = admin_app().await;
    let id = create_company(&app, &cookie, "Acme Holdings", "RC-1001").await;

    let update = json!({
        "name": "Acme Holdings International",
        "registration_number": "RC-1001",
        "registration_date": "2020-03-15",
        "status": "INACTIVE",
        "company_type": "Public Limited",
        "description": "Diversified holding company",
        "industry_classification": "Finance",
        "nature_of_business": "Investment holding",
        "nominal_capital": 250000.0,
        "shares_issued": 5000,
        "share_value": 50.0,
        "compliance_status": "COMPLIANT",
    });

    let (status, _) = send(
        &app,
        request(
            "PATCH",
            &format!("/api/companies/{id}"),
            Some(&cookie),
            Some(update.clone()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) =
        send(&app, request("GET", &format!("/api/companies/{id}"), None, None)).await;
    assert_eq!(status, StatusCode::OK);
    for (field, expected) in update.as_object().unwrap() {
        assert_eq!(&body[field], expected, "field {field} did not round-trip");
    }
}

#[tokio::test]
async fn duplicate_registration_number_conflicts() {
    let (app, cookie) = admin_app().await;
    create_company(&app, &cookie, "Acme", "RC-1001").await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/companies",
            Some(&cookie),
            Some(company_payload("Acme Clone", "RC-1001")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");
}

#[tokio::test]
async fn unknown_company_is_not_found() {
    let app = handlers::router(test_state().await);
    let (status, body) = send(&app, request("GET", "/api/companies/999", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");

    let (status, _) = send(&app, request("GET", "/api/companies/999/directors", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn shareholder_total_percentage_capped_at_100() {
    let (app, cookie) = admin_app().await;
    let id = create_company(&app, &cookie, "Acme", "RC-1001").await;
    let uri = format!("/api/companies/{id}/shareholders");

    let (status, body) = send(
        &app,
        request(
            "POST",
            &uri,
            Some(&cookie),
            Some(json!({"name": "Alice", "percentage": 60.0})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let alice_id = body["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        request(
            "POST",
            &uri,
            Some(&cookie),
            Some(json!({"name": "Bob", "percentage": 50.0})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "total shareholding cannot exceed 100%");

    // updating the existing row to 100 is fine, its old value is excluded
    let (status, _) = send(
        &app,
        request(
            "PATCH",
            &format!("{uri}/{alice_id}"),
            Some(&cookie),
            Some(json!({"name": "Alice", "percentage": 100.0})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        request(
            "POST",
            &uri,
            Some(&cookie),
            Some(json!({"name": "Carol", "percentage": 120.0})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_shareholder_shrinks_list() {
    let (app, cookie) = admin_app().await;
    let id = create_company(&app, &cookie, "Acme", "RC-1001").await;
    let uri = format!("/api/companies/{id}/shareholders");

    for (name, pct) in [("Alice", 40.0), ("Bob", 30.0)] {
        let (status, _) = send(
            &app,
            request(
                "POST",
                &uri,
                Some(&cookie),
                Some(json!({"name": name, "percentage": pct})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(&app, request("GET", &uri, None, None)).await;
    let before = body.as_array().unwrap().len();
    let first_id = body[0]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        request("DELETE", &format!("{uri}/{first_id}"), Some(&cookie), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, request("GET", &uri, None, None)).await;
    assert_eq!(body.as_array().unwrap().len(), before - 1);
}

#[tokio::test]
async fn contact_and_address_formats_are_validated() {
    let (app, cookie) = admin_app().await;
    let id = create_company(&app, &cookie, "Acme", "RC-1001").await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/api/companies/{id}/contacts"),
            Some(&cookie),
            Some(json!({"name": "Jane", "role": "Secretary", "email": "not-an-email"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/api/companies/{id}/addresses"),
            Some(&cookie),
            Some(json!({"street": "1 Main St", "city": "Lagos", "country": "NG", "postal_code": "x"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/api/companies/{id}/addresses"),
            Some(&cookie),
            Some(json!({"street": "1 Main St", "city": "Lagos", "country": "NG", "postal_code": "100001"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn financial_year_is_unique_per_company() {
    let (app, cookie) = admin_app().await;
    let id = create_company(&app, &cookie, "Acme", "RC-1001").await;
    let uri = format!("/api/companies/{id}/financials");

    let (status, _) = send(
        &app,
        request(
            "POST",
            &uri,
            Some(&cookie),
            Some(json!({"year": 2023, "revenue": 1000000.0, "profit": 120000.0})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        request("POST", &uri, Some(&cookie), Some(json!({"year": 2023}))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        request("POST", &uri, Some(&cookie), Some(json!({"year": 1640}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn network_collapses_dual_role_people() {
    let (app, cookie) = admin_app().await;
    let id = create_company(&app, &cookie, "Acme", "RC-1001").await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/api/companies/{id}/directors"),
            Some(&cookie),
            Some(json!({"name": "Grace Okafor", "role": "Chairman"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/api/companies/{id}/shareholders"),
            Some(&cookie),
            Some(json!({"name": "Grace Okafor", "percentage": 51.0})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        request("GET", &format!("/api/companies/{id}/network"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // one company node + one person node, but two labeled links
    assert_eq!(body["nodes"].as_array().unwrap().len(), 2);
    let links = body["links"].as_array().unwrap();
    assert_eq!(links.len(), 2);
    let relationships: Vec<&str> = links
        .iter()
        .map(|l| l["relationship"].as_str().unwrap())
        .collect();
    assert!(relationships.contains(&"director"));
    assert!(relationships.contains(&"shareholder"));
}

#[tokio::test]
async fn person_companies_spans_both_roles() {
    let (app, cookie) = admin_app().await;
    let first = create_company(&app, &cookie, "Acme", "RC-1001").await;
    let second = create_company(&app, &cookie, "Beta", "RC-2002").await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            &format!("/api/companies/{first}/directors"),
            Some(&cookie),
            Some(json!({"name": "Grace Okafor"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let director_id = body["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/api/companies/{second}/shareholders"),
            Some(&cookie),
            Some(json!({"name": "Grace Okafor", "percentage": 10.0})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        request("GET", &format!("/api/people/{director_id}/companies"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["companies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Acme", "Beta"]);
}

#[tokio::test]
async fn admin_stats_counts_and_recent_activity() {
    let state = test_state().await;
    insert_user(&state, "admin@example.com", "secret", true).await;
    let app = handlers::router(state.clone());
    let cookie = login(&app, "admin@example.com", "secret").await;

    let id = create_company(&app, &cookie, "Acme", "RC-1001").await;
    create_company(&app, &cookie, "Beta", "RC-2002").await;

    // move one registration into the 7-day activity window
    sqlx::query("UPDATE companies SET registration_date = date('now') WHERE id = ?1")
        .bind(id)
        .execute(&state.db)
        .await
        .unwrap();

    let (status, body) = send(&app, request("GET", "/api/admin/stats", Some(&cookie), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_companies"], 2);
    assert_eq!(body["active_companies"], 2);
    assert_eq!(body["total_tenders"], 0);
    assert_eq!(body["total_encumbrances"], 0);
    let activity = body["recent_activity"].as_array().unwrap();
    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0]["companies"], 1);
}

#[tokio::test]
async fn malformed_body_is_bad_request_with_envelope() {
    let (app, cookie) = admin_app().await;

    // missing required fields
    let (status, body) = send(
        &app,
        request("POST", "/api/auth/login", None, Some(json!({}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");

    // body that is not JSON at all
    let req = Request::builder()
        .method("POST")
        .uri("/api/companies")
        .header(header::COOKIE, &cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn tender_validation_and_round_trip() {
    let (app, cookie) = admin_app().await;
    let id = create_company(&app, &cookie, "Acme", "RC-1001").await;
    let uri = format!("/api/companies/{id}/tenders");

    let (status, body) = send(
        &app,
        request(
            "POST",
            &uri,
            Some(&cookie),
            Some(json!({
                "project_name": "Highway Rehabilitation",
                "amount": 5000000.0,
                "award_date": "2023-06-01",
                "status": "AWARDED",
                "government_entity": "Ministry of Works",
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["project_name"], "Highway Rehabilitation");

    let (status, body) = send(
        &app,
        request(
            "POST",
            &uri,
            Some(&cookie),
            Some(json!({"project_name": "  ", "amount": 1000.0})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "project name required");

    let (status, body) = send(
        &app,
        request(
            "POST",
            &uri,
            Some(&cookie),
            Some(json!({"project_name": "Bridge Repair", "amount": -1.0})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "amount cannot be negative");

    let (_, body) = send(&app, request("GET", &uri, None, None)).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn encumbrance_validation_and_round_trip() {
    let (app, cookie) = admin_app().await;
    let id = create_company(&app, &cookie, "Acme", "RC-1001").await;
    let uri = format!("/api/companies/{id}/encumbrances");

    let (status, body) = send(
        &app,
        request(
            "POST",
            &uri,
            Some(&cookie),
            Some(json!({
                "kind": "Fixed Charge",
                "amount": 250000.0,
                "registered_date": "2022-11-20",
                "status": "ACTIVE",
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["kind"], "Fixed Charge");
    let encumbrance_id = body["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        request(
            "POST",
            &uri,
            Some(&cookie),
            Some(json!({"kind": "", "amount": 1000.0})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        request(
            "POST",
            &uri,
            Some(&cookie),
            Some(json!({"kind": "Lien", "amount": -500.0})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "amount cannot be negative");

    let (status, body) = send(
        &app,
        request(
            "PATCH",
            &format!("{uri}/{encumbrance_id}"),
            Some(&cookie),
            Some(json!({"kind": "Fixed Charge", "amount": 100000.0, "status": "DISCHARGED"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "DISCHARGED");

    let (_, body) = send(&app, request("GET", &uri, None, None)).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn first_shareholder_on_fresh_company_is_created() {
    let (app, cookie) = admin_app().await;
    let id = create_company(&app, &cookie, "Acme", "RC-1001").await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            &format!("/api/companies/{id}/shareholders"),
            Some(&cookie),
            Some(json!({"name": "Alice", "percentage": 25.0})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["percentage"], 25.0);
}

#[tokio::test]
async fn company_list_filters_by_status() {
    let (app, cookie) = admin_app().await;
    create_company(&app, &cookie, "Acme", "RC-1001").await;
    let second = create_company(&app, &cookie, "Beta", "RC-2002").await;

    let mut update = company_payload("Beta", "RC-2002");
    update["status"] = json!("INACTIVE");
    let (status, _) = send(
        &app,
        request(
            "PATCH",
            &format!("/api/companies/{second}"),
            Some(&cookie),
            Some(update),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, request("GET", "/api/companies?status=ACTIVE", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["companies"][0]["name"], "Acme");

    let (status, _) = send(&app, request("GET", "/api/companies?status=BOGUS", None, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
