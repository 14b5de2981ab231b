use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App};
use fieldforce_api::config::{AttendanceConfig, BootstrapConfig};
use fieldforce_api::database::{expense_sheets as sheets_db, users as users_db};
use fieldforce_api::helpers::database::bootstrap_admin;
use fieldforce_api::Database;
use serde_json::{json, Value};
use shared_types::{
    ExpenseCategory, ExpenseEntryEdit, ExpenseStatus, Territory, UserProfile, UserRole,
    UserStatus,
};
use tempfile::{tempdir, TempDir};

const CENTRE_LAT: f64 = 28.6139;
const CENTRE_LNG: f64 = 77.2090;

fn fixture_db() -> (TempDir, Arc<Database>) {
    let dir = tempdir().expect("tempdir");
    let db = Database::new(&dir.path().join("fieldforce.db")).expect("open database");
    (dir, Arc::new(db))
}

fn profile(id: &str, role: UserRole, manager: Option<&str>) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        email: format!("{}@example.com", id),
        display_name: id.to_uppercase(),
        role,
        status: UserStatus::Confirmed,
        hq_location: "Delhi".to_string(),
        reporting_manager_id: manager.map(str::to_string),
        territories: vec![Territory {
            id: format!("{}-hq", id),
            name: "Connaught Place".to_string(),
            category: ExpenseCategory::Hq,
            fixed_km: 0.0,
            geo_lat: Some(CENTRE_LAT),
            geo_lng: Some(CENTRE_LNG),
            geo_radius_meters: Some(2000.0),
        }],
    }
}

async fn seed_users(db: &Arc<Database>) {
    let users = [
        profile("admin", UserRole::Admin, None),
        profile("asm1", UserRole::Asm, None),
        profile("asm2", UserRole::Asm, None),
        profile("mr1", UserRole::Mr, Some("asm1")),
        profile("mr2", UserRole::Mr, Some("asm2")),
    ];
    for user in &users {
        users_db::upsert_user(db.async_connection.clone(), user)
            .await
            .expect("seed user");
    }
}

macro_rules! app {
    ($db:expr) => {
        app!($db, false)
    };
    ($db:expr, $strict:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($db.clone()))
                .app_data(web::Data::new(AttendanceConfig {
                    strict_geofence: $strict,
                }))
                .configure(fieldforce_api::configure),
        )
        .await
    };
}

fn get(uri: &str, user: &str) -> test::TestRequest {
    test::TestRequest::get()
        .uri(uri)
        .insert_header(("X-User-Id", user))
}

fn post(uri: &str, user: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header(("X-User-Id", user))
}

const SHEET: &str = "/api/sheets/mr1/2025/3";

#[actix_web::test]
async fn health_reports_connected_database() {
    let (_dir, db) = fixture_db();
    let app = app!(db);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["database"], "connected");
}

#[actix_web::test]
async fn sheet_is_created_on_first_read() {
    let (_dir, db) = fixture_db();
    seed_users(&db).await;
    let app = app!(db);

    let resp = test::call_service(&app, get(SHEET, "mr1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["sheet"]["id"], "mr1_2025_2");
    assert_eq!(body["sheet"]["month"], 3);
    assert_eq!(body["sheet"]["status"], "DRAFT");
    assert_eq!(body["sheet"]["entries"].as_array().unwrap().len(), 31);
    assert_eq!(body["sheet"]["entries"][0]["date"], "2025-03-01");
    assert_eq!(body["sheet"]["entries"][1]["category"], "SUNDAY");
    assert_eq!(body["summary"]["is_hq_compliant"], true);
    assert_eq!(body["can_edit"], true);
    assert_eq!(body["can_submit"], true);
    assert_eq!(body["can_review"], false);

    // Second read returns the stored sheet, not a fresh one
    let first_id = body["sheet"]["entries"][0]["id"].clone();
    let again: Value =
        test::read_body_json(test::call_service(&app, get(SHEET, "mr1").to_request()).await).await;
    assert_eq!(again["sheet"]["entries"][0]["id"], first_id);
}

#[actix_web::test]
async fn entry_edits_are_recomputed_with_owner_rates() {
    let (_dir, db) = fixture_db();
    seed_users(&db).await;
    let app = app!(db);
    let entry_uri = format!("{}/entries/2025-03-04", SHEET);

    let req = test::TestRequest::patch()
        .uri(&entry_uri)
        .insert_header(("X-User-Id", "mr1"))
        .set_json(json!({"field": "category", "value": "EX_HQ"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::patch()
        .uri(&entry_uri)
        .insert_header(("X-User-Id", "mr1"))
        .set_json(json!({"field": "km", "value": 45}))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;

    // MR_CONFIRMED: 720 ex-HQ allowance, 3 per km
    let entry = &body["sheet"]["entries"][3];
    assert_eq!(entry["category"], "EX_HQ");
    assert_eq!(entry["daily_allowance"].as_f64(), Some(720.0));
    assert_eq!(entry["travel_amount"].as_f64(), Some(135.0));
    assert_eq!(entry["total_amount"].as_f64(), Some(855.0));

    // A manager can read the sheet but not edit it
    let req = test::TestRequest::patch()
        .uri(&entry_uri)
        .insert_header(("X-User-Id", "asm1"))
        .set_json(json!({"field": "misc_amount", "value": 100}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    // Dates outside the month are not on the sheet
    let req = test::TestRequest::patch()
        .uri(&format!("{}/entries/2025-04-01", SHEET))
        .insert_header(("X-User-Id", "mr1"))
        .set_json(json!({"field": "misc_amount", "value": 100}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn approval_chain_runs_to_admin() {
    let (_dir, db) = fixture_db();
    seed_users(&db).await;
    let app = app!(db);

    let resp = test::call_service(&app, post(&format!("{}/submit", SHEET), "mr1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["sheet"]["status"], "SUBMITTED");
    assert!(body["sheet"]["submitted_at"].is_i64());
    assert_eq!(body["can_edit"], false);

    // Owner can no longer edit
    let req = test::TestRequest::patch()
        .uri(&format!("{}/entries/2025-03-04", SHEET))
        .insert_header(("X-User-Id", "mr1"))
        .set_json(json!({"field": "remarks", "value": "late"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    // Only asm1's team shows up in asm1's queue
    let pending: Value = test::read_body_json(
        test::call_service(&app, get("/api/sheets/pending", "asm1").to_request()).await,
    )
    .await;
    assert_eq!(pending["sheets"].as_array().unwrap().len(), 1);
    let pending: Value = test::read_body_json(
        test::call_service(&app, get("/api/sheets/pending", "asm2").to_request()).await,
    )
    .await;
    assert!(pending["sheets"].as_array().unwrap().is_empty());

    let resp = test::call_service(&app, post(&format!("{}/approve", SHEET), "asm2").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(&app, post(&format!("{}/approve", SHEET), "asm1").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["sheet"]["status"], "APPROVED_ASM");

    let resp = test::call_service(&app, post(&format!("{}/approve", SHEET), "asm1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let pending: Value = test::read_body_json(
        test::call_service(&app, get("/api/sheets/pending", "admin").to_request()).await,
    )
    .await;
    assert_eq!(pending["sheets"][0]["status"], "APPROVED_ASM");

    let resp = test::call_service(&app, post(&format!("{}/approve", SHEET), "admin").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["sheet"]["status"], "APPROVED_ADMIN");
    assert!(body["sheet"]["approved_by_admin_at"].is_i64());
    assert_eq!(body["can_edit"], true);

    let resp = test::call_service(&app, post(&format!("{}/submit", SHEET), "mr1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn rejection_needs_a_reason_and_allows_resubmission() {
    let (_dir, db) = fixture_db();
    seed_users(&db).await;
    let app = app!(db);

    test::call_service(&app, post(&format!("{}/submit", SHEET), "mr1").to_request()).await;

    let resp = test::call_service(
        &app,
        post(&format!("{}/reject", SHEET), "asm1")
            .set_json(json!({"reason": "  "}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        post(&format!("{}/reject", SHEET), "asm1")
            .set_json(json!({"reason": "incomplete"}))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["sheet"]["status"], "REJECTED");
    assert_eq!(body["sheet"]["rejection_reason"], "incomplete");
    assert_eq!(body["sheet"]["entries"][3]["total_amount"].as_f64(), Some(349.0));

    let resp = test::call_service(&app, post(&format!("{}/submit", SHEET), "mr1").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["sheet"]["status"], "SUBMITTED");
}

#[actix_web::test]
async fn sheet_requests_are_validated() {
    let (_dir, db) = fixture_db();
    seed_users(&db).await;
    let app = app!(db);

    let resp = test::call_service(&app, get("/api/sheets/mr1/2025/13", "mr1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(&app, get("/api/sheets/ghost/2025/3", "admin").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, get(SHEET, "mr2").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri(SHEET).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("X-User-Id"));
}

fn location(lat: f64, lng: f64, accuracy: f64) -> Value {
    json!({
        "latitude": lat,
        "longitude": lng,
        "accuracy": accuracy,
        "timestamp": 1_741_000_000
    })
}

#[actix_web::test]
async fn punches_build_the_day_record() {
    let (_dir, db) = fixture_db();
    seed_users(&db).await;
    let app = app!(db);
    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();

    let punch = |punch_type: &str, loc: Value| {
        post("/api/attendance/punch", "mr1")
            .set_json(json!({"punch_type": punch_type, "location": loc}))
            .to_request()
    };

    let resp = test::call_service(&app, punch("OUT", location(CENTRE_LAT, CENTRE_LNG, 20.0))).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // ~800 m north of the centre, inside the 2 km fence
    let resp = test::call_service(&app, punch("IN", location(CENTRE_LAT + 0.0072, CENTRE_LNG, 50.0))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["verification"]["matched_territory_id"], "mr1-hq");
    assert_eq!(body["attendance"]["punch_in"]["verified_territory_id"], "mr1-hq");
    assert!(body["warning"].is_null());

    let resp = test::call_service(&app, punch("OUT", location(CENTRE_LAT + 0.2, CENTRE_LNG, 30.0))).await;
    let body: Value = test::read_body_json(resp).await;
    assert!(body["warning"].as_str().unwrap().starts_with("Warning:"));

    let resp = test::call_service(&app, punch("OUT", location(CENTRE_LAT, CENTRE_LNG, 1200.0))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let uri = format!("/api/attendance/mr1/{}", today);
    let day: Value = test::read_body_json(test::call_service(&app, get(&uri, "mr1").to_request()).await).await;
    assert_eq!(day["id"], format!("mr1_{}", today));
    assert_eq!(day["punch_outs"].as_array().unwrap().len(), 1);
    assert_eq!(day["is_synced_to_sheets"], false);

    let resp = test::call_service(&app, get(&uri, "mr2").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let synced: Value = test::read_body_json(
        test::call_service(&app, post(&format!("{}/synced", uri), "mr1").to_request()).await,
    )
    .await;
    assert_eq!(synced["is_synced_to_sheets"], true);

    // A later punch needs syncing again
    let body: Value = test::read_body_json(
        test::call_service(&app, punch("OUT", location(CENTRE_LAT, CENTRE_LNG, 10.0))).await,
    )
    .await;
    assert_eq!(body["attendance"]["is_synced_to_sheets"], false);
    assert_eq!(body["attendance"]["punch_outs"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn low_accuracy_punch_writes_nothing() {
    let (_dir, db) = fixture_db();
    seed_users(&db).await;
    let app = app!(db);
    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();

    let resp = test::call_service(
        &app,
        post("/api/attendance/punch", "mr2")
            .set_json(json!({"punch_type": "IN", "location": location(CENTRE_LAT, CENTRE_LNG, 1200.0)}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let uri = format!("/api/attendance/mr2/{}", today);
    let day: Value = test::read_body_json(test::call_service(&app, get(&uri, "mr2").to_request()).await).await;
    assert!(day["punch_in"].is_null());

    let resp = test::call_service(&app, post(&format!("{}/synced", uri), "mr2").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn strict_geofence_refuses_outside_punch_in() {
    let (_dir, db) = fixture_db();
    seed_users(&db).await;
    let app = app!(db, true);

    let resp = test::call_service(
        &app,
        post("/api/attendance/punch", "mr1")
            .set_json(json!({"punch_type": "IN", "location": location(CENTRE_LAT + 0.2, CENTRE_LNG, 20.0)}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn route_orders_by_priority_then_distance() {
    let (_dir, db) = fixture_db();
    let app = app!(db);
    let one_km = 1.0 / 111.195;

    let customer = |id: &str, category: &str, lat: Option<f64>, lng: Option<f64>| {
        json!({
            "id": id,
            "name": id,
            "customer_type": "DOCTOR",
            "category": category,
            "territory_id": "t1",
            "geo_lat": lat,
            "geo_lng": lng
        })
    };

    let req = test::TestRequest::post()
        .uri("/api/route/optimize")
        .set_json(json!({
            "start": {"lat": CENTRE_LAT, "lng": CENTRE_LNG},
            "customers": [
                customer("c", "C", Some(CENTRE_LAT + one_km), Some(CENTRE_LNG)),
                customer("x", "A", None, None),
                customer("a", "A", Some(CENTRE_LAT - one_km), Some(CENTRE_LNG)),
                customer("b", "B", Some(CENTRE_LAT), Some(CENTRE_LNG + one_km)),
            ]
        }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;

    let ids: Vec<&str> = body["customers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["a", "b", "c", "x"]);
    assert!(body["total_distance_km"].as_f64().unwrap() > 0.0);
}

#[actix_web::test]
async fn rates_are_admin_managed() {
    let (_dir, db) = fixture_db();
    seed_users(&db).await;
    let app = app!(db);

    let body: Value =
        test::read_body_json(test::call_service(&app, get("/api/rates", "mr1").to_request()).await).await;
    assert_eq!(body["rates"]["MR_CONFIRMED"]["hq_allowance"].as_f64(), Some(349.0));

    let table = json!({"rates": {"MR_CONFIRMED": {
        "hq_allowance": 400.0, "ex_hq_allowance": 650.0,
        "outstation_allowance": 1300.0, "km_rate": 3.5
    }}});

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/rates")
            .insert_header(("X-User-Id", "mr1"))
            .set_json(&table)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/rates")
            .insert_header(("X-User-Id", "admin"))
            .set_json(json!({"rates": {"INTERN_X": {
                "hq_allowance": 1.0, "ex_hq_allowance": 1.0,
                "outstation_allowance": 1.0, "km_rate": 1.0
            }}}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/rates")
            .insert_header(("X-User-Id", "admin"))
            .set_json(&table)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // New sheets pick up the replaced rates
    let body: Value = test::read_body_json(
        test::call_service(&app, get("/api/sheets/mr1/2025/4", "mr1").to_request()).await,
    )
    .await;
    assert_eq!(body["sheet"]["entries"][0]["daily_allowance"].as_f64(), Some(400.0));
}

#[actix_web::test]
async fn open_sheet_rows_follow_replaced_rates() {
    let (_dir, db) = fixture_db();
    seed_users(&db).await;
    let app = app!(db);

    let body: Value =
        test::read_body_json(test::call_service(&app, get(SHEET, "mr1").to_request()).await).await;
    assert_eq!(body["sheet"]["entries"][4]["daily_allowance"].as_f64(), Some(349.0));

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/rates")
            .insert_header(("X-User-Id", "admin"))
            .set_json(json!({"rates": {"MR_CONFIRMED": {
                "hq_allowance": 400.0, "ex_hq_allowance": 720.0,
                "outstation_allowance": 1440.0, "km_rate": 3.0
            }}}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::patch()
        .uri(&format!("{}/entries/2025-03-04", SHEET))
        .insert_header(("X-User-Id", "mr1"))
        .set_json(json!({"field": "remarks", "value": "Chemist visit"}))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["sheet"]["entries"][3]["daily_allowance"].as_f64(), Some(400.0));
    assert_eq!(body["sheet"]["entries"][4]["daily_allowance"].as_f64(), Some(400.0));
    assert_eq!(body["summary"]["totals"]["total"].as_f64(), Some(26.0 * 400.0));

    // The refreshed rows were stored with the edit
    let stored = sheets_db::get_sheet(db.async_connection.clone(), "mr1", 2025, 3)
        .await
        .unwrap()
        .unwrap();
    assert!(stored
        .entries
        .iter()
        .filter(|e| e.category == ExpenseCategory::Hq)
        .all(|e| e.daily_allowance == 400.0));

    // A submitted sheet keeps the amounts it was sent with
    test::call_service(&app, post(&format!("{}/submit", SHEET), "mr1").to_request()).await;
    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/rates")
            .insert_header(("X-User-Id", "admin"))
            .set_json(json!({"rates": {"MR_CONFIRMED": {
                "hq_allowance": 500.0, "ex_hq_allowance": 720.0,
                "outstation_allowance": 1440.0, "km_rate": 3.0
            }}}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value =
        test::read_body_json(test::call_service(&app, get(SHEET, "asm1").to_request()).await).await;
    assert_eq!(body["sheet"]["status"], "SUBMITTED");
    assert_eq!(body["sheet"]["entries"][4]["daily_allowance"].as_f64(), Some(400.0));
}

#[actix_web::test]
async fn few_hq_days_warn_but_still_submit() {
    let (_dir, db) = fixture_db();
    seed_users(&db).await;
    let app = app!(db);

    let hq_days: Vec<u32> = (1..=31)
        .filter(|day| ![2, 9, 16, 23, 30].contains(day))
        .take(24)
        .collect();
    let mut body = Value::Null;
    for day in hq_days {
        let req = test::TestRequest::patch()
            .uri(&format!("{}/entries/2025-03-{:02}", SHEET, day))
            .insert_header(("X-User-Id", "mr1"))
            .set_json(json!({"field": "category", "value": "HOLIDAY"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        body = test::read_body_json(resp).await;
    }

    assert_eq!(body["summary"]["totals"]["hq_days"], 2);
    assert_eq!(body["summary"]["is_hq_compliant"], false);
    assert!(body["summary"]["compliance_warning"].is_string());
    assert_eq!(body["can_submit"], true);

    let resp = test::call_service(&app, post(&format!("{}/submit", SHEET), "mr1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["sheet"]["status"], "SUBMITTED");
    assert!(body["summary"]["compliance_warning"].is_string());
}

#[actix_web::test]
async fn review_of_an_unopened_month_creates_nothing() {
    let (_dir, db) = fixture_db();
    seed_users(&db).await;
    let app = app!(db);

    let resp = test::call_service(&app, post(&format!("{}/approve", SHEET), "asm1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        post(&format!("{}/reject", SHEET), "admin")
            .set_json(json!({"reason": "incomplete"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let stored = sheets_db::get_sheet(db.async_connection.clone(), "mr1", 2025, 3)
        .await
        .unwrap();
    assert!(stored.is_none());

    // Opening the month is still lazy for readers
    let resp = test::call_service(&app, get(SHEET, "asm1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn users_are_admin_managed() {
    let (_dir, db) = fixture_db();
    seed_users(&db).await;
    let app = app!(db);

    let resp = test::call_service(&app, get("/api/users", "mr1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: Value =
        test::read_body_json(test::call_service(&app, get("/api/users", "admin").to_request()).await).await;
    assert_eq!(body["users"].as_array().unwrap().len(), 5);

    let new_user = json!({
        "email": "mr3@example.com",
        "display_name": "MR3",
        "role": "MR",
        "status": "TRAINEE",
        "hq_location": "Noida",
        "reporting_manager_id": "asm1"
    });
    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/users/mr3")
            .insert_header(("X-User-Id", "admin"))
            .set_json(&new_user)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value =
        test::read_body_json(test::call_service(&app, get("/api/users/mr3", "asm1").to_request()).await).await;
    assert_eq!(body["status"], "TRAINEE");
    assert!(body["territories"].as_array().unwrap().is_empty());

    let resp = test::call_service(&app, get("/api/users/mr3", "asm2").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn bootstrap_admin_only_fills_an_empty_table() {
    let (_dir, db) = fixture_db();
    let bootstrap = BootstrapConfig {
        admin_user_id: "root".to_string(),
        admin_email: "root@example.com".to_string(),
    };

    assert!(bootstrap_admin(db.async_connection.clone(), &bootstrap).await.unwrap());
    assert!(!bootstrap_admin(db.async_connection.clone(), &bootstrap).await.unwrap());

    let admin = users_db::get_user(db.async_connection.clone(), "root")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(admin.role, UserRole::Admin);
}

/// Saves are whole-sheet overwrites: of two sessions editing the same month
/// from the same starting copy, only the later save survives.
#[actix_web::test]
async fn concurrent_sheet_saves_are_last_write_wins() {
    let (_dir, db) = fixture_db();
    seed_users(&db).await;
    let conn = db.async_connection.clone();
    let rates = engine::default_rate_table()["MR_CONFIRMED"];
    let owner = engine::Actor::new("mr1", UserRole::Mr);
    let day = chrono::NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();

    let base = sheets_db::get_or_create_sheet(conn.clone(), "mr1", 2025, 3, &rates)
        .await
        .unwrap();

    let first = engine::lifecycle::edit_entry(
        &base,
        &owner,
        day,
        &ExpenseEntryEdit::MiscAmount(100.0),
        &[],
        &rates,
    )
    .unwrap();
    let second = engine::lifecycle::edit_entry(
        &base,
        &owner,
        day,
        &ExpenseEntryEdit::Remarks("second session".to_string()),
        &[],
        &rates,
    )
    .unwrap();

    sheets_db::save_sheet(conn.clone(), &first).await.unwrap();
    sheets_db::save_sheet(conn.clone(), &second).await.unwrap();

    let stored = sheets_db::get_sheet(conn, "mr1", 2025, 3).await.unwrap().unwrap();
    let entry = stored.entry_for(day).unwrap();
    assert_eq!(entry.remarks, "second session");
    assert_eq!(entry.misc_amount, 0.0);
    assert_eq!(stored.status, ExpenseStatus::Draft);
}
