pub mod config;
pub mod database;
pub mod handlers;
pub mod helpers;

use actix_web::{get, web, HttpResponse, Responder};
use std::sync::Arc;

pub use database::Database;

#[get("/health")]
async fn health(db: web::Data<Arc<Database>>) -> impl Responder {
    match db.async_connection.lock().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        })),
        Err(_) => HttpResponse::InternalServerError().json(serde_json::json!({
            "status": "unhealthy",
            "database": "disconnected"
        })),
    }
}

/// Registers every route. Expects `web::Data<Arc<Database>>` and
/// `web::Data<config::AttendanceConfig>` to be provided by the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .route("/api/users", web::get().to(handlers::users::list_users))
        .route("/api/users/{id}", web::get().to(handlers::users::get_user))
        .route("/api/users/{id}", web::put().to(handlers::users::upsert_user))
        .route("/api/rates", web::get().to(handlers::rates::get_rates))
        .route("/api/rates", web::put().to(handlers::rates::update_rates))
        .route("/api/sheets/pending", web::get().to(handlers::expense_sheets::list_pending))
        .route("/api/sheets/{user_id}/{year}/{month}", web::get().to(handlers::expense_sheets::get_sheet))
        .route("/api/sheets/{user_id}/{year}/{month}/entries/{date}", web::patch().to(handlers::expense_sheets::edit_entry))
        .route("/api/sheets/{user_id}/{year}/{month}/submit", web::post().to(handlers::expense_sheets::submit_sheet))
        .route("/api/sheets/{user_id}/{year}/{month}/approve", web::post().to(handlers::expense_sheets::approve_sheet))
        .route("/api/sheets/{user_id}/{year}/{month}/reject", web::post().to(handlers::expense_sheets::reject_sheet))
        .route("/api/attendance/punch", web::post().to(handlers::attendance::punch))
        .route("/api/attendance/{user_id}/{date}", web::get().to(handlers::attendance::get_attendance))
        .route("/api/attendance/{user_id}/{date}/synced", web::post().to(handlers::attendance::mark_synced))
        .route("/api/route/optimize", web::post().to(handlers::route::optimize_route));
}
