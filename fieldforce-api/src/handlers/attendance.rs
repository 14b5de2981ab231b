use actix_web::{web, HttpRequest, HttpResponse};
use chrono::NaiveDate;
use engine::PunchInput;
use shared_types::{DailyAttendance, PunchRequest, PunchResponse, WorkflowError};
use std::sync::Arc;

use crate::config::AttendanceConfig;
use crate::database::{attendance as attendance_db, users as users_db, Database};
use crate::handlers::ApiError;
use crate::helpers::identity;

/// Records an IN or OUT punch for the caller's current UTC day
pub async fn punch(
    db: web::Data<Arc<Database>>,
    settings: web::Data<AttendanceConfig>,
    request: web::Json<PunchRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let conn = db.async_connection.clone();
    let caller = identity::current_user(conn.clone(), &req).await?;
    let PunchRequest {
        punch_type,
        location,
    } = request.into_inner();

    let now = chrono::Utc::now();
    let date = now.date_naive();

    let verification = engine::verify(location.point(), location.accuracy, &caller.territories);
    let message = engine::geo::status_message(&verification, location.accuracy);

    let current = attendance_db::get_attendance(conn.clone(), &caller.id, date).await?;
    let outcome = engine::punch(
        current.as_ref(),
        PunchInput {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: caller.id.clone(),
            date,
            punch_type,
            location,
            verification: verification.clone(),
            recorded_at: now.timestamp(),
            strict: settings.strict_geofence,
        },
    )?;

    attendance_db::save_attendance(conn, &outcome.attendance).await?;
    tracing::info!(
        "{} punch for {} on {} ({})",
        punch_type,
        caller.id,
        date,
        message
    );

    Ok(HttpResponse::Ok().json(PunchResponse {
        attendance: outcome.attendance,
        verification,
        message,
        warning: outcome.warning,
    }))
}

async fn authorize_view(
    db: &Database,
    req: &HttpRequest,
    user_id: &str,
) -> Result<(), ApiError> {
    let conn = db.async_connection.clone();
    let caller = identity::current_user(conn.clone(), req).await?;
    let users = users_db::list_users(conn).await?;

    if identity::can_view(&caller, user_id, &users) {
        Ok(())
    } else {
        Err(WorkflowError::Forbidden(format!("cannot view attendance of {}", user_id)).into())
    }
}

/// A day with no punches is returned as an empty record
pub async fn get_attendance(
    db: web::Data<Arc<Database>>,
    path: web::Path<(String, NaiveDate)>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let (user_id, date) = path.into_inner();
    authorize_view(&db, &req, &user_id).await?;

    let attendance = attendance_db::get_attendance(db.async_connection.clone(), &user_id, date)
        .await?
        .unwrap_or_else(|| DailyAttendance::empty(&user_id, date));

    Ok(HttpResponse::Ok().json(attendance))
}

/// Confirmation that the day has been carried into the expense sheet
pub async fn mark_synced(
    db: web::Data<Arc<Database>>,
    path: web::Path<(String, NaiveDate)>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let (user_id, date) = path.into_inner();
    authorize_view(&db, &req, &user_id).await?;

    let conn = db.async_connection.clone();
    if !attendance_db::mark_attendance_synced(conn.clone(), &user_id, date).await? {
        return Err(WorkflowError::NotFound(format!(
            "no attendance for {} on {}",
            user_id, date
        ))
        .into());
    }

    let attendance = attendance_db::get_attendance(conn, &user_id, date)
        .await?
        .ok_or_else(|| WorkflowError::NotFound(format!("attendance for {} on {}", user_id, date)))?;

    Ok(HttpResponse::Ok().json(attendance))
}
