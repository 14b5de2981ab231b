use actix_web::{web, HttpRequest, HttpResponse};
use shared_types::{UpsertUserRequest, UserProfile, UsersResponse, WorkflowError};
use std::sync::Arc;

use crate::database::{users as users_db, Database};
use crate::handlers::ApiError;
use crate::helpers::identity;

pub async fn list_users(
    db: web::Data<Arc<Database>>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let caller = identity::current_user(db.async_connection.clone(), &req).await?;
    identity::require_admin(&caller)?;

    let users = users_db::list_users(db.async_connection.clone()).await?;

    Ok(HttpResponse::Ok().json(UsersResponse { users }))
}

pub async fn get_user(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    let caller = identity::current_user(db.async_connection.clone(), &req).await?;

    let users = users_db::list_users(db.async_connection.clone()).await?;
    if !identity::can_view(&caller, &user_id, &users) {
        return Err(WorkflowError::Forbidden(format!("cannot view user {}", user_id)).into());
    }

    let user = users
        .into_iter()
        .find(|u| u.id == user_id)
        .ok_or_else(|| WorkflowError::NotFound(format!("user {}", user_id)))?;

    Ok(HttpResponse::Ok().json(user))
}

pub async fn upsert_user(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
    request: web::Json<UpsertUserRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    let caller = identity::current_user(db.async_connection.clone(), &req).await?;
    identity::require_admin(&caller)?;

    let body = request.into_inner();
    if body.email.trim().is_empty() {
        return Err(WorkflowError::InvalidInput("email is required".to_string()).into());
    }
    if body.reporting_manager_id.as_deref() == Some(user_id.as_str()) {
        return Err(
            WorkflowError::InvalidInput("a user cannot report to themselves".to_string()).into(),
        );
    }

    let user = UserProfile {
        id: user_id,
        email: body.email.trim().to_string(),
        display_name: body.display_name,
        role: body.role,
        status: body.status,
        hq_location: body.hq_location,
        reporting_manager_id: body.reporting_manager_id.filter(|id| !id.trim().is_empty()),
        territories: body.territories,
    };

    users_db::upsert_user(db.async_connection.clone(), &user).await?;
    tracing::info!("Saved user {} ({})", user.id, user.role);

    Ok(HttpResponse::Ok().json(user))
}
