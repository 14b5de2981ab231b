//! Caller identification. Requests name their user in the `X-User-Id`
//! header; there is no authentication behind it.

use actix_web::HttpRequest;
use engine::Actor;
use shared_types::{UserProfile, UserRole};

use crate::database::{users as users_db, AsyncDbConnection};
use crate::handlers::ApiError;

pub const USER_ID_HEADER: &str = "X-User-Id";

pub fn caller_id(req: &HttpRequest) -> Result<String, ApiError> {
    req.headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::Unauthorized(format!("Missing {} header", USER_ID_HEADER)))
}

/// Loads the caller's profile; an unknown id is treated like a missing one
pub async fn current_user(
    conn: AsyncDbConnection,
    req: &HttpRequest,
) -> Result<UserProfile, ApiError> {
    let id = caller_id(req)?;

    users_db::get_user(conn, &id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(format!("Unknown user {}", id)))
}

pub fn actor(user: &UserProfile) -> Actor {
    Actor::new(user.id.clone(), user.role)
}

pub fn require_admin(user: &UserProfile) -> Result<(), ApiError> {
    if user.role == UserRole::Admin {
        Ok(())
    } else {
        Err(ApiError::from(shared_types::WorkflowError::Forbidden(
            "admin role required".to_string(),
        )))
    }
}

/// A user's own records are readable by the user, any ADMIN and every
/// manager above them.
pub fn can_view(viewer: &UserProfile, owner_id: &str, users: &[UserProfile]) -> bool {
    viewer.id == owner_id
        || viewer.role == UserRole::Admin
        || engine::hierarchy::is_upstream(&viewer.id, owner_id, users)
}
