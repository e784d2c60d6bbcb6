use tower_sessions::Session;
use uuid::Uuid;

use crate::{AppError, AppResult};

pub const USER_ID: &str = "user_id";

pub async fn current_user(session: &Session) -> AppResult<Option<Uuid>> {
    Ok(session.get::<Uuid>(USER_ID).await?)
}

/// The signed-in user, or 401.
pub async fn require_user(session: &Session) -> AppResult<Uuid> {
    current_user(session)
        .await?
        .ok_or(AppError::Unauthorized("not signed in"))
}
