use axum::{debug_handler, extract::State, Json};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{db::models::Profile, profiles, session::USER_ID, AppError, AppResult};

use super::password;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Returns the user id when the email exists and the password matches.
/// One `None` for both failure modes, so responses don't leak which it was.
pub async fn verify_credentials(
    pool: &SqlitePool,
    credentials: &Credentials,
) -> AppResult<Option<Uuid>> {
    let row: Option<(Uuid, String)> =
        sqlx::query_as("SELECT id, password_hash FROM users WHERE email = ?")
            .bind(&credentials.email)
            .fetch_optional(pool)
            .await?;

    match row {
        Some((id, stored)) if password::verify(&credentials.password, &stored)? => Ok(Some(id)),
        _ => Ok(None),
    }
}

#[debug_handler]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Json(credentials): Json<Credentials>,
) -> AppResult<Json<Profile>> {
    let Some(user_id) = verify_credentials(&db_pool, &credentials).await? else {
        return Err(AppError::Unauthorized("invalid email or password"));
    };

    session.insert(USER_ID, user_id).await?;
    tracing::info!(user = %user_id, "signed in");

    let profile = profiles::profile_by_id(&db_pool, user_id)
        .await?
        .ok_or(AppError::NotFound("profile"))?;
    Ok(Json(profile))
}
