use axum::{debug_handler, extract::State, Json};
use serde::Deserialize;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    db::models::{Profile, UserType},
    error::is_unique_violation,
    profiles,
    session::USER_ID,
    AppError, AppResult,
};

use super::password;

#[derive(Debug, Deserialize)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub name: String,
    pub user_type: UserType,
}

/// Creates the credential row and the role-typed profile in one transaction.
pub async fn create_account(pool: &SqlitePool, account: NewAccount) -> AppResult<Profile> {
    if !account.email.contains('@') {
        return Err("a valid email is required")?;
    }
    if account.password.len() < 8 {
        return Err("password must be at least 8 characters")?;
    }
    if account.name.trim().is_empty() {
        return Err("name is required")?;
    }

    let id = Uuid::now_v7();
    let password_hash = password::hash(&account.password)?;
    let now = OffsetDateTime::now_utc();

    let mut tx = pool.begin().await?;

    let inserted = sqlx::query("INSERT INTO users (id, email, password_hash, created_at) VALUES (?,?,?,?)")
        .bind(id)
        .bind(&account.email)
        .bind(&password_hash)
        .bind(now)
        .execute(&mut *tx)
        .await;
    if let Err(e) = inserted {
        if is_unique_violation(&e) {
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }
        return Err(e.into());
    }

    sqlx::query("INSERT INTO profiles (id, email, name, user_type, created_at) VALUES (?,?,?,?,?)")
        .bind(id)
        .bind(&account.email)
        .bind(account.name.trim())
        .bind(account.user_type)
        .bind(now)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    profiles::profile_by_id(pool, id)
        .await?
        .ok_or(AppError::NotFound("profile"))
}

#[debug_handler]
pub(crate) async fn signup(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Json(account): Json<NewAccount>,
) -> AppResult<Json<Profile>> {
    let profile = create_account(&db_pool, account).await?;
    session.insert(USER_ID, profile.id).await?;
    tracing::info!(user = %profile.id, role = ?profile.user_type, "account created");
    Ok(Json(profile))
}
