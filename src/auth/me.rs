use axum::{debug_handler, extract::State, Json};
use serde::Serialize;
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{db::models::Profile, profiles, session, AppResult};

#[derive(Serialize)]
pub(crate) struct Me {
    user_id: Option<Uuid>,
    profile: Option<Profile>,
}

/// Nulls when signed out; read paths don't error on absence.
#[debug_handler]
pub(crate) async fn me(State(db_pool): State<SqlitePool>, session: Session) -> AppResult<Json<Me>> {
    let Some(user_id) = session::current_user(&session).await? else {
        return Ok(Json(Me {
            user_id: None,
            profile: None,
        }));
    };

    let profile = profiles::profile_by_id(&db_pool, user_id).await?;
    Ok(Json(Me {
        user_id: Some(user_id),
        profile,
    }))
}
