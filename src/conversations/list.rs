use axum::{debug_handler, extract::State, Json};
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{db::models::Conversation, session, AppResult};

use super::{expand, ConversationView};

/// Both sides see the thread; newest activity first.
pub async fn conversations_for_user(
    pool: &SqlitePool,
    user: Uuid,
) -> AppResult<Vec<ConversationView>> {
    let rows: Vec<Conversation> = sqlx::query_as(
        "SELECT * FROM conversations WHERE musician_id = ? OR venue_id = ? ORDER BY updated_at DESC",
    )
    .bind(user)
    .bind(user)
    .fetch_all(pool)
    .await?;

    let mut views = Vec::with_capacity(rows.len());
    for conversation in rows {
        views.push(expand(pool, conversation).await?);
    }
    Ok(views)
}

#[debug_handler]
pub(crate) async fn list(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Json<Vec<ConversationView>>> {
    let user = session::require_user(&session).await?;
    Ok(Json(conversations_for_user(&db_pool, user).await?))
}
