use axum::{
    debug_handler,
    extract::{Path, State},
    Json,
};
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{db::models::Conversation, session, AppError, AppResult};

use super::{ensure_participant, expand, ConversationView};

pub async fn conversation_by_id(pool: &SqlitePool, id: Uuid) -> AppResult<Option<Conversation>> {
    Ok(
        sqlx::query_as::<_, Conversation>("SELECT * FROM conversations WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

#[debug_handler]
pub(crate) async fn conversation(
    Path(id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Json<ConversationView>> {
    let user = session::require_user(&session).await?;
    let conversation = conversation_by_id(&db_pool, id)
        .await?
        .ok_or(AppError::NotFound("conversation"))?;
    ensure_participant(&conversation, user)?;
    Ok(Json(expand(&db_pool, conversation).await?))
}
