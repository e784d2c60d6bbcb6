use axum::{
    debug_handler,
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use time::OffsetDateTime;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    db::models::{Message, Profile},
    profiles, session, AppError, AppResult,
};

use super::{conversation_by_id, ensure_participant};

#[derive(Debug, Serialize)]
pub struct MessageWithSender {
    #[serde(flatten)]
    pub message: Message,
    pub sender: Option<Profile>,
}

#[derive(Debug, Deserialize)]
pub struct NewMessage {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReadReceipt {
    marked: u64,
}

/// Full ordered history; clients refetch this on an interval rather than
/// holding any push channel open.
pub async fn messages_in(
    pool: &SqlitePool,
    requester: Uuid,
    conversation_id: Uuid,
) -> AppResult<Vec<MessageWithSender>> {
    let conversation = conversation_by_id(pool, conversation_id)
        .await?
        .ok_or(AppError::NotFound("conversation"))?;
    ensure_participant(&conversation, requester)?;

    let rows: Vec<Message> = sqlx::query_as(
        "SELECT * FROM messages WHERE conversation_id = ? ORDER BY created_at ASC",
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;

    // only two possible senders in a thread
    let musician = profiles::profile_by_id(pool, conversation.musician_id).await?;
    let venue = profiles::profile_by_id(pool, conversation.venue_id).await?;
    let sender_of = |id: Uuid| -> Option<Profile> {
        [&musician, &venue]
            .into_iter()
            .flatten()
            .find(|p| p.id == id)
            .cloned()
    };

    Ok(rows
        .into_iter()
        .map(|message| {
            let sender = sender_of(message.sender_id);
            MessageWithSender { message, sender }
        })
        .collect())
}

pub async fn send_message(
    pool: &SqlitePool,
    sender_id: Uuid,
    conversation_id: Uuid,
    content: String,
) -> AppResult<MessageWithSender> {
    let conversation = conversation_by_id(pool, conversation_id)
        .await?
        .ok_or(AppError::NotFound("conversation"))?;
    ensure_participant(&conversation, sender_id)?;

    if content.trim().is_empty() {
        return Err("message content is required")?;
    }

    let id = Uuid::now_v7();
    let now = OffsetDateTime::now_utc();

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO messages (id, conversation_id, sender_id, content, created_at) VALUES (?,?,?,?,?)",
    )
    .bind(id)
    .bind(conversation_id)
    .bind(sender_id)
    .bind(&content)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    sqlx::query("UPDATE conversations SET updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(conversation_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    let message: Message = sqlx::query_as("SELECT * FROM messages WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    let sender = profiles::profile_by_id(pool, sender_id).await?;
    Ok(MessageWithSender { message, sender })
}

/// Stamps read_at on everything the other side sent that is still unread.
pub async fn mark_read(
    pool: &SqlitePool,
    reader: Uuid,
    conversation_id: Uuid,
) -> AppResult<u64> {
    let conversation = conversation_by_id(pool, conversation_id)
        .await?
        .ok_or(AppError::NotFound("conversation"))?;
    ensure_participant(&conversation, reader)?;

    let updated = sqlx::query(
        "UPDATE messages SET read_at = ? \
         WHERE conversation_id = ? AND sender_id != ? AND read_at IS NULL",
    )
    .bind(OffsetDateTime::now_utc())
    .bind(conversation_id)
    .bind(reader)
    .execute(pool)
    .await?;
    Ok(updated.rows_affected())
}

#[debug_handler]
pub(crate) async fn list(
    Path(id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Json<Vec<MessageWithSender>>> {
    let user = session::require_user(&session).await?;
    Ok(Json(messages_in(&db_pool, user, id).await?))
}

#[debug_handler]
pub(crate) async fn send(
    Path(id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
    session: Session,
    Json(NewMessage { content }): Json<NewMessage>,
) -> AppResult<Json<MessageWithSender>> {
    let user = session::require_user(&session).await?;
    Ok(Json(send_message(&db_pool, user, id, content).await?))
}

#[debug_handler]
pub(crate) async fn read(
    Path(id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Json<ReadReceipt>> {
    let user = session::require_user(&session).await?;
    let marked = mark_read(&db_pool, user, id).await?;
    Ok(Json(ReadReceipt { marked }))
}
