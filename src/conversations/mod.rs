mod list;
mod messages;
mod new;
mod show;

pub use list::conversations_for_user;
pub use messages::{mark_read, messages_in, send_message, MessageWithSender, NewMessage};
pub use new::{open_conversation, NewConversation};
pub use show::conversation_by_id;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    db::models::{Conversation, Gig, Message, Profile},
    error::is_unique_violation,
    gigs, profiles, AppError, AppResult, AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list))
        .route("/new", post(new::new_conversation))
        .route("/{id}", get(show::conversation))
        .route("/{id}/messages", get(messages::list).post(messages::send))
        .route("/{id}/read", post(messages::read))
}

/// A conversation with its foreign keys expanded, the shape the
/// list and detail responses use.
#[derive(Debug, Serialize)]
pub struct ConversationView {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub gig: Option<Gig>,
    pub musician: Option<Profile>,
    pub venue: Option<Profile>,
    pub last_message: Option<Message>,
}

/// Finds the conversation for (musician, venue, gig?) or inserts it.
/// Takes a connection so the accept-application transaction can run it
/// atomically with the status flip.
pub async fn get_or_create_in(
    conn: &mut SqliteConnection,
    musician_id: Uuid,
    venue_id: Uuid,
    gig_id: Option<Uuid>,
    application_id: Option<Uuid>,
) -> AppResult<Uuid> {
    if let Some(id) = find_thread(&mut *conn, musician_id, venue_id, gig_id).await? {
        return Ok(id);
    }

    let id = Uuid::now_v7();
    let now = OffsetDateTime::now_utc();
    let inserted = sqlx::query(
        "INSERT INTO conversations (id, gig_id, application_id, musician_id, venue_id, created_at, updated_at) \
         VALUES (?,?,?,?,?,?,?)",
    )
    .bind(id)
    .bind(gig_id)
    .bind(application_id)
    .bind(musician_id)
    .bind(venue_id)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await;
    if let Err(e) = inserted {
        // lost a race to another caller between probe and insert; the
        // unique indexes guarantee the winner's row is there to reuse
        if is_unique_violation(&e) {
            return find_thread(conn, musician_id, venue_id, gig_id)
                .await?
                .ok_or(AppError::NotFound("conversation"));
        }
        return Err(e.into());
    }

    tracing::info!(conversation = %id, musician = %musician_id, venue = %venue_id, "conversation opened");
    Ok(id)
}

/// The gig-less thread has its own partial unique index, so the NULL
/// probe is explicit.
async fn find_thread(
    conn: &mut SqliteConnection,
    musician_id: Uuid,
    venue_id: Uuid,
    gig_id: Option<Uuid>,
) -> AppResult<Option<Uuid>> {
    let existing: Option<(Uuid,)> = match gig_id {
        Some(gig_id) => {
            sqlx::query_as(
                "SELECT id FROM conversations WHERE musician_id = ? AND venue_id = ? AND gig_id = ?",
            )
            .bind(musician_id)
            .bind(venue_id)
            .bind(gig_id)
            .fetch_optional(conn)
            .await?
        }
        None => {
            sqlx::query_as(
                "SELECT id FROM conversations WHERE musician_id = ? AND venue_id = ? AND gig_id IS NULL",
            )
            .bind(musician_id)
            .bind(venue_id)
            .fetch_optional(conn)
            .await?
        }
    };
    Ok(existing.map(|(id,)| id))
}

pub(crate) fn ensure_participant(conversation: &Conversation, user: Uuid) -> AppResult<()> {
    if conversation.musician_id != user && conversation.venue_id != user {
        return Err(AppError::Forbidden(
            "you are not part of this conversation".to_owned(),
        ));
    }
    Ok(())
}

pub(crate) async fn expand(
    pool: &SqlitePool,
    conversation: Conversation,
) -> AppResult<ConversationView> {
    let gig = match conversation.gig_id {
        Some(gig_id) => gigs::gig_by_id(pool, gig_id).await?,
        None => None,
    };
    let musician = profiles::profile_by_id(pool, conversation.musician_id).await?;
    let venue = profiles::profile_by_id(pool, conversation.venue_id).await?;
    let last_message: Option<Message> = sqlx::query_as(
        "SELECT * FROM messages WHERE conversation_id = ? ORDER BY created_at DESC LIMIT 1",
    )
    .bind(conversation.id)
    .fetch_optional(pool)
    .await?;

    Ok(ConversationView {
        conversation,
        gig,
        musician,
        venue,
        last_message,
    })
}
