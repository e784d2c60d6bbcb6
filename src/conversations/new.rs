use axum::{debug_handler, extract::State, Json};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    db::models::UserType, profiles, session, AppError, AppResult,
};

use super::{conversation_by_id, expand, get_or_create_in, ConversationView};

#[derive(Debug, Deserialize)]
pub struct NewConversation {
    pub peer_id: Uuid,
    pub gig_id: Option<Uuid>,
}

/// Get-or-create between the caller and a peer; which side is the musician
/// falls out of the two profiles' roles.
pub async fn open_conversation(
    pool: &SqlitePool,
    user: Uuid,
    peer_id: Uuid,
    gig_id: Option<Uuid>,
) -> AppResult<ConversationView> {
    let caller = profiles::profile_by_id(pool, user)
        .await?
        .ok_or(AppError::NotFound("profile"))?;
    let peer = profiles::profile_by_id(pool, peer_id)
        .await?
        .ok_or(AppError::NotFound("profile"))?;

    let (musician_id, venue_id) = match (caller.user_type, peer.user_type) {
        (UserType::Musician, UserType::Venue) => (caller.id, peer.id),
        (UserType::Venue, UserType::Musician) => (peer.id, caller.id),
        _ => {
            return Err(AppError::BadRequest(
                "a conversation links one musician and one venue".to_owned(),
            ))
        }
    };

    let mut conn = pool.acquire().await?;
    let id = get_or_create_in(&mut conn, musician_id, venue_id, gig_id, None).await?;
    drop(conn);

    let conversation = conversation_by_id(pool, id)
        .await?
        .ok_or(AppError::NotFound("conversation"))?;
    expand(pool, conversation).await
}

#[debug_handler]
pub(crate) async fn new_conversation(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Json(NewConversation { peer_id, gig_id }): Json<NewConversation>,
) -> AppResult<Json<ConversationView>> {
    let user = session::require_user(&session).await?;
    Ok(Json(
        open_conversation(&db_pool, user, peer_id, gig_id).await?,
    ))
}
