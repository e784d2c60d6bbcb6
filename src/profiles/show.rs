use axum::{
    debug_handler,
    extract::{Path, State},
    Json,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    db::models::{Gig, Profile},
    gigs, AppError, AppResult,
};

pub async fn profile_by_id(pool: &SqlitePool, id: Uuid) -> AppResult<Option<Profile>> {
    Ok(sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

#[debug_handler]
pub(crate) async fn profile(
    Path(id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Json<Profile>> {
    profile_by_id(&db_pool, id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("profile"))
}

/// Every gig a venue has posted, whatever its status.
#[debug_handler]
pub(crate) async fn venue_gigs(
    Path(id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Json<Vec<Gig>>> {
    Ok(Json(gigs::gigs_by_venue(&db_pool, id).await?))
}
