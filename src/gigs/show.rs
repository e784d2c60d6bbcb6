use axum::{
    debug_handler,
    extract::{Path, State},
    Json,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{db::models::Gig, profiles, AppError, AppResult};

use super::GigWithVenue;

pub async fn gig_by_id(pool: &SqlitePool, id: Uuid) -> AppResult<Option<Gig>> {
    Ok(sqlx::query_as::<_, Gig>("SELECT * FROM gigs WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

pub async fn gig_with_venue(pool: &SqlitePool, id: Uuid) -> AppResult<Option<GigWithVenue>> {
    let Some(gig) = gig_by_id(pool, id).await? else {
        return Ok(None);
    };
    let venue = profiles::profile_by_id(pool, gig.venue_id).await?;
    Ok(Some(GigWithVenue { gig, venue }))
}

#[debug_handler]
pub(crate) async fn gig(
    Path(id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Json<GigWithVenue>> {
    gig_with_venue(&db_pool, id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("gig"))
}
