use axum::{
    debug_handler,
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    db::models::{Gig, GigStatus},
    session, AppError, AppResult,
};

use super::gig_by_id;

#[derive(Debug, Deserialize)]
pub(crate) struct StatusChange {
    status: GigStatus,
}

pub async fn set_gig_status(
    pool: &SqlitePool,
    requester: Uuid,
    gig_id: Uuid,
    status: GigStatus,
) -> AppResult<Gig> {
    let gig = gig_by_id(pool, gig_id)
        .await?
        .ok_or(AppError::NotFound("gig"))?;
    if gig.venue_id != requester {
        return Err(AppError::Forbidden(
            "only the venue that posted this gig may change it".to_owned(),
        ));
    }

    sqlx::query("UPDATE gigs SET status = ? WHERE id = ?")
        .bind(status)
        .bind(gig_id)
        .execute(pool)
        .await?;

    tracing::info!(gig = %gig_id, ?status, "gig status changed");

    gig_by_id(pool, gig_id)
        .await?
        .ok_or(AppError::NotFound("gig"))
}

#[debug_handler]
pub(crate) async fn change_status(
    Path(id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
    session: Session,
    Json(StatusChange { status }): Json<StatusChange>,
) -> AppResult<Json<Gig>> {
    let requester = session::require_user(&session).await?;
    Ok(Json(set_gig_status(&db_pool, requester, id, status).await?))
}
