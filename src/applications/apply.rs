use axum::{
    debug_handler,
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    db::models::{Application, GigStatus, UserType},
    error::is_unique_violation,
    gigs, profiles, session, AppError, AppResult,
};

use super::application_by_id;

#[derive(Debug, Deserialize)]
pub struct NewApplication {
    pub message: String,
}

pub async fn apply_to_gig(
    pool: &SqlitePool,
    musician_id: Uuid,
    gig_id: Uuid,
    message: String,
) -> AppResult<Application> {
    let musician = profiles::profile_by_id(pool, musician_id)
        .await?
        .ok_or(AppError::NotFound("profile"))?;
    if musician.user_type != UserType::Musician {
        return Err(AppError::Forbidden(
            "only musician profiles may apply to gigs".to_owned(),
        ));
    }

    let gig = gigs::gig_by_id(pool, gig_id)
        .await?
        .ok_or(AppError::NotFound("gig"))?;
    if gig.status != GigStatus::Open {
        return Err(AppError::Conflict("this gig is no longer open".to_owned()));
    }

    let id = Uuid::now_v7();
    let inserted = sqlx::query(
        "INSERT INTO applications (id, gig_id, musician_id, message, status, created_at) \
         VALUES (?,?,?,?,'pending',?)",
    )
    .bind(id)
    .bind(gig_id)
    .bind(musician_id)
    .bind(&message)
    .bind(OffsetDateTime::now_utc())
    .execute(pool)
    .await;
    if let Err(e) = inserted {
        // UNIQUE (gig_id, musician_id): at most one application per pair
        if is_unique_violation(&e) {
            return Err(AppError::Conflict(
                "you have already applied to this gig".to_owned(),
            ));
        }
        return Err(e.into());
    }

    tracing::info!(application = %id, gig = %gig_id, musician = %musician_id, "application submitted");

    application_by_id(pool, id)
        .await?
        .ok_or(AppError::NotFound("application"))
}

#[debug_handler]
pub(crate) async fn apply(
    Path(gig_id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
    session: Session,
    Json(NewApplication { message }): Json<NewApplication>,
) -> AppResult<Json<Application>> {
    let musician_id = session::require_user(&session).await?;
    Ok(Json(
        apply_to_gig(&db_pool, musician_id, gig_id, message).await?,
    ))
}
