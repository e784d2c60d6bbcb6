use axum::{
    debug_handler,
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    db::models::{Application, Profile},
    gigs, profiles, session, AppError, AppResult,
};

#[derive(Debug, Serialize)]
pub struct ApplicationWithMusician {
    #[serde(flatten)]
    pub application: Application,
    pub musician: Option<Profile>,
}

pub async fn application_by_id(pool: &SqlitePool, id: Uuid) -> AppResult<Option<Application>> {
    Ok(
        sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

/// The applicant list is the owning venue's alone; everyone else gets 403
/// no matter what the UI hides.
pub async fn applications_for_gig(
    pool: &SqlitePool,
    requester: Uuid,
    gig_id: Uuid,
) -> AppResult<Vec<ApplicationWithMusician>> {
    let gig = gigs::gig_by_id(pool, gig_id)
        .await?
        .ok_or(AppError::NotFound("gig"))?;
    if gig.venue_id != requester {
        return Err(AppError::Forbidden(
            "only the venue that posted this gig may view its applications".to_owned(),
        ));
    }

    let rows: Vec<Application> = sqlx::query_as(
        "SELECT * FROM applications WHERE gig_id = ? ORDER BY created_at DESC",
    )
    .bind(gig_id)
    .fetch_all(pool)
    .await?;

    let mut expanded = Vec::with_capacity(rows.len());
    for application in rows {
        let musician = profiles::profile_by_id(pool, application.musician_id).await?;
        expanded.push(ApplicationWithMusician {
            application,
            musician,
        });
    }
    Ok(expanded)
}

pub async fn application_for_musician(
    pool: &SqlitePool,
    gig_id: Uuid,
    musician_id: Uuid,
) -> AppResult<Option<Application>> {
    Ok(sqlx::query_as::<_, Application>(
        "SELECT * FROM applications WHERE gig_id = ? AND musician_id = ?",
    )
    .bind(gig_id)
    .bind(musician_id)
    .fetch_optional(pool)
    .await?)
}

#[debug_handler]
pub(crate) async fn list_for_gig(
    Path(gig_id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Json<Vec<ApplicationWithMusician>>> {
    let requester = session::require_user(&session).await?;
    Ok(Json(
        applications_for_gig(&db_pool, requester, gig_id).await?,
    ))
}

/// Null body when the musician hasn't applied; absence isn't an error on
/// read paths.
#[debug_handler]
pub(crate) async fn own_for_gig(
    Path(gig_id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Json<Option<Application>>> {
    let musician_id = session::require_user(&session).await?;
    Ok(Json(
        application_for_musician(&db_pool, gig_id, musician_id).await?,
    ))
}
