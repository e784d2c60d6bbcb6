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
    conversations,
    db::models::{Application, ApplicationStatus},
    session, AppError, AppResult,
};

use super::application_by_id;

#[derive(Debug, Deserialize)]
pub(crate) struct Decision {
    status: ApplicationStatus,
}

/// Pending is the only state that may transition, and it transitions once.
/// Accepting also fills the gig and opens the gig-scoped conversation; all
/// three writes commit together or not at all.
pub async fn decide_application(
    pool: &SqlitePool,
    requester: Uuid,
    application_id: Uuid,
    decision: ApplicationStatus,
) -> AppResult<Application> {
    if decision == ApplicationStatus::Pending {
        return Err("decision must be accepted or rejected")?;
    }

    let mut tx = pool.begin().await?;

    let row: Option<(Uuid, Uuid, ApplicationStatus, Uuid)> = sqlx::query_as(
        "SELECT a.gig_id, a.musician_id, a.status, g.venue_id \
         FROM applications a JOIN gigs g ON g.id = a.gig_id WHERE a.id = ?",
    )
    .bind(application_id)
    .fetch_optional(&mut *tx)
    .await?;
    let Some((gig_id, musician_id, status, venue_id)) = row else {
        return Err(AppError::NotFound("application"));
    };

    if venue_id != requester {
        return Err(AppError::Forbidden(
            "only the venue that posted the gig may decide its applications".to_owned(),
        ));
    }
    if status != ApplicationStatus::Pending {
        return Err(AppError::Conflict(
            "this application has already been decided".to_owned(),
        ));
    }

    let updated =
        sqlx::query("UPDATE applications SET status = ? WHERE id = ? AND status = 'pending'")
            .bind(decision)
            .bind(application_id)
            .execute(&mut *tx)
            .await?;
    if updated.rows_affected() != 1 {
        return Err(AppError::Conflict(
            "this application has already been decided".to_owned(),
        ));
    }

    if decision == ApplicationStatus::Accepted {
        sqlx::query("UPDATE gigs SET status = 'filled' WHERE id = ?")
            .bind(gig_id)
            .execute(&mut *tx)
            .await?;

        conversations::get_or_create_in(
            &mut tx,
            musician_id,
            venue_id,
            Some(gig_id),
            Some(application_id),
        )
        .await?;
    }

    tx.commit().await?;
    tracing::info!(application = %application_id, ?decision, "application decided");

    application_by_id(pool, application_id)
        .await?
        .ok_or(AppError::NotFound("application"))
}

#[debug_handler]
pub(crate) async fn decide(
    Path(id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
    session: Session,
    Json(Decision { status }): Json<Decision>,
) -> AppResult<Json<Application>> {
    let requester = session::require_user(&session).await?;
    Ok(Json(
        decide_application(&db_pool, requester, id, status).await?,
    ))
}
