use axum::{debug_handler, extract::State, Json};
use serde::Deserialize;
use sqlx::{types::Json as SqlJson, SqlitePool};
use time::OffsetDateTime;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    db::models::{Gig, UserType},
    profiles, session, AppError, AppResult,
};

use super::gig_by_id;

#[derive(Debug, Deserialize)]
pub struct NewGig {
    pub title: String,
    pub description: String,
    pub date: String,
    pub start_time: String,
    pub end_time: Option<String>,
    pub location: String,
    pub pay_min: i64,
    pub pay_max: i64,
    #[serde(default)]
    pub genres: Vec<String>,
    pub image_url: Option<String>,
    pub requirements: Option<String>,
}

pub async fn create_gig(pool: &SqlitePool, venue_id: Uuid, gig: NewGig) -> AppResult<Gig> {
    let venue = profiles::profile_by_id(pool, venue_id)
        .await?
        .ok_or(AppError::NotFound("profile"))?;
    if venue.user_type != UserType::Venue {
        return Err(AppError::Forbidden(
            "only venue profiles may post gigs".to_owned(),
        ));
    }

    for (field, value) in [
        ("title", &gig.title),
        ("description", &gig.description),
        ("date", &gig.date),
        ("start_time", &gig.start_time),
        ("location", &gig.location),
    ] {
        if value.trim().is_empty() {
            return Err(format!("{field} is required"))?;
        }
    }

    let id = Uuid::now_v7();
    sqlx::query(
        "INSERT INTO gigs (id, venue_id, title, description, date, start_time, end_time, \
         location, pay_min, pay_max, genres, image_url, requirements, status, created_at) \
         VALUES (?,?,?,?,?,?,?,?,?,?,?,?,?,'open',?)",
    )
    .bind(id)
    .bind(venue_id)
    .bind(&gig.title)
    .bind(&gig.description)
    .bind(&gig.date)
    .bind(&gig.start_time)
    .bind(&gig.end_time)
    .bind(&gig.location)
    .bind(gig.pay_min)
    .bind(gig.pay_max)
    .bind(SqlJson(gig.genres))
    .bind(&gig.image_url)
    .bind(&gig.requirements)
    .bind(OffsetDateTime::now_utc())
    .execute(pool)
    .await?;

    tracing::info!(gig = %id, venue = %venue_id, "gig posted");

    gig_by_id(pool, id).await?.ok_or(AppError::NotFound("gig"))
}

#[debug_handler]
pub(crate) async fn new_gig(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Json(body): Json<NewGig>,
) -> AppResult<Json<Gig>> {
    let venue_id = session::require_user(&session).await?;
    Ok(Json(create_gig(&db_pool, venue_id, body).await?))
}
