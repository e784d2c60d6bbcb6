use axum::{
    debug_handler,
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use sqlx::{types::Json as SqlJson, QueryBuilder, Sqlite, SqlitePool};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{db::models::Profile, session, AppError, AppResult};

use super::profile_by_id;

/// Partial update; absent fields keep their value. Identity fields
/// (id, email, user_type, created_at) are immutable.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub genres: Option<Vec<String>>,
    pub venue_name: Option<String>,
    pub venue_address: Option<String>,
    pub venue_capacity: Option<i64>,
    pub instruments: Option<Vec<String>>,
    pub experience_years: Option<i64>,
}

pub async fn update_profile(
    pool: &SqlitePool,
    editor: Uuid,
    target: Uuid,
    update: ProfileUpdate,
) -> AppResult<Profile> {
    if editor != target {
        return Err(AppError::Forbidden(
            "only the profile owner may edit it".to_owned(),
        ));
    }

    let current = profile_by_id(pool, target)
        .await?
        .ok_or(AppError::NotFound("profile"))?;

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE profiles SET ");
    let mut any = false;
    {
        let mut set = qb.separated(", ");
        if let Some(name) = &update.name {
            set.push("name = ").push_bind_unseparated(name.clone());
            any = true;
        }
        if let Some(bio) = &update.bio {
            set.push("bio = ").push_bind_unseparated(bio.clone());
            any = true;
        }
        if let Some(location) = &update.location {
            set.push("location = ").push_bind_unseparated(location.clone());
            any = true;
        }
        if let Some(avatar_url) = &update.avatar_url {
            set.push("avatar_url = ").push_bind_unseparated(avatar_url.clone());
            any = true;
        }
        if let Some(genres) = &update.genres {
            set.push("genres = ").push_bind_unseparated(SqlJson(genres.clone()));
            any = true;
        }
        if let Some(venue_name) = &update.venue_name {
            set.push("venue_name = ").push_bind_unseparated(venue_name.clone());
            any = true;
        }
        if let Some(venue_address) = &update.venue_address {
            set.push("venue_address = ").push_bind_unseparated(venue_address.clone());
            any = true;
        }
        if let Some(venue_capacity) = update.venue_capacity {
            set.push("venue_capacity = ").push_bind_unseparated(venue_capacity);
            any = true;
        }
        if let Some(instruments) = &update.instruments {
            set.push("instruments = ").push_bind_unseparated(SqlJson(instruments.clone()));
            any = true;
        }
        if let Some(experience_years) = update.experience_years {
            set.push("experience_years = ").push_bind_unseparated(experience_years);
            any = true;
        }
    }

    if !any {
        return Ok(current);
    }

    qb.push(" WHERE id = ").push_bind(target);
    qb.build().execute(pool).await?;

    profile_by_id(pool, target)
        .await?
        .ok_or(AppError::NotFound("profile"))
}

#[debug_handler]
pub(crate) async fn update(
    Path(id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
    session: Session,
    Json(body): Json<ProfileUpdate>,
) -> AppResult<Json<Profile>> {
    let editor = session::require_user(&session).await?;
    Ok(Json(update_profile(&db_pool, editor, id, body).await?))
}
