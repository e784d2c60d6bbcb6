use axum::{
    debug_handler,
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{db::models::Gig, AppResult};

use super::{attach_venues, GigWithVenue};

/// Every filter that is present narrows the result; they combine as AND.
#[derive(Debug, Default, Deserialize)]
pub struct GigFilters {
    /// Case-insensitive substring match on location.
    pub location: Option<String>,
    /// Inclusive ISO date bounds.
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    /// Gigs whose floor pay is at least this.
    pub pay_min: Option<i64>,
    /// Gigs whose ceiling pay is at most this.
    pub pay_max: Option<i64>,
    /// Comma-separated; matches gigs sharing any listed genre.
    pub genres: Option<String>,
}

impl GigFilters {
    fn genre_list(&self) -> Vec<String> {
        self.genres
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Open gigs only; closed and filled gigs never show up here.
pub async fn open_gigs(pool: &SqlitePool, filters: &GigFilters) -> AppResult<Vec<GigWithVenue>> {
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT * FROM gigs WHERE status = 'open'");

    if let Some(location) = &filters.location {
        // sqlite LIKE is case-insensitive for ASCII
        qb.push(" AND location LIKE ").push_bind(format!("%{location}%"));
    }
    if let Some(from) = &filters.date_from {
        qb.push(" AND date >= ").push_bind(from.clone());
    }
    if let Some(to) = &filters.date_to {
        qb.push(" AND date <= ").push_bind(to.clone());
    }
    if let Some(min) = filters.pay_min {
        qb.push(" AND pay_min >= ").push_bind(min);
    }
    if let Some(max) = filters.pay_max {
        qb.push(" AND pay_max <= ").push_bind(max);
    }

    let wanted = filters.genre_list();
    if !wanted.is_empty() {
        qb.push(" AND EXISTS (SELECT 1 FROM json_each(gigs.genres) WHERE json_each.value IN (");
        {
            let mut vals = qb.separated(", ");
            for genre in wanted {
                vals.push_bind(genre);
            }
        }
        qb.push("))");
    }

    qb.push(" ORDER BY date ASC");

    let gigs: Vec<Gig> = qb.build_query_as().fetch_all(pool).await?;
    attach_venues(pool, gigs).await
}

pub async fn gigs_by_venue(pool: &SqlitePool, venue_id: Uuid) -> AppResult<Vec<Gig>> {
    Ok(
        sqlx::query_as::<_, Gig>("SELECT * FROM gigs WHERE venue_id = ? ORDER BY date ASC")
            .bind(venue_id)
            .fetch_all(pool)
            .await?,
    )
}

#[debug_handler]
pub(crate) async fn list(
    State(db_pool): State<SqlitePool>,
    Query(filters): Query<GigFilters>,
) -> AppResult<Json<Vec<GigWithVenue>>> {
    Ok(Json(open_gigs(&db_pool, &filters).await?))
}
