mod list;
mod new;
mod show;
mod status;

pub use list::{gigs_by_venue, open_gigs, GigFilters};
pub use new::{create_gig, NewGig};
pub use show::{gig_by_id, gig_with_venue};
pub use status::set_gig_status;

use std::collections::HashMap;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{
    applications,
    db::models::{Gig, Profile},
    AppResult, AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list))
        .route("/new", post(new::new_gig))
        .route("/{id}", get(show::gig))
        .route("/{id}/status", post(status::change_status))
        .route("/{id}/apply", post(applications::apply))
        .route("/{id}/applications", get(applications::list_for_gig))
        .route("/{id}/application", get(applications::own_for_gig))
}

/// A gig expanded with its venue's profile, the shape list and detail
/// responses use.
#[derive(Debug, Serialize)]
pub struct GigWithVenue {
    #[serde(flatten)]
    pub gig: Gig,
    pub venue: Option<Profile>,
}

pub(crate) async fn attach_venues(
    pool: &SqlitePool,
    gigs: Vec<Gig>,
) -> AppResult<Vec<GigWithVenue>> {
    if gigs.is_empty() {
        return Ok(Vec::new());
    }

    let mut ids: Vec<Uuid> = gigs.iter().map(|g| g.venue_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM profiles WHERE id IN (");
    {
        let mut vals = qb.separated(", ");
        for id in &ids {
            vals.push_bind(*id);
        }
    }
    qb.push(")");
    let venues: Vec<Profile> = qb.build_query_as().fetch_all(pool).await?;
    let by_id: HashMap<Uuid, Profile> = venues.into_iter().map(|p| (p.id, p)).collect();

    Ok(gigs
        .into_iter()
        .map(|gig| {
            let venue = by_id.get(&gig.venue_id).cloned();
            GigWithVenue { gig, venue }
        })
        .collect())
}
