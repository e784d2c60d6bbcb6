mod show;
mod update;

pub use show::profile_by_id;
pub use update::{update_profile, ProfileUpdate};

use axum::{routing::get, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(show::profile).put(update::update))
        .route("/{id}/gigs", get(show::venue_gigs))
}
