mod apply;
mod list;
mod status;

pub use apply::{apply_to_gig, NewApplication};
pub use list::{
    application_by_id, application_for_musician, applications_for_gig, ApplicationWithMusician,
};
pub use status::decide_application;

pub(crate) use apply::apply;
pub(crate) use list::{list_for_gig, own_for_gig};

use axum::{routing::post, Router};

use crate::AppState;

/// Creation and listing hang off the gig routes; only the decision
/// endpoint is addressed by application id.
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/status", post(status::decide))
}
