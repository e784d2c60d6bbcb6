pub mod applications;
pub mod auth;
pub mod conversations;
pub mod db;
pub mod error;
pub mod gigs;
pub mod profiles;
pub mod session;

use axum::extract::FromRef;
use sqlx::SqlitePool;

pub use error::{AppError, AppResult};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
}
