mod login;
mod logout;
mod me;
pub mod password;
mod signup;

pub use login::{verify_credentials, Credentials};
pub use signup::{create_account, NewAccount};

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup::signup))
        .route("/login", post(login::login))
        .route("/logout", post(logout::logout))
        .route("/me", get(me::me))
}
