#![allow(dead_code)]

use std::str::FromStr;

use bandstand::{
    auth::{create_account, NewAccount},
    db,
    db::models::{Gig, Profile, UserType},
    gigs::{create_gig, NewGig},
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// One connection so every query sees the same in-memory database.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    db::init(&pool).await.unwrap();
    pool
}

pub async fn musician(pool: &SqlitePool, email: &str) -> Profile {
    create_account(
        pool,
        NewAccount {
            email: email.to_owned(),
            password: "trombone4ever".to_owned(),
            name: "Pat Keys".to_owned(),
            user_type: UserType::Musician,
        },
    )
    .await
    .unwrap()
}

pub async fn venue(pool: &SqlitePool, email: &str) -> Profile {
    create_account(
        pool,
        NewAccount {
            email: email.to_owned(),
            password: "stagefright".to_owned(),
            name: "The Blue Note".to_owned(),
            user_type: UserType::Venue,
        },
    )
    .await
    .unwrap()
}

pub fn gig_input(title: &str) -> NewGig {
    NewGig {
        title: title.to_owned(),
        description: "House band night, two sets".to_owned(),
        date: "2026-10-01".to_owned(),
        start_time: "20:00".to_owned(),
        end_time: Some("23:00".to_owned()),
        location: "Portland, OR".to_owned(),
        pay_min: 200,
        pay_max: 400,
        genres: vec!["Jazz".to_owned(), "Blues".to_owned()],
        image_url: None,
        requirements: None,
    }
}

pub async fn open_gig(pool: &SqlitePool, venue: &Profile, title: &str) -> Gig {
    create_gig(pool, venue.id, gig_input(title)).await.unwrap()
}
