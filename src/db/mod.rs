pub mod models;

use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::AppResult;

/// One statement per entry; sqlite prepares a single statement at a time.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id BLOB PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS profiles (
        id BLOB PRIMARY KEY REFERENCES users(id),
        email TEXT NOT NULL,
        name TEXT NOT NULL,
        user_type TEXT NOT NULL CHECK (user_type IN ('musician','venue')),
        bio TEXT,
        location TEXT,
        avatar_url TEXT,
        genres TEXT,
        venue_name TEXT,
        venue_address TEXT,
        venue_capacity INTEGER,
        instruments TEXT,
        experience_years INTEGER,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS gigs (
        id BLOB PRIMARY KEY,
        venue_id BLOB NOT NULL REFERENCES profiles(id),
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        date TEXT NOT NULL,
        start_time TEXT NOT NULL,
        end_time TEXT,
        location TEXT NOT NULL,
        pay_min INTEGER NOT NULL,
        pay_max INTEGER NOT NULL,
        genres TEXT NOT NULL DEFAULT '[]',
        image_url TEXT,
        requirements TEXT,
        status TEXT NOT NULL DEFAULT 'open' CHECK (status IN ('open','closed','filled')),
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS applications (
        id BLOB PRIMARY KEY,
        gig_id BLOB NOT NULL REFERENCES gigs(id),
        musician_id BLOB NOT NULL REFERENCES profiles(id),
        message TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ('pending','accepted','rejected')),
        created_at TEXT NOT NULL,
        UNIQUE (gig_id, musician_id)
    )",
    "CREATE TABLE IF NOT EXISTS conversations (
        id BLOB PRIMARY KEY,
        gig_id BLOB REFERENCES gigs(id),
        application_id BLOB REFERENCES applications(id),
        musician_id BLOB NOT NULL REFERENCES profiles(id),
        venue_id BLOB NOT NULL REFERENCES profiles(id),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (musician_id, venue_id, gig_id)
    )",
    "CREATE TABLE IF NOT EXISTS messages (
        id BLOB PRIMARY KEY,
        conversation_id BLOB NOT NULL REFERENCES conversations(id),
        sender_id BLOB NOT NULL REFERENCES profiles(id),
        content TEXT NOT NULL,
        read_at TEXT,
        created_at TEXT NOT NULL
    )",
    // UNIQUE above treats NULL gig_ids as distinct; this pins down the
    // one general thread per pair
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_conversations_general_pair \
     ON conversations(musician_id, venue_id) WHERE gig_id IS NULL",
    "CREATE INDEX IF NOT EXISTS idx_gigs_status_date ON gigs(status, date)",
    "CREATE INDEX IF NOT EXISTS idx_messages_conversation ON messages(conversation_id, created_at)",
];

pub async fn connect(url: &str) -> AppResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect_with(options)
        .await?;

    init(&pool).await?;
    Ok(pool)
}

pub async fn init(pool: &SqlitePool) -> AppResult<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
