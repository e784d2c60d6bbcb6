use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Musician,
    Venue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GigStatus {
    Open,
    Closed,
    Filled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Public identity record; one per user, keyed by the user's id.
/// Role-specific columns are null for the other role.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub user_type: UserType,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub genres: Option<Json<Vec<String>>>,
    pub venue_name: Option<String>,
    pub venue_address: Option<String>,
    pub venue_capacity: Option<i64>,
    pub instruments: Option<Json<Vec<String>>>,
    pub experience_years: Option<i64>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Gig {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub title: String,
    pub description: String,
    /// ISO `YYYY-MM-DD`; range filters compare lexically.
    pub date: String,
    pub start_time: String,
    pub end_time: Option<String>,
    pub location: String,
    pub pay_min: i64,
    pub pay_max: i64,
    pub genres: Json<Vec<String>>,
    pub image_url: Option<String>,
    pub requirements: Option<String>,
    pub status: GigStatus,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub gig_id: Uuid,
    pub musician_id: Uuid,
    pub message: String,
    pub status: ApplicationStatus,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub gig_id: Option<Uuid>,
    pub application_id: Option<Uuid>,
    pub musician_id: Uuid,
    pub venue_id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub read_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}
