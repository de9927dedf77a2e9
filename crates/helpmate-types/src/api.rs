use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};

use crate::models::{DEFAULT_PAGE, DEFAULT_PER_PAGE, Paginated, UserType};

// -- JWT Claims --

/// Claims carried by every bearer token. `sub` is the user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub exp: usize,
}

// -- Common --

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

impl StatusMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_per_page() -> i64 {
    DEFAULT_PER_PAGE
}

// -- Auth --

/// Fields are optional so that a missing field is reported as a 400 with a
/// readable message instead of a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub user_type: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub skills: Option<String>,
    pub experience: Option<String>,
    pub company_name: Option<String>,
    pub company_description: Option<String>,
    pub company_website: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: i64,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: i64,
    pub username: String,
    pub token: String,
}

// -- Users --

#[derive(Debug, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub user_type: UserType,
    pub username: String,
    pub email: String,
    pub skills: Option<String>,
    pub experience: Option<String>,
    pub company_name: Option<String>,
    pub company_description: Option<String>,
    pub company_website: Option<String>,
}

/// Absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub skills: Option<String>,
    pub experience: Option<String>,
    pub company_name: Option<String>,
    pub company_description: Option<String>,
    pub company_website: Option<String>,
    pub password: Option<String>,
}

// -- Messages --

/// Extra fields are ignored, and `recipient_id` may arrive as a number or
/// as a numeric string.
#[derive(Debug, Default, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default, deserialize_with = "lenient_id")]
    pub recipient_id: Option<i64>,
    pub content: Option<String>,
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(i64),
        Text(String),
    }

    match Option::<Id>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Id::Number(id)) => Ok(Some(id)),
        Some(Id::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("recipient_id is not a number: '{}'", text))),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub message: MessageResponse,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationResponse {
    pub messages: Vec<MessageResponse>,
    pub total: u64,
    pub per_page: u32,
    pub total_pages: u64,
    pub current_page: u32,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
}

impl From<Paginated<MessageResponse>> for ConversationResponse {
    fn from(page: Paginated<MessageResponse>) -> Self {
        Self {
            total: page.total,
            per_page: page.per_page(),
            total_pages: page.total_pages(),
            current_page: page.current_page(),
            has_prev: page.has_prev(),
            has_next: page.has_next(),
            prev_page: page.prev_page(),
            next_page: page.next_page(),
            messages: page.items,
        }
    }
}

// -- Job listings --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobListingRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobListingResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub employer_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub keyword: String,
}

// -- Applications --

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplyRequest {
    pub cover_letter: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobApplicationResponse {
    pub id: i64,
    pub job_listing_id: i64,
    pub job_seeker_id: i64,
    pub cover_letter: Option<String>,
    pub application_date: DateTime<Utc>,
}

// -- Time slots --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeSlotRequest {
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TimeSlotResponse {
    pub id: i64,
    pub user_id: i64,
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
}
