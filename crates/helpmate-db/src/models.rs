//! Database row types. These map directly to SQLite rows and stay
//! independent of the helpmate-types API shapes.

use helpmate_types::models::UserType;

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub user_type: UserType,
    pub username: String,
    pub email: String,
    pub password: String,
    pub skills: Option<String>,
    pub experience: Option<String>,
    pub company_name: Option<String>,
    pub company_description: Option<String>,
    pub company_website: Option<String>,
    pub created_at: String,
}

/// Insert payload for [`UserRow`]; `password` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub user_type: UserType,
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub skills: Option<&'a str>,
    pub experience: Option<&'a str>,
    pub company_name: Option<&'a str>,
    pub company_description: Option<&'a str>,
    pub company_website: Option<&'a str>,
}

/// Profile columns after an update. The caller merges absent fields with the
/// stored row first.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub skills: Option<String>,
    pub experience: Option<String>,
    pub company_name: Option<String>,
    pub company_description: Option<String>,
    pub company_website: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobListingRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub employer_id: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRow {
    pub id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub content: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobApplicationRow {
    pub id: i64,
    pub job_seeker_id: i64,
    pub job_listing_id: i64,
    pub cover_letter: Option<String>,
    pub application_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlotRow {
    pub id: i64,
    pub user_id: i64,
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
}
