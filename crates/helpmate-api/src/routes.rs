use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;
use crate::{applications, auth, listings, messages, time_slots, users};

/// Every endpoint. Handlers that need a caller take a `CurrentUser`, so public
/// and authenticated methods can share a path.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        // Accounts
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/users", get(users::list_users))
        .route("/profile", get(users::get_profile))
        .route("/update_profile", put(users::update_profile))
        // Job listings
        .route(
            "/job_listings",
            get(listings::list_job_listings).post(listings::create_job_listing),
        )
        .route(
            "/job_listings/{listing_id}",
            get(listings::get_job_listing)
                .put(listings::update_job_listing)
                .delete(listings::delete_job_listing),
        )
        .route("/search", get(listings::search))
        // Applications and saved jobs
        .route("/job_listings/{listing_id}/apply", post(applications::apply_for_job))
        .route("/job_applications", get(applications::get_job_applications))
        .route("/save_job/{listing_id}", post(applications::save_job))
        .route("/saved_jobs", get(applications::get_saved_jobs))
        .route("/unsave_job/{listing_id}", delete(applications::unsave_job))
        // Time slots
        .route(
            "/time_slots",
            get(time_slots::list_time_slots).post(time_slots::create_time_slot),
        )
        .route(
            "/time_slots/{slot_id}",
            put(time_slots::update_time_slot).delete(time_slots::delete_time_slot),
        )
        // Messaging
        .route("/send_message", post(messages::send_message))
        .route("/conversation/{user2_id}", get(messages::get_conversation))
        .with_state(state)
}

async fn index() -> &'static str {
    "Hello, Help Mate!"
}
