use rusqlite::Connection;
use tracing::info;

use crate::Result;

pub const LATEST_VERSION: i64 = 1;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            BEGIN;

            CREATE TABLE users (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                user_type           TEXT NOT NULL CHECK (user_type IN ('job_seeker', 'business')),
                username            TEXT NOT NULL UNIQUE,
                email               TEXT NOT NULL UNIQUE,
                password            TEXT NOT NULL,
                skills              TEXT,
                experience          TEXT,
                company_name        TEXT,
                company_description TEXT,
                company_website     TEXT,
                created_at          TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE job_listings (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                title       TEXT NOT NULL,
                description TEXT NOT NULL,
                employer_id INTEGER NOT NULL REFERENCES users(id),
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_job_listings_employer ON job_listings(employer_id);

            CREATE TABLE messages (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                sender_id    INTEGER NOT NULL REFERENCES users(id),
                recipient_id INTEGER NOT NULL REFERENCES users(id),
                content      TEXT NOT NULL CHECK (length(content) > 0),
                timestamp    TEXT NOT NULL
            );

            CREATE INDEX idx_messages_timestamp ON messages(timestamp);
            CREATE INDEX idx_messages_pair ON messages(sender_id, recipient_id, timestamp);

            CREATE TABLE job_applications (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                job_seeker_id    INTEGER NOT NULL REFERENCES users(id),
                job_listing_id   INTEGER NOT NULL REFERENCES job_listings(id) ON DELETE CASCADE,
                cover_letter     TEXT,
                application_date TEXT NOT NULL,
                UNIQUE(job_seeker_id, job_listing_id)
            );

            CREATE TABLE saved_jobs (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                job_seeker_id  INTEGER NOT NULL REFERENCES users(id),
                job_listing_id INTEGER NOT NULL REFERENCES job_listings(id) ON DELETE CASCADE,
                created_at     TEXT NOT NULL,
                UNIQUE(job_seeker_id, job_listing_id)
            );

            CREATE TABLE time_slots (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id     INTEGER NOT NULL REFERENCES users(id),
                day_of_week TEXT NOT NULL,
                start_time  TEXT NOT NULL,
                end_time    TEXT NOT NULL,
                CHECK (start_time < end_time)
            );

            CREATE INDEX idx_time_slots_user ON time_slots(user_id);

            INSERT INTO schema_version (version) VALUES (1);

            COMMIT;
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
