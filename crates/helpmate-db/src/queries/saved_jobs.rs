use chrono::{DateTime, Utc};

use super::listings::map_listing;
use crate::models::JobListingRow;
use crate::{Database, Result, format_timestamp};

impl Database {
    // -- Saved jobs --

    /// Fails with [`crate::DbError::Conflict`] if the listing is already saved.
    pub fn save_job(
        &self,
        job_seeker_id: i64,
        job_listing_id: i64,
        saved_at: DateTime<Utc>,
    ) -> Result<i64> {
        let created_at = format_timestamp(saved_at);
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO saved_jobs (job_seeker_id, job_listing_id, created_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![job_seeker_id, job_listing_id, created_at],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Saved listings, most recently saved first.
    pub fn get_saved_listings(&self, job_seeker_id: i64) -> Result<Vec<JobListingRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT l.id, l.title, l.description, l.employer_id, l.created_at
                 FROM saved_jobs s
                 JOIN job_listings l ON l.id = s.job_listing_id
                 WHERE s.job_seeker_id = ?1
                 ORDER BY s.created_at DESC, s.id DESC",
            )?;
            let rows = stmt
                .query_map([job_seeker_id], map_listing)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Returns false when the listing was not saved.
    pub fn unsave_job(&self, job_seeker_id: i64, job_listing_id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "DELETE FROM saved_jobs WHERE job_seeker_id = ?1 AND job_listing_id = ?2",
                [job_seeker_id, job_listing_id],
            )?;
            Ok(changed > 0)
        })
    }
}
