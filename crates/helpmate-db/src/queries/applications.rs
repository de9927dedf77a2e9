use chrono::{DateTime, Utc};

use crate::models::JobApplicationRow;
use crate::{Database, Result, format_timestamp};

impl Database {
    // -- Job applications --

    /// Fails with [`crate::DbError::Conflict`] if the seeker already applied.
    pub fn create_application(
        &self,
        job_seeker_id: i64,
        job_listing_id: i64,
        cover_letter: Option<&str>,
        applied_at: DateTime<Utc>,
    ) -> Result<JobApplicationRow> {
        let application_date = format_timestamp(applied_at);
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO job_applications (job_seeker_id, job_listing_id, cover_letter, application_date)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![job_seeker_id, job_listing_id, cover_letter, application_date],
            )?;
            Ok(JobApplicationRow {
                id: conn.last_insert_rowid(),
                job_seeker_id,
                job_listing_id,
                cover_letter: cover_letter.map(str::to_string),
                application_date,
            })
        })
    }

    pub fn get_applications_for_seeker(&self, job_seeker_id: i64) -> Result<Vec<JobApplicationRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, job_seeker_id, job_listing_id, cover_letter, application_date
                 FROM job_applications
                 WHERE job_seeker_id = ?1
                 ORDER BY application_date DESC, id DESC",
            )?;
            let rows = stmt
                .query_map([job_seeker_id], |row| {
                    Ok(JobApplicationRow {
                        id: row.get(0)?,
                        job_seeker_id: row.get(1)?,
                        job_listing_id: row.get(2)?,
                        cover_letter: row.get(3)?,
                        application_date: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbError;
    use crate::queries::fixtures;
    use helpmate_types::models::UserType;

    #[test]
    fn test_one_application_per_listing() {
        let db = Database::open_in_memory().unwrap();
        let acme = fixtures::user(&db, "acme", UserType::Business);
        let dana = fixtures::user(&db, "dana", UserType::JobSeeker);
        let listing = db.create_job_listing("Welder", "Night shift", acme).unwrap();

        let now = Utc::now();
        let app = db
            .create_application(dana, listing.id, Some("I weld."), now)
            .unwrap();
        assert_eq!(app.cover_letter.as_deref(), Some("I weld."));

        let err = db.create_application(dana, listing.id, None, now).unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)), "got {:?}", err);

        let apps = db.get_applications_for_seeker(dana).unwrap();
        assert_eq!(apps, vec![app]);
        assert!(db.get_applications_for_seeker(acme).unwrap().is_empty());
    }

    #[test]
    fn test_deleting_listing_removes_applications() {
        let db = Database::open_in_memory().unwrap();
        let acme = fixtures::user(&db, "acme", UserType::Business);
        let dana = fixtures::user(&db, "dana", UserType::JobSeeker);
        let listing = db.create_job_listing("Welder", "Night shift", acme).unwrap();
        db.create_application(dana, listing.id, None, Utc::now()).unwrap();

        assert!(db.delete_job_listing(listing.id).unwrap());
        assert!(db.get_applications_for_seeker(dana).unwrap().is_empty());
    }
}
