use helpmate_types::models::{PageRequest, Paginated};
use rusqlite::Row;

use super::OptionalExt;
use crate::models::JobListingRow;
use crate::{Database, Result};

impl Database {
    // -- Job listings --

    pub fn create_job_listing(
        &self,
        title: &str,
        description: &str,
        employer_id: i64,
    ) -> Result<JobListingRow> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO job_listings (title, description, employer_id) VALUES (?1, ?2, ?3)",
                rusqlite::params![title, description, employer_id],
            )?;
            let id = conn.last_insert_rowid();
            let row = conn.query_row(
                "SELECT id, title, description, employer_id, created_at FROM job_listings WHERE id = ?1",
                [id],
                map_listing,
            )?;
            Ok(row)
        })
    }

    pub fn get_job_listing(&self, id: i64) -> Result<Option<JobListingRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, title, description, employer_id, created_at FROM job_listings WHERE id = ?1",
                [id],
                map_listing,
            )
            .optional()
        })
    }

    pub fn list_job_listings(&self, page: PageRequest) -> Result<Paginated<JobListingRow>> {
        self.with_conn(|conn| {
            let total: i64 =
                conn.query_row("SELECT COUNT(*) FROM job_listings", [], |r| r.get(0))?;

            let mut stmt = conn.prepare(
                "SELECT id, title, description, employer_id, created_at
                 FROM job_listings
                 ORDER BY id
                 LIMIT ?1 OFFSET ?2",
            )?;
            let rows = stmt
                .query_map(
                    rusqlite::params![page.per_page(), page.offset()],
                    map_listing,
                )?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(Paginated::new(rows, total as u64, page))
        })
    }

    /// Returns false when no listing has this id.
    pub fn update_job_listing(&self, id: i64, title: &str, description: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE job_listings SET title = ?2, description = ?3 WHERE id = ?1",
                rusqlite::params![id, title, description],
            )?;
            Ok(changed > 0)
        })
    }

    /// Also drops the listing's applications and saved-job rows (ON DELETE CASCADE).
    pub fn delete_job_listing(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute("DELETE FROM job_listings WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }

    /// Case-insensitive substring match on title or description.
    pub fn search_job_listings(&self, keyword: &str) -> Result<Vec<JobListingRow>> {
        let pattern = format!("%{}%", escape_like(keyword));
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, description, employer_id, created_at
                 FROM job_listings
                 WHERE title LIKE ?1 ESCAPE '\\' OR description LIKE ?1 ESCAPE '\\'
                 ORDER BY id",
            )?;
            let rows = stmt
                .query_map([&pattern], map_listing)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

pub(super) fn map_listing(row: &Row<'_>) -> rusqlite::Result<JobListingRow> {
    Ok(JobListingRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        employer_id: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
