use rusqlite::Row;

use super::OptionalExt;
use crate::models::TimeSlotRow;
use crate::{Database, Result};

impl Database {
    // -- Time slots --

    pub fn create_time_slot(
        &self,
        user_id: i64,
        day_of_week: &str,
        start_time: &str,
        end_time: &str,
    ) -> Result<TimeSlotRow> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO time_slots (user_id, day_of_week, start_time, end_time) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![user_id, day_of_week, start_time, end_time],
            )?;
            Ok(TimeSlotRow {
                id: conn.last_insert_rowid(),
                user_id,
                day_of_week: day_of_week.to_string(),
                start_time: start_time.to_string(),
                end_time: end_time.to_string(),
            })
        })
    }

    pub fn get_time_slot(&self, id: i64) -> Result<Option<TimeSlotRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, user_id, day_of_week, start_time, end_time FROM time_slots WHERE id = ?1",
                [id],
                map_slot,
            )
            .optional()
        })
    }

    /// A user's slots in calendar order: Monday first, then by start time.
    pub fn list_time_slots(&self, user_id: i64) -> Result<Vec<TimeSlotRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, day_of_week, start_time, end_time
                 FROM time_slots
                 WHERE user_id = ?1
                 ORDER BY CASE day_of_week
                              WHEN 'Monday' THEN 1
                              WHEN 'Tuesday' THEN 2
                              WHEN 'Wednesday' THEN 3
                              WHEN 'Thursday' THEN 4
                              WHEN 'Friday' THEN 5
                              WHEN 'Saturday' THEN 6
                              WHEN 'Sunday' THEN 7
                              ELSE 8
                          END,
                          start_time,
                          id",
            )?;
            let rows = stmt
                .query_map([user_id], map_slot)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn update_time_slot(
        &self,
        id: i64,
        day_of_week: &str,
        start_time: &str,
        end_time: &str,
    ) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE time_slots SET day_of_week = ?2, start_time = ?3, end_time = ?4 WHERE id = ?1",
                rusqlite::params![id, day_of_week, start_time, end_time],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn delete_time_slot(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute("DELETE FROM time_slots WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }
}

fn map_slot(row: &Row<'_>) -> rusqlite::Result<TimeSlotRow> {
    Ok(TimeSlotRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        day_of_week: row.get(2)?,
        start_time: row.get(3)?,
        end_time: row.get(4)?,
    })
}
