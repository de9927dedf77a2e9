use chrono::{DateTime, Utc};
use helpmate_types::models::{PageRequest, Paginated};
use rusqlite::Row;

use crate::models::MessageRow;
use crate::{Database, Result, format_timestamp};

/// Both directions of a two-party exchange.
const PAIR_PREDICATE: &str =
    "(sender_id = ?1 AND recipient_id = ?2) OR (sender_id = ?2 AND recipient_id = ?1)";

impl Database {
    // -- Messages --

    pub fn insert_message(
        &self,
        sender_id: i64,
        recipient_id: i64,
        content: &str,
        sent_at: DateTime<Utc>,
    ) -> Result<MessageRow> {
        let timestamp = format_timestamp(sent_at);
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO messages (sender_id, recipient_id, content, timestamp) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![sender_id, recipient_id, content, timestamp],
            )?;
            Ok(MessageRow {
                id: conn.last_insert_rowid(),
                sender_id,
                recipient_id,
                content: content.to_string(),
                timestamp,
            })
        })
    }

    /// Messages exchanged between `user_a` and `user_b` in either direction,
    /// newest first. Count and slice are read under the same lock.
    pub fn get_conversation(
        &self,
        user_a: i64,
        user_b: i64,
        page: PageRequest,
    ) -> Result<Paginated<MessageRow>> {
        self.with_conn(|conn| {
            let total: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM messages WHERE {}", PAIR_PREDICATE),
                rusqlite::params![user_a, user_b],
                |r| r.get(0),
            )?;

            let mut stmt = conn.prepare(&format!(
                "SELECT id, sender_id, recipient_id, content, timestamp
                 FROM messages
                 WHERE {}
                 ORDER BY timestamp DESC, id DESC
                 LIMIT ?3 OFFSET ?4",
                PAIR_PREDICATE
            ))?;

            let rows = stmt
                .query_map(
                    rusqlite::params![user_a, user_b, page.per_page(), page.offset()],
                    map_message,
                )?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(Paginated::new(rows, total as u64, page))
        })
    }
}

fn map_message(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        sender_id: row.get(1)?,
        recipient_id: row.get(2)?,
        content: row.get(3)?,
        timestamp: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbError;
    use crate::queries::fixtures;
    use chrono::TimeZone;
    use helpmate_types::models::UserType;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_conversation_matches_both_directions() {
        let db = Database::open_in_memory().unwrap();
        let a = fixtures::user(&db, "a", UserType::JobSeeker);
        let b = fixtures::user(&db, "b", UserType::Business);
        let c = fixtures::user(&db, "c", UserType::JobSeeker);

        let t = base_time();
        db.insert_message(a, b, "hello", t).unwrap();
        db.insert_message(b, a, "hi there", t + chrono::Duration::seconds(1)).unwrap();
        db.insert_message(c, a, "unrelated", t + chrono::Duration::seconds(2)).unwrap();
        db.insert_message(b, c, "also unrelated", t + chrono::Duration::seconds(3)).unwrap();

        let page = db.get_conversation(a, b, PageRequest::default()).unwrap();
        assert_eq!(page.total, 2);
        let contents: Vec<_> = page.items.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["hi there", "hello"]);

        let reversed = db.get_conversation(b, a, PageRequest::default()).unwrap();
        assert_eq!(reversed, page);
    }

    #[test]
    fn test_conversation_orders_by_timestamp_not_insertion() {
        let db = Database::open_in_memory().unwrap();
        let a = fixtures::user(&db, "a", UserType::JobSeeker);
        let b = fixtures::user(&db, "b", UserType::Business);

        let t = base_time();
        db.insert_message(a, b, "late", t + chrono::Duration::minutes(5)).unwrap();
        db.insert_message(b, a, "early", t).unwrap();

        let page = db.get_conversation(a, b, PageRequest::default()).unwrap();
        assert_eq!(page.items[0].content, "late");
        assert_eq!(page.items[1].content, "early");
    }

    #[test]
    fn test_same_timestamp_falls_back_to_insert_order() {
        let db = Database::open_in_memory().unwrap();
        let a = fixtures::user(&db, "a", UserType::JobSeeker);
        let b = fixtures::user(&db, "b", UserType::Business);

        let t = base_time();
        let first = db.insert_message(a, b, "first", t).unwrap();
        let second = db.insert_message(b, a, "second", t).unwrap();

        let page = db.get_conversation(a, b, PageRequest::default()).unwrap();
        assert_eq!(page.items[0].id, second.id);
        assert_eq!(page.items[1].id, first.id);
    }

    #[test]
    fn test_conversation_offset_and_limit() {
        let db = Database::open_in_memory().unwrap();
        let a = fixtures::user(&db, "a", UserType::JobSeeker);
        let b = fixtures::user(&db, "b", UserType::Business);

        let t = base_time();
        for i in 0..7 {
            db.insert_message(a, b, &format!("m{}", i), t + chrono::Duration::seconds(i))
                .unwrap();
        }

        let page = db.get_conversation(a, b, PageRequest::new(2, 3).unwrap()).unwrap();
        assert_eq!(page.total, 7);
        let contents: Vec<_> = page.items.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m3", "m2", "m1"]);

        let beyond = db.get_conversation(a, b, PageRequest::new(4, 3).unwrap()).unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 7);
    }

    #[test]
    fn test_message_to_unknown_user_is_foreign_key_error() {
        let db = Database::open_in_memory().unwrap();
        let a = fixtures::user(&db, "a", UserType::JobSeeker);

        let err = db.insert_message(a, a + 42, "anyone?", base_time()).unwrap_err();
        assert!(matches!(err, DbError::ForeignKey(_)), "got {:?}", err);
    }
}
