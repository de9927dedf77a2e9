//! Direct messages between two users.
//!
//! A conversation is never stored: it is the set of messages whose
//! sender/recipient pair is `{a, b}` in either direction, read newest first
//! and sliced into pages. Both directions interleave in one timeline.

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use helpmate_db::models::MessageRow;
use helpmate_db::{Database, DbError};
use helpmate_types::models::{PageError, PageRequest, Paginated};

use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("Missing {0}")]
    MissingField(&'static str),

    #[error("Recipient not found")]
    RecipientNotFound(i64),

    #[error(transparent)]
    InvalidPage(#[from] PageError),

    #[error(transparent)]
    Store(#[from] DbError),
}

impl From<MessagingError> for ApiError {
    fn from(err: MessagingError) -> Self {
        match err {
            MessagingError::MissingField(field) => ApiError::Validation(format!("Missing {}", field)),
            MessagingError::RecipientNotFound(_) => ApiError::NotFound("Recipient not found".into()),
            MessagingError::InvalidPage(e) => ApiError::Validation(e.to_string()),
            MessagingError::Store(e) => ApiError::Database(e),
        }
    }
}

/// Persists a message from `sender_id` stamped with the current time.
/// A zero recipient id counts as absent, as does empty content. Content is
/// stored exactly as given.
pub fn send_message(
    db: &Database,
    sender_id: i64,
    recipient_id: Option<i64>,
    content: Option<&str>,
) -> Result<MessageRow, MessagingError> {
    let recipient_id = recipient_id
        .filter(|id| *id != 0)
        .ok_or(MessagingError::MissingField("recipient_id"))?;
    let content = content
        .filter(|c| !c.is_empty())
        .ok_or(MessagingError::MissingField("content"))?;

    if !db.user_exists(recipient_id)? {
        return Err(MessagingError::RecipientNotFound(recipient_id));
    }

    let message = db.insert_message(sender_id, recipient_id, content, Utc::now())?;
    info!(
        message_id = message.id,
        sender_id, recipient_id, "Message sent"
    );
    Ok(message)
}

/// One page of the conversation between `user_a` and `user_b`.
/// A page past the end comes back empty rather than failing.
pub fn get_conversation(
    db: &Database,
    user_a: i64,
    user_b: i64,
    page: i64,
    per_page: i64,
) -> Result<Paginated<MessageRow>, MessagingError> {
    let request = PageRequest::new(page, per_page)?;

    if !db.user_exists(user_b)? {
        return Err(MessagingError::RecipientNotFound(user_b));
    }

    Ok(db.get_conversation(user_a, user_b, request)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use helpmate_db::models::NewUser;
    use helpmate_types::models::UserType;

    fn user(db: &Database, name: &str) -> i64 {
        let email = format!("{}@example.com", name);
        db.create_user(&NewUser {
            user_type: UserType::JobSeeker,
            username: name,
            email: &email,
            password: "hash",
            skills: None,
            experience: None,
            company_name: None,
            company_description: None,
            company_website: None,
        })
        .unwrap()
    }

    fn setup() -> (Database, i64, i64) {
        let db = Database::open_in_memory().unwrap();
        let a = user(&db, "alice");
        let b = user(&db, "bob");
        (db, a, b)
    }

    #[test]
    fn test_sent_message_is_newest_in_conversation() {
        let (db, a, b) = setup();
        send_message(&db, b, Some(a), Some("earlier")).unwrap();
        let sent = send_message(&db, a, Some(b), Some("hello bob")).unwrap();

        let page = get_conversation(&db, a, b, 1, 1).unwrap();
        assert_eq!(page.items, vec![sent]);
        assert_eq!(page.total, 2);
    }

    #[test]
    fn test_conversation_is_symmetric() {
        let (db, a, b) = setup();
        for i in 0..5 {
            let (from, to) = if i % 2 == 0 { (a, b) } else { (b, a) };
            send_message(&db, from, Some(to), Some(&format!("msg {}", i))).unwrap();
        }

        let ab = get_conversation(&db, a, b, 1, 10).unwrap();
        let ba = get_conversation(&db, b, a, 1, 10).unwrap();
        assert_eq!(ab.items, ba.items);
        assert_eq!(ab.items.len(), 5);
    }

    #[test]
    fn test_same_page_twice_is_identical() {
        let (db, a, b) = setup();
        for i in 0..4 {
            send_message(&db, a, Some(b), Some(&format!("msg {}", i))).unwrap();
        }

        let first = get_conversation(&db, a, b, 2, 3).unwrap();
        let second = get_conversation(&db, a, b, 2, 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fifteen_alternating_messages_over_two_pages() {
        let (db, a, b) = setup();
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        for i in 0..15 {
            let (from, to) = if i % 2 == 0 { (a, b) } else { (b, a) };
            db.insert_message(from, to, &format!("msg {}", i), start + chrono::Duration::seconds(i))
                .unwrap();
        }

        let page1 = get_conversation(&db, a, b, 1, 10).unwrap();
        let contents: Vec<_> = page1.items.iter().map(|m| m.content.clone()).collect();
        let expected: Vec<_> = (5..15).rev().map(|i| format!("msg {}", i)).collect();
        assert_eq!(contents, expected);
        assert_eq!(page1.total_pages(), 2);
        assert!(page1.has_next());
        assert_eq!(page1.next_page(), Some(2));
        assert!(!page1.has_prev());

        let page2 = get_conversation(&db, a, b, 2, 10).unwrap();
        let contents: Vec<_> = page2.items.iter().map(|m| m.content.clone()).collect();
        let expected: Vec<_> = (0..5).rev().map(|i| format!("msg {}", i)).collect();
        assert_eq!(contents, expected);
        assert!(!page2.has_next());
        assert_eq!(page2.next_page(), None);
        assert_eq!(page2.prev_page(), Some(1));
    }

    #[test]
    fn test_page_out_of_range_is_empty() {
        let (db, a, b) = setup();
        send_message(&db, a, Some(b), Some("one")).unwrap();
        send_message(&db, b, Some(a), Some("two")).unwrap();

        let page = get_conversation(&db, a, b, 1000, 10).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 2);
        assert_eq!(page.total_pages(), 1);
        assert!(!page.has_next());
    }

    #[test]
    fn test_page_count_invariant() {
        let (db, a, b) = setup();
        for i in 0..7 {
            send_message(&db, a, Some(b), Some(&format!("m{}", i))).unwrap();
        }

        for per_page in (1..=8).chain([101, 500]) {
            for page in 1..=9 {
                let p = get_conversation(&db, a, b, page, per_page).unwrap();
                assert_eq!(p.total_pages(), 7u64.div_ceil(per_page as u64));
                assert_eq!(p.has_next(), (page as u64) < p.total_pages());
            }
        }
    }

    #[test]
    fn test_large_page_size_is_not_clamped() {
        let (db, a, b) = setup();
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        for i in 0..250 {
            db.insert_message(a, b, &format!("msg {}", i), start + chrono::Duration::seconds(i))
                .unwrap();
        }

        let page1 = get_conversation(&db, a, b, 1, 150).unwrap();
        assert_eq!(page1.items.len(), 150);
        assert_eq!(page1.per_page(), 150);
        assert_eq!(page1.total_pages(), 2);
        assert_eq!(page1.items[0].content, "msg 249");
        assert_eq!(page1.items[149].content, "msg 100");

        let page2 = get_conversation(&db, a, b, 2, 150).unwrap();
        assert_eq!(page2.items.len(), 100);
        assert_eq!(page2.items[0].content, "msg 99");
        assert!(!page2.has_next());
    }

    #[test]
    fn test_unknown_recipient() {
        let (db, a, _) = setup();
        let err = send_message(&db, a, Some(999), Some("hi")).unwrap_err();
        assert!(matches!(err, MessagingError::RecipientNotFound(999)));

        let err = get_conversation(&db, a, 999, 1, 10).unwrap_err();
        assert!(matches!(err, MessagingError::RecipientNotFound(999)));
    }

    #[test]
    fn test_missing_or_empty_fields() {
        let (db, a, b) = setup();
        let err = send_message(&db, a, Some(b), Some("")).unwrap_err();
        assert!(matches!(err, MessagingError::MissingField("content")));

        let err = send_message(&db, a, None, Some("hi")).unwrap_err();
        assert!(matches!(err, MessagingError::MissingField("recipient_id")));

        let err = send_message(&db, a, Some(0), Some("hi")).unwrap_err();
        assert!(matches!(err, MessagingError::MissingField("recipient_id")));

        let err = send_message(&db, a, Some(b), None).unwrap_err();
        assert!(matches!(err, MessagingError::MissingField("content")));

        assert_eq!(db.get_conversation(a, b, PageRequest::default()).unwrap().total, 0);
    }

    #[test]
    fn test_whitespace_content_is_stored_verbatim() {
        let (db, a, b) = setup();
        let sent = send_message(&db, a, Some(b), Some("   ")).unwrap();
        assert_eq!(sent.content, "   ");

        let sent = send_message(&db, a, Some(b), Some("  padded  ")).unwrap();
        assert_eq!(sent.content, "  padded  ");
        assert_eq!(get_conversation(&db, a, b, 1, 10).unwrap().total, 2);
    }

    #[test]
    fn test_invalid_page_parameters() {
        let (db, a, b) = setup();
        assert!(matches!(
            get_conversation(&db, a, b, 0, 10),
            Err(MessagingError::InvalidPage(PageError::PageOutOfRange(0)))
        ));
        assert!(matches!(
            get_conversation(&db, a, b, 1, 0),
            Err(MessagingError::InvalidPage(PageError::PerPageOutOfRange(0)))
        ));
    }
}
