use helpmate_types::models::{PageRequest, Paginated, UserType};
use rusqlite::types::Type;
use rusqlite::{Connection, Row};

use super::OptionalExt;
use crate::models::{NewUser, ProfileUpdate, UserRow};
use crate::{Database, Result};

const USER_COLUMNS: &str = "id, user_type, username, email, password, skills, experience, \
     company_name, company_description, company_website, created_at";

impl Database {
    // -- Users --

    pub fn create_user(&self, user: &NewUser<'_>) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (user_type, username, email, password, skills, experience,
                                    company_name, company_description, company_website)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                rusqlite::params![
                    user.user_type.as_str(),
                    user.username,
                    user.email,
                    user.password,
                    user.skills,
                    user.experience,
                    user.company_name,
                    user.company_description,
                    user.company_website,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id = ?1", id))
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email = ?1", email))
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username = ?1", username))
    }

    pub fn user_exists(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row("SELECT 1 FROM users WHERE id = ?1", [id], |row| row.get(0))
                .optional()?;
            Ok(found.is_some())
        })
    }

    pub fn list_users(&self, page: PageRequest) -> Result<Paginated<UserRow>> {
        self.with_conn(|conn| {
            let total: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?;

            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM users ORDER BY id LIMIT ?1 OFFSET ?2",
                USER_COLUMNS
            ))?;
            let rows = stmt
                .query_map(
                    rusqlite::params![page.per_page(), page.offset()],
                    map_user,
                )?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(Paginated::new(rows, total as u64, page))
        })
    }

    /// Overwrites every profile column; a `None` password leaves the stored
    /// credential untouched. Returns false when the user does not exist.
    pub fn update_profile(&self, id: i64, update: &ProfileUpdate) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE users
                 SET skills = ?2, experience = ?3, company_name = ?4,
                     company_description = ?5, company_website = ?6,
                     password = COALESCE(?7, password)
                 WHERE id = ?1",
                rusqlite::params![
                    id,
                    update.skills,
                    update.experience,
                    update.company_name,
                    update.company_description,
                    update.company_website,
                    update.password,
                ],
            )?;
            Ok(changed > 0)
        })
    }
}

fn query_user<P: rusqlite::ToSql>(
    conn: &Connection,
    predicate: &str,
    value: P,
) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM users WHERE {}",
        USER_COLUMNS, predicate
    ))?;

    let row = stmt.query_row([value], map_user).optional()?;

    Ok(row)
}

fn map_user(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    let raw_type: String = row.get(1)?;
    let user_type = raw_type
        .parse::<UserType>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;

    Ok(UserRow {
        id: row.get(0)?,
        user_type,
        username: row.get(2)?,
        email: row.get(3)?,
        password: row.get(4)?,
        skills: row.get(5)?,
        experience: row.get(6)?,
        company_name: row.get(7)?,
        company_description: row.get(8)?,
        company_website: row.get(9)?,
        created_at: row.get(10)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbError;
    use crate::queries::fixtures;

    #[test]
    fn test_create_and_lookup_user() {
        let db = Database::open_in_memory().unwrap();
        let id = fixtures::user(&db, "alice", UserType::JobSeeker);

        let by_id = db.get_user_by_id(id).unwrap().unwrap();
        assert_eq!(by_id.username, "alice");
        assert_eq!(by_id.user_type, UserType::JobSeeker);

        let by_email = db.get_user_by_email("alice@example.com").unwrap().unwrap();
        assert_eq!(by_email.id, id);
        assert!(db.get_user_by_username("bob").unwrap().is_none());
        assert!(db.user_exists(id).unwrap());
        assert!(!db.user_exists(id + 100).unwrap());
    }

    #[test]
    fn test_duplicate_username_is_conflict() {
        let db = Database::open_in_memory().unwrap();
        fixtures::user(&db, "acme", UserType::Business);

        let err = db
            .create_user(&NewUser {
                user_type: UserType::Business,
                username: "acme",
                email: "other@example.com",
                password: "hash",
                skills: None,
                experience: None,
                company_name: Some("Acme"),
                company_description: None,
                company_website: None,
            })
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)), "got {:?}", err);
    }

    #[test]
    fn test_update_profile_keeps_password_when_absent() {
        let db = Database::open_in_memory().unwrap();
        let id = fixtures::user(&db, "carol", UserType::JobSeeker);

        let update = ProfileUpdate {
            skills: Some("rust, sql".into()),
            ..Default::default()
        };
        assert!(db.update_profile(id, &update).unwrap());

        let row = db.get_user_by_id(id).unwrap().unwrap();
        assert_eq!(row.skills.as_deref(), Some("rust, sql"));
        assert_eq!(row.password, "hash");
        assert!(!db.update_profile(id + 1, &update).unwrap());
    }

    #[test]
    fn test_list_users_pages() {
        let db = Database::open_in_memory().unwrap();
        for i in 0..3 {
            fixtures::user(&db, &format!("user{}", i), UserType::JobSeeker);
        }

        let page = db.list_users(PageRequest::new(2, 2).unwrap()).unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].username, "user2");
    }
}
