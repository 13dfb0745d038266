//! Named slot operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};

impl Database {
    /// Read a slot's value.
    pub fn get_slot(&self, key: &str) -> DbResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?",
                [key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Write a slot, replacing any previous value.
    pub fn set_slot(&self, key: &str, value: &str) -> DbResult<()> {
        let now = chrono::Utc::now().to_rfc3339();
        self.conn.execute(
            r#"
            INSERT INTO local_storage (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value, now],
        )?;
        Ok(())
    }

    /// Remove a slot.
    pub fn remove_slot(&self, key: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM local_storage WHERE key = ?", [key])?;
        Ok(rows_affected > 0)
    }

    /// List slot names.
    pub fn list_slots(&self) -> DbResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM local_storage ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_get_missing_slot() {
        let db = setup_db();
        assert_eq!(db.get_slot("students").unwrap(), None);
    }

    #[test]
    fn test_set_and_overwrite() {
        let db = setup_db();

        db.set_slot("username", "clinic").unwrap();
        assert_eq!(db.get_slot("username").unwrap().as_deref(), Some("clinic"));

        db.set_slot("username", "front-desk").unwrap();
        assert_eq!(
            db.get_slot("username").unwrap().as_deref(),
            Some("front-desk")
        );
        assert_eq!(db.list_slots().unwrap(), vec!["username".to_string()]);
    }

    #[test]
    fn test_remove_slot() {
        let db = setup_db();

        db.set_slot("isLoggedIn", "true").unwrap();
        assert!(db.remove_slot("isLoggedIn").unwrap());
        assert!(!db.remove_slot("isLoggedIn").unwrap());
        assert_eq!(db.get_slot("isLoggedIn").unwrap(), None);
    }

    #[test]
    fn test_list_slots_sorted() {
        let db = setup_db();

        db.set_slot("students", "[]").unwrap();
        db.set_slot("password", "x").unwrap();
        db.set_slot("username", "y").unwrap();

        assert_eq!(
            db.list_slots().unwrap(),
            vec!["password", "students", "username"]
        );
    }
}
