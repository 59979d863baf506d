//! Single-slot persistence for the user record.
//!
//! The record lives under one fixed key in a small key-value table; saving
//! replaces the whole serialized record, loading deserializes it or yields
//! nothing, and logout deletes the row.

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

use crate::user::User;

pub const USER_KEY: &str = "tradepro_user";

pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    pub fn new(path: &str) -> Result<Self> {
        Ok(Self { conn: Connection::open(path)? })
    }

    pub fn init(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "BEGIN;
            CREATE TABLE IF NOT EXISTS session (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            COMMIT;",
        )?;
        Ok(())
    }

    /// Serialize and store the record, replacing whatever was there.
    pub fn save_user(&mut self, user: &User) -> Result<()> {
        let value = serde_json::to_string(user)?;
        self.conn.execute(
            "INSERT INTO session (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![USER_KEY, value],
        )?;
        Ok(())
    }

    /// Load the persisted record, if any. A corrupt row is an error, not
    /// a silent miss.
    pub fn load_user(&self) -> Result<Option<User>> {
        let row: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM session WHERE key = ?1",
                params![USER_KEY],
                |row| row.get(0),
            )
            .optional()?;
        match row {
            Some(value) => Ok(Some(serde_json::from_str(&value)?)),
            None => Ok(None),
        }
    }

    pub fn clear_user(&mut self) -> Result<()> {
        self.conn
            .execute("DELETE FROM session WHERE key = ?1", params![USER_KEY])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::User;

    fn open_store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("academy.sqlite");
        let mut store = SessionStore::new(path.to_str().unwrap()).unwrap();
        store.init().unwrap();
        (dir, store)
    }

    fn sample_user() -> User {
        let mut user = User::new(
            "u-1".to_string(),
            "ada@example.com".to_string(),
            "Ada".to_string(),
            "2026-08-23T00:00:00.000Z".to_string(),
        );
        user.has_passed = true;
        user.credits = 10_000;
        user.courses_completed.push("Trading Fundamentals".to_string());
        user
    }

    #[test]
    fn test_empty_store_loads_nothing() {
        let (_dir, store) = open_store();
        assert!(store.load_user().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let (_dir, mut store) = open_store();
        let user = sample_user();
        store.save_user(&user).unwrap();
        let loaded = store.load_user().unwrap().unwrap();
        assert_eq!(loaded, user);
    }

    #[test]
    fn test_save_replaces_previous_record() {
        let (_dir, mut store) = open_store();
        let mut user = sample_user();
        store.save_user(&user).unwrap();
        user.test_attempts = 3;
        store.save_user(&user).unwrap();
        let loaded = store.load_user().unwrap().unwrap();
        assert_eq!(loaded.test_attempts, 3);
    }

    #[test]
    fn test_clear_removes_record() {
        let (_dir, mut store) = open_store();
        store.save_user(&sample_user()).unwrap();
        store.clear_user().unwrap();
        assert!(store.load_user().unwrap().is_none());
    }

    #[test]
    fn test_init_is_idempotent() {
        let (_dir, mut store) = open_store();
        store.init().unwrap();
        store.init().unwrap();
    }
}
