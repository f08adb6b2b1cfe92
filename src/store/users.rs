//! User storage operations

use redb::ReadableTable;

use super::models::User;
use super::{MarketStore, StorageError, StorageResult, USERS_BY_EMAIL_TABLE, USERS_TABLE};

impl MarketStore {
    /// Insert a new user, enforcing email uniqueness atomically
    pub fn create_user(&self, user: &User) -> StorageResult<()> {
        let email_key = user.email.to_ascii_lowercase();
        let bytes = serde_json::to_vec(user)?;

        let txn = self.begin_write()?;
        {
            let mut email_table = txn.open_table(USERS_BY_EMAIL_TABLE)?;
            if email_table.get(email_key.as_str())?.is_some() {
                return Err(StorageError::Duplicate(format!(
                    "User already exists: {}",
                    user.email
                )));
            }
            email_table.insert(email_key.as_str(), user.id.as_str())?;

            let mut users = txn.open_table(USERS_TABLE)?;
            users.insert(user.id.as_str(), bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Look up a user by id
    pub fn get_user(&self, id: &str) -> StorageResult<Option<User>> {
        let txn = self.begin_read()?;
        let table = txn.open_table(USERS_TABLE)?;
        match table.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Look up a user by email (case-insensitive)
    pub fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let email_key = email.to_ascii_lowercase();
        let txn = self.begin_read()?;
        let email_table = txn.open_table(USERS_BY_EMAIL_TABLE)?;
        let Some(id_guard) = email_table.get(email_key.as_str())? else {
            return Ok(None);
        };
        let users = txn.open_table(USERS_TABLE)?;
        match users.get(id_guard.value())? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Overwrite an existing user record (email changes are not supported
    /// here; the email index is written only at creation)
    pub fn update_user(&self, user: &User) -> StorageResult<()> {
        let bytes = serde_json::to_vec(user)?;
        let txn = self.begin_write()?;
        {
            let mut users = txn.open_table(USERS_TABLE)?;
            users.insert(user.id.as_str(), bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Delete a user and their email index entry; returns whether a record
    /// existed
    pub fn delete_user(&self, id: &str) -> StorageResult<bool> {
        let txn = self.begin_write()?;
        let existed = {
            let mut users = txn.open_table(USERS_TABLE)?;
            let removed: Option<User> = match users.remove(id)? {
                Some(guard) => Some(serde_json::from_slice(guard.value())?),
                None => None,
            };
            if let Some(user) = &removed {
                let mut email_table = txn.open_table(USERS_BY_EMAIL_TABLE)?;
                email_table.remove(user.email.to_ascii_lowercase().as_str())?;
            }
            removed.is_some()
        };
        txn.commit()?;
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::now_millis;

    fn sample_user(id: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            first_name: "Test".into(),
            last_name: "User".into(),
            email: email.to_string(),
            age: 21,
            contact_number: "555-0100".into(),
            password_hash: Some("hash".into()),
            created_at: now_millis(),
        }
    }

    #[test]
    fn create_and_lookup_by_email() {
        let store = MarketStore::open_in_memory().unwrap();
        store.create_user(&sample_user("u1", "a@example.com")).unwrap();

        let found = store.find_user_by_email("A@Example.COM").unwrap().unwrap();
        assert_eq!(found.id, "u1");
        assert!(store.get_user("u1").unwrap().is_some());
        assert!(store.get_user("missing").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let store = MarketStore::open_in_memory().unwrap();
        store.create_user(&sample_user("u1", "a@example.com")).unwrap();
        let err = store
            .create_user(&sample_user("u2", "a@example.com"))
            .unwrap_err();
        assert!(matches!(err, StorageError::Duplicate(_)));
    }

    #[test]
    fn delete_frees_the_email() {
        let store = MarketStore::open_in_memory().unwrap();
        store.create_user(&sample_user("u1", "a@example.com")).unwrap();
        assert!(store.delete_user("u1").unwrap());
        assert!(!store.delete_user("u1").unwrap());
        assert!(store.find_user_by_email("a@example.com").unwrap().is_none());
        store.create_user(&sample_user("u2", "a@example.com")).unwrap();
    }
}
