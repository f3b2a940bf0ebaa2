use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use async_trait::async_trait;

use super::repo::{StoreError, UserStore};
use super::repo_types::{NewUser, User};

/// In-memory `UserStore` with the same uniqueness rules as the `users` table.
#[derive(Default)]
pub struct MemoryUserStore {
    rows: Mutex<Vec<User>>,
    // Lookups miss, so only the insert-time constraint guards uniqueness.
    stale_reads: AtomicBool,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_stale_reads(&self, on: bool) {
        self.stale_reads.store(on, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Vec<User> {
        self.rows.lock().unwrap().clone()
    }

    fn find(&self, pred: impl Fn(&User) -> bool) -> Option<User> {
        if self.stale_reads.load(Ordering::SeqCst) {
            return None;
        }
        self.rows.lock().unwrap().iter().find(|u| pred(u)).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        Ok(self.find(|u| u.name == name))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.find(|u| u.email == email))
    }

    async fn insert(&self, new: NewUser<'_>) -> Result<User, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.name == new.name) {
            return Err(StoreError::NameTaken);
        }
        if rows.iter().any(|u| u.email == new.email) {
            return Err(StoreError::EmailTaken);
        }
        let user = User {
            id: rows.len() as i32 + 1,
            name: new.name.to_string(),
            email: new.email.to_string(),
            password: new.password_hash.to_string(),
            profile_picture: new.profile_picture.map(str::to_string),
        };
        rows.push(user.clone());
        Ok(user)
    }

    async fn update_password(&self, email: &str, password_hash: &str) -> Result<u64, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let mut touched = 0;
        for u in rows.iter_mut().filter(|u| u.email == email) {
            u.password = password_hash.to_string();
            touched += 1;
        }
        Ok(touched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user<'a>(name: &'a str, email: &'a str) -> NewUser<'a> {
        NewUser {
            name,
            email,
            password_hash: "hash",
            profile_picture: None,
        }
    }

    #[tokio::test]
    async fn insert_enforces_unique_name_and_email() {
        let store = MemoryUserStore::new();
        let alice = store.insert(new_user("alice", "a@x.io")).await.unwrap();
        assert_eq!(alice.id, 1);

        let err = store.insert(new_user("alice", "other@x.io")).await.unwrap_err();
        assert!(matches!(err, StoreError::NameTaken));
        let err = store.insert(new_user("bob", "a@x.io")).await.unwrap_err();
        assert!(matches!(err, StoreError::EmailTaken));
    }

    #[tokio::test]
    async fn update_password_reports_rows_touched() {
        let store = MemoryUserStore::new();
        store.insert(new_user("alice", "a@x.io")).await.unwrap();
        assert_eq!(store.update_password("a@x.io", "h2").await.unwrap(), 1);
        assert_eq!(store.update_password("nobody@x.io", "h3").await.unwrap(), 0);
        let found = store.find_by_name("alice").await.unwrap().unwrap();
        assert_eq!(found.password, "h2");
    }
}
