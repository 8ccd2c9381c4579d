use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::{
    repo::{StoreError, UserStore},
    repo_types::{NewUser, User},
};

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    by_email: HashMap<String, Uuid>,
}

/// In-process store used by tests and local runs without Postgres.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_email
            .get(&email.to_lowercase())
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        // Check and insert under one write guard.
        let mut inner = self.inner.write().await;
        let key = user.email.to_lowercase();
        if inner.by_email.contains_key(&key) {
            return Err(StoreError::DuplicateEmail);
        }

        let now = OffsetDateTime::now_utc();
        let record = User {
            id: user.id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            work: user.work,
            created_at: now,
            updated_at: now,
        };
        inner.by_email.insert(key, record.id);
        inner.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.inner.read().await.users.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn candidate(email: &str) -> NewUser {
        NewUser {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: email.into(),
            password_hash: "$argon2id$fake".into(),
            work: "Engineer".into(),
        }
    }

    #[tokio::test]
    async fn insert_then_find_by_email_and_id() {
        let store = MemoryUserStore::new();
        let user = store.insert(candidate("ada@example.com")).await.unwrap();

        let by_email = store.find_by_email("ada@example.com").await.unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(user.id));

        let by_id = store.find_by_id(user.id).await.unwrap();
        assert_eq!(by_id.map(|u| u.email), Some("ada@example.com".to_string()));
        assert_eq!(user.created_at, user.updated_at);
    }

    #[tokio::test]
    async fn unknown_lookups_return_none() {
        let store = MemoryUserStore::new();
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
        assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryUserStore::new();
        store.insert(candidate("ada@example.com")).await.unwrap();

        let err = store.insert(candidate("ADA@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_admit_exactly_one() {
        let store = Arc::new(MemoryUserStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.insert(candidate("race@example.com")).await })
            })
            .collect();

        let mut ok = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(StoreError::DuplicateEmail) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
