//! Counting test doubles for the credential store and password hasher

use crate::auth::{PasswordError, PasswordHasher};
use crate::repositories::{CredentialStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory store that counts calls and can simulate an outage
#[derive(Default)]
pub struct CountingStore {
    users: Mutex<HashMap<String, String>>,
    get_calls: AtomicUsize,
    create_calls: AtomicUsize,
    unavailable: AtomicBool,
    write_delay: Mutex<Option<Duration>>,
}

impl CountingStore {
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn stored_hash(&self, username: &str) -> Option<String> {
        self.users.lock().unwrap().get(username).cloned()
    }

    pub fn insert(&self, username: &str, hash: &str) {
        self.users
            .lock()
            .unwrap()
            .insert(username.to_string(), hash.to_string());
    }

    pub fn fail_backend(&self) {
        self.unavailable.store(true, Ordering::SeqCst);
    }

    /// Make every `create` sleep before writing
    pub fn delay_writes(&self, delay: Duration) {
        *self.write_delay.lock().unwrap() = Some(delay);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Backend(anyhow::anyhow!("connection refused")));
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for CountingStore {
    async fn get_by_username(&self, username: &str) -> Result<Option<String>, StoreError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.stored_hash(username))
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<(), StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let delay = *self.write_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut users = self.users.lock().unwrap();
        if users.contains_key(username) {
            return Err(StoreError::Duplicate);
        }
        users.insert(username.to_string(), password_hash.to_string());
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}

/// Reversible "hash" that counts calls
#[derive(Default)]
pub struct CountingHasher {
    hash_calls: AtomicUsize,
    compare_calls: AtomicUsize,
    failing: AtomicBool,
}

impl CountingHasher {
    const PREFIX: &'static str = "hashed:";

    pub fn hash_calls(&self) -> usize {
        self.hash_calls.load(Ordering::SeqCst)
    }

    pub fn compare_calls(&self) -> usize {
        self.compare_calls.load(Ordering::SeqCst)
    }

    pub fn fail_hashing(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

impl PasswordHasher for CountingHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        self.hash_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(PasswordError::Hashing("simulated failure".to_string()));
        }
        Ok(format!("{}{}", Self::PREFIX, password))
    }

    fn compare(&self, hash: &str, password: &str) -> Result<(), PasswordError> {
        self.compare_calls.fetch_add(1, Ordering::SeqCst);
        let expected = hash
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| PasswordError::InvalidHash("missing prefix".to_string()))?;
        if expected == password {
            Ok(())
        } else {
            Err(PasswordError::Mismatch)
        }
    }
}
