//! Credential persistence
//!
//! Provides the [`CredentialStore`] capability and its SQLite backing.

pub mod credentials;

pub use credentials::{CredentialStore, SqliteCredentialStore, StoreError};
