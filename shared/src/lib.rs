//! Authgate Shared Library
//!
//! Wire types exchanged between the authentication service and its
//! clients: request/response bodies, the error envelope, and input
//! validation.

pub mod errors;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
pub use validation::validate_credentials;
