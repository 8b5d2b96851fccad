//! Input validation functions
//!
//! Uses the `validator` derive on the request types and flattens the
//! result into a single client-facing message.

use crate::types::CredentialsRequest;
use validator::Validate;

/// Message returned for any rejected credentials payload
pub const INVALID_CREDENTIALS_INPUT: &str = "Username and password are required";

/// Validate a credentials payload
///
/// Both fields must be non-empty. No other shape rules are imposed.
pub fn validate_credentials(req: &CredentialsRequest) -> Result<(), String> {
    req.validate()
        .map_err(|_| INVALID_CREDENTIALS_INPUT.to_string())
}
