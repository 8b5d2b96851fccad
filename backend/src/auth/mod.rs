//! Authentication module
//!
//! Provides HS256 bearer tokens, pluggable password hashing, and the
//! middleware that guards protected routes.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, TokenError, TokenService, TOKEN_ALGORITHM};
pub use middleware::{require_auth, AuthUser, TokenState};
pub use password::{hasher_from_config, Argon2Hasher, BcryptHasher, PasswordError, PasswordHasher};
