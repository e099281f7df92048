/// Argon2 password hashing and verification
pub mod password;

/// In-memory session tokens
pub mod session;

pub use password::{hash_password, verify_password};
pub use session::{Session, SessionStore};
