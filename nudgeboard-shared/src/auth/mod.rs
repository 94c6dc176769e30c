/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT bearer token generation and validation
///
/// Passwords are hashed with Argon2id and never stored or logged in
/// plaintext. Bearer tokens are HS256 JWTs carrying the user's identity
/// (id, phone, admin flag) with a seven-day expiration.

pub mod jwt;
pub mod password;
