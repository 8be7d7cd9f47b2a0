//! Authentication module
//!
//! Validates employee credentials and issues signed, time-bounded access
//! tokens.

mod jwt;
mod password;
mod service;

pub use jwt::{create_token, decode_token, Claims, TokenResponse};
pub use password::{hash_password, verify_password};
pub use service::login;
