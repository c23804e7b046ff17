//! API Key domain
//!
//! Domain types and the key store contract used to authenticate callers and
//! track their remaining quota.

mod entity;
mod error;
mod repository;

pub use entity::ApiKey;
pub use error::{AuthError, PersistenceError};
pub use repository::KeyStore;

#[cfg(test)]
pub use repository::mock::MockKeyStore;
