//! API Key infrastructure implementations
//!
//! Key stores, key generation, admission and issuance.

mod auth_gate;
mod factory;
mod generator;
mod issuer;
mod mongo;
mod repository;

pub use auth_gate::AuthGate;
pub use factory::{KeyStoreFactory, KeyStoreType};
pub use generator::ApiKeyGenerator;
pub use issuer::KeyIssuer;
pub use mongo::{MongoKeyStore, MongoKeyStoreConfig};
pub use repository::InMemoryKeyStore;
