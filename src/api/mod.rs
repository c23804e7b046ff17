//! API layer - HTTP endpoints and middleware

pub mod data;
pub mod health;
pub mod key_issuer;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;

pub use router::create_router;
pub use state::AppState;
