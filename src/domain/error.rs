use thiserror::Error;

/// Failures raised by entities and by the collaborators behind the domain
/// traits. Component errors (`AuthError`, `DataError`, ...) wrap these.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Key store I/O
    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    /// Dataset file missing or not valid JSON
    #[error("Data source error: {message}")]
    DataSource { message: String },
}

macro_rules! constructor {
    ($name:ident, $variant:ident) => {
        pub fn $name(message: impl Into<String>) -> Self {
            Self::$variant {
                message: message.into(),
            }
        }
    };
}

impl DomainError {
    constructor!(validation, Validation);
    constructor!(configuration, Configuration);
    constructor!(conflict, Conflict);
    constructor!(storage, Storage);
    constructor!(cache, Cache);
    constructor!(data_source, DataSource);
}
