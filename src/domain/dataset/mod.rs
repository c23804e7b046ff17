//! Dataset domain - the document guarded by the gateway and where it comes from

mod entity;
mod error;
mod source;

pub use entity::Dataset;
pub use error::DataError;
pub use source::DataSource;

#[cfg(test)]
pub use source::MockDataSource;
