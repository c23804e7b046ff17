//! Dataset infrastructure - file source and read-through serving

mod file_source;
mod service;

pub use file_source::FileDataSource;
pub use service::{DataService, DataServiceConfig};
