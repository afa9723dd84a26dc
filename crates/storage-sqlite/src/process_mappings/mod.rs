//! SQLite storage implementation for process mappings.

mod model;
mod repository;

pub use model::{NewProcessMappingDB, ProcessMappingDB};
pub use repository::ProcessMappingRepository;
