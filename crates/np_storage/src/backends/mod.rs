pub mod json_file;
pub mod memory;

pub use json_file::{JsonFileStore, StagedSnapshot};
pub use memory::InMemoryStore;
