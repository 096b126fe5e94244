/// JSON file persistence for the inventory collection.
pub mod json_file;
pub use json_file::{DataFile, SaveError};
