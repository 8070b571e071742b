pub mod image;
pub mod history;
pub mod event;
pub mod config;
pub mod error;


pub use error::{StorageError, StudioError};
pub type Result<T> = std::result::Result<T, StudioError>;
