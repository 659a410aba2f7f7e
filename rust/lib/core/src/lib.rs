pub mod config;
pub mod error;
pub mod module;

pub use config::{ServiceConfig, StorageBackend};
pub use error::{ServiceError, StatusCategory};
pub use module::Module;
