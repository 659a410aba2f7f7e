pub mod error;
pub mod redb_store;
pub mod traits;

pub use error::KVError;
pub use redb_store::RedbStore;
pub use traits::KVStore;
