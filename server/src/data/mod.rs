//! Data storage layer
//!
//! - `traits` - `ChatStore`, the storage interface handlers depend on
//! - `memory` - In-process backend
//! - `error` - Store error type

pub mod error;
pub mod memory;
pub mod traits;

pub use error::DataError;
pub use memory::InMemoryChatStore;
pub use traits::ChatStore;
