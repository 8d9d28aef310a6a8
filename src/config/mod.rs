//! Configuration for file-backed preference stores
//!
//! - `FileStoreConfig` - Where a [`FileStore`](crate::FileStore) keeps its data and in which format
//! - `FileStoreConfigBuilder` - Fluent builder with system config directory defaults

mod types;

pub use types::{FileStoreConfig, FileStoreConfigBuilder};
