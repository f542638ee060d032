//! Object storage adapter and image pipeline.
//!
//! [`ObjectStore`] is a thin wrapper over an S3-compatible bucket; the
//! [`image` module](crate::image) turns property uploads into fixed size
//! variants before they are stored.

pub mod image;
pub mod store;

pub use store::{ObjectStore, StorageError};
