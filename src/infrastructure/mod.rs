//! Infrastructure layer: I/O implementations
//!
//! This layer implements the I/O boundary traits used while casting values.

pub mod traits;

pub use traits::{FileSystem, RealFileSystem};
