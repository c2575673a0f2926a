//! Recording storage adapters

mod client;
mod local;

pub use client::{Credentials, StorageClient};
pub use local::LocalArtifactStore;
