//! Vector store access.
//!
//! Thin wrapper over Qdrant plus the [`VectorDbClient`] trait that the cache
//! and retrieval layers are generic over. Both collections (cache records and
//! document chunks) use cosine distance; Qdrant reports a similarity score
//! directly, so no distance-to-similarity conversion happens in this crate.

pub mod client;
pub mod error;
pub mod model;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use client::{QdrantVectorDb, VectorDbClient};
pub use error::VectorDbError;
pub use model::{Payload, SearchResult, VectorPoint};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockVectorDb;
