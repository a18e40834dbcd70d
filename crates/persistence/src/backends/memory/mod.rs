//! In-memory backend.
//!
//! Used by the test suites and for local runs without a cluster
//! (`SIFT_BACKEND=memory`). Nothing is persisted across restarts.

mod backend;
mod search;

pub use backend::MemoryBackend;
