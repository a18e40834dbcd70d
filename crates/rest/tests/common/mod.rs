//! Common test utilities for REST API testing.
//!
//! - [`harness`] - test server over the in-memory backend
//! - [`fixtures`] - test documents
//! - [`assertions`] - HTTP response assertions

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
pub mod harness;
