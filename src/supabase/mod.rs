//! Remote backend client
//!
//! Thin HTTP client for the Supabase-style backend: a PostgREST relational
//! API under `/rest/v1` and an object-storage API under `/storage/v1`. All
//! persistence lives on the other side of this module; nothing is cached or
//! retried here, and timeout behavior is whatever the HTTP client and the
//! backend default to.

pub mod client;
pub mod error;
pub mod storage;

pub use client::{Supabase, TableQuery};
pub use error::SupabaseError;
pub use storage::{ObjectStore, StorageClient};
