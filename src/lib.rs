//! Folio - a magazine publishing API
//!
//! All persistence, authentication primitives, and file storage are owned by
//! a remote Supabase-style backend; this crate is the HTTP contract in front
//! of it.

pub mod api;
pub mod config;
pub mod models;
pub mod repositories;
pub mod services;
pub mod session;
pub mod supabase;

#[cfg(test)]
pub mod test_support;
