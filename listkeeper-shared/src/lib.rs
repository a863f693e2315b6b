//! # Listkeeper Shared Library
//!
//! This crate contains the storage layer and authentication primitives used
//! by the Listkeeper web server.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, the credential store and signed session tokens
//! - `db`: SQLite connection pool and embedded migrations
//! - `models`: The ownership graph (users, todo lists, items)

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Listkeeper shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
