//! # Listkeeper Web Server Library
//!
//! This library provides the HTTP side of Listkeeper: a small server-rendered
//! to-do list application.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder and the session gate
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `forms`: Form payloads and their validation rules
//! - `middleware`: Response hardening
//! - `routes`: Request handlers
//! - `session`: Cookie-backed session extractor
//! - `views`: HTML rendering

pub mod app;
pub mod config;
pub mod error;
pub mod forms;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod views;
