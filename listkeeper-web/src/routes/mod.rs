/// Request handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login and logout
/// - `lists`: Creating and listing todo lists
/// - `items`: A single list page, adding items and saving completion

pub mod auth;
pub mod health;
pub mod items;
pub mod lists;
