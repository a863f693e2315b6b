/// Middleware modules for the web server
///
/// - Security headers and cache control on every response

pub mod security;
