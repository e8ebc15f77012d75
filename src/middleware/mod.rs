//! Middleware del sistema
//!
//! Autenticación por sesión, política de roles y CORS.

pub mod auth;
pub mod cors;

pub use auth::*;
pub use cors::*;
