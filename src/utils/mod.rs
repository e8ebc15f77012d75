//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! JWT de sesión y extracción de JSON.

pub mod errors;
pub mod json;
pub mod jwt;
pub mod validation;
