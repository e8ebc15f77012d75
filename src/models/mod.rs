//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL del taller.

pub mod customer;
pub mod invoice;
pub mod mechanic;
pub mod service_request;
pub mod user;
pub mod vehicle;
