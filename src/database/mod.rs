//! Módulo de base de datos
//!
//! Maneja la conexión con PostgreSQL o el almacenamiento en memoria

pub mod connection;

pub use connection::connect_store;
