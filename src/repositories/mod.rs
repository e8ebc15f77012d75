//! Repositorios
//!
//! `store` define el contrato transaccional; `postgres` y `memory` son sus
//! dos implementaciones.

pub mod memory;
pub mod postgres;
pub mod store;

pub use store::{GarageStore, StoreTx};
