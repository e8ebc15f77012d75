//! Modelo de Invoice
//!
//! Una factura referencia la orden de servicio, el cliente y el vehículo.
//! Las tres claves foráneas son RESTRICT: mientras exista la factura, la orden
//! no puede borrarse.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const PAYMENT_PENDING: &str = "Pending";
pub const PAYMENT_PAID: &str = "Paid";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub id: i64,
    pub service_id: i64,
    pub customer_id: i64,
    pub vehicle_id: i64,
    pub total_amount: Decimal,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub service_id: i64,
    pub customer_id: i64,
    pub vehicle_id: i64,
    pub total_amount: Decimal,
    pub payment_status: String,
}
