use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Request para crear una factura.
// `total_amount` acepta número o texto; se valida como decimal positivo.
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    pub service_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub vehicle_id: Option<i64>,
    pub total_amount: Option<Value>,
    pub payment_status: Option<String>,
}

impl CreateInvoiceRequest {
    /// Representación textual del importe recibido
    pub fn raw_amount(&self) -> String {
        match &self.total_amount {
            Some(Value::String(raw)) => raw.clone(),
            Some(Value::Number(number)) => number.to_string(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateInvoiceRequest {
    pub payment_status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvoiceCreatedResponse {
    pub invoice_id: i64,
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_amount_accepts_numbers_and_strings() {
        let request: CreateInvoiceRequest =
            serde_json::from_str(r#"{"service_id": 1, "total_amount": 99.5}"#).unwrap();
        assert_eq!(request.raw_amount(), "99.5");

        let request: CreateInvoiceRequest =
            serde_json::from_str(r#"{"service_id": 1, "total_amount": "120.00"}"#).unwrap();
        assert_eq!(request.raw_amount(), "120.00");

        let request: CreateInvoiceRequest = serde_json::from_str(r#"{"service_id": 1}"#).unwrap();
        assert_eq!(request.raw_amount(), "");
    }
}
