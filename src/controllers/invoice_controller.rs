use std::sync::Arc;

use crate::dto::api_response::ApiResponse;
use crate::dto::invoice_dto::{CreateInvoiceRequest, InvoiceCreatedResponse, UpdateInvoiceRequest};
use crate::models::invoice::{Invoice, NewInvoice, PAYMENT_PAID, PAYMENT_PENDING};
use crate::repositories::store::GarageStore;
use crate::utils::errors::{conflict_on_integrity, not_found_error, AppError};
use crate::utils::validation::parse_positive_amount;

const DUPLICATE_INVOICE: &str = "Invoice already exists for this service";

pub struct InvoiceController {
    store: Arc<dyn GarageStore>,
}

fn validate_payment_status(status: &str) -> Result<(), AppError> {
    if status == PAYMENT_PENDING || status == PAYMENT_PAID {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid payment status".to_string()))
    }
}

impl InvoiceController {
    pub fn new(store: Arc<dyn GarageStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        request: CreateInvoiceRequest,
    ) -> Result<ApiResponse<InvoiceCreatedResponse>, AppError> {
        let mut tx = self.store.begin().await?;

        // Una factura por orden
        if let Some(service_id) = request.service_id {
            if let Some(existing) = tx.find_invoice_by_service(service_id).await? {
                log::warn!("⚠️ La orden {} ya tiene la factura {}", service_id, existing.id);
                return Err(AppError::Conflict(DUPLICATE_INVOICE.to_string()));
            }
        }

        let total_amount = parse_positive_amount(&request.raw_amount())?;

        let (service_id, customer_id, vehicle_id) =
            match (request.service_id, request.customer_id, request.vehicle_id) {
                (Some(s), Some(c), Some(v)) => (s, c, v),
                _ => return Err(AppError::BadRequest("Missing required invoice fields".to_string())),
            };

        let payment_status = request
            .payment_status
            .unwrap_or_else(|| PAYMENT_PENDING.to_string());
        validate_payment_status(&payment_status)?;

        if tx.find_service(service_id).await?.is_none() {
            return Err(not_found_error("Service request"));
        }
        if tx.find_customer(customer_id).await?.is_none() {
            return Err(not_found_error("Customer"));
        }
        if tx.find_vehicle(vehicle_id).await?.is_none() {
            return Err(not_found_error("Vehicle"));
        }

        let invoice = tx
            .insert_invoice(NewInvoice {
                service_id,
                customer_id,
                vehicle_id,
                total_amount,
                payment_status,
            })
            .await
            .map_err(conflict_on_integrity(DUPLICATE_INVOICE))?;
        tx.commit().await.map_err(conflict_on_integrity(DUPLICATE_INVOICE))?;

        log::info!("🧾 Factura {} creada para la orden {}", invoice.id, invoice.service_id);
        Ok(ApiResponse::success_with_message(
            InvoiceCreatedResponse {
                invoice_id: invoice.id,
                amount: invoice.total_amount,
            },
            "Invoice created successfully",
        ))
    }

    pub async fn list(&self) -> Result<Vec<Invoice>, AppError> {
        let mut tx = self.store.begin().await?;
        let invoices = tx.list_invoices().await?;
        Ok(invoices)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Invoice, AppError> {
        let mut tx = self.store.begin().await?;
        let invoice = tx.find_invoice(id).await?;
        invoice.ok_or_else(|| not_found_error("Invoice"))
    }

    pub async fn update(&self, id: i64, request: UpdateInvoiceRequest) -> Result<ApiResponse<()>, AppError> {
        let mut tx = self.store.begin().await?;
        let invoice = tx
            .find_invoice(id)
            .await?
            .ok_or_else(|| not_found_error("Invoice"))?;

        let payment_status = request.payment_status.unwrap_or(invoice.payment_status);
        validate_payment_status(&payment_status)?;

        tx.update_invoice_payment_status(id, &payment_status).await?;
        tx.commit().await?;

        Ok(ApiResponse::message("Invoice updated successfully"))
    }

    pub async fn delete(&self, id: i64) -> Result<ApiResponse<()>, AppError> {
        let mut tx = self.store.begin().await?;
        if tx.find_invoice(id).await?.is_none() {
            return Err(not_found_error("Invoice"));
        }
        tx.delete_invoice(id).await?;
        tx.commit().await?;

        log::info!("🗑️ Factura {} eliminada", id);
        Ok(ApiResponse::message("Invoice deleted successfully"))
    }
}
