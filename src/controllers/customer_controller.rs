use std::sync::Arc;

use crate::dto::api_response::ApiResponse;
use crate::dto::customer_dto::{CreateCustomerRequest, CustomerSummary, UpdateCustomerRequest};
use crate::models::customer::{Customer, NewCustomer};
use crate::repositories::store::GarageStore;
use crate::utils::errors::{conflict_on_integrity, not_found_error, AppError};

const DUPLICATE_PHONE: &str = "Customer with this phone number already exists";
const HAS_VEHICLES: &str = "Cannot delete customer because vehicles are associated with this customer";

pub struct CustomerController {
    store: Arc<dyn GarageStore>,
}

impl CustomerController {
    pub fn new(store: Arc<dyn GarageStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<ApiResponse<Vec<CustomerSummary>>, AppError> {
        let customers = self.list_full().await?;
        Ok(ApiResponse::success_with_message(
            customers.into_iter().map(CustomerSummary::from).collect(),
            "Customers fetched successfully",
        ))
    }

    pub async fn list_full(&self) -> Result<Vec<Customer>, AppError> {
        let mut tx = self.store.begin().await?;
        let customers = tx.list_customers().await?;
        Ok(customers)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Customer, AppError> {
        let mut tx = self.store.begin().await?;
        let customer = tx.find_customer(id).await?;
        customer.ok_or_else(|| not_found_error("Customer"))
    }

    pub async fn create(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<ApiResponse<CustomerSummary>, AppError> {
        let customer = self.insert(request.into_new_customer()?).await?;
        Ok(ApiResponse::success_with_message(
            CustomerSummary::from(customer),
            "Customer created successfully",
        ))
    }

    pub async fn insert(&self, new_customer: NewCustomer) -> Result<Customer, AppError> {
        let mut tx = self.store.begin().await?;

        if tx.find_customer_by_phone(&new_customer.phone).await?.is_some() {
            return Err(AppError::Conflict(DUPLICATE_PHONE.to_string()));
        }

        let customer = tx
            .insert_customer(new_customer)
            .await
            .map_err(conflict_on_integrity(DUPLICATE_PHONE))?;
        tx.commit().await.map_err(conflict_on_integrity(DUPLICATE_PHONE))?;

        log::info!("👤 Cliente {} creado", customer.id);
        Ok(customer)
    }

    pub async fn update(&self, id: i64, request: UpdateCustomerRequest) -> Result<ApiResponse<()>, AppError> {
        let mut tx = self.store.begin().await?;
        let mut customer = tx
            .find_customer(id)
            .await?
            .ok_or_else(|| not_found_error("Customer"))?;

        if let Some(name) = request.name {
            customer.name = name;
        }
        if let Some(phone) = request.phone {
            customer.phone = phone;
        }
        if request.email.is_some() {
            customer.email = request.email;
        }
        if request.address.is_some() {
            customer.address = request.address;
        }

        tx.update_customer(&customer)
            .await
            .map_err(conflict_on_integrity(DUPLICATE_PHONE))?;
        tx.commit().await.map_err(conflict_on_integrity(DUPLICATE_PHONE))?;

        Ok(ApiResponse::message("Customer updated"))
    }

    /// Un cliente con vehículos no se borra
    pub async fn delete(&self, id: i64) -> Result<ApiResponse<()>, AppError> {
        let mut tx = self.store.begin().await?;
        if tx.find_customer(id).await?.is_none() {
            return Err(not_found_error("Customer"));
        }
        if tx.customer_has_vehicles(id).await? {
            return Err(AppError::Conflict(HAS_VEHICLES.to_string()));
        }

        tx.delete_customer(id).await.map_err(conflict_on_integrity(HAS_VEHICLES))?;
        tx.commit().await.map_err(conflict_on_integrity(HAS_VEHICLES))?;

        log::info!("🗑️ Cliente {} eliminado", id);
        Ok(ApiResponse::message("Customer deleted"))
    }
}
