use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::customer::{Customer, NewCustomer};
use crate::utils::errors::{AppError, AppResult};

// Request para crear un cliente
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(required, length(min = 1, max = 20))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
}

impl CreateCustomerRequest {
    pub fn into_new_customer(self) -> AppResult<NewCustomer> {
        let missing = || AppError::BadRequest("Missing required fields: name, phone".to_string());
        self.validate().map_err(|_| missing())?;

        Ok(NewCustomer {
            name: self.name.ok_or_else(missing)?,
            phone: self.phone.ok_or_else(missing)?,
            email: self.email,
            address: self.address,
        })
    }
}

// Request para actualizar un cliente
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

// Resumen de cliente (listados y alta)
#[derive(Debug, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub id: i64,
    pub name: String,
    pub phone: String,
}

impl From<Customer> for CustomerSummary {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            phone: customer.phone,
        }
    }
}
