//! Contrato de persistencia
//!
//! Toda operación de escritura ocurre dentro de un `StoreTx`. Si la
//! transacción se descarta sin `commit`, ninguna de sus escrituras persiste:
//! las mutaciones de orden + disponibilidad del mecánico son atómicas.
//!
//! Las violaciones de restricciones (unique, foreign key, check) se reportan
//! como `AppError::Integrity` con el nombre de la restricción.

use async_trait::async_trait;

use crate::models::customer::{Customer, NewCustomer};
use crate::models::invoice::{Invoice, NewInvoice};
use crate::models::mechanic::{Mechanic, NewMechanic};
use crate::models::service_request::{NewServiceRequest, ServiceRequest};
use crate::models::user::{NewUser, User};
use crate::models::vehicle::{NewVehicle, Vehicle};
use crate::utils::errors::AppResult;

/// Nombres de restricciones compartidos por ambos backends
pub mod constraints {
    pub const CUSTOMER_PHONE: &str = "customers_phone_key";
    pub const VEHICLE_NUMBER: &str = "vehicles_vehicle_number_key";
    pub const VEHICLE_CUSTOMER: &str = "vehicles_customer_id_fkey";
    pub const MECHANIC_PHONE: &str = "mechanics_phone_key";
    pub const SERVICE_VEHICLE: &str = "service_requests_vehicle_id_fkey";
    pub const SERVICE_MECHANIC: &str = "service_requests_assigned_mechanic_id_fkey";
    pub const INVOICE_SERVICE: &str = "invoices_service_id_fkey";
    pub const INVOICE_CUSTOMER: &str = "invoices_customer_id_fkey";
    pub const INVOICE_VEHICLE: &str = "invoices_vehicle_id_fkey";
    pub const INVOICE_SERVICE_UNIQUE: &str = "invoices_service_id_key";
    pub const INVOICE_AMOUNT: &str = "check_invoice_amount";
    pub const USER_EMAIL: &str = "users_email_key";
}

/// Fuente de transacciones
#[async_trait]
pub trait GarageStore: Send + Sync {
    async fn begin(&self) -> AppResult<Box<dyn StoreTx>>;
}

/// Una transacción abierta sobre el almacenamiento del taller
#[async_trait]
pub trait StoreTx: Send {
    // Customers
    async fn list_customers(&mut self) -> AppResult<Vec<Customer>>;
    async fn find_customer(&mut self, id: i64) -> AppResult<Option<Customer>>;
    async fn find_customer_by_phone(&mut self, phone: &str) -> AppResult<Option<Customer>>;
    async fn insert_customer(&mut self, customer: NewCustomer) -> AppResult<Customer>;
    async fn update_customer(&mut self, customer: &Customer) -> AppResult<()>;
    async fn delete_customer(&mut self, id: i64) -> AppResult<()>;
    async fn customer_has_vehicles(&mut self, id: i64) -> AppResult<bool>;

    // Vehicles
    async fn list_vehicles(&mut self) -> AppResult<Vec<Vehicle>>;
    async fn find_vehicle(&mut self, id: i64) -> AppResult<Option<Vehicle>>;
    async fn find_vehicle_by_number(&mut self, vehicle_number: &str) -> AppResult<Option<Vehicle>>;
    async fn insert_vehicle(&mut self, vehicle: NewVehicle) -> AppResult<Vehicle>;
    async fn update_vehicle(&mut self, vehicle: &Vehicle) -> AppResult<()>;
    async fn delete_vehicle(&mut self, id: i64) -> AppResult<()>;

    // Mechanics
    async fn list_mechanics(&mut self) -> AppResult<Vec<Mechanic>>;
    async fn find_mechanic(&mut self, id: i64) -> AppResult<Option<Mechanic>>;
    /// Igual que `find_mechanic`, pero bloquea la fila hasta el fin de la transacción
    async fn lock_mechanic(&mut self, id: i64) -> AppResult<Option<Mechanic>>;
    async fn find_mechanic_by_phone(&mut self, phone: &str) -> AppResult<Option<Mechanic>>;
    async fn insert_mechanic(&mut self, mechanic: NewMechanic) -> AppResult<Mechanic>;
    async fn update_mechanic(&mut self, mechanic: &Mechanic) -> AppResult<()>;
    async fn set_mechanic_availability(&mut self, id: i64, is_available: bool) -> AppResult<()>;
    async fn delete_mechanic(&mut self, id: i64) -> AppResult<()>;

    // Service requests
    async fn list_services(&mut self) -> AppResult<Vec<ServiceRequest>>;
    async fn find_service(&mut self, id: i64) -> AppResult<Option<ServiceRequest>>;
    /// Inserta la orden en estado `Pending`
    async fn insert_service(&mut self, service: NewServiceRequest) -> AppResult<ServiceRequest>;
    /// Persiste descripción, estado y mecánico asignado
    async fn update_service(&mut self, service: &ServiceRequest) -> AppResult<()>;
    async fn delete_service(&mut self, id: i64) -> AppResult<()>;

    // Invoices
    async fn list_invoices(&mut self) -> AppResult<Vec<Invoice>>;
    async fn find_invoice(&mut self, id: i64) -> AppResult<Option<Invoice>>;
    async fn find_invoice_by_service(&mut self, service_id: i64) -> AppResult<Option<Invoice>>;
    async fn insert_invoice(&mut self, invoice: NewInvoice) -> AppResult<Invoice>;
    async fn update_invoice_payment_status(&mut self, id: i64, payment_status: &str) -> AppResult<()>;
    async fn delete_invoice(&mut self, id: i64) -> AppResult<()>;

    // Users
    async fn find_user(&mut self, id: i64) -> AppResult<Option<User>>;
    async fn find_user_by_email(&mut self, email: &str) -> AppResult<Option<User>>;
    async fn find_user_by_username(&mut self, username: &str) -> AppResult<Option<User>>;
    async fn insert_user(&mut self, user: NewUser) -> AppResult<User>;

    async fn commit(self: Box<Self>) -> AppResult<()>;
}
