//! Almacenamiento en memoria
//!
//! Emula el esquema PostgreSQL (unique, foreign keys con CASCADE/RESTRICT,
//! check de importe) para desarrollo local (`STORAGE_BACKEND=memory`) y tests.
//! Las transacciones son serializables: cada una toma el mutex, trabaja sobre
//! una copia de las tablas y solo la publica en `commit`.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::models::customer::{Customer, NewCustomer};
use crate::models::invoice::{Invoice, NewInvoice};
use crate::models::mechanic::{Mechanic, NewMechanic};
use crate::models::service_request::{NewServiceRequest, ServiceRequest, ServiceStatus};
use crate::models::user::{NewUser, User};
use crate::models::vehicle::{NewVehicle, Vehicle};
use crate::repositories::store::{constraints, GarageStore, StoreTx};
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
struct Tables {
    next_id: i64,
    customers: BTreeMap<i64, Customer>,
    vehicles: BTreeMap<i64, Vehicle>,
    mechanics: BTreeMap<i64, Mechanic>,
    services: BTreeMap<i64, ServiceRequest>,
    invoices: BTreeMap<i64, Invoice>,
    users: BTreeMap<i64, User>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn services_of_vehicles(&self, vehicle_ids: &[i64]) -> Vec<i64> {
        self.services
            .values()
            .filter(|s| vehicle_ids.contains(&s.vehicle_id))
            .map(|s| s.id)
            .collect()
    }

    /// RESTRICT de invoices sobre cualquiera de las filas que se borrarían
    fn ensure_no_invoices(&self, customer_id: Option<i64>, vehicle_ids: &[i64], service_ids: &[i64]) -> AppResult<()> {
        for invoice in self.invoices.values() {
            if customer_id == Some(invoice.customer_id) {
                return Err(violation(constraints::INVOICE_CUSTOMER));
            }
            if vehicle_ids.contains(&invoice.vehicle_id) {
                return Err(violation(constraints::INVOICE_VEHICLE));
            }
            if service_ids.contains(&invoice.service_id) {
                return Err(violation(constraints::INVOICE_SERVICE));
            }
        }
        Ok(())
    }
}

fn violation(constraint: &str) -> AppError {
    AppError::Integrity(constraint.to_string())
}

/// Almacenamiento en memoria compartido entre clones
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GarageStore for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTx>> {
        let guard = self.tables.clone().lock_owned().await;
        let working = (*guard).clone();
        Ok(Box::new(MemoryTx { guard, working }))
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn list_customers(&mut self) -> AppResult<Vec<Customer>> {
        Ok(self.working.customers.values().cloned().collect())
    }

    async fn find_customer(&mut self, id: i64) -> AppResult<Option<Customer>> {
        Ok(self.working.customers.get(&id).cloned())
    }

    async fn find_customer_by_phone(&mut self, phone: &str) -> AppResult<Option<Customer>> {
        Ok(self.working.customers.values().find(|c| c.phone == phone).cloned())
    }

    async fn insert_customer(&mut self, customer: NewCustomer) -> AppResult<Customer> {
        if self.working.customers.values().any(|c| c.phone == customer.phone) {
            return Err(violation(constraints::CUSTOMER_PHONE));
        }
        let row = Customer {
            id: self.working.next_id(),
            name: customer.name,
            phone: customer.phone,
            email: customer.email,
            address: customer.address,
            created_at: Utc::now(),
        };
        self.working.customers.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_customer(&mut self, customer: &Customer) -> AppResult<()> {
        if self
            .working
            .customers
            .values()
            .any(|c| c.id != customer.id && c.phone == customer.phone)
        {
            return Err(violation(constraints::CUSTOMER_PHONE));
        }
        if let Some(row) = self.working.customers.get_mut(&customer.id) {
            *row = customer.clone();
        }
        Ok(())
    }

    async fn delete_customer(&mut self, id: i64) -> AppResult<()> {
        let vehicle_ids: Vec<i64> = self
            .working
            .vehicles
            .values()
            .filter(|v| v.customer_id == id)
            .map(|v| v.id)
            .collect();
        let service_ids = self.working.services_of_vehicles(&vehicle_ids);
        self.working.ensure_no_invoices(Some(id), &vehicle_ids, &service_ids)?;

        for service_id in service_ids {
            self.working.services.remove(&service_id);
        }
        for vehicle_id in vehicle_ids {
            self.working.vehicles.remove(&vehicle_id);
        }
        self.working.customers.remove(&id);
        Ok(())
    }

    async fn customer_has_vehicles(&mut self, id: i64) -> AppResult<bool> {
        Ok(self.working.vehicles.values().any(|v| v.customer_id == id))
    }

    async fn list_vehicles(&mut self) -> AppResult<Vec<Vehicle>> {
        Ok(self.working.vehicles.values().cloned().collect())
    }

    async fn find_vehicle(&mut self, id: i64) -> AppResult<Option<Vehicle>> {
        Ok(self.working.vehicles.get(&id).cloned())
    }

    async fn find_vehicle_by_number(&mut self, vehicle_number: &str) -> AppResult<Option<Vehicle>> {
        Ok(self
            .working
            .vehicles
            .values()
            .find(|v| v.vehicle_number == vehicle_number)
            .cloned())
    }

    async fn insert_vehicle(&mut self, vehicle: NewVehicle) -> AppResult<Vehicle> {
        if !self.working.customers.contains_key(&vehicle.customer_id) {
            return Err(violation(constraints::VEHICLE_CUSTOMER));
        }
        if self
            .working
            .vehicles
            .values()
            .any(|v| v.vehicle_number == vehicle.vehicle_number)
        {
            return Err(violation(constraints::VEHICLE_NUMBER));
        }
        let row = Vehicle {
            id: self.working.next_id(),
            customer_id: vehicle.customer_id,
            vehicle_number: vehicle.vehicle_number,
            vehicle_type: vehicle.vehicle_type,
            brand: vehicle.brand,
            model: vehicle.model,
            created_at: Utc::now(),
        };
        self.working.vehicles.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_vehicle(&mut self, vehicle: &Vehicle) -> AppResult<()> {
        if !self.working.customers.contains_key(&vehicle.customer_id) {
            return Err(violation(constraints::VEHICLE_CUSTOMER));
        }
        if self
            .working
            .vehicles
            .values()
            .any(|v| v.id != vehicle.id && v.vehicle_number == vehicle.vehicle_number)
        {
            return Err(violation(constraints::VEHICLE_NUMBER));
        }
        if let Some(row) = self.working.vehicles.get_mut(&vehicle.id) {
            *row = vehicle.clone();
        }
        Ok(())
    }

    async fn delete_vehicle(&mut self, id: i64) -> AppResult<()> {
        let service_ids = self.working.services_of_vehicles(&[id]);
        self.working.ensure_no_invoices(None, &[id], &service_ids)?;

        for service_id in service_ids {
            self.working.services.remove(&service_id);
        }
        self.working.vehicles.remove(&id);
        Ok(())
    }

    async fn list_mechanics(&mut self) -> AppResult<Vec<Mechanic>> {
        Ok(self.working.mechanics.values().cloned().collect())
    }

    async fn find_mechanic(&mut self, id: i64) -> AppResult<Option<Mechanic>> {
        Ok(self.working.mechanics.get(&id).cloned())
    }

    async fn lock_mechanic(&mut self, id: i64) -> AppResult<Option<Mechanic>> {
        // la transacción ya es exclusiva
        self.find_mechanic(id).await
    }

    async fn find_mechanic_by_phone(&mut self, phone: &str) -> AppResult<Option<Mechanic>> {
        Ok(self.working.mechanics.values().find(|m| m.phone == phone).cloned())
    }

    async fn insert_mechanic(&mut self, mechanic: NewMechanic) -> AppResult<Mechanic> {
        if self.working.mechanics.values().any(|m| m.phone == mechanic.phone) {
            return Err(violation(constraints::MECHANIC_PHONE));
        }
        let row = Mechanic {
            id: self.working.next_id(),
            name: mechanic.name,
            phone: mechanic.phone,
            specialization: mechanic.specialization,
            is_available: mechanic.is_available,
            created_at: Utc::now(),
        };
        self.working.mechanics.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_mechanic(&mut self, mechanic: &Mechanic) -> AppResult<()> {
        if self
            .working
            .mechanics
            .values()
            .any(|m| m.id != mechanic.id && m.phone == mechanic.phone)
        {
            return Err(violation(constraints::MECHANIC_PHONE));
        }
        if let Some(row) = self.working.mechanics.get_mut(&mechanic.id) {
            *row = mechanic.clone();
        }
        Ok(())
    }

    async fn set_mechanic_availability(&mut self, id: i64, is_available: bool) -> AppResult<()> {
        if let Some(row) = self.working.mechanics.get_mut(&id) {
            row.is_available = is_available;
        }
        Ok(())
    }

    async fn delete_mechanic(&mut self, id: i64) -> AppResult<()> {
        if self
            .working
            .services
            .values()
            .any(|s| s.assigned_mechanic_id == Some(id))
        {
            return Err(violation(constraints::SERVICE_MECHANIC));
        }
        self.working.mechanics.remove(&id);
        Ok(())
    }

    async fn list_services(&mut self) -> AppResult<Vec<ServiceRequest>> {
        Ok(self.working.services.values().cloned().collect())
    }

    async fn find_service(&mut self, id: i64) -> AppResult<Option<ServiceRequest>> {
        Ok(self.working.services.get(&id).cloned())
    }

    async fn insert_service(&mut self, service: NewServiceRequest) -> AppResult<ServiceRequest> {
        if !self.working.vehicles.contains_key(&service.vehicle_id) {
            return Err(violation(constraints::SERVICE_VEHICLE));
        }
        if let Some(mechanic_id) = service.assigned_mechanic_id {
            if !self.working.mechanics.contains_key(&mechanic_id) {
                return Err(violation(constraints::SERVICE_MECHANIC));
            }
        }
        let row = ServiceRequest {
            id: self.working.next_id(),
            vehicle_id: service.vehicle_id,
            service_type: service.service_type,
            service_date: service.service_date,
            problem_description: service.problem_description,
            status: ServiceStatus::Pending,
            assigned_mechanic_id: service.assigned_mechanic_id,
            created_at: Utc::now(),
        };
        self.working.services.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_service(&mut self, service: &ServiceRequest) -> AppResult<()> {
        if let Some(mechanic_id) = service.assigned_mechanic_id {
            if !self.working.mechanics.contains_key(&mechanic_id) {
                return Err(violation(constraints::SERVICE_MECHANIC));
            }
        }
        if let Some(row) = self.working.services.get_mut(&service.id) {
            row.problem_description = service.problem_description.clone();
            row.status = service.status;
            row.assigned_mechanic_id = service.assigned_mechanic_id;
        }
        Ok(())
    }

    async fn delete_service(&mut self, id: i64) -> AppResult<()> {
        self.working.ensure_no_invoices(None, &[], &[id])?;
        self.working.services.remove(&id);
        Ok(())
    }

    async fn list_invoices(&mut self) -> AppResult<Vec<Invoice>> {
        Ok(self.working.invoices.values().cloned().collect())
    }

    async fn find_invoice(&mut self, id: i64) -> AppResult<Option<Invoice>> {
        Ok(self.working.invoices.get(&id).cloned())
    }

    async fn find_invoice_by_service(&mut self, service_id: i64) -> AppResult<Option<Invoice>> {
        Ok(self
            .working
            .invoices
            .values()
            .find(|i| i.service_id == service_id)
            .cloned())
    }

    async fn insert_invoice(&mut self, invoice: NewInvoice) -> AppResult<Invoice> {
        if !self.working.services.contains_key(&invoice.service_id) {
            return Err(violation(constraints::INVOICE_SERVICE));
        }
        if !self.working.customers.contains_key(&invoice.customer_id) {
            return Err(violation(constraints::INVOICE_CUSTOMER));
        }
        if !self.working.vehicles.contains_key(&invoice.vehicle_id) {
            return Err(violation(constraints::INVOICE_VEHICLE));
        }
        if invoice.total_amount <= Decimal::ZERO {
            return Err(violation(constraints::INVOICE_AMOUNT));
        }
        if self
            .working
            .invoices
            .values()
            .any(|i| i.service_id == invoice.service_id)
        {
            return Err(violation(constraints::INVOICE_SERVICE_UNIQUE));
        }
        let row = Invoice {
            id: self.working.next_id(),
            service_id: invoice.service_id,
            customer_id: invoice.customer_id,
            vehicle_id: invoice.vehicle_id,
            total_amount: invoice.total_amount,
            payment_status: invoice.payment_status,
            created_at: Utc::now(),
        };
        self.working.invoices.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_invoice_payment_status(&mut self, id: i64, payment_status: &str) -> AppResult<()> {
        if let Some(row) = self.working.invoices.get_mut(&id) {
            row.payment_status = payment_status.to_string();
        }
        Ok(())
    }

    async fn delete_invoice(&mut self, id: i64) -> AppResult<()> {
        self.working.invoices.remove(&id);
        Ok(())
    }

    async fn find_user(&mut self, id: i64) -> AppResult<Option<User>> {
        Ok(self.working.users.get(&id).cloned())
    }

    async fn find_user_by_email(&mut self, email: &str) -> AppResult<Option<User>> {
        Ok(self.working.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&mut self, username: &str) -> AppResult<Option<User>> {
        Ok(self.working.users.values().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&mut self, user: NewUser) -> AppResult<User> {
        if self.working.users.values().any(|u| u.email == user.email) {
            return Err(violation(constraints::USER_EMAIL));
        }
        let row = User {
            id: self.working.next_id(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        self.working.users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryTx { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    async fn seed_service(store: &MemoryStore) -> (i64, i64, i64) {
        let mut tx = store.begin().await.unwrap();
        let customer = tx
            .insert_customer(NewCustomer {
                name: "Ana".into(),
                phone: "555-0100".into(),
                email: None,
                address: None,
            })
            .await
            .unwrap();
        let vehicle = tx
            .insert_vehicle(NewVehicle {
                customer_id: customer.id,
                vehicle_number: "KA-01-1234".into(),
                vehicle_type: "Car".into(),
                brand: "Toyota".into(),
                model: "Corolla".into(),
            })
            .await
            .unwrap();
        let service = tx
            .insert_service(NewServiceRequest {
                vehicle_id: vehicle.id,
                service_type: "Oil change".into(),
                service_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
                problem_description: "Routine".into(),
                assigned_mechanic_id: None,
            })
            .await
            .unwrap();
        tx.commit().await.unwrap();
        (customer.id, vehicle.id, service.id)
    }

    #[tokio::test]
    async fn test_dropped_transaction_discards_writes() {
        let store = MemoryStore::new();
        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_mechanic(NewMechanic {
                name: "Raj".into(),
                phone: "555-0101".into(),
                specialization: None,
                is_available: true,
            })
            .await
            .unwrap();
        }
        let mut tx = store.begin().await.unwrap();
        assert!(tx.list_mechanics().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unique_vehicle_number() {
        let store = MemoryStore::new();
        let (customer_id, _, _) = seed_service(&store).await;
        let mut tx = store.begin().await.unwrap();
        let err = tx
            .insert_vehicle(NewVehicle {
                customer_id,
                vehicle_number: "KA-01-1234".into(),
                vehicle_type: "Car".into(),
                brand: "Honda".into(),
                model: "City".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Integrity(_)));
    }

    #[tokio::test]
    async fn test_vehicle_delete_cascades_services() {
        let store = MemoryStore::new();
        let (_, vehicle_id, service_id) = seed_service(&store).await;
        let mut tx = store.begin().await.unwrap();
        tx.delete_vehicle(vehicle_id).await.unwrap();
        assert!(tx.find_service(service_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invoice_restricts_service_delete() {
        let store = MemoryStore::new();
        let (customer_id, vehicle_id, service_id) = seed_service(&store).await;
        let mut tx = store.begin().await.unwrap();
        tx.insert_invoice(NewInvoice {
            service_id,
            customer_id,
            vehicle_id,
            total_amount: Decimal::new(15000, 2),
            payment_status: "Pending".into(),
        })
        .await
        .unwrap();

        let err = tx.delete_service(service_id).await.unwrap_err();
        assert!(matches!(err, AppError::Integrity(ref c) if c == constraints::INVOICE_SERVICE));
        let err = tx.delete_customer(customer_id).await.unwrap_err();
        assert!(matches!(err, AppError::Integrity(_)));
        assert!(tx.find_service(service_id).await.unwrap().is_some());
    }
}
