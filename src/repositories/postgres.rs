use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::customer::{Customer, NewCustomer};
use crate::models::invoice::{Invoice, NewInvoice};
use crate::models::mechanic::{Mechanic, NewMechanic};
use crate::models::service_request::{NewServiceRequest, ServiceRequest, ServiceStatus};
use crate::models::user::{NewUser, User};
use crate::models::vehicle::{NewVehicle, Vehicle};
use crate::repositories::store::{GarageStore, StoreTx};
use crate::utils::errors::{map_db_error, AppResult};

/// Almacenamiento PostgreSQL
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GarageStore for PgStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTx>> {
        let tx = self.pool.begin().await.map_err(map_db_error)?;
        Ok(Box::new(PgTx { tx }))
    }
}

/// Transacción PostgreSQL. Si se descarta sin `commit`, sqlx hace rollback.
pub struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PgTx {
    async fn list_customers(&mut self) -> AppResult<Vec<Customer>> {
        sqlx::query_as::<_, Customer>("SELECT * FROM customers ORDER BY id")
            .fetch_all(&mut *self.tx)
            .await
            .map_err(map_db_error)
    }

    async fn find_customer(&mut self, id: i64) -> AppResult<Option<Customer>> {
        sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)
    }

    async fn find_customer_by_phone(&mut self, phone: &str) -> AppResult<Option<Customer>> {
        sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE phone = $1")
            .bind(phone)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)
    }

    async fn insert_customer(&mut self, customer: NewCustomer) -> AppResult<Customer> {
        sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, phone, email, address)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(customer.name)
        .bind(customer.phone)
        .bind(customer.email)
        .bind(customer.address)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    async fn update_customer(&mut self, customer: &Customer) -> AppResult<()> {
        sqlx::query("UPDATE customers SET name = $2, phone = $3, email = $4, address = $5 WHERE id = $1")
            .bind(customer.id)
            .bind(&customer.name)
            .bind(&customer.phone)
            .bind(&customer.email)
            .bind(&customer.address)
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    async fn delete_customer(&mut self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    async fn customer_has_vehicles(&mut self, id: i64) -> AppResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehicles WHERE customer_id = $1)")
                .bind(id)
                .fetch_one(&mut *self.tx)
                .await
                .map_err(map_db_error)?;
        Ok(result.0)
    }

    async fn list_vehicles(&mut self) -> AppResult<Vec<Vehicle>> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY id")
            .fetch_all(&mut *self.tx)
            .await
            .map_err(map_db_error)
    }

    async fn find_vehicle(&mut self, id: i64) -> AppResult<Option<Vehicle>> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)
    }

    async fn find_vehicle_by_number(&mut self, vehicle_number: &str) -> AppResult<Option<Vehicle>> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE vehicle_number = $1")
            .bind(vehicle_number)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)
    }

    async fn insert_vehicle(&mut self, vehicle: NewVehicle) -> AppResult<Vehicle> {
        sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (customer_id, vehicle_number, vehicle_type, brand, model)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(vehicle.customer_id)
        .bind(vehicle.vehicle_number)
        .bind(vehicle.vehicle_type)
        .bind(vehicle.brand)
        .bind(vehicle.model)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    async fn update_vehicle(&mut self, vehicle: &Vehicle) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE vehicles
            SET customer_id = $2, vehicle_number = $3, vehicle_type = $4, brand = $5, model = $6
            WHERE id = $1
            "#,
        )
        .bind(vehicle.id)
        .bind(vehicle.customer_id)
        .bind(&vehicle.vehicle_number)
        .bind(&vehicle.vehicle_type)
        .bind(&vehicle.brand)
        .bind(&vehicle.model)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn delete_vehicle(&mut self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    async fn list_mechanics(&mut self) -> AppResult<Vec<Mechanic>> {
        sqlx::query_as::<_, Mechanic>("SELECT * FROM mechanics ORDER BY id")
            .fetch_all(&mut *self.tx)
            .await
            .map_err(map_db_error)
    }

    async fn find_mechanic(&mut self, id: i64) -> AppResult<Option<Mechanic>> {
        sqlx::query_as::<_, Mechanic>("SELECT * FROM mechanics WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)
    }

    async fn lock_mechanic(&mut self, id: i64) -> AppResult<Option<Mechanic>> {
        sqlx::query_as::<_, Mechanic>("SELECT * FROM mechanics WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)
    }

    async fn find_mechanic_by_phone(&mut self, phone: &str) -> AppResult<Option<Mechanic>> {
        sqlx::query_as::<_, Mechanic>("SELECT * FROM mechanics WHERE phone = $1")
            .bind(phone)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)
    }

    async fn insert_mechanic(&mut self, mechanic: NewMechanic) -> AppResult<Mechanic> {
        sqlx::query_as::<_, Mechanic>(
            r#"
            INSERT INTO mechanics (name, phone, specialization, is_available)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(mechanic.name)
        .bind(mechanic.phone)
        .bind(mechanic.specialization)
        .bind(mechanic.is_available)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    async fn update_mechanic(&mut self, mechanic: &Mechanic) -> AppResult<()> {
        sqlx::query(
            "UPDATE mechanics SET name = $2, phone = $3, specialization = $4, is_available = $5 WHERE id = $1",
        )
        .bind(mechanic.id)
        .bind(&mechanic.name)
        .bind(&mechanic.phone)
        .bind(&mechanic.specialization)
        .bind(mechanic.is_available)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn set_mechanic_availability(&mut self, id: i64, is_available: bool) -> AppResult<()> {
        sqlx::query("UPDATE mechanics SET is_available = $2 WHERE id = $1")
            .bind(id)
            .bind(is_available)
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    async fn delete_mechanic(&mut self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM mechanics WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    async fn list_services(&mut self) -> AppResult<Vec<ServiceRequest>> {
        sqlx::query_as::<_, ServiceRequest>("SELECT * FROM service_requests ORDER BY id")
            .fetch_all(&mut *self.tx)
            .await
            .map_err(map_db_error)
    }

    async fn find_service(&mut self, id: i64) -> AppResult<Option<ServiceRequest>> {
        sqlx::query_as::<_, ServiceRequest>("SELECT * FROM service_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)
    }

    async fn insert_service(&mut self, service: NewServiceRequest) -> AppResult<ServiceRequest> {
        sqlx::query_as::<_, ServiceRequest>(
            r#"
            INSERT INTO service_requests
                (vehicle_id, service_type, service_date, problem_description, status, assigned_mechanic_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(service.vehicle_id)
        .bind(service.service_type)
        .bind(service.service_date)
        .bind(service.problem_description)
        .bind(ServiceStatus::Pending.as_str())
        .bind(service.assigned_mechanic_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    async fn update_service(&mut self, service: &ServiceRequest) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE service_requests
            SET problem_description = $2, status = $3, assigned_mechanic_id = $4
            WHERE id = $1
            "#,
        )
        .bind(service.id)
        .bind(&service.problem_description)
        .bind(service.status.as_str())
        .bind(service.assigned_mechanic_id)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn delete_service(&mut self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM service_requests WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    async fn list_invoices(&mut self) -> AppResult<Vec<Invoice>> {
        sqlx::query_as::<_, Invoice>("SELECT * FROM invoices ORDER BY id")
            .fetch_all(&mut *self.tx)
            .await
            .map_err(map_db_error)
    }

    async fn find_invoice(&mut self, id: i64) -> AppResult<Option<Invoice>> {
        sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)
    }

    async fn find_invoice_by_service(&mut self, service_id: i64) -> AppResult<Option<Invoice>> {
        sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE service_id = $1")
            .bind(service_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)
    }

    async fn insert_invoice(&mut self, invoice: NewInvoice) -> AppResult<Invoice> {
        sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (service_id, customer_id, vehicle_id, total_amount, payment_status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(invoice.service_id)
        .bind(invoice.customer_id)
        .bind(invoice.vehicle_id)
        .bind(invoice.total_amount)
        .bind(invoice.payment_status)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    async fn update_invoice_payment_status(&mut self, id: i64, payment_status: &str) -> AppResult<()> {
        sqlx::query("UPDATE invoices SET payment_status = $2 WHERE id = $1")
            .bind(id)
            .bind(payment_status)
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    async fn delete_invoice(&mut self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    async fn find_user(&mut self, id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)
    }

    async fn find_user_by_email(&mut self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)
    }

    async fn find_user_by_username(&mut self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1 ORDER BY id LIMIT 1")
            .bind(username)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)
    }

    async fn insert_user(&mut self, user: NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user.username)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await.map_err(map_db_error)
    }
}
