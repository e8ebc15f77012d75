//! Handlers de formularios de la UI
//!
//! Cada POST termina en una redirección con mensaje flash. Los errores de
//! dominio vuelven al formulario de origen con `public_message()`.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::Value;

use crate::controllers::customer_controller::CustomerController;
use crate::controllers::dashboard_controller::DashboardController;
use crate::controllers::invoice_controller::InvoiceController;
use crate::controllers::mechanic_controller::MechanicController;
use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::auth_dto::RegisterRequest;
use crate::dto::customer_dto::{CreateCustomerRequest, UpdateCustomerRequest};
use crate::dto::invoice_dto::{CreateInvoiceRequest, UpdateInvoiceRequest};
use crate::dto::mechanic_dto::{CreateMechanicRequest, UpdateMechanicRequest};
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::middleware::auth::{expired_session_cookie, session_cookie, Principal};
use crate::models::service_request::ServiceStatus;
use crate::routes::auth_routes::auth_controller;
use crate::services::service_request_service::{ServiceDraft, ServiceRequestService};
use crate::state::AppState;
use crate::ui::flash::{redirect_with_flash, redirect_with_jar, take_flash};
use crate::ui::views;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{checkbox_checked, parse_optional_id};

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn services(state: &AppState) -> ServiceRequestService {
    ServiceRequestService::new(state.store.clone(), state.config.api_update_policy)
}

/// Renderiza una página consumiendo el flash pendiente
fn render(jar: CookieJar, principal: Option<Principal>, title: &str, body: AppResult<String>) -> Response {
    match body {
        Ok(body) => {
            let (jar, flash) = take_flash(jar);
            (jar, views::layout(title, principal, flash.as_deref(), &body)).into_response()
        }
        Err(error) => {
            tracing::warn!("⚠️ No se pudo renderizar {}: {}", title, error);
            redirect_with_flash("/", &error.public_message()).into_response()
        }
    }
}

/// Resultado de un POST: éxito y error redirigen con flash
fn finish<T>(result: AppResult<T>, success_to: &str, success: &str, failure_to: &str) -> Response {
    match result {
        Ok(_) => redirect_with_flash(success_to, success).into_response(),
        Err(error) => {
            tracing::warn!("⚠️ Formulario rechazado: {}", error);
            redirect_with_flash(failure_to, &error.public_message()).into_response()
        }
    }
}

// ---------- Sesión ----------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

pub async fn login_page(jar: CookieJar) -> Response {
    render(jar, None, "Login", Ok(views::login_page()))
}

pub async fn login(State(state): State<AppState>, jar: CookieJar, Form(form): Form<LoginForm>) -> Response {
    match auth_controller(&state)
        .login_with_username(form.username.trim(), &form.password)
        .await
    {
        Ok((_, token)) => redirect_with_jar(jar.add(session_cookie(token)), "/", "Login successful").into_response(),
        Err(_) => redirect_with_flash("/login", "Invalid credentials").into_response(),
    }
}

pub async fn register_page(jar: CookieJar) -> Response {
    render(jar, None, "Register", Ok(views::register_page()))
}

pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    let request = RegisterRequest {
        username: form.username.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password,
        role: non_empty(form.role),
    };
    let result = auth_controller(&state).register(request).await;
    finish(result, "/login", "Registration successful. Please login.", "/register")
}

pub async fn logout(jar: CookieJar) -> Response {
    redirect_with_jar(jar.remove(expired_session_cookie()), "/login", "Logged out").into_response()
}

pub async fn dashboard(State(state): State<AppState>, principal: Principal, jar: CookieJar) -> Response {
    let body = DashboardController::new(state.store.clone())
        .stats()
        .await
        .map(|stats| views::dashboard_page(&stats));
    render(jar, Some(principal), "Dashboard", body)
}

// ---------- Customers ----------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CustomerForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

pub async fn customers_page(State(state): State<AppState>, principal: Principal, jar: CookieJar) -> Response {
    let body = CustomerController::new(state.store.clone())
        .list_full()
        .await
        .map(|customers| views::customers_page(&customers));
    render(jar, Some(principal), "Customers", body)
}

pub async fn customer_create_page(principal: Principal, jar: CookieJar) -> Response {
    render(jar, Some(principal), "New customer", Ok(views::customer_form("/customers/create", None)))
}

pub async fn customer_create(State(state): State<AppState>, Form(form): Form<CustomerForm>) -> Response {
    let controller = CustomerController::new(state.store.clone());
    let request = CreateCustomerRequest {
        name: non_empty(form.name),
        phone: non_empty(form.phone),
        email: non_empty(form.email),
        address: non_empty(form.address),
    };
    let result = match request.into_new_customer() {
        Ok(new_customer) => controller.insert(new_customer).await,
        Err(e) => Err(e),
    };
    finish(result, "/customers", "Customer created successfully", "/customers/create")
}

pub async fn customer_update_page(
    State(state): State<AppState>,
    principal: Principal,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Response {
    let body = CustomerController::new(state.store.clone())
        .get_by_id(id)
        .await
        .map(|customer| views::customer_form(&format!("/customers/{}/update", id), Some(&customer)));
    render(jar, Some(principal), "Edit customer", body)
}

pub async fn customer_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<CustomerForm>,
) -> Response {
    let request = UpdateCustomerRequest {
        name: non_empty(form.name),
        phone: non_empty(form.phone),
        email: non_empty(form.email),
        address: non_empty(form.address),
    };
    let result = CustomerController::new(state.store.clone()).update(id, request).await;
    finish(
        result,
        "/customers",
        "Customer updated successfully",
        &format!("/customers/{}/update", id),
    )
}

pub async fn customer_delete(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let result = CustomerController::new(state.store.clone()).delete(id).await;
    finish(result, "/customers", "Customer deleted successfully", "/customers")
}

// ---------- Vehicles ----------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VehicleForm {
    pub customer_id: String,
    pub vehicle_number: String,
    pub vehicle_type: String,
    pub brand: String,
    pub model: String,
}

pub async fn vehicles_page(State(state): State<AppState>, principal: Principal, jar: CookieJar) -> Response {
    let body = VehicleController::new(state.store.clone())
        .list()
        .await
        .map(|vehicles| views::vehicles_page(&vehicles));
    render(jar, Some(principal), "Vehicles", body)
}

pub async fn vehicle_create_page(State(state): State<AppState>, principal: Principal, jar: CookieJar) -> Response {
    let body = CustomerController::new(state.store.clone())
        .list_full()
        .await
        .map(|customers| views::vehicle_form("/vehicles/create", None, &customers));
    render(jar, Some(principal), "New vehicle", body)
}

pub async fn vehicle_create(State(state): State<AppState>, Form(form): Form<VehicleForm>) -> Response {
    let result = async {
        let request = CreateVehicleRequest {
            customer_id: parse_optional_id(Some(form.customer_id.as_str()), "customer_id")?,
            vehicle_number: non_empty(form.vehicle_number),
            vehicle_type: non_empty(form.vehicle_type),
            brand: non_empty(form.brand),
            model: non_empty(form.model),
        };
        VehicleController::new(state.store.clone())
            .insert(request.into_new_vehicle()?)
            .await
    }
    .await;
    finish(result, "/vehicles", "Vehicle created successfully", "/vehicles/create")
}

pub async fn vehicle_update_page(
    State(state): State<AppState>,
    principal: Principal,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Response {
    let body = async {
        let vehicle = VehicleController::new(state.store.clone()).get_by_id(id).await?;
        let customers = CustomerController::new(state.store.clone()).list_full().await?;
        Ok::<_, AppError>(views::vehicle_form(
            &format!("/vehicles/{}/update", id),
            Some(&vehicle),
            &customers,
        ))
    }
    .await;
    render(jar, Some(principal), "Edit vehicle", body)
}

pub async fn vehicle_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<VehicleForm>,
) -> Response {
    let request = UpdateVehicleRequest {
        vehicle_number: non_empty(form.vehicle_number),
        vehicle_type: non_empty(form.vehicle_type),
        brand: non_empty(form.brand),
        model: non_empty(form.model),
    };
    let result = VehicleController::new(state.store.clone()).update(id, request).await;
    finish(
        result,
        "/vehicles",
        "Vehicle updated successfully",
        &format!("/vehicles/{}/update", id),
    )
}

pub async fn vehicle_delete(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let result = VehicleController::new(state.store.clone()).delete(id).await;
    finish(result, "/vehicles", "Vehicle deleted successfully", "/vehicles")
}

// ---------- Services ----------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServiceCreateForm {
    pub vehicle_id: String,
    pub service_type: String,
    pub service_date: String,
    pub problem_description: String,
    pub mechanic_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServiceUpdateForm {
    pub status: String,
    pub mechanic_id: String,
}

impl ServiceCreateForm {
    fn into_draft(self) -> AppResult<ServiceDraft> {
        let missing = || AppError::BadRequest("Missing required service fields".to_string());
        let vehicle_id = parse_optional_id(Some(self.vehicle_id.as_str()), "vehicle_id")?.ok_or_else(missing)?;

        Ok(ServiceDraft {
            vehicle_id,
            service_type: non_empty(self.service_type).ok_or_else(missing)?,
            service_date: non_empty(self.service_date).ok_or_else(missing)?,
            problem_description: non_empty(self.problem_description).ok_or_else(missing)?,
            assigned_mechanic_id: parse_optional_id(Some(self.mechanic_id.as_str()), "mechanic_id")?,
        })
    }
}

pub async fn services_page(State(state): State<AppState>, principal: Principal, jar: CookieJar) -> Response {
    let body = services(&state)
        .list()
        .await
        .map(|services| views::services_page(&services));
    render(jar, Some(principal), "Service requests", body)
}

pub async fn service_create_page(State(state): State<AppState>, principal: Principal, jar: CookieJar) -> Response {
    let body = async {
        let vehicles = VehicleController::new(state.store.clone()).list().await?;
        let available: Vec<_> = MechanicController::new(state.store.clone())
            .list()
            .await?
            .into_iter()
            .filter(|mechanic| mechanic.is_available)
            .collect();
        Ok::<_, AppError>(views::service_create_form(&vehicles, &available))
    }
    .await;
    render(jar, Some(principal), "New service request", body)
}

/// Alta con mecánico: el coordinador reserva al mecánico en la misma transacción
pub async fn service_create(State(state): State<AppState>, Form(form): Form<ServiceCreateForm>) -> Response {
    let result = match form.into_draft() {
        Ok(draft) => services(&state).create_with_assignment(draft).await,
        Err(e) => Err(e),
    };
    finish(
        result,
        "/services",
        "Service request created successfully",
        "/services/create",
    )
}

pub async fn service_update_page(
    State(state): State<AppState>,
    principal: Principal,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Response {
    let body = async {
        let service = services(&state).get(id).await?;
        let mechanics = MechanicController::new(state.store.clone()).list().await?;
        Ok::<_, AppError>(views::service_update_form(&service, &mechanics))
    }
    .await;
    render(jar, Some(principal), "Update service request", body)
}

pub async fn service_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<ServiceUpdateForm>,
) -> Response {
    let result = async {
        let mechanic_id = parse_optional_id(Some(form.mechanic_id.as_str()), "mechanic_id")?;
        let status = non_empty(form.status);
        services(&state).reassign(id, mechanic_id, status.as_deref()).await
    }
    .await;

    if let Ok(service) = &result {
        if service.status == ServiceStatus::Completed {
            tracing::info!("✅ Orden {} completada desde la UI", service.id);
        }
    }

    finish(
        result,
        "/services",
        "Service updated successfully",
        &format!("/services/{}/update", id),
    )
}

pub async fn service_delete(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let result = services(&state).delete(id).await;
    finish(result, "/services", "Service request deleted successfully", "/services")
}

// ---------- Mechanics ----------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MechanicForm {
    pub name: String,
    pub phone: String,
    pub specialization: String,
    pub is_available: Option<String>,
}

pub async fn mechanics_page(State(state): State<AppState>, principal: Principal, jar: CookieJar) -> Response {
    let body = MechanicController::new(state.store.clone())
        .list()
        .await
        .map(|mechanics| views::mechanics_page(&mechanics));
    render(jar, Some(principal), "Mechanics", body)
}

pub async fn mechanic_create_page(principal: Principal, jar: CookieJar) -> Response {
    render(jar, Some(principal), "New mechanic", Ok(views::mechanic_form("/mechanics/create", None)))
}

pub async fn mechanic_create(State(state): State<AppState>, Form(form): Form<MechanicForm>) -> Response {
    let request = CreateMechanicRequest {
        name: non_empty(form.name),
        phone: non_empty(form.phone),
        specialization: non_empty(form.specialization),
        is_available: checkbox_checked(form.is_available.as_deref()),
    };
    let result = match request.into_new_mechanic() {
        Ok(new_mechanic) => MechanicController::new(state.store.clone()).insert(new_mechanic).await,
        Err(e) => Err(e),
    };
    finish(result, "/mechanics", "Mechanic added successfully", "/mechanics/create")
}

pub async fn mechanic_update_page(
    State(state): State<AppState>,
    principal: Principal,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Response {
    let body = MechanicController::new(state.store.clone())
        .get_by_id(id)
        .await
        .map(|mechanic| views::mechanic_form(&format!("/mechanics/{}/update", id), Some(&mechanic)));
    render(jar, Some(principal), "Edit mechanic", body)
}

pub async fn mechanic_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<MechanicForm>,
) -> Response {
    let request = UpdateMechanicRequest {
        name: non_empty(form.name),
        phone: non_empty(form.phone),
        specialization: non_empty(form.specialization),
        is_available: Some(checkbox_checked(form.is_available.as_deref())),
    };
    let result = MechanicController::new(state.store.clone()).update(id, request).await;
    finish(
        result,
        "/mechanics",
        "Mechanic updated successfully",
        &format!("/mechanics/{}/update", id),
    )
}

pub async fn mechanic_delete(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let result = MechanicController::new(state.store.clone()).delete(id).await;
    finish(result, "/mechanics", "Mechanic deleted successfully", "/mechanics")
}

// ---------- Invoices ----------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InvoiceCreateForm {
    pub service_id: String,
    pub customer_id: String,
    pub vehicle_id: String,
    pub total_amount: String,
    pub payment_status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InvoiceUpdateForm {
    pub payment_status: String,
}

pub async fn invoices_page(State(state): State<AppState>, principal: Principal, jar: CookieJar) -> Response {
    let body = InvoiceController::new(state.store.clone())
        .list()
        .await
        .map(|invoices| views::invoices_page(&invoices));
    render(jar, Some(principal), "Invoices", body)
}

/// Solo se facturan órdenes completadas
pub async fn invoice_create_page(State(state): State<AppState>, principal: Principal, jar: CookieJar) -> Response {
    let body = async {
        let completed: Vec<_> = services(&state)
            .list()
            .await?
            .into_iter()
            .filter(|service| service.status.is_completed())
            .collect();
        let customers = CustomerController::new(state.store.clone()).list_full().await?;
        let vehicles = VehicleController::new(state.store.clone()).list().await?;
        Ok::<_, AppError>(views::invoice_create_form(&completed, &customers, &vehicles))
    }
    .await;
    render(jar, Some(principal), "New invoice", body)
}

pub async fn invoice_create(State(state): State<AppState>, Form(form): Form<InvoiceCreateForm>) -> Response {
    let result = async {
        let request = CreateInvoiceRequest {
            service_id: parse_optional_id(Some(form.service_id.as_str()), "service_id")?,
            customer_id: parse_optional_id(Some(form.customer_id.as_str()), "customer_id")?,
            vehicle_id: parse_optional_id(Some(form.vehicle_id.as_str()), "vehicle_id")?,
            total_amount: Some(Value::String(form.total_amount)),
            payment_status: non_empty(form.payment_status),
        };
        InvoiceController::new(state.store.clone()).create(request).await
    }
    .await;
    finish(result, "/invoices", "Invoice created successfully", "/invoices/create")
}

pub async fn invoice_update_page(
    State(state): State<AppState>,
    principal: Principal,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Response {
    let body = InvoiceController::new(state.store.clone())
        .get_by_id(id)
        .await
        .map(|invoice| views::invoice_update_form(&invoice));
    render(jar, Some(principal), "Edit invoice", body)
}

pub async fn invoice_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<InvoiceUpdateForm>,
) -> Response {
    let request = UpdateInvoiceRequest {
        payment_status: non_empty(form.payment_status),
    };
    let result = InvoiceController::new(state.store.clone()).update(id, request).await;
    finish(
        result,
        "/invoices",
        "Invoice updated successfully",
        &format!("/invoices/{}/update", id),
    )
}

pub async fn invoice_delete(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let result = InvoiceController::new(state.store.clone()).delete(id).await;
    finish(result, "/invoices", "Invoice deleted successfully", "/invoices")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_form_requires_fields() {
        let form = ServiceCreateForm {
            vehicle_id: "3".into(),
            service_type: "Brakes".into(),
            service_date: String::new(),
            problem_description: "Squeaks".into(),
            mechanic_id: String::new(),
        };
        let err = form.into_draft().unwrap_err();
        assert_eq!(err.public_message(), "Missing required service fields");
    }

    #[test]
    fn test_service_form_empty_mechanic_means_unassigned() {
        let form = ServiceCreateForm {
            vehicle_id: "3".into(),
            service_type: "Brakes".into(),
            service_date: "2024-03-15".into(),
            problem_description: "Squeaks".into(),
            mechanic_id: String::new(),
        };
        let draft = form.into_draft().unwrap();
        assert_eq!(draft.vehicle_id, 3);
        assert_eq!(draft.assigned_mechanic_id, None);
    }

    #[test]
    fn test_non_empty_trims() {
        assert_eq!(non_empty("  ".into()), None);
        assert_eq!(non_empty(" Brakes ".into()).as_deref(), Some("Brakes"));
    }
}
