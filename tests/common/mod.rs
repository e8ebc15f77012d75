#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use garage_manager::{
    build_router,
    config::environment::{ApiUpdatePolicy, EnvironmentConfig, StorageBackend},
    models::{
        customer::NewCustomer,
        mechanic::{Mechanic, NewMechanic},
        service_request::ServiceRequest,
        user::{NewUser, Role},
        vehicle::NewVehicle,
    },
    repositories::{memory::MemoryStore, store::GarageStore},
    state::AppState,
    utils::jwt::{generate_token, JwtConfig},
};

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub config: EnvironmentConfig,
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }

    /// Valor decodificado de la cookie flash establecida en la respuesta
    pub fn flash(&self) -> Option<String> {
        self.cookie("garage_flash")
            .map(|raw| urlencoding::decode(&raw).expect("flash not url-encoded").into_owned())
    }

    pub fn cookie(&self, name: &str) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|cookie| {
                let pair = cookie.split(';').next()?;
                let (key, value) = pair.split_once('=')?;
                (key == name).then(|| value.to_string())
            })
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_policy(ApiUpdatePolicy::Unaware)
    }

    pub fn with_policy(api_update_policy: ApiUpdatePolicy) -> Self {
        let config = EnvironmentConfig {
            storage_backend: StorageBackend::Memory,
            api_update_policy,
            bcrypt_cost: 4,
            ..EnvironmentConfig::default()
        };
        let store = Arc::new(MemoryStore::new());
        let router = build_router(AppState::new(store.clone(), config.clone()));
        Self { store, config, router }
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.expect("router failed");
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body read failed")
            .to_vec();
        TestResponse { status, headers, body }
    }

    pub async fn json(&self, method: Method, uri: &str, body: Option<Value>, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        };
        self.send(request.unwrap()).await
    }

    pub async fn raw(&self, method: Method, uri: &str, content_type: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.json(Method::GET, uri, None, cookie).await
    }

    pub async fn form(&self, uri: &str, body: &str, cookie: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::COOKIE, cookie)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Crea un usuario y devuelve la cabecera Cookie con su sesión
    pub async fn session_for(&self, username: &str, role: Role) -> String {
        let mut tx = self.store.begin().await.unwrap();
        let user = tx
            .insert_user(NewUser {
                username: username.to_string(),
                email: format!("{}@garage.test", username),
                password_hash: bcrypt::hash("secret123", 4).unwrap(),
                role,
            })
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let token = generate_token(user.id, role, &JwtConfig::from(&self.config)).unwrap();
        format!("garage_session={}", token)
    }

    pub async fn seed_customer(&self, phone: &str) -> i64 {
        let mut tx = self.store.begin().await.unwrap();
        let customer = tx
            .insert_customer(NewCustomer {
                name: "Ana Ruiz".into(),
                phone: phone.into(),
                email: None,
                address: None,
            })
            .await
            .unwrap();
        tx.commit().await.unwrap();
        customer.id
    }

    pub async fn seed_vehicle(&self, customer_id: i64, number: &str) -> i64 {
        let mut tx = self.store.begin().await.unwrap();
        let vehicle = tx
            .insert_vehicle(NewVehicle {
                customer_id,
                vehicle_number: number.into(),
                vehicle_type: "Car".into(),
                brand: "Seat".into(),
                model: "Ibiza".into(),
            })
            .await
            .unwrap();
        tx.commit().await.unwrap();
        vehicle.id
    }

    pub async fn seed_mechanic(&self, phone: &str, is_available: bool) -> i64 {
        let mut tx = self.store.begin().await.unwrap();
        let mechanic = tx
            .insert_mechanic(NewMechanic {
                name: format!("Mechanic {}", phone),
                phone: phone.into(),
                specialization: Some("Brakes".into()),
                is_available,
            })
            .await
            .unwrap();
        tx.commit().await.unwrap();
        mechanic.id
    }

    pub async fn mechanic(&self, id: i64) -> Mechanic {
        let mut tx = self.store.begin().await.unwrap();
        let mechanic = tx.find_mechanic(id).await.unwrap();
        mechanic.expect("mechanic missing")
    }

    pub async fn set_availability(&self, id: i64, is_available: bool) {
        let mut tx = self.store.begin().await.unwrap();
        tx.set_mechanic_availability(id, is_available).await.unwrap();
        tx.commit().await.unwrap();
    }

    pub async fn services(&self) -> Vec<ServiceRequest> {
        let mut tx = self.store.begin().await.unwrap();
        let services = tx.list_services().await.unwrap();
        services
    }

    pub async fn service(&self, id: i64) -> Option<ServiceRequest> {
        let mut tx = self.store.begin().await.unwrap();
        let service = tx.find_service(id).await.unwrap();
        service
    }
}
