mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;
use garage_manager::config::environment::ApiUpdatePolicy;
use garage_manager::models::service_request::ServiceStatus;
use garage_manager::models::user::Role;

async fn create_service(app: &TestApp, body: serde_json::Value) -> common::TestResponse {
    app.json(Method::POST, "/services/", Some(body), None).await
}

#[tokio::test]
async fn test_create_service_is_always_pending() {
    let app = TestApp::new();
    let customer = app.seed_customer("600000001").await;
    let vehicle = app.seed_vehicle(customer, "1234-ABC").await;

    let response = create_service(
        &app,
        json!({
            "vehicle_id": vehicle,
            "service_type": "Oil change",
            "service_date": "2024-03-15",
            "problem_description": "Routine",
            "status": "Completed"
        }),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let body = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Service request created");
    assert_eq!(body["data"]["status"], "Pending");

    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(app.service(id).await.unwrap().status, ServiceStatus::Pending);
}

#[tokio::test]
async fn test_api_create_does_not_touch_availability() {
    let app = TestApp::new();
    let customer = app.seed_customer("600000002").await;
    let vehicle = app.seed_vehicle(customer, "2222-BBB").await;
    let mechanic = app.seed_mechanic("700000001", true).await;

    let response = create_service(
        &app,
        json!({
            "vehicle_id": vehicle,
            "service_type": "Brakes",
            "service_date": "2024-03-15",
            "problem_description": "Squeaking",
            "assigned_mechanic_id": mechanic
        }),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json()["data"]["assigned_mechanic_id"], mechanic);
    assert!(app.mechanic(mechanic).await.is_available);
}

#[tokio::test]
async fn test_create_service_validation_order() {
    let app = TestApp::new();
    let customer = app.seed_customer("600000003").await;
    let vehicle = app.seed_vehicle(customer, "3333-CCC").await;

    let missing = create_service(&app, json!({ "vehicle_id": vehicle, "service_type": "Brakes" })).await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.json()["message"], "Missing required service fields");

    let no_vehicle = create_service(
        &app,
        json!({
            "vehicle_id": 9999,
            "service_type": "Brakes",
            "service_date": "not-a-date",
            "problem_description": "x"
        }),
    )
    .await;
    assert_eq!(no_vehicle.status, StatusCode::NOT_FOUND);
    assert_eq!(no_vehicle.json()["message"], "Vehicle not found");

    let no_mechanic = create_service(
        &app,
        json!({
            "vehicle_id": vehicle,
            "service_type": "Brakes",
            "service_date": "not-a-date",
            "problem_description": "x",
            "assigned_mechanic_id": 9999
        }),
    )
    .await;
    assert_eq!(no_mechanic.status, StatusCode::NOT_FOUND);
    assert_eq!(no_mechanic.json()["message"], "Assigned mechanic not found");

    let bad_date = create_service(
        &app,
        json!({
            "vehicle_id": vehicle,
            "service_type": "Brakes",
            "service_date": "15/03/2024",
            "problem_description": "x"
        }),
    )
    .await;
    assert_eq!(bad_date.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_date.json()["message"], "service_date must be YYYY-MM-DD");

    assert!(app.services().await.is_empty());
}

#[tokio::test]
async fn test_malformed_json_body() {
    let app = TestApp::new();
    let malformed = app
        .raw(Method::POST, "/services/", "application/json", "{not json")
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert_eq!(malformed.json()["message"], "JSON body required");

    let missing = app.json(Method::POST, "/services/", None, None).await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.json()["message"], "JSON body required");
}

#[tokio::test]
async fn test_empty_json_object_is_rejected() {
    let app = TestApp::new();
    let customer_id = app.seed_customer("600100200").await;
    let vehicle_id = app.seed_vehicle(customer_id, "4321-BCD").await;

    let created = app.json(Method::POST, "/services/", Some(json!({})), None).await;
    assert_eq!(created.status, StatusCode::BAD_REQUEST);
    assert_eq!(created.json()["message"], "JSON body required");
    assert!(app.services().await.is_empty());

    let response = create_service(
        &app,
        json!({
            "vehicle_id": vehicle_id,
            "service_type": "Brakes",
            "service_date": "2024-05-10",
            "problem_description": "Squeaking"
        }),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.json()["data"]["id"].as_i64().unwrap();

    // El cuerpo vacío se rechaza antes de buscar la orden
    for uri in [format!("/services/{}", id), "/services/9999".to_string()] {
        let updated = app.json(Method::PUT, &uri, Some(json!({})), None).await;
        assert_eq!(updated.status, StatusCode::BAD_REQUEST);
        assert_eq!(updated.json()["message"], "JSON body required");
    }

    let vehicle = app.json(Method::POST, "/vehicles/", Some(json!({})), None).await;
    assert_eq!(vehicle.status, StatusCode::BAD_REQUEST);
    assert_eq!(vehicle.json()["message"], "JSON body required");
}

#[tokio::test]
async fn test_service_date_round_trip() {
    let app = TestApp::new();
    let customer = app.seed_customer("600000004").await;
    let vehicle = app.seed_vehicle(customer, "4444-DDD").await;

    let created = create_service(
        &app,
        json!({
            "vehicle_id": vehicle,
            "service_type": "Tyres",
            "service_date": "2024-03-15",
            "problem_description": "Worn"
        }),
    )
    .await
    .json();
    let id = created["data"]["id"].as_i64().unwrap();

    let fetched = app.get(&format!("/services/{}", id), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json()["data"]["service_date"], "2024-03-15");
}

#[tokio::test]
async fn test_update_service_status_rules() {
    let app = TestApp::new();
    let customer = app.seed_customer("600000005").await;
    let vehicle = app.seed_vehicle(customer, "5555-EEE").await;
    let id = create_service(
        &app,
        json!({
            "vehicle_id": vehicle,
            "service_type": "Engine",
            "service_date": "2024-04-01",
            "problem_description": "Noise"
        }),
    )
    .await
    .json()["data"]["id"]
        .as_i64()
        .unwrap();
    let uri = format!("/services/{}", id);

    let invalid = app.json(Method::PUT, &uri, Some(json!({ "status": "Cancelled" })), None).await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid.json()["message"], "Invalid service status");

    let ok = app
        .json(
            Method::PUT,
            &uri,
            Some(json!({ "status": "In Progress", "problem_description": null })),
            None,
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.json()["message"], "Service status updated successfully");

    let service = app.service(id).await.unwrap();
    assert_eq!(service.status, ServiceStatus::InProgress);
    assert_eq!(service.problem_description, "");

    let dangling = app
        .json(Method::PUT, &uri, Some(json!({ "assigned_mechanic_id": 4242 })), None)
        .await;
    assert_eq!(dangling.status, StatusCode::CONFLICT);
    assert_eq!(dangling.json()["message"], "Assigned mechanic does not exist");

    let missing = app
        .json(Method::PUT, "/services/9999", Some(json!({ "status": "Completed" })), None)
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.json()["message"], "Service request not found");
}

#[tokio::test]
async fn test_unaware_api_update_leaves_availability_alone() {
    let app = TestApp::new();
    let customer = app.seed_customer("600000006").await;
    let vehicle = app.seed_vehicle(customer, "6666-FFF").await;
    let mechanic = app.seed_mechanic("700000002", false).await;

    let id = create_service(
        &app,
        json!({
            "vehicle_id": vehicle,
            "service_type": "Clutch",
            "service_date": "2024-05-01",
            "problem_description": "Slipping",
            "assigned_mechanic_id": mechanic
        }),
    )
    .await
    .json()["data"]["id"]
        .as_i64()
        .unwrap();

    let response = app
        .json(Method::PUT, &format!("/services/{}", id), Some(json!({ "status": "Completed" })), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(!app.mechanic(mechanic).await.is_available);
}

#[tokio::test]
async fn test_coordinated_api_update_releases_on_completion() {
    let app = TestApp::with_policy(ApiUpdatePolicy::Coordinated);
    let customer = app.seed_customer("600000007").await;
    let vehicle = app.seed_vehicle(customer, "7777-GGG").await;
    let mechanic = app.seed_mechanic("700000003", false).await;

    let id = create_service(
        &app,
        json!({
            "vehicle_id": vehicle,
            "service_type": "Clutch",
            "service_date": "2024-05-01",
            "problem_description": "Slipping",
            "assigned_mechanic_id": mechanic
        }),
    )
    .await
    .json()["data"]["id"]
        .as_i64()
        .unwrap();

    let response = app
        .json(Method::PUT, &format!("/services/{}", id), Some(json!({ "status": "Completed" })), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(app.mechanic(mechanic).await.is_available);
}

#[tokio::test]
async fn test_delete_service_blocked_by_invoice() {
    let app = TestApp::new();
    let customer = app.seed_customer("600000008").await;
    let vehicle = app.seed_vehicle(customer, "8888-HHH").await;
    let mechanic = app.seed_mechanic("700000004", false).await;

    let id = create_service(
        &app,
        json!({
            "vehicle_id": vehicle,
            "service_type": "Battery",
            "service_date": "2024-06-01",
            "problem_description": "Dead",
            "assigned_mechanic_id": mechanic
        }),
    )
    .await
    .json()["data"]["id"]
        .as_i64()
        .unwrap();

    let invoice = app
        .json(
            Method::POST,
            "/api/invoices/create",
            Some(json!({
                "service_id": id,
                "customer_id": customer,
                "vehicle_id": vehicle,
                "total_amount": 120.5
            })),
            None,
        )
        .await;
    assert_eq!(invoice.status, StatusCode::CREATED);
    assert!(invoice.json()["data"]["invoice_id"].is_i64());

    let before = app.service(id).await.unwrap();
    let response = app.json(Method::DELETE, &format!("/services/{}", id), None, None).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(
        response.json()["message"],
        "Cannot delete service request because an invoice exists for this service"
    );

    assert_eq!(app.service(id).await, Some(before));
    assert!(!app.mechanic(mechanic).await.is_available);
    let invoices = app.get("/api/invoices/", None).await.json();
    assert_eq!(invoices["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_service_without_invoice() {
    let app = TestApp::new();
    let customer = app.seed_customer("600000009").await;
    let vehicle = app.seed_vehicle(customer, "9999-III").await;
    let id = create_service(
        &app,
        json!({
            "vehicle_id": vehicle,
            "service_type": "Lights",
            "service_date": "2024-06-02",
            "problem_description": "Blown bulb"
        }),
    )
    .await
    .json()["data"]["id"]
        .as_i64()
        .unwrap();

    let response = app.json(Method::DELETE, &format!("/services/{}", id), None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["message"], "Service request deleted successfully");
    assert!(app.service(id).await.is_none());

    let again = app.json(Method::DELETE, &format!("/services/{}", id), None, None).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invoice_rules() {
    let app = TestApp::new();
    let customer = app.seed_customer("600000010").await;
    let vehicle = app.seed_vehicle(customer, "1010-JJJ").await;
    let id = create_service(
        &app,
        json!({
            "vehicle_id": vehicle,
            "service_type": "Paint",
            "service_date": "2024-07-01",
            "problem_description": "Scratch"
        }),
    )
    .await
    .json()["data"]["id"]
        .as_i64()
        .unwrap();

    let zero = app
        .json(
            Method::POST,
            "/api/invoices/create",
            Some(json!({ "service_id": id, "customer_id": customer, "vehicle_id": vehicle, "total_amount": 0 })),
            None,
        )
        .await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);
    assert_eq!(zero.json()["message"], "Amount must be a positive number");

    let created = app
        .json(
            Method::POST,
            "/api/invoices/create",
            Some(json!({ "service_id": id, "customer_id": customer, "vehicle_id": vehicle, "total_amount": "80.00" })),
            None,
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);

    let duplicate = app
        .json(
            Method::POST,
            "/api/invoices/create",
            Some(json!({ "service_id": id, "customer_id": customer, "vehicle_id": vehicle, "total_amount": 10 })),
            None,
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.json()["message"], "Invoice already exists for this service");
}

#[tokio::test]
async fn test_vehicle_api() {
    let app = TestApp::new();
    let customer = app.seed_customer("600000011").await;

    let body = json!({
        "customer_id": customer,
        "vehicle_number": "1111-KKK",
        "vehicle_type": "Van",
        "brand": "Ford",
        "model": "Transit"
    });
    let created = app.json(Method::POST, "/vehicles/", Some(body.clone()), None).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.json()["message"], "Vehicle added successfully");

    let duplicate = app.json(Method::POST, "/vehicles/", Some(body), None).await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let orphan = app
        .json(
            Method::POST,
            "/vehicles/",
            Some(json!({
                "customer_id": 9999,
                "vehicle_number": "0000-ZZZ",
                "vehicle_type": "Van",
                "brand": "Ford",
                "model": "Transit"
            })),
            None,
        )
        .await;
    assert_eq!(orphan.status, StatusCode::NOT_FOUND);
    assert_eq!(orphan.json()["message"], "Customer not found");

    let list = app.get("/vehicles/", None).await.json();
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_mechanic_api_defaults_to_available() {
    let app = TestApp::new();
    let created = app
        .json(
            Method::POST,
            "/api/mechanics/create",
            Some(json!({ "name": "Luis", "phone": "711111111" })),
            None,
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.json()["data"]["id"].as_i64().unwrap();
    assert!(app.mechanic(id).await.is_available);

    let missing = app
        .json(Method::POST, "/api/mechanics/create", Some(json!({ "name": "Luis" })), None)
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_customers_require_session_and_admin_delete() {
    let app = TestApp::new();

    let anonymous = app.get("/api/customers", None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.json()["success"], false);

    let staff = app.session_for("staff1", Role::Staff).await;
    let created = app
        .json(
            Method::POST,
            "/api/customers",
            Some(json!({ "name": "Marta", "phone": "622222222" })),
            Some(&staff),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.json()["data"]["id"].as_i64().unwrap();

    let forbidden = app
        .json(Method::DELETE, &format!("/api/customers/{}", id), None, Some(&staff))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let admin = app.session_for("admin1", Role::Admin).await;
    let deleted = app
        .json(Method::DELETE, &format!("/api/customers/{}", id), None, Some(&admin))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.json()["message"], "Customer deleted");
}

#[tokio::test]
async fn test_register_and_login_flow() {
    let app = TestApp::new();

    let registered = app
        .json(
            Method::POST,
            "/api/auth/register",
            Some(json!({ "username": "carla", "email": "carla@garage.test", "password": "secret123" })),
            None,
        )
        .await;
    assert_eq!(registered.status, StatusCode::CREATED);

    let duplicate = app
        .json(
            Method::POST,
            "/api/auth/register",
            Some(json!({ "username": "carla2", "email": "carla@garage.test", "password": "secret123" })),
            None,
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.json()["message"], "Email already registered");

    let wrong = app
        .json(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": "carla@garage.test", "password": "nope" })),
            None,
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.json()["message"], "Invalid credentials");

    let login = app
        .json(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": "carla@garage.test", "password": "secret123" })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    let body = login.json();
    assert_eq!(body["data"]["user"]["role"], "admin");
    assert!(body["data"]["user"].get("password_hash").is_none());

    let session = login.cookie("garage_session").expect("session cookie");
    let customers = app
        .get("/api/customers", Some(&format!("garage_session={}", session)))
        .await;
    assert_eq!(customers.status, StatusCode::OK);
    assert_eq!(customers.json()["message"], "Customers fetched successfully");
}
