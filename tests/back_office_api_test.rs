//! Integration tests for the catalog, production, inventory, payment and
//! customer endpoints.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::{json, Value};

use backoffice_api::{
    entities::{inventory, inventory::UnitOfMeasurement, order, supplier, OrderStatus},
    services::catalog::upsert_category,
};

fn decimal(value: &Value) -> Decimal {
    value
        .as_str()
        .expect("decimal rendered as text")
        .parse()
        .expect("decimal text")
}

/// One material in `category`, optionally tied to an existing supplier.
async fn stock_material(
    app: &TestApp,
    name: &str,
    category: &str,
    stock_level: i32,
    reorder_threshold: i32,
    supplier_id: Option<i32>,
) -> i32 {
    let db = &*app.state.db;
    let category_id = upsert_category(db, category).await.expect("category");
    inventory::ActiveModel {
        name: Set(name.to_string()),
        category_id: Set(Some(category_id)),
        stock_level: Set(stock_level),
        reorder_threshold: Set(reorder_threshold),
        supplier_id: Set(supplier_id),
        unit_of_measurement: Set(UnitOfMeasurement::Liters),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert material")
    .material_id
}

async fn submit_production(app: &TestApp, order_id: i32, priority: &str) -> i32 {
    let response = app
        .request(
            Method::POST,
            "/submit-production/",
            Some(json!({
                "order": order_id,
                "priority": priority,
                "equipment_assigned": {"printer": "Roland VG3"},
            })),
            Some(&app.staff_token),
        )
        .await;
    assert_eq!(response.status(), 201);
    let body = response_json(response).await;
    body["production"]["job_id"].as_i64().expect("job id") as i32
}

#[tokio::test]
async fn customization_and_pricing_options_follow_the_service() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Mug Printing").await;
    let token = Some(app.staff_token.as_str());

    let response = app
        .request(
            Method::GET,
            &format!("/get-customization-options/?service_id={}", service_id),
            None,
            token,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    let options = body["options"].as_array().expect("options");
    assert_eq!(options.len(), 1);
    // Option names are stored normalized.
    assert_eq!(options[0]["name"], "size");
    let option_id = options[0]["id"].as_i64().expect("option id");

    let response = app
        .request(
            Method::GET,
            &format!(
                "/get-pricing-options/?service_id={}&customization_ids={}",
                service_id, option_id
            ),
            None,
            token,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    let rows = body[option_id.to_string()].as_array().expect("grouped rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["description"], "A4");
    assert_eq!(decimal(&rows[0]["price"]), dec!(100));

    let missing = app
        .request(Method::GET, "/get-customization-options/", None, token)
        .await;
    assert_eq!(missing.status(), 400);

    let unknown = app
        .request(
            Method::GET,
            "/get-customization-options/?service_id=9999",
            None,
            token,
        )
        .await;
    assert_eq!(unknown.status(), 404);

    let no_ids = app
        .request(
            Method::GET,
            &format!("/get-pricing-options/?service_id={}", service_id),
            None,
            token,
        )
        .await;
    assert_eq!(no_ids.status(), 400);
}

#[tokio::test]
async fn catalog_records_can_be_created_and_listed() {
    let app = TestApp::new().await;
    let token = Some(app.staff_token.as_str());

    let response = app
        .request(
            Method::POST,
            "/services",
            Some(json!({"name": "Sticker Printing", "customization_options": ["Shape", "Size"]})),
            token,
        )
        .await;
    assert_eq!(response.status(), 201);
    let body = response_json(response).await;
    assert_eq!(body["service"]["customization_options"].as_array().map(Vec::len), Some(2));

    let short = app
        .request(Method::POST, "/services", Some(json!({"name": "ab"})), token)
        .await;
    assert_eq!(short.status(), 400);
    let body = response_json(short).await;
    assert!(body["errors"]["name"].is_array());

    let response = app
        .request(
            Method::POST,
            "/equipment",
            Some(json!({
                "name": "Roland VG3",
                "description": "Eco-solvent printer",
                "condition": "working",
                "categories": ["Ink", "Vinyl"],
            })),
            token,
        )
        .await;
    assert_eq!(response.status(), 201);

    let supplier = json!({
        "supplier_name": "Ink Depot",
        "contact_person": "Ana",
        "phone_number": "09171234567",
        "email": "sales@inkdepot.com",
    });
    let response = app
        .request(Method::POST, "/suppliers", Some(supplier.clone()), token)
        .await;
    assert_eq!(response.status(), 201);

    let duplicate = app
        .request(Method::POST, "/suppliers", Some(supplier), token)
        .await;
    assert_eq!(duplicate.status(), 400);
    let body = response_json(duplicate).await;
    assert!(body["errors"]["supplier_name"].is_array());

    for (uri, key, expected) in [
        ("/services", "services", 1),
        ("/equipment", "equipment", 1),
        ("/suppliers", "suppliers", 1),
    ] {
        let response = app.request(Method::GET, uri, None, token).await;
        assert_eq!(response.status(), 200);
        let body = response_json(response).await;
        assert_eq!(body[key].as_array().map(Vec::len), Some(expected), "{}", uri);
    }
}

#[tokio::test]
async fn catalog_requires_authentication() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/services", None, None).await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn customer_detail_includes_orders_and_payments() {
    let app = TestApp::new().await;
    let token = Some(app.staff_token.as_str());

    let response = app
        .request(
            Method::POST,
            "/customers",
            Some(json!({
                "name": "Maria Santos",
                "contact_number": "09181234567",
                "email": "maria@mail.test",
            })),
            token,
        )
        .await;
    assert_eq!(response.status(), 201);
    let body = response_json(response).await;
    let customer_id = body["customer"]["customer_id"].as_i64().expect("customer id");

    let invalid = app
        .request(
            Method::POST,
            "/customers",
            Some(json!({"name": "Bo", "contact_number": "123", "email": "nope"})),
            token,
        )
        .await;
    assert_eq!(invalid.status(), 400);
    let body = response_json(invalid).await;
    for field in ["name", "contact_number", "email"] {
        assert!(body["errors"][field].is_array(), "{} should fail", field);
    }

    let service_id = app.seed_service("Tarpaulin Printing").await;
    let order_id = app
        .request(
            Method::POST,
            "/orders",
            Some(json!({
                "customer_id": customer_id,
                "service_id": service_id,
                "deadline": (chrono::Utc::now() + chrono::Duration::days(2)).to_rfc3339(),
            })),
            token,
        )
        .await;
    assert_eq!(order_id.status(), 201);
    let order_id = response_json(order_id).await["order"]["order_id"]
        .as_i64()
        .expect("order id");

    let paid = app
        .request(
            Method::POST,
            "/new_payment/",
            Some(json!({
                "order_id": order_id,
                "amount": "250",
                "amount_paid": "250",
                "status": "PAID",
            })),
            token,
        )
        .await;
    assert_eq!(paid.status(), 201);

    let response = app
        .request(Method::GET, &format!("/customers/{}", customer_id), None, token)
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["name"], "Maria Santos");
    assert_eq!(body["orders"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["payments"].as_array().map(Vec::len), Some(1));

    let list = app.request(Method::GET, "/customers", None, token).await;
    let body = response_json(list).await;
    assert_eq!(body["customers"].as_array().map(Vec::len), Some(1));

    let missing = app
        .request(Method::GET, "/customers/9999", None, token)
        .await;
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn payments_apply_discounts_and_link_the_order() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Tarpaulin Printing").await;
    let order_id = app.create_order(service_id, "Pedro Reyes").await;
    let token = Some(app.staff_token.as_str());

    let response = app
        .request(
            Method::POST,
            "/new_payment/",
            Some(json!({
                "order_id": order_id,
                "amount": "500",
                "amount_paid": "200",
                "discount": "10",
                "discount_type": "percentage",
                "discount_name": "Loyalty",
            })),
            token,
        )
        .await;
    assert_eq!(response.status(), 201);
    let body = response_json(response).await;
    let payment = &body["payment"];
    assert_eq!(decimal(&payment["final_price"]), dec!(450));
    assert_eq!(payment["status"], "PENDING");
    let payment_id = payment["payment_id"].as_i64().expect("payment id") as i32;

    let stored = order::Entity::find_by_id(order_id)
        .one(&*app.state.db)
        .await
        .expect("load order")
        .expect("order exists");
    assert_eq!(stored.payment_id, Some(payment_id));

    let fixed = app
        .request(
            Method::POST,
            "/new_payment/",
            Some(json!({
                "order_id": order_id,
                "amount": "100",
                "discount": "150",
                "discount_type": "fixed",
            })),
            token,
        )
        .await;
    let body = response_json(fixed).await;
    assert_eq!(decimal(&body["payment"]["final_price"]), Decimal::ZERO);

    let listed = app
        .request(
            Method::GET,
            &format!("/payments?order_id={}", order_id),
            None,
            token,
        )
        .await;
    let body = response_json(listed).await;
    assert_eq!(body["payments"].as_array().map(Vec::len), Some(2));

    let orphan = app
        .request(
            Method::POST,
            "/new_payment/",
            Some(json!({"order_id": 9999, "amount": "10"})),
            token,
        )
        .await;
    assert_eq!(orphan.status(), 400);
    let body = response_json(orphan).await;
    assert!(body["errors"]["order_id"].is_array());

    let negative = app
        .request(
            Method::POST,
            "/new_payment/",
            Some(json!({"order_id": order_id, "amount": "-1"})),
            token,
        )
        .await;
    assert_eq!(negative.status(), 400);
}

#[tokio::test]
async fn submitting_production_starts_the_order() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Tarpaulin Printing").await;
    let order_id = app.create_order(service_id, "Jose Cruz").await;
    let material_id = stock_material(&app, "Cyan Ink", "Ink", 5, 2, None).await;

    let response = app
        .request(
            Method::POST,
            "/submit-production/",
            Some(json!({
                "order": order_id,
                "materials": [material_id],
                "quality_checks": [{"parameter": "Color", "result": "Pass"}],
                "priority": "HIGH",
            })),
            Some(&app.staff_token),
        )
        .await;
    assert_eq!(response.status(), 201);
    let body = response_json(response).await;
    assert_eq!(body["production"]["status"], "IN_PROGRESS");
    assert_eq!(body["production"]["priority"], "HIGH");

    let stored = order::Entity::find_by_id(order_id)
        .one(&*app.state.db)
        .await
        .expect("load order")
        .expect("order exists");
    assert_eq!(stored.status, OrderStatus::InProgress);
    assert!(stored.order_queue.is_some());

    let unknown_order = app
        .request(
            Method::POST,
            "/submit-production/",
            Some(json!({"order": 9999})),
            Some(&app.staff_token),
        )
        .await;
    assert_eq!(unknown_order.status(), 404);

    let unknown_material = app
        .request(
            Method::POST,
            "/submit-production/",
            Some(json!({"order": order_id, "materials": [9999]})),
            Some(&app.staff_token),
        )
        .await;
    assert_eq!(unknown_material.status(), 400);
}

#[tokio::test]
async fn production_filters_by_priority_and_status() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Tarpaulin Printing").await;
    let first = app.create_order(service_id, "Jose Cruz").await;
    let second = app.create_order(service_id, "Lina Bautista").await;
    let urgent = submit_production(&app, first, "HIGH").await;
    submit_production(&app, second, "LOW").await;
    let token = Some(app.staff_token.as_str());

    let response = app
        .request(
            Method::GET,
            "/filter/production-by-priority/?priority=HIGH",
            None,
            token,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    let jobs = body["productions"].as_array().expect("productions");
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["job_id"], urgent);

    let bad = app
        .request(
            Method::GET,
            "/filter/production-by-priority/?priority=URGENT",
            None,
            token,
        )
        .await;
    assert_eq!(bad.status(), 400);

    let response = app
        .request(
            Method::GET,
            "/filter/production-by-status/?status=IN_PROGRESS&priority=LOW",
            None,
            token,
        )
        .await;
    let body = response_json(response).await;
    let labels = body["productions"].as_array().expect("labels");
    assert_eq!(labels.len(), 1);
    assert!(labels[0]["name"]
        .as_str()
        .expect("label")
        .ends_with("Lina Bautista"));

    let response = app
        .request(
            Method::POST,
            &format!("/production/{}/status/", urgent),
            Some(json!({"status": "ON_HOLD"})),
            token,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["production"]["status"], "ON_HOLD");

    let bad_status = app
        .request(
            Method::POST,
            &format!("/production/{}/status/", urgent),
            Some(json!({"status": "PAUSED"})),
            token,
        )
        .await;
    assert_eq!(bad_status.status(), 400);

    let response = app
        .request(
            Method::GET,
            &format!("/production/search/?q={}", urgent),
            None,
            token,
        )
        .await;
    let body = response_json(response).await;
    let ids = body["job_ids"].as_array().expect("job ids");
    assert!(ids.iter().any(|id| id == &json!(urgent)));
}

#[tokio::test]
async fn quality_checks_are_added_then_modified() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Tarpaulin Printing").await;
    let order_id = app.create_order(service_id, "Jose Cruz").await;
    let job_id = submit_production(&app, order_id, "MODERATE").await;
    let token = Some(app.staff_token.as_str());
    let save_uri = format!("/save_quality_check/{}/Alignment/", job_id);

    let response = app
        .request(
            Method::POST,
            &save_uri,
            Some(json!({"parameter": "Alignment", "result": "Fail", "notes": "Off by 2mm"})),
            token,
        )
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(response_json(response).await["save_type"], "Added");

    let response = app
        .request(
            Method::POST,
            &save_uri,
            Some(json!({"parameter": "Alignment", "result": "Pass"})),
            token,
        )
        .await;
    assert_eq!(response_json(response).await["save_type"], "Modified");

    let response = app
        .request(
            Method::GET,
            &format!("/get_quality_check/{}/Alignment/", job_id),
            None,
            token,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["result"], "Pass");

    let response = app
        .request(
            Method::GET,
            &format!("/fetch/quality-checks/{}/", job_id),
            None,
            token,
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["quality_checks"].as_array().map(Vec::len), Some(1));

    let missing = app
        .request(
            Method::GET,
            &format!("/get_quality_check/{}/Gloss/", job_id),
            None,
            token,
        )
        .await;
    assert_eq!(missing.status(), 404);

    let no_job = app
        .request(Method::GET, "/fetch/quality-checks/9999/", None, token)
        .await;
    assert_eq!(no_job.status(), 404);

    let blank = app
        .request(
            Method::POST,
            &save_uri,
            Some(json!({"parameter": "Alignment", "result": " "})),
            token,
        )
        .await;
    assert_eq!(blank.status(), 400);
}

#[tokio::test]
async fn inventory_views_group_and_flag_materials() {
    let app = TestApp::new().await;
    let token = Some(app.staff_token.as_str());
    let depot = supplier::ActiveModel {
        supplier_name: Set("Ink Depot".to_string()),
        phone_number: Set(Some("09171234567".to_string())),
        email: Set(Some("sales@inkdepot.com".to_string())),
        ..Default::default()
    }
    .insert(&*app.state.db)
    .await
    .expect("insert supplier");

    stock_material(&app, "Cyan Ink", "Ink", 1, 3, Some(depot.id)).await;
    stock_material(&app, "Glossy Vinyl", "Vinyl", 10, 2, None).await;

    let response = app
        .request(Method::GET, "/inventory/alerts/", None, token)
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    let low = body["low_stock"].as_array().expect("low stock");
    assert_eq!(low.len(), 1);
    assert_eq!(low[0]["name"], "Cyan Ink");
    assert_eq!(low[0]["supplier_name"], "Ink Depot");
    assert_eq!(low[0]["needs_reorder"], true);

    let response = app
        .request(Method::GET, "/inventory/management/", None, token)
        .await;
    let body = response_json(response).await;
    let groups = body["categories"].as_array().expect("categories");
    assert_eq!(groups.len(), 2);
    let vinyl = groups
        .iter()
        .find(|g| g["category"] == "Vinyl")
        .expect("vinyl group");
    assert_eq!(vinyl["materials"][0]["supplier_contact"], "N/A");

    let response = app
        .request(
            Method::POST,
            "/contact-supplier/",
            Some(json!({"supplier_name": "Ink Depot", "material_name": "Cyan Ink"})),
            token,
        )
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(response_json(response).await["message"], "Request sent to Ink Depot.");

    let unknown = app
        .request(
            Method::POST,
            "/contact-supplier/",
            Some(json!({"supplier_name": "Nobody"})),
            token,
        )
        .await;
    assert_eq!(unknown.status(), 404);
}

#[tokio::test]
async fn materials_are_fetched_through_equipment_categories() {
    let app = TestApp::new().await;
    let token = Some(app.staff_token.as_str());

    let response = app
        .request(
            Method::POST,
            "/equipment",
            Some(json!({
                "name": "Roland VG3",
                "description": "Eco-solvent printer",
                "condition": "new",
                "categories": ["Ink"],
            })),
            token,
        )
        .await;
    assert_eq!(response.status(), 201);
    stock_material(&app, "Cyan Ink", "Ink", 5, 2, None).await;
    stock_material(&app, "Glossy Vinyl", "Vinyl", 5, 2, None).await;

    let response = app
        .request(
            Method::GET,
            "/fetch-materials/?equipment_name=Roland%20VG3",
            None,
            token,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    let materials = body["materials"].as_array().expect("materials");
    assert_eq!(materials.len(), 1);
    assert_eq!(materials[0]["name"], "Cyan Ink");

    let missing = app
        .request(Method::GET, "/fetch-materials/", None, token)
        .await;
    assert_eq!(missing.status(), 400);

    let unknown = app
        .request(
            Method::GET,
            "/fetch-materials/?equipment_name=Cutter",
            None,
            token,
        )
        .await;
    assert_eq!(unknown.status(), 404);
}

#[tokio::test]
async fn health_reports_database_up() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "up");
    assert_eq!(body["data"]["database"], "up");
}
