//! Integration tests for the order queue.
//!
//! Tests cover:
//! - Queue positions on creation and after cancel/complete
//! - Superuser-only mutations and inline re-authentication
//! - Page-relative drag-and-drop reordering
//! - Queue pagination and search

mod common;

use axum::http::Method;
use common::{response_json, TestApp, STAFF, SUPERUSER};
use sea_orm::{EntityTrait, QueryOrder};
use serde_json::json;

use backoffice_api::entities::{order, OrderStatus};

/// Active orders as `(order_id, position)` in queue order.
async fn positions(app: &TestApp) -> Vec<(i32, Option<i32>)> {
    order::Entity::find()
        .order_by_asc(order::Column::OrderQueue)
        .order_by_asc(order::Column::OrderId)
        .all(&*app.state.db)
        .await
        .expect("load orders")
        .into_iter()
        .filter(|o| o.status.is_active())
        .map(|o| (o.order_id, o.order_queue))
        .collect()
}

async fn seeded_queue(app: &TestApp, count: usize) -> Vec<i32> {
    let service_id = app.seed_service("Tarpaulin Printing").await;
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        ids.push(app.create_order(service_id, &format!("Customer {}", i)).await);
    }
    ids
}

#[tokio::test]
async fn new_orders_join_the_end_of_the_queue() {
    let app = TestApp::new().await;
    let ids = seeded_queue(&app, 3).await;

    assert_eq!(
        positions(&app).await,
        vec![(ids[0], Some(1)), (ids[1], Some(2)), (ids[2], Some(3))]
    );

    let response = app
        .request(Method::GET, "/orders", None, Some(&app.staff_token))
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["orders_queue"]["total"], 3);
    assert_eq!(body["orders_queue"]["orders"][0]["status"], "PENDING");
    assert_eq!(body["orders_queue"]["orders"][0]["service_name"], "Tarpaulin Printing");
    assert_eq!(body["completed_orders"]["total"], 0);
}

#[tokio::test]
async fn order_listing_requires_a_token() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/orders", None, None).await;
    assert_eq!(response.status(), 401);

    let response = app
        .request(Method::GET, "/orders", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn order_with_past_deadline_is_rejected() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Mug Printing").await;
    let mut body = common::order_body(service_id, "Late Customer");
    body["deadline"] = json!("2001-01-01T00:00:00Z");

    let response = app
        .request(Method::POST, "/orders", Some(body), Some(&app.staff_token))
        .await;
    assert_eq!(response.status(), 400);
    let body = response_json(response).await;
    assert_eq!(body["errors"]["deadline"][0], "The deadline must be in the future.");
    assert!(positions(&app).await.is_empty());
}

#[tokio::test]
async fn staff_cannot_cancel_orders() {
    let app = TestApp::new().await;
    let ids = seeded_queue(&app, 2).await;

    let response = app
        .request(
            Method::POST,
            &format!("/orders/{}/cancel/", ids[0]),
            None,
            Some(&app.staff_token),
        )
        .await;
    assert_eq!(response.status(), 403);
    assert_eq!(positions(&app).await.len(), 2);
}

#[tokio::test]
async fn cancelling_closes_the_gap_in_the_queue() {
    let app = TestApp::new().await;
    let ids = seeded_queue(&app, 3).await;

    let response = app
        .request(
            Method::POST,
            &format!("/orders/{}/cancel/?page_pp=1", ids[1]),
            None,
            Some(&app.superuser_token),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["orders_queue"]["total"], 2);

    assert_eq!(
        positions(&app).await,
        vec![(ids[0], Some(1)), (ids[2], Some(2))]
    );

    let cancelled = order::Entity::find_by_id(ids[1])
        .one(&*app.state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.order_queue, None);
    assert!(cancelled.completed_or_cancelled.is_some());

    // A second cancellation is a state conflict.
    let response = app
        .request(
            Method::POST,
            &format!("/orders/{}/cancel/", ids[1]),
            None,
            Some(&app.superuser_token),
        )
        .await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn completed_orders_move_to_history() {
    let app = TestApp::new().await;
    let ids = seeded_queue(&app, 2).await;

    let response = app
        .request(
            Method::POST,
            &format!("/orders/{}/complete/", ids[0]),
            None,
            Some(&app.superuser_token),
        )
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(positions(&app).await, vec![(ids[1], Some(1))]);

    let response = app
        .request(
            Method::GET,
            "/get_paginated_orders/?page_cc=1",
            None,
            Some(&app.staff_token),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["completed_orders"]["total"], 1);
    assert_eq!(body["completed_orders"]["orders"][0]["order_id"], ids[0]);
    assert_eq!(body["completed_orders"]["orders"][0]["status"], "COMPLETED");

    // A cancelled order cannot be completed.
    let response = app
        .request(
            Method::POST,
            &format!("/orders/{}/cancel/", ids[1]),
            None,
            Some(&app.superuser_token),
        )
        .await;
    assert_eq!(response.status(), 200);
    let response = app
        .request(
            Method::POST,
            &format!("/orders/{}/complete/", ids[1]),
            None,
            Some(&app.superuser_token),
        )
        .await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn completed_order_can_still_be_cancelled() {
    let app = TestApp::new().await;
    let ids = seeded_queue(&app, 3).await;

    let response = app
        .request(
            Method::POST,
            &format!("/orders/{}/complete/", ids[1]),
            None,
            Some(&app.superuser_token),
        )
        .await;
    assert_eq!(response.status(), 200);
    let completed_at = order::Entity::find_by_id(ids[1])
        .one(&*app.state.db)
        .await
        .expect("load order")
        .expect("order exists")
        .completed_or_cancelled
        .expect("completion time");

    let response = app
        .request(
            Method::POST,
            &format!("/orders/{}/cancel/", ids[1]),
            None,
            Some(&app.superuser_token),
        )
        .await;
    assert_eq!(response.status(), 200);

    let voided = order::Entity::find_by_id(ids[1])
        .one(&*app.state.db)
        .await
        .expect("load order")
        .expect("order exists");
    assert_eq!(voided.status, OrderStatus::Cancelled);
    assert_eq!(voided.order_queue, None);
    assert!(voided.completed_or_cancelled.expect("cancel time") >= completed_at);
    assert_eq!(positions(&app).await, vec![(ids[0], Some(1)), (ids[2], Some(2))]);

    // Cancelling twice is still a conflict.
    let response = app
        .request(
            Method::POST,
            &format!("/orders/{}/cancel/", ids[1]),
            None,
            Some(&app.superuser_token),
        )
        .await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn unknown_order_is_not_found() {
    let app = TestApp::new().await;
    let response = app
        .request(
            Method::POST,
            "/orders/999/complete/",
            None,
            Some(&app.superuser_token),
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn authorize_cancel_requires_superuser_credentials() {
    let app = TestApp::new().await;
    let ids = seeded_queue(&app, 2).await;

    let response = app
        .request(
            Method::POST,
            "/authorize-cancel/",
            Some(json!({"username": STAFF.0, "password": STAFF.1, "order_id": ids[0]})),
            Some(&app.staff_token),
        )
        .await;
    assert_eq!(response.status(), 403);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Invalid superuser credentials.");

    let response = app
        .request(
            Method::POST,
            "/authorize-cancel/",
            Some(json!({
                "username": SUPERUSER.0,
                "password": "wrong-password",
                "order_id": ids[0],
            })),
            Some(&app.staff_token),
        )
        .await;
    assert_eq!(response.status(), 403);

    let response = app
        .request(
            Method::POST,
            "/authorize-cancel/",
            Some(json!({"username": SUPERUSER.0, "password": SUPERUSER.1})),
            Some(&app.staff_token),
        )
        .await;
    assert_eq!(response.status(), 400);

    let response = app
        .request(
            Method::POST,
            "/authorize-cancel/",
            Some(json!({
                "username": SUPERUSER.0,
                "password": SUPERUSER.1,
                "order_id": ids[0],
                "page_pp": 7,
            })),
            Some(&app.staff_token),
        )
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(positions(&app).await, vec![(ids[1], Some(1))]);

    // The requested page is clamped to what is left after the cancel.
    let body = response_json(response).await;
    assert_eq!(body["orders_queue"]["page"], 1);
    assert_eq!(body["orders_queue"]["total"], 1);
}

#[tokio::test]
async fn reorder_rewrites_positions_for_the_page() {
    let app = TestApp::new().await;
    let ids = seeded_queue(&app, 3).await;

    let response = app
        .request(
            Method::POST,
            "/orders/update_order_queue/",
            Some(json!({"order": [ids[2], ids[0], ids[1]], "page_pp": 1})),
            Some(&app.superuser_token),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["orders_queue"]["orders"][0]["order_id"], ids[2]);

    assert_eq!(
        positions(&app).await,
        vec![(ids[2], Some(1)), (ids[0], Some(2)), (ids[1], Some(3))]
    );
}

#[tokio::test]
async fn reorder_is_rejected_for_staff_and_unknown_ids() {
    let app = TestApp::new().await;
    let ids = seeded_queue(&app, 2).await;
    let before = positions(&app).await;

    let response = app
        .request(
            Method::POST,
            "/orders/update_order_queue/",
            Some(json!({"order": [ids[1], ids[0]], "page_pp": 1})),
            Some(&app.staff_token),
        )
        .await;
    assert_eq!(response.status(), 403);

    let response = app
        .request(
            Method::POST,
            "/orders/update_order_queue/",
            Some(json!({"order": [ids[1], 4242], "page_pp": 1})),
            Some(&app.superuser_token),
        )
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(positions(&app).await, before);
}

#[tokio::test]
async fn reorder_on_second_page_keeps_first_page() {
    let app = TestApp::with_config(|cfg| cfg.queue_page_size = 2).await;
    let ids = seeded_queue(&app, 4).await;

    let response = app
        .request(
            Method::POST,
            "/orders/update_order_queue/",
            Some(json!({"order": [ids[3], ids[2]], "page_pp": 2})),
            Some(&app.superuser_token),
        )
        .await;
    assert_eq!(response.status(), 200);

    assert_eq!(
        positions(&app).await,
        vec![
            (ids[0], Some(1)),
            (ids[1], Some(2)),
            (ids[3], Some(3)),
            (ids[2], Some(4)),
        ]
    );
}

#[tokio::test]
async fn out_of_range_page_falls_back_to_last_page() {
    let app = TestApp::with_config(|cfg| cfg.queue_page_size = 2).await;
    seeded_queue(&app, 3).await;

    let response = app
        .request(
            Method::GET,
            "/refresh-order-queue/?page_pp=99",
            None,
            Some(&app.staff_token),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["orders_queue"]["page"], 2);
    assert_eq!(body["orders_queue"]["orders"].as_array().map(Vec::len), Some(1));

    let response = app
        .request(
            Method::GET,
            "/refresh-order-queue/?page_pp=abc",
            None,
            Some(&app.staff_token),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["orders_queue"]["page"], 1);
}

#[tokio::test]
async fn search_matches_customer_service_and_status() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Sticker Printing").await;
    app.create_order(service_id, "Maria Santos").await;
    app.create_order(service_id, "Jose Rizal Jr").await;

    for (query, expected) in
        [("maria", 1), ("STICKER", 2), ("pending", 2), ("nothing", 0), ("", 0)]
    {
        let response = app
            .request(
                Method::GET,
                &format!("/orders/search/?query={}", query),
                None,
                Some(&app.staff_token),
            )
            .await;
        assert_eq!(response.status(), 200);
        let body = response_json(response).await;
        assert_eq!(
            body["orders"].as_array().map(Vec::len),
            Some(expected),
            "query {:?}",
            query
        );
    }
}

#[tokio::test]
async fn verify_superuser_reports_the_flag() {
    let app = TestApp::new().await;
    let response = app
        .request(Method::GET, "/verify-superuser/", None, Some(&app.superuser_token))
        .await;
    assert_eq!(response_json(response).await["is_superuser"], true);

    let response = app
        .request(Method::GET, "/verify-superuser/", None, Some(&app.staff_token))
        .await;
    assert_eq!(response_json(response).await["is_superuser"], false);
}

#[tokio::test]
async fn login_issues_a_token() {
    let app = TestApp::new().await;
    let response = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({"username": SUPERUSER.0, "password": SUPERUSER.1})),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["is_superuser"], true);
    let token = body["access_token"].as_str().expect("token").to_string();

    let response = app.request(Method::GET, "/orders", None, Some(&token)).await;
    assert_eq!(response.status(), 200);

    let response = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({"username": SUPERUSER.0, "password": "nope"})),
            None,
        )
        .await;
    assert_eq!(response.status(), 401);
}
