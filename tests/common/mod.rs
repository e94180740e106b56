#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use erpnext_material_flow::{ErpNextClient, ErpNextCredentials, ServiceFactory};
use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path},
    Match, Mock, MockServer, Request, ResponseTemplate,
};

pub const API_KEY: &str = "test-key";
pub const API_SECRET: &str = "test-secret";
pub const AUTH_HEADER: &str = "token test-key:test-secret";

pub fn credentials_for(server: &MockServer) -> ErpNextCredentials {
    ErpNextCredentials::new(server.uri(), API_KEY, API_SECRET)
}

pub fn client_for(server: &MockServer) -> ErpNextClient {
    ErpNextClient::new(&credentials_for(server), Duration::from_secs(5))
        .expect("mock server URI is a valid domain")
}

pub fn factory_for(server: &MockServer) -> ServiceFactory {
    ServiceFactory::new(Arc::new(client_for(server)), 1)
}

/// Matches a query parameter holding JSON, independent of key order.
pub struct JsonQueryParam {
    name: &'static str,
    expected: Value,
}

pub fn json_query_param(name: &'static str, expected: Value) -> JsonQueryParam {
    JsonQueryParam { name, expected }
}

impl Match for JsonQueryParam {
    fn matches(&self, request: &Request) -> bool {
        request
            .url
            .query_pairs()
            .find(|(key, _)| key == self.name)
            .and_then(|(_, value)| serde_json::from_str::<Value>(&value).ok())
            .map_or(false, |value| value == self.expected)
    }
}

pub fn work_order_body(name: &str, wip: Option<&str>, items: &[(&str, &str, f64)]) -> Value {
    let required_items: Vec<Value> = items
        .iter()
        .map(|(code, wh, qty)| {
            json!({"item_code": code, "source_warehouse": wh, "required_qty": qty})
        })
        .collect();
    json!({
        "data": {
            "name": name,
            "item_name": "Assembled Desk",
            "sales_order": "SAL-ORD-0001",
            "owner": "planner@example.com",
            "creation": "2024-03-01 09:30:00.123456",
            "wip_warehouse": wip,
            "required_items": required_items,
        }
    })
}

/// Serves `GET /api/resource/Work Order/<name>`.
pub async fn mount_work_order(server: &MockServer, name: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/resource/Work%20Order/{}", name)))
        .and(header("Authorization", AUTH_HEADER))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Serves the Bin lookup for one item/warehouse pair; `None` answers with no record.
pub async fn mount_bin(server: &MockServer, item_code: &str, warehouse: &str, actual_qty: Option<f64>) {
    let data = match actual_qty {
        Some(qty) => json!([{"item_code": item_code, "warehouse": warehouse, "actual_qty": qty}]),
        None => json!([]),
    };
    Mock::given(method("GET"))
        .and(path("/api/resource/Bin"))
        .and(header("Authorization", AUTH_HEADER))
        .and(json_query_param(
            "filters",
            json!({"item_code": item_code, "warehouse": warehouse}),
        ))
        .and(json_query_param(
            "fields",
            json!(["item_code", "warehouse", "actual_qty"]),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
        .mount(server)
        .await;
}

/// Accepts `POST /api/resource/<doctype>` and echoes back a record named `name`.
pub async fn mount_create(server: &MockServer, encoded_doctype: &str, name: &str) {
    let doctype = encoded_doctype.replace("%20", " ");
    Mock::given(method("POST"))
        .and(path(format!("/api/resource/{}", encoded_doctype)))
        .and(header("Authorization", AUTH_HEADER))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"name": name, "doctype": doctype, "docstatus": 1}
        })))
        .mount(server)
        .await;
}

/// JSON bodies of every POST the server received for `encoded_doctype`.
pub async fn posted_bodies(server: &MockServer, encoded_doctype: &str) -> Vec<Value> {
    let expected_path = format!("/api/resource/{}", encoded_doctype);
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == "POST" && r.url.path() == expected_path)
        .map(|r| serde_json::from_slice(&r.body).expect("request body is JSON"))
        .collect()
}
