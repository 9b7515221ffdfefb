//! End-to-end tests for the JSON API, exercising the HTTP surface against an
//! in-memory SQLite database.

use axum_test::{
    TestServer,
    multipart::{MultipartForm, Part},
};
use rusqlite::Connection;
use serde_json::{Value, json};

use cashbook_rs::{build_router, create_app_state};

fn new_test_server() -> TestServer {
    let connection = Connection::open_in_memory().unwrap();
    let state = create_app_state(connection).unwrap();

    TestServer::new(build_router(state))
}

fn csv_form(csv_data: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::text(csv_data.to_owned())
            .file_name("transactions.csv")
            .mime_type("text/csv"),
    )
}

#[tokio::test]
async fn listing_an_empty_ledger_returns_no_transactions_and_zero_balance() {
    let server = new_test_server();

    let response = server.get("/transactions").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["transactions"], json!([]));
    assert_eq!(body["balance"]["income"], json!(0.0));
    assert_eq!(body["balance"]["outcome"], json!(0.0));
    assert_eq!(body["balance"]["total"], json!(0.0));
}

#[tokio::test]
async fn creating_a_transaction_returns_it_as_json() {
    let server = new_test_server();

    let response = server
        .post("/transactions")
        .json(&json!({
            "title": "Salary",
            "type": "income",
            "value": 3000.0,
            "category": "Work",
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["title"], json!("Salary"));
    assert_eq!(body["type"], json!("income"));
    assert_eq!(body["value"], json!(3000.0));
    assert!(body["id"].as_i64().unwrap() > 0);
    assert!(body["category_id"].as_i64().unwrap() > 0);
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn creating_an_outcome_over_the_balance_is_rejected() {
    let server = new_test_server();
    server
        .post("/transactions")
        .json(&json!({
            "title": "Deposit", "type": "income", "value": 100.0, "category": "Misc",
        }))
        .await
        .assert_status_ok();

    let response = server
        .post("/transactions")
        .json(&json!({
            "title": "Splurge", "type": "outcome", "value": 150.0, "category": "Misc",
        }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["status"], json!("error"));
    assert_eq!(
        body["message"],
        json!("cannot complete transaction, funds below zero")
    );

    // The rejection must leave the balance unchanged.
    let list: Value = server.get("/transactions").await.json();
    assert_eq!(list["balance"]["total"], json!(100.0));
    assert_eq!(list["transactions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn spending_the_balance_down_to_zero_is_accepted() {
    let server = new_test_server();
    server
        .post("/transactions")
        .json(&json!({
            "title": "Deposit", "type": "income", "value": 100.0, "category": "Misc",
        }))
        .await
        .assert_status_ok();

    server
        .post("/transactions")
        .json(&json!({
            "title": "Rent", "type": "outcome", "value": 100.0, "category": "Housing",
        }))
        .await
        .assert_status_ok();

    let list: Value = server.get("/transactions").await.json();
    assert_eq!(list["balance"]["total"], json!(0.0));
}

#[tokio::test]
async fn creating_a_transaction_with_an_unknown_type_is_rejected() {
    let server = new_test_server();

    let response = server
        .post("/transactions")
        .json(&json!({
            "title": "Loan", "type": "transfer", "value": 10.0, "category": "Misc",
        }))
        .await;

    response.assert_status_unprocessable_entity();
}

#[tokio::test]
async fn transactions_sharing_a_category_title_share_one_category() {
    let server = new_test_server();

    let first: Value = server
        .post("/transactions")
        .json(&json!({
            "title": "Groceries", "type": "income", "value": 10.0, "category": "Food",
        }))
        .await
        .json();
    let second: Value = server
        .post("/transactions")
        .json(&json!({
            "title": "Takeaway", "type": "income", "value": 20.0, "category": "Food",
        }))
        .await
        .json();

    assert_eq!(first["category_id"], second["category_id"]);
}

#[tokio::test]
async fn deleting_a_transaction_returns_no_content() {
    let server = new_test_server();
    let created: Value = server
        .post("/transactions")
        .json(&json!({
            "title": "Deposit", "type": "income", "value": 10.0, "category": "Misc",
        }))
        .await
        .json();
    let id = created["id"].as_i64().unwrap();

    let response = server.delete(&format!("/transactions/{id}")).await;

    response.assert_status(axum::http::StatusCode::NO_CONTENT);

    let list: Value = server.get("/transactions").await.json();
    assert_eq!(list["transactions"], json!([]));
}

#[tokio::test]
async fn deleting_a_missing_transaction_returns_not_found() {
    let server = new_test_server();

    let response = server.delete("/transactions/123").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn importing_a_csv_persists_rows_in_input_order() {
    let server = new_test_server();

    let response = server
        .post("/transactions/import")
        .multipart(csv_form(
            "title,type,value,category\n\
             Loan,income,100,Transfer\n\
             Rent,outcome,40,Housing\n",
        ))
        .await;

    response.assert_status_ok();
    let imported: Value = response.json();
    let imported = imported.as_array().unwrap();
    assert_eq!(imported.len(), 2);
    assert_eq!(imported[0]["title"], json!("Loan"));
    assert_eq!(imported[1]["title"], json!("Rent"));

    let list: Value = server.get("/transactions").await.json();
    assert_eq!(list["balance"]["total"], json!(60.0));
}

#[tokio::test]
async fn importing_a_net_negative_csv_is_rejected_entirely() {
    let server = new_test_server();

    let response = server
        .post("/transactions/import")
        .multipart(csv_form(
            "title,type,value,category\n\
             Loan,income,50,Transfer\n\
             Rent,outcome,80,Housing\n",
        ))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(
        body["message"],
        json!("cannot complete transaction, funds below zero")
    );

    // All-or-nothing: no rows were persisted.
    let list: Value = server.get("/transactions").await.json();
    assert_eq!(list["transactions"], json!([]));
    assert_eq!(list["balance"]["total"], json!(0.0));
}

#[tokio::test]
async fn importing_creates_each_referenced_category_once() {
    let server = new_test_server();

    let response = server
        .post("/transactions/import")
        .multipart(csv_form(
            "title,type,value,category\n\
             Rent 1,income,10,Rent\n\
             Rent 2,income,10,Rent\n\
             Rent 3,income,10,Rent\n\
             Rent 4,income,10,Rent\n\
             Rent 5,income,10,Rent\n",
        ))
        .await;

    response.assert_status_ok();
    let imported: Value = response.json();
    let imported = imported.as_array().unwrap();
    assert_eq!(imported.len(), 5);

    let category_id = &imported[0]["category_id"];
    for transaction in imported {
        assert_eq!(&transaction["category_id"], category_id);
    }
}

#[tokio::test]
async fn importing_a_malformed_csv_is_rejected() {
    let server = new_test_server();

    let response = server
        .post("/transactions/import")
        .multipart(csv_form(
            "title,type,value,category\n\
             Loan,income,not-a-number,Misc\n",
        ))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn importing_a_csv_with_a_nan_value_is_a_client_error() {
    let server = new_test_server();

    let response = server
        .post("/transactions/import")
        .multipart(csv_form(
            "title,type,value,category\n\
             Loan,income,NaN,Misc\n",
        ))
        .await;

    response.assert_status_bad_request();

    let list: Value = server.get("/transactions").await.json();
    assert_eq!(list["transactions"], json!([]));
}

#[tokio::test]
async fn importing_without_a_file_field_is_rejected() {
    let server = new_test_server();

    let response = server
        .post("/transactions/import")
        .multipart(MultipartForm::new().add_text("comment", "no file here"))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn unknown_routes_return_a_json_error() {
    let server = new_test_server();

    let response = server.get("/budgets").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["status"], json!("error"));
}
