use chrono::{NaiveDate, TimeZone, Utc};
use dueline::client::{RemoteTaskService, TaskClient};
use dueline::error::ServiceError;
use dueline::model::{DueUpdateRequest, ResolvedDueFields};
use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;

fn client_for(url: &str) -> TaskClient {
    TaskClient::new(url, "test-token", Duration::from_secs(5), false).unwrap()
}

#[tokio::test]
async fn test_due_string_update_sends_only_due_string() {
    let mut server = Server::new_async().await;

    // Exact JSON match: no due_date, due_datetime or due_lang may ride along.
    let mock = server
        .mock("POST", "/tasks/123")
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::Json(json!({ "due_string": "next friday" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "123",
                "content": "Pay rent",
                "due": {
                    "date": "2026-10-23",
                    "datetime": "2026-10-23T09:00:00Z",
                    "is_recurring": false,
                    "string": "next friday 9am"
                },
                "deadline": { "date": "2026-10-30" }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let fields = client_for(&server.url())
        .update_due("123", &DueUpdateRequest::from_text("next friday"))
        .await
        .expect("update should succeed");

    mock.assert_async().await;
    assert_eq!(
        fields,
        ResolvedDueFields {
            due_date: NaiveDate::from_ymd_opt(2026, 10, 23),
            due_datetime: Some(Utc.with_ymd_and_hms(2026, 10, 23, 9, 0, 0).unwrap()),
            is_recurring: false,
            deadline: NaiveDate::from_ymd_opt(2026, 10, 30),
        }
    );
}

#[tokio::test]
async fn test_recurring_date_only_response() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/tasks/9")
        .with_status(200)
        .with_body(r#"{"id":"9","due":{"date":"2026-10-19","is_recurring":true,"string":"every mon"}}"#)
        .create_async()
        .await;

    let fields = client_for(&server.url())
        .update_due("9", &DueUpdateRequest::from_text("every monday"))
        .await
        .unwrap();

    assert_eq!(fields.due_date, NaiveDate::from_ymd_opt(2026, 10, 19));
    assert_eq!(fields.due_datetime, None);
    assert!(fields.is_recurring);
    assert_eq!(fields.deadline, None);
}

#[tokio::test]
async fn test_no_date_response_is_cleared() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/tasks/7")
        .match_body(Matcher::Json(json!({ "due_string": "no date" })))
        .with_status(200)
        .with_body(r#"{"id":"7","due":null,"deadline":null}"#)
        .create_async()
        .await;

    let fields = client_for(&server.url())
        .update_due("7", &DueUpdateRequest::from_text("no date"))
        .await
        .unwrap();

    assert_eq!(fields, ResolvedDueFields::default());
}

#[tokio::test]
async fn test_bad_request_is_rejected_with_server_message() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/tasks/1")
        .with_status(400)
        .with_body("Date is invalid")
        .create_async()
        .await;

    let err = client_for(&server.url())
        .update_due("1", &DueUpdateRequest::from_text("the twelfth of never"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ServiceError::Rejected {
            status: 400,
            message: "Date is invalid".to_string()
        }
    );
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_server_error_is_transport_failure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/tasks/1")
        .with_status(503)
        .create_async()
        .await;

    let err = client_for(&server.url())
        .update_due("1", &DueUpdateRequest::from_text("tomorrow"))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Transport(_)), "got {:?}", err);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_undecodable_success_body_is_invalid_response() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/tasks/1")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = client_for(&server.url())
        .update_due("1", &DueUpdateRequest::from_text("tomorrow"))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_trailing_slash_in_base_url_is_tolerated() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/tasks/5")
        .with_status(200)
        .with_body(r#"{"id":"5","due":null}"#)
        .create_async()
        .await;

    client_for(&format!("{}/", server.url()))
        .update_due("5", &DueUpdateRequest::from_text("no date"))
        .await
        .unwrap();

    mock.assert_async().await;
}
