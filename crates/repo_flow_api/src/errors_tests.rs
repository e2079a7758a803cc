//! Tests for error handling and HTTP conversion

use super::*;
use axum::http::StatusCode;
use repo_flow_core::{Error, NO_ROUTES_FOUND};

fn convert(error: Error) -> (StatusCode, ErrorResponse) {
    convert_error(&ApiError::from(error))
}

#[test]
fn test_invalid_reference_is_bad_request() {
    let (status, response) = convert(Error::InvalidReference("not a url".to_string()));

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error.code, "InvalidReference");
    assert_eq!(
        response.error.message,
        "Invalid GitHub repository URL: not a url"
    );
}

#[test]
fn test_not_found() {
    let (status, response) = convert(Error::NotFound);

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response.error.code, "NotFound");
}

#[test]
fn test_rate_limited() {
    let (status, response) = convert(Error::RateLimited);

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.error.code, "RateLimited");
    assert!(response.error.message.contains("rate limit"));
}

#[test]
fn test_empty_result_keeps_message() {
    let (status, response) = convert(Error::EmptyResult(NO_ROUTES_FOUND.to_string()));

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error.code, "EmptyResult");
    assert_eq!(response.error.message, NO_ROUTES_FOUND);
}

#[test]
fn test_provider_error_is_passed_through() {
    let (status, response) = convert(Error::ProviderError("Bad credentials".to_string()));

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.error.code, "ProviderError");
    assert_eq!(response.error.message, "Bad credentials");
    assert!(response.error.details.is_none());
}

#[test]
fn test_budget_exhaustion_reports_limit() {
    let (status, response) = convert(Error::RequestBudgetExhausted(50));

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.error.code, "RequestBudgetExhausted");
    let details = response.error.details.expect("Should have details");
    assert_eq!(details["maxRequests"], 50);
}

#[test]
fn test_client_error_is_bad_gateway() {
    let (status, response) = convert(Error::Client("bad base url".to_string()));

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.error.code, "ClientError");
}

#[test]
fn test_validation_error_names_field() {
    let (status, response) = convert_error(&ApiError::validation("repoUrl", "must not be empty"));

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error.code, "ValidationError");
    assert_eq!(
        response.error.message,
        "Invalid value for 'repoUrl': must not be empty"
    );
    assert_eq!(response.error.details.unwrap()["field"], "repoUrl");
}

#[test]
fn test_error_response_serialization() {
    let (_, response) = convert(Error::NotFound);

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["error"]["code"], "NotFound");
    assert!(json["error"].get("details").is_none());
}
