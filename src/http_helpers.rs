//! HTTP helper functions for the Crux Core
//!
//! Response decoding lives here as plain functions so the update handlers
//! stay declarative and the decoding rules stay testable.

use crux_http::Response;
use serde::{Deserialize, Serialize};

/// Base URL for the station's API endpoints.
///
/// `crux_http` insists on absolute URLs and rejects relative paths
/// (`RelativeUrlWithoutBase`). The station is reached at whatever address the
/// page was served from, so the shell strips this dummy prefix and issues the
/// request relative to the page origin.
pub const BASE_URL: &str = "https://station";

/// Constructs the full address for a station endpoint such as
/// `"/get_station_data"`.
pub fn build_url(endpoint: &str) -> String {
    format!("{BASE_URL}{endpoint}")
}

/// Returns `true` if the response status is 2xx.
pub fn is_response_success(response: &Response<Vec<u8>>) -> bool {
    response.status().is_success()
}

/// Extracts an error message from a failed HTTP response.
pub fn extract_error_message(action: &str, response: &mut Response<Vec<u8>>) -> String {
    let status = response.status().to_string();

    match response.take_body() {
        Some(body) if !body.is_empty() => match String::from_utf8(body) {
            Ok(msg) => format!("{action} failed: HTTP {status}: {msg}"),
            Err(e) => format!("{action} failed: HTTP {status} (Invalid UTF-8: {e})"),
        },
        _ => format!("{action} failed: HTTP {status}"),
    }
}

/// Parse JSON from a response body.
///
/// Returns an error if the response is not successful or JSON parsing fails.
pub fn parse_json_response<T: serde::de::DeserializeOwned>(
    action: &str,
    response: &mut Response<Vec<u8>>,
) -> Result<T, String> {
    if !is_response_success(response) {
        return Err(extract_error_message(action, response));
    }

    match response.take_body() {
        Some(body) => {
            serde_json::from_slice(&body).map_err(|e| format!("{action}: JSON parse error: {e}"))
        }
        None => Err(format!("{action}: Empty response body")),
    }
}

/// Check the response status only (no body parsing).
pub fn check_response_status(action: &str, response: &mut Response<Vec<u8>>) -> Result<(), String> {
    if is_response_success(response) {
        Ok(())
    } else {
        Err(extract_error_message(action, response))
    }
}

/// Extract the plain-text body of a successful response.
pub fn extract_string_response(
    action: &str,
    response: &mut Response<Vec<u8>>,
) -> Result<String, String> {
    if !is_response_success(response) {
        return Err(extract_error_message(action, response));
    }

    match response.take_body() {
        Some(bytes) => {
            String::from_utf8(bytes).map_err(|_| format!("{action}: Invalid UTF-8 in response"))
        }
        None => Err(format!("{action}: Empty response body")),
    }
}

/// Process an HTTP result, checking status only
pub fn process_status_response(
    action: &str,
    result: crux_http::Result<Response<Vec<u8>>>,
) -> Result<(), String> {
    match result {
        Ok(mut response) => check_response_status(action, &mut response),
        Err(e) => Err(e.to_string()),
    }
}

/// Process an HTTP result, parsing the body as JSON
pub fn process_json_response<T: serde::de::DeserializeOwned>(
    action: &str,
    result: crux_http::Result<Response<Vec<u8>>>,
) -> Result<T, String> {
    match result {
        Ok(mut response) => parse_json_response(action, &mut response),
        Err(e) => Err(e.to_string()),
    }
}

/// Process an HTTP result, extracting the body as plain text
pub fn process_string_response(
    action: &str,
    result: crux_http::Result<Response<Vec<u8>>>,
) -> Result<String, String> {
    match result {
        Ok(mut response) => extract_string_response(action, &mut response),
        Err(e) => Err(e.to_string()),
    }
}

/// What a command-style endpoint (dome shutter, lookout) answered.
///
/// The firmware's contract: 200 means the command was accepted; 503 means the
/// device is busy or not ready, which is a normal condition, not a failure,
/// and the UI must leave its state untouched without surfacing an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActuatorOutcome {
    Accepted,
    Busy,
    Failed(String),
}

/// Classify an actuator endpoint's HTTP result per the firmware contract.
pub fn actuator_outcome(
    action: &str,
    result: crux_http::Result<Response<Vec<u8>>>,
) -> ActuatorOutcome {
    match result {
        Ok(mut response) => {
            if response.status() == crux_http::http::StatusCode::ServiceUnavailable {
                ActuatorOutcome::Busy
            } else if is_response_success(&response) {
                ActuatorOutcome::Accepted
            } else {
                ActuatorOutcome::Failed(extract_error_message(action, &mut response))
            }
        }
        Err(e) => ActuatorOutcome::Failed(e.to_string()),
    }
}
