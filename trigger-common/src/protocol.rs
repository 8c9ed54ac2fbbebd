//! Wire protocol for the trigger endpoint.
//!
//! Defines the JSON body a CI job posts and the JSON bodies the daemon
//! sends back.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::TriggerError;

/// Action name that runs the test handler.
pub const TEST_ACTION: &str = "test";
/// Action used when the request body has no `action` key.
pub const DEFAULT_ACTION: &str = TEST_ACTION;
/// App name used when the request body has no `app` key.
pub const DEFAULT_APP: &str = "unknown";

/// Message attached to every successful test run.
pub const TESTS_PASSED_MESSAGE: &str = "All tests passed successfully";
/// Message attached to the soft error for unrecognized actions.
pub const UNKNOWN_ACTION_MESSAGE: &str = "Unknown action";
/// Message reported by the health check.
pub const HEALTH_MESSAGE: &str = "Android App Test Server is running";

/// A decoded trigger request.
///
/// Field values are kept as raw JSON: the body is only required to be a JSON
/// object, and whatever types the caller sent are carried through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerRequest {
    /// Selected action. Only the string `"test"` has behavior attached.
    pub action: Value,
    /// Application name, echoed back verbatim in the success response.
    pub app: Value,
}

impl TriggerRequest {
    /// Decode a request body.
    ///
    /// Fails with [`TriggerError::BadRequest`] unless the bytes are a JSON
    /// object. Missing keys fall back to [`DEFAULT_ACTION`] and
    /// [`DEFAULT_APP`]; keys that are present (even as `null`) are kept.
    pub fn from_slice(body: &[u8]) -> Result<Self, TriggerError> {
        let value: Value = serde_json::from_slice(body).map_err(|e| TriggerError::BadRequest {
            reason: e.to_string(),
        })?;

        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(TriggerError::BadRequest {
                reason: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
        }
    }

    fn from_map(mut map: Map<String, Value>) -> Self {
        let action = map
            .remove("action")
            .unwrap_or_else(|| Value::String(DEFAULT_ACTION.to_string()));
        let app = map
            .remove("app")
            .unwrap_or_else(|| Value::String(DEFAULT_APP.to_string()));
        Self { action, app }
    }

    /// Whether this request selects the test handler.
    pub fn is_test_action(&self) -> bool {
        self.action.as_str() == Some(TEST_ACTION)
    }

    /// Render the action for log lines, without JSON quoting for strings.
    pub fn action_label(&self) -> String {
        display_value(&self.action)
    }

    /// Render the app for log lines, without JSON quoting for strings.
    pub fn app_label(&self) -> String {
        display_value(&self.app)
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Fixed result set reported by the mock test handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TestReport {
    pub ui: &'static str,
    pub network: &'static str,
    pub storage: &'static str,
}

impl TestReport {
    /// The only report the handler ever produces.
    pub const PASSED: TestReport = TestReport {
        ui: "PASSED",
        network: "PASSED",
        storage: "PASSED",
    };
}

/// Response body for trigger requests, discriminated by `status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TriggerResponse {
    /// The test action ran.
    Success {
        app: Value,
        tests: TestReport,
        message: String,
    },
    /// Soft or hard failure with a human readable message.
    Error { message: String },
}

impl TriggerResponse {
    /// Success response for a completed test run of `app`.
    pub fn tests_passed(app: Value) -> Self {
        Self::Success {
            app,
            tests: TestReport::PASSED,
            message: TESTS_PASSED_MESSAGE.to_string(),
        }
    }

    /// Soft error for an action other than `"test"`. Sent with HTTP 200.
    pub fn unknown_action() -> Self {
        Self::error(UNKNOWN_ACTION_MESSAGE)
    }

    /// Error body carrying `message`.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

impl From<&TriggerError> for TriggerResponse {
    fn from(err: &TriggerError) -> Self {
        Self::error(err.client_message())
    }
}

/// Body of the unauthenticated health check.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn now() -> Self {
        Self {
            status: "success",
            message: HEALTH_MESSAGE,
            timestamp: Utc::now(),
        }
    }
}
