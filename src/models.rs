//! Data models and DTOs (Data Transfer Objects)
//!
//! Contains the response envelope and the per-entity request/response
//! structures used by the API.

pub mod department;
pub mod department_type;
pub mod employee;

// Re-export commonly used types
pub use department::*;
pub use department_type::*;
pub use employee::*;

use serde::{Deserialize, Serialize};

/// Structured error carried in the response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// Uniform response envelope returned by every operation
///
/// Invariants: on failure `data` is absent and at least one error is present;
/// on success the error list is empty.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub result: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub errors: Vec<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful envelope carrying a payload
    pub fn ok(data: T) -> Self {
        Self {
            result: true,
            data: Some(data),
            errors: Vec::new(),
        }
    }

    /// Successful envelope without a payload
    pub fn ok_empty() -> ApiResponse<()> {
        ApiResponse {
            result: true,
            data: None,
            errors: Vec::new(),
        }
    }

    /// Failed envelope with a single structured error
    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            result: false,
            data: None,
            errors: vec![ApiError {
                code: code.into(),
                message: message.into(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_success_envelope_has_no_errors() {
        let json = serde_json::to_value(ApiResponse::ok(42)).unwrap();
        assert_eq!(json["result"], true);
        assert_eq!(json["data"], 42);
        assert_eq!(json["errors"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_empty_envelope_omits_data() {
        let json = serde_json::to_value(ApiResponse::<()>::ok_empty()).unwrap();
        assert_eq!(json["result"], true);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_failure_envelope_has_error_and_no_data() {
        let json =
            serde_json::to_value(ApiResponse::<()>::failure("NOT_FOUND", "no such employee"))
                .unwrap();
        assert_eq!(json["result"], false);
        assert!(json.get("data").is_none());
        assert_eq!(json["errors"][0]["code"], "NOT_FOUND");
        assert_eq!(json["errors"][0]["message"], "no such employee");
    }

    #[test]
    fn test_list_envelope() {
        let json = serde_json::to_value(ApiResponse::ok(vec![1, 2, 3])).unwrap();
        assert_eq!(json["data"].as_array().unwrap().len(), 3);
    }
}
