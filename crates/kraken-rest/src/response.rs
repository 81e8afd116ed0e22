//! Response decoding
//!
//! Every Kraken REST response is a JSON object with an `error` array (empty
//! on success) and a method-specific `result`.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{RestError, RestResult};

/// Kraken error categories, taken from the `E<Category>:` prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// EAPI:* errors - API-level issues (bad key, bad nonce, rate limit)
    Api,
    /// EGeneral:* errors - General errors
    General,
    /// EService:* errors - Service availability
    Service,
    /// EOrder:* errors - Trading/order errors
    Order,
    /// EFunding:* errors - Deposit/withdrawal errors
    Funding,
    /// EQuery:* errors - Query/search errors
    Query,
    /// ETrade:* errors - Trade execution errors
    Trade,
    /// ESession:* errors - Session errors
    Session,
    /// Unknown error category
    Unknown,
}

impl ErrorCategory {
    /// Categorise an error string such as `EAPI:Invalid nonce`
    pub fn from_error(error: &str) -> Self {
        let Some((prefix, _)) = error.split_once(':') else {
            return Self::Unknown;
        };

        // Severity letter: E for errors, W for warnings
        match prefix.get(1..).unwrap_or_default() {
            "API" => Self::Api,
            "General" => Self::General,
            "Service" => Self::Service,
            "Order" => Self::Order,
            "Funding" => Self::Funding,
            "Query" => Self::Query,
            "Trade" => Self::Trade,
            "Session" => Self::Session,
            _ => Self::Unknown,
        }
    }
}

/// One entry of a response's `error` array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorInfo {
    /// The original error string from Kraken
    pub raw: String,
    /// Error category
    pub category: ErrorCategory,
    /// Text after the category prefix
    pub message: String,
    /// Whether Kraken flagged this as a warning (`W` prefix)
    pub is_warning: bool,
}

impl ApiErrorInfo {
    /// Parse a Kraken error string
    pub fn parse(error: &str) -> Self {
        let message = error
            .split_once(':')
            .map(|(_, msg)| msg.trim())
            .unwrap_or(error);

        Self {
            raw: error.to_string(),
            category: ErrorCategory::from_error(error),
            message: message.to_string(),
            is_warning: error.starts_with('W'),
        }
    }
}

/// Standard Kraken API response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiResponse {
    /// Error messages (empty if successful)
    #[serde(default)]
    pub error: Vec<String>,
    /// Result data (`Null` when absent)
    #[serde(default)]
    pub result: Value,
}

impl ApiResponse {
    /// Decode a raw response body
    ///
    /// # Errors
    /// Returns [`RestError::Decode`] if the body is not valid JSON or its top
    /// level is not an object.
    pub fn decode(raw: &[u8]) -> RestResult<Self> {
        let value: Value = serde_json::from_slice(raw)
            .map_err(|e| RestError::Decode(format!("invalid JSON: {}", e)))?;

        if !value.is_object() {
            return Err(RestError::Decode(
                "top-level value is not an object".to_string(),
            ));
        }

        serde_json::from_value(value).map_err(|e| RestError::Decode(e.to_string()))
    }

    /// Check if the response indicates success
    pub fn is_success(&self) -> bool {
        self.error.is_empty()
    }

    /// Parsed entries of the `error` array
    pub fn errors(&self) -> Vec<ApiErrorInfo> {
        self.error.iter().map(|e| ApiErrorInfo::parse(e)).collect()
    }

    /// Get the typed result, turning reported errors into [`RestError::Api`]
    pub fn into_result<T: DeserializeOwned>(self) -> RestResult<T> {
        if !self.error.is_empty() {
            return Err(RestError::from_api_errors(&self.error));
        }

        serde_json::from_value(self.result).map_err(|e| RestError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_decode_success() {
        let raw = br#"{"error":[],"result":{"ZUSD":"3415.8014","XXBT":"149.9688412800"}}"#;
        let response = ApiResponse::decode(raw).unwrap();

        assert!(response.is_success());
        let balances: HashMap<String, String> = response.into_result().unwrap();
        assert_eq!(balances["ZUSD"], "3415.8014");
    }

    #[test]
    fn test_remote_errors_are_data() {
        let raw = br#"{"error":["EOrder:Insufficient funds"]}"#;
        let response = ApiResponse::decode(raw).unwrap();

        assert!(!response.is_success());
        assert_eq!(response.result, Value::Null);

        let errors = response.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].category, ErrorCategory::Order);
        assert_eq!(errors[0].message, "Insufficient funds");
        assert!(!errors[0].is_warning);

        let typed: RestResult<Value> = response.into_result();
        assert!(matches!(
            typed,
            Err(RestError::Api { category: ErrorCategory::Order, .. })
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_json() {
        let result = ApiResponse::decode(b"<html>502 Bad Gateway</html>");
        assert!(matches!(result, Err(RestError::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_non_object() {
        let cases: [&[u8]; 4] = [b"[]", b"\"ok\"", b"42", b"null"];
        for raw in cases {
            assert!(matches!(ApiResponse::decode(raw), Err(RestError::Decode(_))));
        }
    }

    #[test]
    fn test_decode_rejects_wrong_error_shape() {
        let result = ApiResponse::decode(br#"{"error":"EAPI:Invalid key"}"#);
        assert!(matches!(result, Err(RestError::Decode(_))));
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(ErrorCategory::from_error("EAPI:Invalid nonce"), ErrorCategory::Api);
        assert_eq!(ErrorCategory::from_error("EService:Unavailable"), ErrorCategory::Service);
        assert_eq!(ErrorCategory::from_error("WGeneral:Deprecated"), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_error("garbage"), ErrorCategory::Unknown);
        assert!(ApiErrorInfo::parse("WGeneral:Deprecated").is_warning);
    }
}
