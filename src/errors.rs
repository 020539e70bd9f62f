// ABOUTME: Unified error handling for the recipe API
// ABOUTME: ErrorCode taxonomy, AppError with context, and HTTP response formatting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions

//! # Unified Error Handling System
//!
//! Centralized error types for all modules. Every fallible operation
//! returns [`AppResult`]; reconciliation failures carry a dedicated
//! [`ErrorCode`] so callers can tell a client mistake (stale reference,
//! dangling link) from a server fault (internal consistency).

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat = 3002,
    /// A step link references an ingredient the request never declared
    #[serde(rename = "DANGLING_LINK_REFERENCE")]
    DanglingLinkReference = 3004,

    // Resource Management (4000-4999)
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    #[serde(rename = "RESOURCE_ALREADY_EXISTS")]
    ResourceAlreadyExists = 4001,
    /// A well-formed persistent identifier that no longer resolves to a record
    #[serde(rename = "STALE_REFERENCE")]
    StaleReference = 4004,

    // Configuration (6000-6999)
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Internal Errors (9000-9999)
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
    /// The placeholder mapping points at an identity absent from the rebuilt list
    #[serde(rename = "INTERNAL_CONSISTENCY")]
    InternalConsistency = 9004,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidInput
            | Self::MissingRequiredField
            | Self::InvalidFormat
            | Self::DanglingLinkReference => 400,

            // 404 Not Found
            Self::ResourceNotFound | Self::StaleReference => 404,

            // 409 Conflict
            Self::ResourceAlreadyExists => 409,

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::SerializationError
            | Self::InternalConsistency
            | Self::ConfigError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::InvalidFormat => "The data format is invalid",
            Self::DanglingLinkReference => {
                "A step link references an ingredient not present in the request"
            }
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ResourceAlreadyExists => "A resource with this identifier already exists",
            Self::StaleReference => {
                "An identifier in the request no longer resolves to an existing record"
            }
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal server error occurred",
            Self::DatabaseError => "Database operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
            Self::InternalConsistency => "Internal consistency check failed",
        }
    }

    /// Whether this code represents a client mistake rather than a server fault
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.http_status() < 500
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Request ID for tracing
    pub request_id: Option<String>,
    /// Owning subject if available
    pub subject: Option<String>,
    /// Resource ID if applicable
    pub resource_id: Option<String>,
    /// Additional key-value context
    pub details: serde_json::Value,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            request_id: None,
            subject: None,
            resource_id: None,
            details: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add a request ID to the error context
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.context.request_id = Some(request_id.into());
        self
    }

    /// Add the owning subject to the error context
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.context.subject = Some(subject.into());
        self
    }

    /// Add a resource ID to the error context
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.context.resource_id = Some(resource_id.into());
        self
    }

    /// Add details to the error context
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorResponseDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
                request_id: error.context.request_id,
                details: error.context.details,
            },
        }
    }
}

/// Convenience functions for creating common errors
impl AppError {
    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Invalid data format
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFormat, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// A client-supplied identifier parsed as a persistent id but matched no record
    pub fn stale_reference(kind: &str, raw_id: impl Into<String>) -> Self {
        let raw_id = raw_id.into();
        Self::new(
            ErrorCode::StaleReference,
            format!("{kind} {raw_id} does not exist"),
        )
        .with_resource_id(raw_id)
    }

    /// A step link referenced an ingredient identifier missing from the request
    pub fn dangling_link(raw_ingredient_id: impl Into<String>) -> Self {
        let raw_id = raw_ingredient_id.into();
        Self::new(
            ErrorCode::DanglingLinkReference,
            format!("ingredient {raw_id} not found in submitted ingredient list"),
        )
        .with_resource_id(raw_id)
    }

    /// The resolved mapping pointed at an identity missing from the rebuilt list
    pub fn internal_consistency(ingredient_id: Uuid) -> Self {
        Self::new(
            ErrorCode::InternalConsistency,
            format!("resolved ingredient {ingredient_id} is absent from the rebuilt list"),
        )
        .with_resource_id(ingredient_id.to_string())
    }
}

/// Conversion from anyhow::Error to `AppError`
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        match error.source() {
            Some(source) => Self::new(ErrorCode::InternalError, error.to_string()).with_details(
                serde_json::json!({
                    "source": source.to_string()
                }),
            ),
            None => Self::new(ErrorCode::InternalError, error.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::ResourceNotFound.http_status(), 404);
        assert_eq!(ErrorCode::StaleReference.http_status(), 404);
        assert_eq!(ErrorCode::DanglingLinkReference.http_status(), 400);
        assert_eq!(ErrorCode::InternalConsistency.http_status(), 500);
    }

    #[test]
    fn test_client_vs_server_errors() {
        assert!(ErrorCode::StaleReference.is_client_error());
        assert!(ErrorCode::DanglingLinkReference.is_client_error());
        assert!(!ErrorCode::InternalConsistency.is_client_error());
        assert!(!ErrorCode::DatabaseError.is_client_error());
    }

    #[test]
    fn test_app_error_creation() {
        let error = AppError::stale_reference("ingredient", "0192f0c1-0000-7000-8000-000000000000")
            .with_request_id("req-123")
            .with_subject("user@example.com");

        assert_eq!(error.code, ErrorCode::StaleReference);
        assert!(error.context.request_id.is_some());
        assert!(error.context.resource_id.is_some());
    }

    #[test]
    fn test_error_response_serialization() {
        let error = AppError::dangling_link("tmp1");
        let response = ErrorResponse::from(error);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("DANGLING_LINK_REFERENCE"));
        assert!(json.contains("tmp1"));
    }
}
