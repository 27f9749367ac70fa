// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Error types for finite field and polynomial operations
//!
//! Every failure is raised at the point of violation and carries the offending
//! values in its message. Nothing here is retried: the algebra is deterministic.

use thiserror::Error;

/// Main error type for field and polynomial operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Requested order is not a single prime power
    #[error("Invalid field order {order}: {reason}")]
    InvalidFieldOrder { order: u64, reason: String },

    /// Value is not a member of the declared field
    #[error("Element {value} is not in {field}")]
    ElementNotInField { value: String, field: String },

    /// Binary operation between values of different fields
    #[error("Incompatible fields in {operation}: {left} and {right}")]
    IncompatibleFields {
        operation: String,
        left: String,
        right: String,
    },

    /// Multiplicative inverse of the additive identity
    #[error("Division by zero in {field}")]
    DivisionByZero { field: String },

    /// Construction path with no known implementation
    #[error("Unimplemented construction: {message}")]
    UnimplementedConstruction { message: String },

    /// Bounded exhaustive search ran out of candidates
    #[error("Search limit of {limit} candidates exceeded while {context}")]
    SearchLimitExceeded { limit: u64, context: String },
}

/// Result type alias for field operations
pub type FieldResult<T> = Result<T, FieldError>;

impl FieldError {
    /// Create an invalid order error
    pub fn invalid_order(order: u64, reason: impl Into<String>) -> Self {
        FieldError::InvalidFieldOrder {
            order,
            reason: reason.into(),
        }
    }

    /// Create a membership error
    pub fn not_in_field(value: impl ToString, field: impl ToString) -> Self {
        FieldError::ElementNotInField {
            value: value.to_string(),
            field: field.to_string(),
        }
    }

    /// Create a field mismatch error
    pub fn incompatible(
        operation: impl Into<String>,
        left: impl ToString,
        right: impl ToString,
    ) -> Self {
        FieldError::IncompatibleFields {
            operation: operation.into(),
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    /// Create a division by zero error
    pub fn division_by_zero(field: impl ToString) -> Self {
        FieldError::DivisionByZero {
            field: field.to_string(),
        }
    }

    /// Create an unimplemented construction error
    pub fn unimplemented(message: impl Into<String>) -> Self {
        FieldError::UnimplementedConstruction {
            message: message.into(),
        }
    }

    /// Create a search limit error
    pub fn search_limit(limit: u64, context: impl Into<String>) -> Self {
        FieldError::SearchLimitExceeded {
            limit,
            context: context.into(),
        }
    }
}
