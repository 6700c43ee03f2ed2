// Copyright 2026 Rowjoin Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types for Rowjoin
//!
//! Every error here is surfaced to the caller; nothing is retried
//! internally. A `next()` call that returns an error never concurrently
//! reports a row as available.

use thiserror::Error;

/// Result type alias for Rowjoin operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for join construction and execution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // =========================================================================
    // Construction errors - reported before the operator ever starts
    // =========================================================================
    /// Join type token not in the supported set
    #[error("unsupported JOIN type {0:?}")]
    UnsupportedJoinType(String),

    /// The same unaliased source name appears on both sides of the join
    #[error("cannot join columns from the same source name '{0}' (missing AS clause)")]
    DuplicateSourceName(String),

    /// USING/NATURAL column not present on one of the sides
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    // =========================================================================
    // Resource errors
    // =========================================================================
    /// Memory quota account rejected a growth request
    #[error("memory budget exceeded: requested {requested}, in use {used}, budget {budget}")]
    MemoryBudgetExceeded {
        requested: usize,
        used: usize,
        budget: usize,
    },

    /// Query cancelled
    #[error("query cancelled")]
    QueryCancelled,

    // =========================================================================
    // Evaluation errors
    // =========================================================================
    /// Equality-key encoding failed
    #[error("key encoding failed: {message}")]
    KeyEncoding { message: String },

    /// ON-predicate evaluation failed
    #[error("expression evaluation failed: {message}")]
    ExpressionEvaluation { message: String },

    /// Internal error for unexpected conditions
    #[error("{message}")]
    Internal { message: String },
}

impl Error {
    /// Create a new KeyEncoding error
    pub fn key_encoding(message: impl Into<String>) -> Self {
        Error::KeyEncoding {
            message: message.into(),
        }
    }

    /// Create a new ExpressionEvaluation error
    pub fn expression_evaluation(message: impl Into<String>) -> Self {
        Error::ExpressionEvaluation {
            message: message.into(),
        }
    }

    /// Create a new Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal {
            message: message.into(),
        }
    }

    /// Check if this error is detected at construction time, before the
    /// operator starts
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedJoinType(_)
                | Error::DuplicateSourceName(_)
                | Error::ColumnNotFound(_)
        )
    }

    /// Check if this is a resource error (quota or cancellation)
    pub fn is_resource_error(&self) -> bool {
        matches!(
            self,
            Error::MemoryBudgetExceeded { .. } | Error::QueryCancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::UnsupportedJoinType("SIDE JOIN".to_string()).to_string(),
            "unsupported JOIN type \"SIDE JOIN\""
        );
        assert_eq!(
            Error::DuplicateSourceName("t".to_string()).to_string(),
            "cannot join columns from the same source name 't' (missing AS clause)"
        );
        assert_eq!(
            Error::ColumnNotFound("x".to_string()).to_string(),
            "column 'x' not found"
        );
        assert_eq!(Error::QueryCancelled.to_string(), "query cancelled");
        assert_eq!(
            Error::MemoryBudgetExceeded {
                requested: 64,
                used: 960,
                budget: 1024,
            }
            .to_string(),
            "memory budget exceeded: requested 64, in use 960, budget 1024"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::UnsupportedJoinType("X".to_string()).is_construction_error());
        assert!(Error::DuplicateSourceName("t".to_string()).is_construction_error());
        assert!(Error::ColumnNotFound("x".to_string()).is_construction_error());
        assert!(!Error::QueryCancelled.is_construction_error());

        assert!(Error::QueryCancelled.is_resource_error());
        assert!(Error::MemoryBudgetExceeded {
            requested: 1,
            used: 0,
            budget: 0,
        }
        .is_resource_error());
        assert!(!Error::key_encoding("oops").is_resource_error());
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(
            Error::ColumnNotFound("x".to_string()),
            Error::ColumnNotFound("x".to_string())
        );
        assert_ne!(
            Error::ColumnNotFound("x".to_string()),
            Error::ColumnNotFound("y".to_string())
        );
    }
}
