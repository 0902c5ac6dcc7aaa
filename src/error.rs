// SPDX-License-Identifier: MIT

//! Typed error handling for cardioflow-rs
//!
//! Two layers: `ClientError` for failures inside a single collaborator call,
//! and `FlowError` for everything the workflow engine reports to its caller.

use thiserror::Error;

use crate::workflow::types::{NextStep, NodeId};

/// Top-level error type returned by the workflow engine
#[derive(Debug, Error)]
pub enum FlowError {
    /// Initial fields missing or enum values unrecognized; the run never starts
    #[error("validation error: {0}")]
    Validation(String),

    /// A collaborator call failed mid-run; nodes in `completed` are not rolled back
    #[error("node '{node}' failed after {completed:?} completed: {source}")]
    Collaborator {
        node: NodeId,
        completed: Vec<NodeId>,
        source: ClientError,
    },

    /// The conditional edge was reached before the router wrote a next step
    #[error("conditional edge at '{node}' has no next step to read")]
    MissingNextStep { node: NodeId },

    /// A routed-to next step has no node registered in the graph
    #[error("next step '{step}' does not resolve to a registered node")]
    UnresolvedStep { step: NextStep },

    /// An unconditional edge points at a node missing from the graph
    #[error("node '{id}' is referenced by an edge but not registered")]
    MissingNode { id: NodeId },

    /// The walk did not reach a terminal node within the hop budget
    #[error("graph walk exceeded {limit} hops without reaching a terminal node")]
    HopLimit { limit: u32 },
}

impl FlowError {
    /// Stable error kind identifier for callers (wire responses, logs)
    pub fn kind(&self) -> &'static str {
        match self {
            FlowError::Validation(_) => "validation_error",
            FlowError::Collaborator { .. } => "collaborator_error",
            FlowError::MissingNextStep { .. }
            | FlowError::UnresolvedStep { .. }
            | FlowError::MissingNode { .. }
            | FlowError::HopLimit { .. } => "fatal_engine_error",
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Errors from a single collaborator (case store, notification, scheduling) call
#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-success HTTP status from a collaborator
    #[error("{service} returned status {status}: {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// Transport-level failure (connect, timeout, body decode)
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Configuration errors (missing env vars)
    #[error("configuration error: {0}")]
    Config(String),

    /// A notification-sending node ran without a resolved patient email
    #[error("patient email for case '{case_id}' was never resolved")]
    MissingRecipient { case_id: String },

    /// The bounded retry budget for one call is spent
    #[error("{service} unavailable after {attempts} attempts: {last}")]
    RetriesExhausted {
        service: String,
        attempts: u32,
        last: String,
    },
}

impl ClientError {
    pub fn api(service: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            service,
            status,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Transport failures and 5xx responses are worth another attempt;
    /// 4xx responses and local misconfiguration are not.
    pub(crate) fn is_retryable(&self) -> bool {
        match self {
            ClientError::Http(_) => true,
            ClientError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(FlowError::validation("x").kind(), "validation_error");
        assert_eq!(
            FlowError::Collaborator {
                node: NodeId::StartReview,
                completed: vec![],
                source: ClientError::config("x"),
            }
            .kind(),
            "collaborator_error"
        );
        assert_eq!(
            FlowError::UnresolvedStep {
                step: NextStep::End
            }
            .kind(),
            "fatal_engine_error"
        );
        assert_eq!(FlowError::HopLimit { limit: 8 }.kind(), "fatal_engine_error");
    }

    #[test]
    fn test_api_errors_retry_only_on_server_status() {
        assert!(ClientError::api("case-store", 503, "unavailable").is_retryable());
        assert!(!ClientError::api("case-store", 404, "missing").is_retryable());
        assert!(!ClientError::config("CASE_STORE_URL must be set").is_retryable());
    }

    #[test]
    fn test_collaborator_error_names_failed_node() {
        let err = FlowError::Collaborator {
            node: NodeId::NotifyAndSchedule,
            completed: vec![NodeId::StartReview, NodeId::DecideNextStep],
            source: ClientError::api("notification", 502, "bad gateway"),
        };
        let message = err.to_string();
        assert!(message.contains("notify_and_schedule"));
        assert!(message.contains("StartReview"));
        assert!(message.contains("502"));
    }
}
