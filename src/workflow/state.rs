// SPDX-License-Identifier: MIT

//! The mutable state record passed through one workflow run
//!
//! Each run owns exactly one `WorkflowState`. Nodes never mutate it directly;
//! they return a [`Transition`] and the engine folds it in through
//! [`WorkflowState::apply`], the single authoritative merge rule.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::FlowError;
use crate::workflow::types::{Decision, DoctorRole, NextStep};

/// State of one case review run
///
/// `case_id`, `decision`, `doctor_role` and `findings` are fixed at run
/// creation; `StateUpdate` cannot name them, so no node can rewrite them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowState {
    pub case_id: String,
    pub patient_email: Option<String>,
    pub decision: Decision,
    pub findings: String,
    pub doctor_role: DoctorRole,
    pub next_step: Option<NextStep>,
}

/// The raw, unvalidated inputs to a run
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    pub case_id: String,
    pub decision: String,
    pub findings: String,
    pub doctor_role: String,
}

/// Partial update: only the fields a node is allowed to override
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub patient_email: Option<String>,
    pub next_step: Option<NextStep>,
}

/// What a node hands back to the engine
#[derive(Debug, Clone)]
pub enum Transition {
    /// Full replacement record
    Replace(WorkflowState),
    /// Shallow merge: named fields overwrite, everything else carries forward
    Update(StateUpdate),
}

impl WorkflowState {
    /// Validate the raw request and build the initial record.
    ///
    /// `findings` content is deliberately not inspected.
    pub fn from_request(request: &ReviewRequest) -> Result<Self, FlowError> {
        if request.case_id.trim().is_empty() {
            return Err(FlowError::validation("case_id must not be empty"));
        }
        let decision = Decision::from_str(&request.decision)?;
        let doctor_role = DoctorRole::from_str(&request.doctor_role)?;

        Ok(Self {
            case_id: request.case_id.clone(),
            patient_email: None,
            decision,
            findings: request.findings.clone(),
            doctor_role,
            next_step: None,
        })
    }

    /// Fold a node's transition into the record.
    ///
    /// Last writer wins per field; an update that leaves a field unnamed
    /// (`None`) carries the current value forward. `patient_email` can only
    /// ever be set, never cleared.
    pub fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Replace(full) => *self = full,
            Transition::Update(update) => {
                if let Some(email) = update.patient_email {
                    self.patient_email = Some(email);
                }
                if let Some(step) = update.next_step {
                    self.next_step = Some(step);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ReviewRequest {
        ReviewRequest {
            case_id: "case-42".to_string(),
            decision: "confirmed".to_string(),
            findings: "70% stenosis in LAD".to_string(),
            doctor_role: "junior".to_string(),
        }
    }

    #[test]
    fn test_from_request_builds_initial_record() {
        let state = WorkflowState::from_request(&request()).unwrap();

        assert_eq!(state.case_id, "case-42");
        assert_eq!(state.decision, Decision::Confirmed);
        assert_eq!(state.doctor_role, DoctorRole::Junior);
        assert_eq!(state.findings, "70% stenosis in LAD");
        assert!(state.patient_email.is_none());
        assert!(state.next_step.is_none());
    }

    #[test]
    fn test_from_request_rejects_empty_case_id() {
        let mut req = request();
        req.case_id = "  ".to_string();

        let err = WorkflowState::from_request(&req).unwrap_err();
        assert_eq!(err.kind(), "validation_error");
    }

    #[test]
    fn test_from_request_rejects_unknown_enum_values() {
        let mut req = request();
        req.decision = "inconclusive".to_string();
        assert!(WorkflowState::from_request(&req).is_err());

        let mut req = request();
        req.doctor_role = "resident".to_string();
        assert!(WorkflowState::from_request(&req).is_err());
    }

    #[test]
    fn test_partial_update_only_touches_named_fields() {
        let mut state = WorkflowState::from_request(&request()).unwrap();
        state.patient_email = Some("patient@example.com".to_string());
        let before = state.clone();

        state.apply(Transition::Update(StateUpdate {
            next_step: Some(NextStep::End),
            ..Default::default()
        }));

        assert_eq!(state.next_step, Some(NextStep::End));
        assert_eq!(state.case_id, before.case_id);
        assert_eq!(state.patient_email, before.patient_email);
        assert_eq!(state.decision, before.decision);
        assert_eq!(state.findings, before.findings);
        assert_eq!(state.doctor_role, before.doctor_role);
    }

    #[test]
    fn test_update_sets_patient_email() {
        let mut state = WorkflowState::from_request(&request()).unwrap();

        state.apply(Transition::Update(StateUpdate {
            patient_email: Some("patient@example.com".to_string()),
            ..Default::default()
        }));

        assert_eq!(state.patient_email.as_deref(), Some("patient@example.com"));
    }

    #[test]
    fn test_unnamed_email_never_clears_existing_value() {
        let mut state = WorkflowState::from_request(&request()).unwrap();
        state.patient_email = Some("patient@example.com".to_string());

        state.apply(Transition::Update(StateUpdate {
            next_step: Some(NextStep::EscalateToSenior),
            ..Default::default()
        }));

        assert_eq!(state.patient_email.as_deref(), Some("patient@example.com"));
    }

    #[test]
    fn test_last_writer_wins_on_next_step() {
        let mut state = WorkflowState::from_request(&request()).unwrap();

        state.apply(Transition::Update(StateUpdate {
            next_step: Some(NextStep::EscalateToSenior),
            ..Default::default()
        }));
        state.apply(Transition::Update(StateUpdate {
            next_step: Some(NextStep::End),
            ..Default::default()
        }));

        assert_eq!(state.next_step, Some(NextStep::End));
    }

    #[test]
    fn test_replace_swaps_whole_record() {
        let mut state = WorkflowState::from_request(&request()).unwrap();
        let mut replacement = state.clone();
        replacement.patient_email = Some("other@example.com".to_string());

        state.apply(Transition::Replace(replacement.clone()));
        assert_eq!(state, replacement);
    }
}
