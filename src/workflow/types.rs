// SPDX-License-Identifier: MIT

//! Core enums shared across the review workflow
//!
//! `Decision` and `DoctorRole` arrive as strings on the wire and are parsed
//! up front; a string outside the enum is a validation failure, so the router
//! and the graph only ever see well-formed values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FlowError;

/// The reviewing doctor's verdict on the case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Confirmed,
    Rejected,
}

impl FromStr for Decision {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(Decision::Confirmed),
            "rejected" => Ok(Decision::Rejected),
            other => Err(FlowError::validation(format!(
                "unrecognized decision '{}' (expected 'confirmed' or 'rejected')",
                other
            ))),
        }
    }
}

/// Seniority of the reviewing doctor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DoctorRole {
    Junior,
    Senior,
}

impl FromStr for DoctorRole {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "junior" => Ok(DoctorRole::Junior),
            "senior" => Ok(DoctorRole::Senior),
            other => Err(FlowError::validation(format!(
                "unrecognized doctor role '{}' (expected 'junior' or 'senior')",
                other
            ))),
        }
    }
}

/// The router's verdict: which branch the workflow takes next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    EscalateToSenior,
    CloseCaseNoStenosis,
    NotifyAndSchedule,
    End,
}

impl NextStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            NextStep::EscalateToSenior => "escalate_to_senior",
            NextStep::CloseCaseNoStenosis => "close_case_no_stenosis",
            NextStep::NotifyAndSchedule => "notify_and_schedule",
            NextStep::End => "end",
        }
    }
}

impl fmt::Display for NextStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one node in the static review graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeId {
    StartReview,
    DecideNextStep,
    EscalateToSenior,
    CloseCaseNoStenosis,
    SendSatisfactoryEmail,
    NotifyAndSchedule,
}

impl NodeId {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeId::StartReview => "start_review",
            NodeId::DecideNextStep => "decide_next_step",
            NodeId::EscalateToSenior => "escalate_to_senior",
            NodeId::CloseCaseNoStenosis => "close_case_no_stenosis",
            NodeId::SendSatisfactoryEmail => "send_satisfactory_email",
            NodeId::NotifyAndSchedule => "notify_and_schedule",
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
