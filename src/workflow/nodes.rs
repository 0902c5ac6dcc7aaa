// SPDX-License-Identifier: MIT

//! The six nodes of the review graph
//!
//! Every node gets its collaborator handles at construction, so the graph
//! can be wired against real HTTP clients in the binary and against mocks in
//! tests. Message subjects and bodies are fixed text; there is no templating
//! layer.

use async_trait::async_trait;
use std::sync::Arc;

use crate::clients::case_store::{CaseStatus, CaseStore};
use crate::clients::notification::NotificationService;
use crate::clients::scheduling::SchedulingService;
use crate::error::ClientError;
use crate::workflow::node::Node;
use crate::workflow::router;
use crate::workflow::state::{StateUpdate, Transition, WorkflowState};
use crate::workflow::types::{NextStep, NodeId};

/// Entry node: enrich the state with the patient's email address.
///
/// A case without a stored email leaves the field unset; whether that matters
/// is decided later, by the nodes that actually need a recipient.
pub struct StartReview {
    store: Arc<dyn CaseStore>,
}

impl StartReview {
    pub fn new(store: Arc<dyn CaseStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Node for StartReview {
    fn id(&self) -> NodeId {
        NodeId::StartReview
    }

    async fn run(&self, state: &WorkflowState) -> Result<Transition, ClientError> {
        let patient_email = self.store.get_patient_email(&state.case_id).await?;
        if patient_email.is_none() {
            log::warn!("case {}: no patient email on record", state.case_id);
        }
        Ok(Transition::Update(StateUpdate {
            patient_email,
            ..Default::default()
        }))
    }
}

/// Decision node: invoke the router and record its verdict. No side effects.
pub struct DecideNextStep;

#[async_trait]
impl Node for DecideNextStep {
    fn id(&self) -> NodeId {
        NodeId::DecideNextStep
    }

    async fn run(&self, state: &WorkflowState) -> Result<Transition, ClientError> {
        let step = router::route(state.decision, state.doctor_role);
        log::info!("case {}: routed to '{}'", state.case_id, step);
        Ok(Transition::Update(StateUpdate {
            next_step: Some(step),
            ..Default::default()
        }))
    }
}

/// Junior confirmation: park the case in the senior reviewer's queue.
pub struct EscalateToSenior {
    store: Arc<dyn CaseStore>,
}

impl EscalateToSenior {
    pub fn new(store: Arc<dyn CaseStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Node for EscalateToSenior {
    fn id(&self) -> NodeId {
        NodeId::EscalateToSenior
    }

    async fn run(&self, state: &WorkflowState) -> Result<Transition, ClientError> {
        self.store
            .update_case_status(&state.case_id, CaseStatus::PendingSeniorReview, &state.findings)
            .await?;
        Ok(Transition::Update(StateUpdate {
            next_step: Some(NextStep::End),
            ..Default::default()
        }))
    }
}

/// Rejection from either role: close the case. The satisfactory email is a
/// separate node, reached through this node's unconditional edge.
pub struct CloseCaseNoStenosis {
    store: Arc<dyn CaseStore>,
}

impl CloseCaseNoStenosis {
    pub fn new(store: Arc<dyn CaseStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Node for CloseCaseNoStenosis {
    fn id(&self) -> NodeId {
        NodeId::CloseCaseNoStenosis
    }

    async fn run(&self, state: &WorkflowState) -> Result<Transition, ClientError> {
        self.store
            .update_case_status(&state.case_id, CaseStatus::ClosedNoStenosis, &state.findings)
            .await?;
        Ok(Transition::Replace(state.clone()))
    }
}

/// Tell the patient no significant stenosis was found.
pub struct SendSatisfactoryEmail {
    notifier: Arc<dyn NotificationService>,
}

impl SendSatisfactoryEmail {
    pub fn new(notifier: Arc<dyn NotificationService>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl Node for SendSatisfactoryEmail {
    fn id(&self) -> NodeId {
        NodeId::SendSatisfactoryEmail
    }

    async fn run(&self, state: &WorkflowState) -> Result<Transition, ClientError> {
        let recipient = state
            .patient_email
            .as_deref()
            .ok_or_else(|| ClientError::MissingRecipient {
                case_id: state.case_id.clone(),
            })?;

        let subject = format!("Your Angiography Results for Case ID: {}", state.case_id);
        let body = satisfactory_email_body(&state.case_id, &state.findings);
        self.notifier.send(recipient, &subject, &body).await?;

        Ok(Transition::Update(StateUpdate {
            next_step: Some(NextStep::End),
            ..Default::default()
        }))
    }
}

/// Senior confirmation: close the case as confirmed, notify the patient and
/// book the follow-up appointment, in that order. The first failure aborts
/// the node; earlier calls are not rolled back.
pub struct NotifyAndSchedule {
    store: Arc<dyn CaseStore>,
    notifier: Arc<dyn NotificationService>,
    scheduler: Arc<dyn SchedulingService>,
}

impl NotifyAndSchedule {
    pub fn new(
        store: Arc<dyn CaseStore>,
        notifier: Arc<dyn NotificationService>,
        scheduler: Arc<dyn SchedulingService>,
    ) -> Self {
        Self {
            store,
            notifier,
            scheduler,
        }
    }
}

#[async_trait]
impl Node for NotifyAndSchedule {
    fn id(&self) -> NodeId {
        NodeId::NotifyAndSchedule
    }

    async fn run(&self, state: &WorkflowState) -> Result<Transition, ClientError> {
        let recipient = state
            .patient_email
            .as_deref()
            .ok_or_else(|| ClientError::MissingRecipient {
                case_id: state.case_id.clone(),
            })?;

        self.store
            .update_case_status(
                &state.case_id,
                CaseStatus::ClosedStenosisConfirmed,
                &state.findings,
            )
            .await?;

        let subject = "Important: Your Angiography Results and Follow-up Appointment";
        let body = follow_up_email_body(&state.case_id, &state.findings);
        self.notifier.send(recipient, subject, &body).await?;

        self.scheduler.create_appointment(recipient).await?;

        Ok(Transition::Update(StateUpdate {
            next_step: Some(NextStep::End),
            ..Default::default()
        }))
    }
}

fn satisfactory_email_body(case_id: &str, findings: &str) -> String {
    format!(
        "Dear Patient,\n\n\
         This email is regarding your recent angiography (Case ID: {}).\n\n\
         A specialist has reviewed your results and found no significant stenosis.\n\n\
         Doctor's Findings:\n{}\n\n\
         If you have any further questions, please contact our clinic.\n\n\
         Sincerely,\nCardioSense Clinic",
        case_id, findings
    )
}

fn follow_up_email_body(case_id: &str, findings: &str) -> String {
    format!(
        "Dear Patient,\n\n\
         This email is regarding your recent angiography (Case ID: {}).\n\n\
         Based on a review by our senior specialist, a follow-up appointment is \
         recommended. An appointment has been scheduled for you; please check your \
         calendar for the details.\n\n\
         Doctor's Findings:\n{}\n\n\
         Sincerely,\nCardioSense Clinic",
        case_id, findings
    )
}
