// SPDX-License-Identifier: MIT

//! Graph-walking execution engine
//!
//! The graph is static: a fixed entry node, unconditional edges, one
//! conditional edge at `decide_next_step`, and terminal nodes. Execution is a
//! single linear walk; the only data-dependent branch is the conditional
//! edge, resolved through the enum-keyed dispatch in [`resolve_step`].

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::clients::case_store::CaseStore;
use crate::clients::notification::NotificationService;
use crate::clients::scheduling::SchedulingService;
use crate::error::FlowError;
use crate::workflow::node::Node;
use crate::workflow::nodes::{
    CloseCaseNoStenosis, DecideNextStep, EscalateToSenior, NotifyAndSchedule,
    SendSatisfactoryEmail, StartReview,
};
use crate::workflow::state::{ReviewRequest, WorkflowState};
use crate::workflow::types::{NextStep, NodeId};

/// Outgoing edge of a node
#[derive(Debug, Clone, Copy)]
pub enum Edge {
    /// Unconditional successor
    To(NodeId),
    /// Successor selected by the `next_step` the router wrote
    Conditional,
    /// Terminal node; the run ends here
    End,
}

/// Safety bound on the walk. The longest defined path is three hops; hitting
/// this limit means the edge table has a definition bug.
const MAX_HOPS: u32 = 8;

static EDGES: Lazy<HashMap<NodeId, Edge>> = Lazy::new(|| {
    HashMap::from([
        (NodeId::StartReview, Edge::To(NodeId::DecideNextStep)),
        (NodeId::DecideNextStep, Edge::Conditional),
        (NodeId::EscalateToSenior, Edge::End),
        (
            NodeId::CloseCaseNoStenosis,
            Edge::To(NodeId::SendSatisfactoryEmail),
        ),
        (NodeId::SendSatisfactoryEmail, Edge::End),
        (NodeId::NotifyAndSchedule, Edge::End),
    ])
});

/// Map the router's verdict onto the graph. `End` has no target node: the
/// run terminates with no further side effects.
fn resolve_step(step: NextStep) -> Option<NodeId> {
    match step {
        NextStep::EscalateToSenior => Some(NodeId::EscalateToSenior),
        NextStep::CloseCaseNoStenosis => Some(NodeId::CloseCaseNoStenosis),
        NextStep::NotifyAndSchedule => Some(NodeId::NotifyAndSchedule),
        NextStep::End => None,
    }
}

/// The compiled review workflow: nodes plus the static edge table.
///
/// One instance serves many concurrent runs; `run` keeps all per-run state in
/// locals, so invocations never share mutable state.
pub struct ReviewWorkflow {
    nodes: HashMap<NodeId, Arc<dyn Node>>,
    edges: HashMap<NodeId, Edge>,
    entry: NodeId,
}

impl ReviewWorkflow {
    /// Assemble a workflow from explicit node and edge tables.
    pub fn new(nodes: Vec<Arc<dyn Node>>, edges: HashMap<NodeId, Edge>, entry: NodeId) -> Self {
        let nodes: HashMap<NodeId, Arc<dyn Node>> =
            nodes.into_iter().map(|n| (n.id(), n)).collect();
        Self {
            nodes,
            edges,
            entry,
        }
    }

    /// The standard six-node review graph wired against the given
    /// collaborator handles.
    pub fn standard(
        store: Arc<dyn CaseStore>,
        notifier: Arc<dyn NotificationService>,
        scheduler: Arc<dyn SchedulingService>,
    ) -> Self {
        let nodes: Vec<Arc<dyn Node>> = vec![
            Arc::new(StartReview::new(store.clone())),
            Arc::new(DecideNextStep),
            Arc::new(EscalateToSenior::new(store.clone())),
            Arc::new(CloseCaseNoStenosis::new(store.clone())),
            Arc::new(SendSatisfactoryEmail::new(notifier.clone())),
            Arc::new(NotifyAndSchedule::new(store, notifier, scheduler)),
        ];
        Self::new(nodes, EDGES.clone(), NodeId::StartReview)
    }

    /// Execute one run over the given request and return the terminal state.
    ///
    /// Validation happens before the first node executes; a request that
    /// fails it causes no side effects. A collaborator failure aborts the run
    /// at that node without rolling back earlier nodes. Retrying the whole
    /// submission is safe for the case status (last writer wins at the store)
    /// but may duplicate notifications and appointments.
    pub async fn run(&self, request: &ReviewRequest) -> Result<WorkflowState, FlowError> {
        let mut state = WorkflowState::from_request(request)?;

        let run_id = Uuid::new_v4();
        log::info!(
            "run {}: starting review workflow for case {} ({:?} by {:?})",
            run_id,
            state.case_id,
            state.decision,
            state.doctor_role
        );

        let mut completed: Vec<NodeId> = Vec::new();
        let mut current = self.entry;

        for _ in 0..MAX_HOPS {
            let node = self
                .nodes
                .get(&current)
                .ok_or(FlowError::MissingNode { id: current })?;

            log::info!("run {}: executing node '{}'", run_id, current);
            let transition = node.run(&state).await.map_err(|source| {
                log::error!("run {}: node '{}' failed: {}", run_id, current, source);
                FlowError::Collaborator {
                    node: current,
                    completed: completed.clone(),
                    source,
                }
            })?;
            state.apply(transition);
            completed.push(current);

            match self.edges.get(&current) {
                Some(Edge::To(next)) => current = *next,
                Some(Edge::Conditional) => {
                    let step = state
                        .next_step
                        .ok_or(FlowError::MissingNextStep { node: current })?;
                    match resolve_step(step) {
                        Some(next) if self.nodes.contains_key(&next) => current = next,
                        Some(_) => return Err(FlowError::UnresolvedStep { step }),
                        None => {
                            log::warn!(
                                "run {}: routing fell back to 'end' for case {}; \
                                 terminating with no side effects",
                                run_id,
                                state.case_id
                            );
                            return Ok(state);
                        }
                    }
                }
                Some(Edge::End) | None => {
                    log::info!(
                        "run {}: reached terminal node '{}' for case {}",
                        run_id,
                        current,
                        state.case_id
                    );
                    return Ok(state);
                }
            }
        }

        Err(FlowError::HopLimit { limit: MAX_HOPS })
    }
}
