// SPDX-License-Identifier: MIT

//! The uniform contract every workflow step implements

use async_trait::async_trait;

use crate::error::ClientError;
use crate::workflow::state::{Transition, WorkflowState};
use crate::workflow::types::NodeId;

/// One step of the review graph.
///
/// A node reads the current state, performs at most one unit of external
/// work, and hands back a [`Transition`] for the engine to merge. Nodes never
/// pick their own successor; edges are owned by the engine.
#[async_trait]
pub trait Node: Send + Sync {
    /// Stable identity of this node in the graph
    fn id(&self) -> NodeId;

    /// Execute the step against the current state
    async fn run(&self, state: &WorkflowState) -> Result<Transition, ClientError>;
}
