// SPDX-License-Identifier: MIT

//! Workflow engine for routing completed clinical case reviews.
//!
//! A finished review (case id, reviewing doctor's role, decision, findings)
//! enters the graph at `start_review` and walks a short, acyclic path to one
//! of three outcomes: escalate to a senior reviewer, close the case, or close
//! the case and schedule a follow-up. The case store, notification sender and
//! scheduler are external services consumed through the traits in [`clients`].

pub mod clients;
pub mod error;
pub mod server;
pub mod workflow;
