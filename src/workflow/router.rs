// SPDX-License-Identifier: MIT

//! Deterministic routing rule for the review workflow
//!
//! A pure, total function over the (decision, doctor role) cross-product.
//! The match is deliberately written without wildcard arms: adding a new
//! `Decision` or `DoctorRole` variant fails to compile until this table is
//! extended, which keeps the dispatch explicit instead of silently falling
//! through.

use crate::workflow::types::{Decision, DoctorRole, NextStep};

/// Compute the branch the workflow takes after `decide_next_step`.
///
/// Precedence, first match wins:
/// 1. a rejection from either role closes the case;
/// 2. a junior confirmation escalates to a senior reviewer;
/// 3. a senior confirmation notifies the patient and schedules a follow-up.
pub fn route(decision: Decision, doctor_role: DoctorRole) -> NextStep {
    match (decision, doctor_role) {
        (Decision::Rejected, DoctorRole::Junior) | (Decision::Rejected, DoctorRole::Senior) => {
            NextStep::CloseCaseNoStenosis
        }
        (Decision::Confirmed, DoctorRole::Junior) => NextStep::EscalateToSenior,
        (Decision::Confirmed, DoctorRole::Senior) => NextStep::NotifyAndSchedule,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_table_over_full_cross_product() {
        let table = [
            (
                Decision::Rejected,
                DoctorRole::Junior,
                NextStep::CloseCaseNoStenosis,
            ),
            (
                Decision::Rejected,
                DoctorRole::Senior,
                NextStep::CloseCaseNoStenosis,
            ),
            (
                Decision::Confirmed,
                DoctorRole::Junior,
                NextStep::EscalateToSenior,
            ),
            (
                Decision::Confirmed,
                DoctorRole::Senior,
                NextStep::NotifyAndSchedule,
            ),
        ];

        for (decision, role, expected) in table {
            assert_eq!(
                route(decision, role),
                expected,
                "({:?}, {:?}) must route to {:?}",
                decision,
                role,
                expected
            );
        }
    }

    #[test]
    fn test_rejection_outranks_role() {
        assert_eq!(
            route(Decision::Rejected, DoctorRole::Junior),
            route(Decision::Rejected, DoctorRole::Senior)
        );
    }
}
