// SPDX-License-Identifier: MIT

//! Case store client
//!
//! The store is the system of record for cases. Status updates for the same
//! case are last-writer-wins at the store layer; this client adds no locking
//! of its own.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::env;
use std::fmt;

use super::{with_retry, CALL_TIMEOUT};
use crate::error::ClientError;

const SERVICE: &str = "case-store";

/// Durable case status values visible outside the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    PendingSeniorReview,
    ClosedNoStenosis,
    ClosedStenosisConfirmed,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::PendingSeniorReview => "pending_senior_review",
            CaseStatus::ClosedNoStenosis => "closed_no_stenosis",
            CaseStatus::ClosedStenosisConfirmed => "closed_stenosis_confirmed",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interface to the case store collaborator
#[async_trait]
pub trait CaseStore: Send + Sync {
    /// Look up the patient's email for a case. `Ok(None)` means the case has
    /// no email on record (or does not exist).
    async fn get_patient_email(&self, case_id: &str) -> Result<Option<String>, ClientError>;

    /// Overwrite the case's status and findings.
    async fn update_case_status(
        &self,
        case_id: &str,
        status: CaseStatus,
        findings: &str,
    ) -> Result<(), ClientError>;
}

/// HTTP shim against the case store service
pub struct HttpCaseStore {
    client: Client,
    base_url: String,
}

impl HttpCaseStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_env() -> Result<Self, ClientError> {
        let base_url = env::var("CASE_STORE_URL")
            .map_err(|_| ClientError::config("CASE_STORE_URL must be set"))?;
        Ok(Self::new(base_url))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Deserialize)]
struct CaseRecord {
    #[serde(rename = "patientEmail")]
    patient_email: Option<String>,
}

#[async_trait]
impl CaseStore for HttpCaseStore {
    async fn get_patient_email(&self, case_id: &str) -> Result<Option<String>, ClientError> {
        let url = self.url(&format!("cases/{}", case_id));
        let client = &self.client;
        let url = url.as_str();

        with_retry(SERVICE, || async move {
            let resp = client.get(url).timeout(CALL_TIMEOUT).send().await?;
            if resp.status() == StatusCode::NOT_FOUND {
                return Ok(None);
            }
            if !resp.status().is_success() {
                let status = resp.status().as_u16();
                let message = resp.text().await.unwrap_or_default();
                return Err(ClientError::api(SERVICE, status, message));
            }
            let record: CaseRecord = resp.json().await?;
            Ok(record.patient_email)
        })
        .await
    }

    async fn update_case_status(
        &self,
        case_id: &str,
        status: CaseStatus,
        findings: &str,
    ) -> Result<(), ClientError> {
        let url = self.url(&format!("cases/{}/status", case_id));
        let payload = json!({
            "status": status,
            "findings": findings,
        });
        let client = &self.client;
        let url = url.as_str();
        let payload = &payload;

        with_retry(SERVICE, || async move {
            let resp = client
                .put(url)
                .timeout(CALL_TIMEOUT)
                .json(payload)
                .send()
                .await?;
            if !resp.status().is_success() {
                let status = resp.status().as_u16();
                let message = resp.text().await.unwrap_or_default();
                return Err(ClientError::api(SERVICE, status, message));
            }
            Ok(())
        })
        .await?;

        log::info!("case {}: status set to '{}'", case_id, status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_status_wire_names() {
        assert_eq!(CaseStatus::PendingSeniorReview.as_str(), "pending_senior_review");
        assert_eq!(CaseStatus::ClosedNoStenosis.as_str(), "closed_no_stenosis");
        assert_eq!(
            CaseStatus::ClosedStenosisConfirmed.as_str(),
            "closed_stenosis_confirmed"
        );
    }

    #[test]
    fn test_case_status_serializes_to_wire_name() {
        let value = serde_json::to_value(CaseStatus::ClosedNoStenosis).unwrap();
        assert_eq!(value, serde_json::json!("closed_no_stenosis"));
    }

    #[test]
    fn test_base_url_trailing_slash_is_tolerated() {
        let store = HttpCaseStore::new("http://cases.internal/");
        assert_eq!(store.url("cases/c1"), "http://cases.internal/cases/c1");
    }

    #[test]
    fn test_case_record_reads_store_field_name() {
        let record: CaseRecord =
            serde_json::from_str(r#"{"patientEmail": "p@example.com", "status": "x"}"#).unwrap();
        assert_eq!(record.patient_email.as_deref(), Some("p@example.com"));

        let record: CaseRecord = serde_json::from_str(r#"{"status": "x"}"#).unwrap();
        assert!(record.patient_email.is_none());
    }
}
