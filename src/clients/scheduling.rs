// SPDX-License-Identifier: MIT

//! Scheduling client
//!
//! The scheduler owns the slot policy: callers only name the attendee, and
//! the shim books the default follow-up slot.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde_json::json;
use std::env;

use super::{with_retry, CALL_TIMEOUT};
use crate::error::ClientError;

const SERVICE: &str = "scheduler";

const APPOINTMENT_TITLE: &str = "Follow-up Appointment for Stenosis Review";
const APPOINTMENT_LEAD_DAYS: i64 = 3;
const APPOINTMENT_HOUR: u32 = 10;
const APPOINTMENT_DURATION_HOURS: i64 = 1;

/// Interface to the appointment scheduling collaborator
#[async_trait]
pub trait SchedulingService: Send + Sync {
    async fn create_appointment(&self, attendee: &str) -> Result<(), ClientError>;
}

/// HTTP shim against the scheduling service
pub struct HttpSchedulingService {
    client: Client,
    base_url: String,
}

impl HttpSchedulingService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_env() -> Result<Self, ClientError> {
        let base_url = env::var("SCHEDULER_URL")
            .map_err(|_| ClientError::config("SCHEDULER_URL must be set"))?;
        Ok(Self::new(base_url))
    }
}

/// Default slot: three days out at 10:00 UTC, one hour long.
fn default_slot(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = (now + Duration::days(APPOINTMENT_LEAD_DAYS))
        .date_naive()
        .and_hms_opt(APPOINTMENT_HOUR, 0, 0)
        .unwrap()
        .and_utc();
    (start, start + Duration::hours(APPOINTMENT_DURATION_HOURS))
}

#[async_trait]
impl SchedulingService for HttpSchedulingService {
    async fn create_appointment(&self, attendee: &str) -> Result<(), ClientError> {
        let (start, end) = default_slot(Utc::now());
        let url = format!("{}/appointments", self.base_url.trim_end_matches('/'));
        let payload = json!({
            "summary": APPOINTMENT_TITLE,
            "description": "Follow-up appointment regarding your recent angiography results.",
            "start": start.to_rfc3339(),
            "end": end.to_rfc3339(),
            "attendees": [attendee],
        });
        let client = &self.client;
        let url = url.as_str();
        let payload = &payload;

        with_retry(SERVICE, || async move {
            let resp = client
                .post(url)
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

        log::info!("appointment created for {} at {}", attendee, start);
        Ok(())
    }
}
