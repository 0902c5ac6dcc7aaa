// SPDX-License-Identifier: MIT

//! Notification sender client
//!
//! Fire-and-forget from the engine's perspective: a failure is reported but
//! never rolls back case store updates that already happened.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::env;

use super::{with_retry, CALL_TIMEOUT};
use crate::error::ClientError;

const SERVICE: &str = "notification";

/// Interface to the outbound notification collaborator
#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), ClientError>;
}

/// HTTP shim against the notification service
pub struct HttpNotificationService {
    client: Client,
    base_url: String,
}

impl HttpNotificationService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_env() -> Result<Self, ClientError> {
        let base_url = env::var("NOTIFICATION_URL")
            .map_err(|_| ClientError::config("NOTIFICATION_URL must be set"))?;
        Ok(Self::new(base_url))
    }
}

#[async_trait]
impl NotificationService for HttpNotificationService {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), ClientError> {
        let url = format!("{}/messages", self.base_url.trim_end_matches('/'));
        let payload = json!({
            "to": recipient,
            "subject": subject,
            "body": body,
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

        log::info!("notification sent to {}", recipient);
        Ok(())
    }
}
