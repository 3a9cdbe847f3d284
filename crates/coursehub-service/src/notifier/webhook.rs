//! Webhook-based notification dispatch.

use std::time::Duration;

use async_trait::async_trait;

use coursehub_core::config::notifier::NotifierConfig;
use coursehub_core::error::AppError;
use coursehub_core::result::AppResult;

use super::{InviteNotification, InviteNotifier};

/// Posts invitation notifications to the platform mail-dispatch endpoint.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl WebhookNotifier {
    /// Creates a new webhook notifier from configuration.
    pub fn new(config: &NotifierConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::external_service(format!("Failed to build dispatch client: {e}"))
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl InviteNotifier for WebhookNotifier {
    async fn notify(&self, notification: InviteNotification) -> AppResult<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&notification)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Mail dispatch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "Mail dispatch returned status {}",
                response.status()
            )));
        }

        Ok(())
    }
}
