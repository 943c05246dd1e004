//! Delivery through the SMS gateway, or simulated success in demo mode.

use std::sync::Arc;

use tracing::{error, info};

use crate::{
    errors::Error,
    ports::{OutboundSms, SmsGateway},
};

pub const FAILED_TO_SEND: &str = "Failed to send SMS";
pub const NETWORK_ERROR: &str = "Network error";

/// Result of one delivery attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub delivered: bool,
    /// Caller-safe reason; provider detail is logged, never carried here.
    pub error_detail: Option<String>,
}

impl DeliveryOutcome {
    pub fn delivered() -> Self {
        Self {
            delivered: true,
            error_detail: None,
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            delivered: false,
            error_detail: Some(detail.into()),
        }
    }
}

/// Delivery client. `gateway = None` is demo mode.
#[derive(Clone)]
pub struct DeliveryClient {
    gateway: Option<Arc<dyn SmsGateway>>,
}

impl DeliveryClient {
    pub fn new(gateway: Option<Arc<dyn SmsGateway>>) -> Self {
        Self { gateway }
    }

    pub fn demo() -> Self {
        Self::new(None)
    }

    pub fn is_demo(&self) -> bool {
        self.gateway.is_none()
    }

    /// Exactly one attempt, no retries.
    pub async fn deliver(&self, destination: &str, text: &str) -> DeliveryOutcome {
        let Some(gateway) = &self.gateway else {
            info!(to = destination, "gateway not configured, running in demo mode");
            return DeliveryOutcome::delivered();
        };

        let sms = OutboundSms {
            to: destination.to_string(),
            body: text.to_string(),
        };

        match gateway.send(&sms).await {
            Ok(()) => {
                info!(to = destination, "sms accepted by gateway");
                DeliveryOutcome::delivered()
            }
            Err(Error::Transport(e)) => {
                error!(error = %e, to = destination, "sms transport error");
                DeliveryOutcome::failed(NETWORK_ERROR)
            }
            Err(e) => {
                error!(error = %e, to = destination, "sms gateway error");
                DeliveryOutcome::failed(FAILED_TO_SEND)
            }
        }
    }
}
