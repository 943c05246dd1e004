//! Send / list orchestration.
//!
//! A send runs Composer -> DeliveryClient -> ledger append. Every request that
//! passes validation leaves exactly one record behind, delivered or not.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    composer::Composer,
    delivery::{DeliveryClient, FAILED_TO_SEND},
    domain::{Capabilities, Category, LedgerSnapshot, MessageRecord, MessageStatus},
    errors::Error,
    ports::MessageLedger,
    Result,
};

pub const MISSING_FIELDS: &str = "Phone number and context are required";

/// Input of a send operation. Fields are optional so the service, not the
/// transport, decides what counts as missing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SendRequest {
    pub destination: Option<String>,
    pub context: Option<String>,
    pub category: Option<String>,
}

/// Successful send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendReceipt {
    pub record: MessageRecord,
}

impl SendReceipt {
    pub fn text(&self) -> &str {
        &self.record.content
    }
}

#[derive(Clone)]
pub struct MessagingService {
    composer: Composer,
    delivery: DeliveryClient,
    ledger: Arc<dyn MessageLedger>,
}

impl MessagingService {
    pub fn new(composer: Composer, delivery: DeliveryClient, ledger: Arc<dyn MessageLedger>) -> Self {
        Self {
            composer,
            delivery,
            ledger,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            completion: self.composer.has_completion(),
            gateway: !self.delivery.is_demo(),
        }
    }

    /// Compose, deliver and record one message.
    ///
    /// Errors: `InvalidInput` (nothing recorded), `Delivery` (recorded as
    /// failed), or whatever the ledger reports.
    pub async fn send(&self, req: SendRequest) -> Result<SendReceipt> {
        let (Some(destination), Some(context)) = (
            req.destination.as_deref().and_then(present),
            req.context.as_deref().and_then(present),
        ) else {
            return Err(Error::InvalidInput(MISSING_FIELDS.to_string()));
        };

        let category = req
            .category
            .as_deref()
            .and_then(present)
            .unwrap_or(Category::default().as_str());

        let text = self.composer.compose(category, context).await;
        let outcome = self.delivery.deliver(destination, &text).await;

        let record = MessageRecord::new(
            destination,
            text,
            MessageStatus::from_delivered(outcome.delivered),
        );
        self.ledger.append(record.clone()).await?;

        if outcome.delivered {
            info!(id = %record.id, category, "message sent");
            Ok(SendReceipt { record })
        } else {
            let detail = outcome
                .error_detail
                .unwrap_or_else(|| FAILED_TO_SEND.to_string());
            warn!(id = %record.id, category, detail = %detail, "message recorded as failed");
            Err(Error::Delivery(detail))
        }
    }

    pub async fn list(&self) -> Result<LedgerSnapshot> {
        self.ledger.list_all().await
    }
}

fn present(s: &str) -> Option<&str> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
