use async_trait::async_trait;

use crate::{
    domain::{LedgerSnapshot, MessageRecord},
    Result,
};

/// A single chat-style completion request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
}

/// Hexagonal port for a text-completion backend (OpenAI today).
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the completion text. Empty or missing output is an error.
    async fn complete(&self, req: &CompletionRequest) -> Result<String>;
}

/// One outbound SMS.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundSms {
    pub to: String,
    pub body: String,
}

/// Hexagonal port for an SMS gateway (Twilio today).
///
/// Implementations make exactly one attempt and map provider rejections to
/// `Error::GatewayRejected` and connection failures to `Error::Transport`.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send(&self, sms: &OutboundSms) -> Result<()>;
}

/// Append-only store of delivery attempts.
#[async_trait]
pub trait MessageLedger: Send + Sync {
    async fn append(&self, record: MessageRecord) -> Result<()>;

    /// Snapshot of every record, most recent first, with stats.
    async fn list_all(&self) -> Result<LedgerSnapshot>;
}
