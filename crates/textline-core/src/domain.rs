use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque message id (UUID v4, string form).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of one delivery attempt. Set once, never changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sent,
    Failed,
}

impl MessageStatus {
    pub fn from_delivered(delivered: bool) -> Self {
        if delivered {
            Self::Sent
        } else {
            Self::Failed
        }
    }
}

/// One delivery attempt as kept in the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: MessageId,
    pub recipient: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub status: MessageStatus,
}

impl MessageRecord {
    /// New record with a fresh id, stamped now.
    pub fn new(
        recipient: impl Into<String>,
        content: impl Into<String>,
        status: MessageStatus,
    ) -> Self {
        Self {
            id: MessageId::generate(),
            recipient: recipient.into(),
            content: content.into(),
            timestamp: Utc::now(),
            status,
        }
    }
}

/// Kind of message the composer is asked to write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Category {
    #[default]
    Followup,
    Reminder,
    Greeting,
    Thankyou,
    Update,
    Custom,
}

impl Category {
    /// Exact-key lookup. Anything else, including other casings, is `Custom`.
    pub fn parse(s: &str) -> Self {
        match s {
            "followup" => Self::Followup,
            "reminder" => Self::Reminder,
            "greeting" => Self::Greeting,
            "thankyou" => Self::Thankyou,
            "update" => Self::Update,
            _ => Self::Custom,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Followup => "followup",
            Self::Reminder => "reminder",
            Self::Greeting => "greeting",
            Self::Thankyou => "thankyou",
            Self::Update => "update",
            Self::Custom => "custom",
        }
    }
}

/// Who the messages are written as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SenderPersona {
    pub name: String,
    pub business: String,
}

impl SenderPersona {
    pub const DEFAULT_NAME: &'static str = "the business owner";
    pub const DEFAULT_BUSINESS: &'static str = "our business";
}

impl Default for SenderPersona {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            business: Self::DEFAULT_BUSINESS.to_string(),
        }
    }
}

/// Aggregate counts over the ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    pub total: usize,
    pub sent: usize,
    pub failed: usize,
}

impl LedgerStats {
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a MessageRecord>) -> Self {
        let mut stats = Self::default();
        for r in records {
            stats.total += 1;
            match r.status {
                MessageStatus::Sent => stats.sent += 1,
                MessageStatus::Failed => stats.failed += 1,
            }
        }
        stats
    }
}

/// Point-in-time copy of the ledger, most recent first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub messages: Vec<MessageRecord>,
    pub stats: LedgerStats,
}

/// Which external dependencies are configured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub completion: bool,
    pub gateway: bool,
}

impl Capabilities {
    /// Demo mode: delivery is simulated.
    pub fn is_demo(&self) -> bool {
        !self.gateway
    }
}
