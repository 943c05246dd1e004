//! Process-lifetime ledger of delivery attempts.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{LedgerSnapshot, LedgerStats, MessageRecord},
    ports::MessageLedger,
    Result,
};

/// In-memory `MessageLedger`. Unbounded; contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    records: Mutex<Vec<MessageRecord>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl MessageLedger for InMemoryLedger {
    async fn append(&self, record: MessageRecord) -> Result<()> {
        self.records.lock().await.push(record);
        Ok(())
    }

    async fn list_all(&self) -> Result<LedgerSnapshot> {
        let messages: Vec<MessageRecord> = {
            let guard = self.records.lock().await;
            guard.iter().rev().cloned().collect()
        };
        let stats = LedgerStats::tally(&messages);
        Ok(LedgerSnapshot { messages, stats })
    }
}
