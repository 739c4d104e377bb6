//! Delayed Transactions and Upstream Records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded intent to execute a nomination at a block number.
/// Unique on (number, controller); deleted once executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayedTx {
    /// Block number the announcement was recorded at
    pub number: u64,
    pub controller: String,
    pub targets: Vec<String>,
    pub call_hash: String,
}

/// An upstream client release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub name: String,
    pub published_at: DateTime<Utc>,
}

/// Chain name and token decimals, stored as a singleton
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainMetadata {
    pub name: String,
    pub decimals: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delayed_tx_identity() {
        let tx = DelayedTx {
            number: 100,
            controller: "C".into(),
            targets: vec!["T".into()],
            call_hash: "H".into(),
        };
        assert_eq!(tx.number, 100);
        assert_eq!(tx.targets.len(), 1);
    }
}
