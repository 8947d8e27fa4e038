//! Hand-off of built transactions for signing and broadcast.
//!
//! Each node's transactions are signed by that node's main account.
//! Signing, broadcast and confirmation are the announcer's job.

use async_trait::async_trait;

use crate::blockchain::account::Account;
use crate::blockchain::client::NetworkRepository;
use crate::blockchain::types::AnnounceError;
use crate::blockchain::transaction::Transaction;
use crate::config::schema::{NodeAccount, PresetData};

/// Transactions to announce on behalf of one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTransactions {
    pub node: NodeAccount,
    pub transactions: Vec<Transaction>,
}

/// Signs and broadcasts node transactions.
#[async_trait]
pub trait Announcer: Send + Sync {
    async fn announce(
        &self,
        repository: &dyn NetworkRepository,
        preset: &PresetData,
        nodes: Vec<NodeTransactions>,
        generation_hash: &str,
    ) -> Result<(), AnnounceError>;
}

/// Announcer that only reports what would be announced.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunAnnouncer;

#[async_trait]
impl Announcer for DryRunAnnouncer {
    async fn announce(
        &self,
        _repository: &dyn NetworkRepository,
        preset: &PresetData,
        nodes: Vec<NodeTransactions>,
        generation_hash: &str,
    ) -> Result<(), AnnounceError> {
        if nodes.is_empty() {
            tracing::info!("There are no transactions to announce");
            return Ok(());
        }

        for entry in &nodes {
            let main = entry.node.main.as_ref().ok_or_else(|| AnnounceError::Signing {
                node: entry.node.name.clone(),
                reason: "CA private key is required!".to_string(),
            })?;
            let signer = Account::from_private_key(&main.private_key, preset.network_type);

            for transaction in &entry.transactions {
                let header = transaction.header();
                tracing::info!(
                    node = %entry.node.name,
                    signer = %signer,
                    kind = %transaction.kind(),
                    action = %header.action,
                    linked_key = %transaction.linked_key_hex(),
                    deadline_ms = header.deadline.as_millis(),
                    max_fee = header.max_fee,
                    generation_hash = %generation_hash,
                    "Dry run: transaction not announced"
                );
            }
        }
        Ok(())
    }
}
