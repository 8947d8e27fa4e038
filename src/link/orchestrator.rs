//! Link run orchestration.
//!
//! # Responsibilities
//! - Load preset and key records (unless supplied by the caller)
//! - Check the node belongs to the preset's network before building anything
//! - Build the key-link transactions of every eligible node
//! - Hand the result to the announcer
//!
//! Network calls are issued one at a time, in order: currency, generation
//! hash, epoch adjustment, announce.

use std::sync::Arc;
use tracing::instrument::WithSubscriber;
use tracing::Dispatch;

use crate::blockchain::account::Account;
use crate::blockchain::announce::{Announcer, NodeTransactions};
use crate::blockchain::client::RepositoryConnector;
use crate::blockchain::transaction::{
    create_voting_key_transaction, Deadline, LinkAction, Transaction, TransactionHeader,
};
use crate::config::loader::ConfigLoader;
use crate::config::schema::{Addresses, LinkParams, NodeAccount, PresetData};
use crate::link::types::{LinkError, LinkResult};

/// Builds and announces key-link transactions for the nodes of a target.
pub struct LinkOrchestrator {
    params: LinkParams,
    config_loader: Arc<dyn ConfigLoader>,
    connector: Arc<dyn RepositoryConnector>,
    announcer: Arc<dyn Announcer>,
    logger: Dispatch,
}

impl LinkOrchestrator {
    /// Create an orchestrator logging to the current default subscriber.
    pub fn new(
        params: LinkParams,
        config_loader: impl ConfigLoader + 'static,
        connector: impl RepositoryConnector + 'static,
        announcer: impl Announcer + 'static,
    ) -> Self {
        Self {
            params,
            config_loader: Arc::new(config_loader),
            connector: Arc::new(connector),
            announcer: Arc::new(announcer),
            logger: tracing::dispatcher::get_default(|dispatch| dispatch.clone()),
        }
    }

    /// Send this orchestrator's log events to `logger`.
    pub fn with_logger(mut self, logger: impl Into<Dispatch>) -> Self {
        self.logger = logger.into();
        self
    }

    /// Run the link process.
    ///
    /// `preset_data` and `addresses` bypass the config loader when given.
    pub async fn run(&self, preset_data: Option<PresetData>, addresses: Option<Addresses>) -> LinkResult<()> {
        self.run_inner(preset_data, addresses)
            .with_subscriber(self.logger.clone())
            .await
    }

    async fn run_inner(&self, preset_data: Option<PresetData>, addresses: Option<Addresses>) -> LinkResult<()> {
        let password = self.params.password.as_deref();
        let preset_data = match preset_data {
            Some(preset) => preset,
            None => self
                .config_loader
                .load_existing_preset_data(&self.params.target, password)?,
        };
        let addresses = match addresses {
            Some(addresses) => addresses,
            None => self
                .config_loader
                .load_existing_addresses(&self.params.target, password)?,
        };

        let url = self.params.url.strip_suffix('/').unwrap_or(&self.params.url);
        let repository = self.connector.connect(url)?;
        let currency = repository.get_currency().await?;

        tracing::info!(
            "{} nodes using network url {}. Max Fee {}",
            if self.params.unlink { "Unlinking" } else { "Linking" },
            url,
            currency.relative_amount(self.params.max_fee)
        );

        let generation_hash = repository.get_generation_hash().await?;
        if generation_hash != preset_data.nemesis_generation_hash_seed {
            tracing::error!(
                expected = %preset_data.nemesis_generation_hash_seed,
                actual = %generation_hash,
                "Network mismatch"
            );
            return Err(LinkError::NetworkMismatch {
                expected: preset_data.nemesis_generation_hash_seed.clone(),
                actual: generation_hash,
            });
        }

        let epoch_adjustment = repository.get_epoch_adjustment().await?;
        let transaction_nodes = self.build_transactions(epoch_adjustment, &addresses, &preset_data)?;

        self.announcer
            .announce(repository.as_ref(), &preset_data, transaction_nodes, &generation_hash)
            .await?;
        Ok(())
    }

    /// Build the transactions of every node that has keys to link.
    ///
    /// Nodes without a main account, or without any of remote, voting and
    /// VRF keys, are skipped. Output keeps the input node order. All
    /// transactions of one node share one deadline and one fee.
    pub fn create_transactions_to_announce(
        &self,
        epoch_adjustment: u64,
        addresses: &Addresses,
        preset_data: &PresetData,
    ) -> LinkResult<Vec<NodeTransactions>> {
        tracing::dispatcher::with_default(&self.logger, || {
            self.build_transactions(epoch_adjustment, addresses, preset_data)
        })
    }

    fn build_transactions(
        &self,
        epoch_adjustment: u64,
        addresses: &Addresses,
        preset_data: &PresetData,
    ) -> LinkResult<Vec<NodeTransactions>> {
        addresses
            .nodes
            .iter()
            .filter(|node| node.is_linkable())
            .map(|node| self.build_node_transactions(node, epoch_adjustment, preset_data))
            .collect()
    }

    fn build_node_transactions(
        &self,
        node: &NodeAccount,
        epoch_adjustment: u64,
        preset_data: &PresetData,
    ) -> LinkResult<NodeTransactions> {
        let main = node.main.as_ref().ok_or_else(|| LinkError::MissingMainKey {
            node: node.name.clone(),
        })?;
        let account = Account::from_private_key(&main.private_key, preset_data.network_type);
        let action = LinkAction::from_unlink(self.params.unlink);

        tracing::info!(
            "Creating transactions for node: {}, ca/main account: {}",
            node.name,
            account
        );

        let deadline = Deadline::create(epoch_adjustment);
        let max_fee = self.params.max_fee;
        let header = TransactionHeader::new(preset_data.network_type, deadline, max_fee, action);
        let mut transactions = Vec::new();

        if let Some(remote) = &node.remote {
            let transport = node.transport.as_ref().ok_or_else(|| LinkError::MissingTransportKey {
                node: node.name.clone(),
            })?;
            tracing::info!(
                "Creating AccountKeyLinkTransaction - node: {}, signer public key: {}, Remote Account public key: {}",
                node.name,
                account.public_key(),
                remote.public_key
            );
            transactions.push(Transaction::account_key_link(header, remote.public_key));
            tracing::info!(
                "Creating NodeKeyLinkTransaction - node: {}, signer public key: {}, Transport/Node Account public key: {}",
                node.name,
                account.public_key(),
                transport.public_key
            );
            transactions.push(Transaction::node_key_link(header, transport.public_key));
        }

        if let Some(vrf) = &node.vrf {
            tracing::info!(
                "Creating VrfKeyLinkTransaction - node: {}, signer public key: {}, VRF public key: {}",
                node.name,
                account.public_key(),
                vrf.public_key
            );
            transactions.push(Transaction::vrf_key_link(header, vrf.public_key));
        }

        if let Some(voting) = &node.voting {
            tracing::info!(
                "Creating VotingKeyLinkTransaction - node: {}, signer public key: {}, Voting public key: {}",
                node.name,
                account.public_key(),
                voting.public_key
            );
            transactions.push(create_voting_key_transaction(
                &voting.public_key,
                action,
                preset_data,
                deadline,
                max_fee,
            ));
        }

        Ok(NodeTransactions {
            node: node.clone(),
            transactions,
        })
    }
}

impl std::fmt::Debug for LinkOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkOrchestrator")
            .field("target", &self.params.target)
            .field("url", &self.params.url)
            .field("max_fee", &self.params.max_fee)
            .field("unlink", &self.params.unlink)
            .finish()
    }
}
