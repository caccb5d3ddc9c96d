//! Repository sources
//!
//! A `RepositorySource` names one upstream repository the aggregator polls,
//! the exact label to query, and the tags attached to every issue it yields.
//! The `Registry` is the immutable, ordered list of sources handed to the
//! aggregator at construction.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// One tracked repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySource {
    pub owner: String,
    pub repo: String,
    /// Upstream label, matched case-sensitively
    pub label: String,
    pub tags: Vec<String>,
}

impl RepositorySource {
    pub fn new(owner: &str, repo: &str, label: &str, tags: &[&str]) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            label: label.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Ordered, immutable set of repository sources
#[derive(Debug, Clone)]
pub struct Registry {
    sources: Arc<[RepositorySource]>,
}

impl Registry {
    pub fn new(sources: Vec<RepositorySource>) -> Self {
        Self {
            sources: sources.into(),
        }
    }

    /// The repositories tracked out of the box
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_SOURCES
                .iter()
                .map(|(owner, repo, label, tags)| RepositorySource::new(owner, repo, label, tags))
                .collect(),
        )
    }

    /// Load a registry from a JSON array of sources
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let sources: Vec<RepositorySource> = serde_json::from_str(json)
            .map_err(|e| DomainError::Validation(format!("Invalid registry: {}", e)))?;

        for source in &sources {
            if source.owner.is_empty() || source.repo.is_empty() || source.label.is_empty() {
                return Err(DomainError::Validation(format!(
                    "Registry entry '{}' must have an owner, repo and label",
                    source.full_name()
                )));
            }
        }

        Ok(Self::new(sources))
    }

    pub fn from_file(path: &Path) -> Result<Self, DomainError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Validation(format!("Cannot read registry {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    pub fn sources(&self) -> &[RepositorySource] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

const GFI: &str = "good first issue";
const GFI_TITLE: &str = "Good First Issue";

type SourceRow = (&'static str, &'static str, &'static str, &'static [&'static str]);

const BUILTIN_SOURCES: &[SourceRow] = &[
    ("ethereum", "go-ethereum", GFI, &["ethereum", "core", "go"]),
    ("prysmaticlabs", "prysm", GFI, &["ethereum", "consensus", "go"]),
    ("sigp", "lighthouse", GFI, &["ethereum", "consensus", "rust"]),
    ("ethereum", "ethereum-org-website", GFI, &["ethereum", "docs", "frontend"]),
    ("ethereum", "web3.py", GFI_TITLE, &["ethereum", "python", "tooling"]),
    ("eth-brownie", "brownie", GFI_TITLE, &["ethereum", "smartcontracts", "python"]),
    ("OpenZeppelin", "openzeppelin-contracts", GFI, &["ethereum", "smartcontracts", "solidity"]),
    ("ethereum", "fe", GFI, &["ethereum", "language", "rust"]),
    ("paritytech", "substrate-connect", GFI, &["polkadot", "infrastructure", "javascript"]),
    ("cosmos", "gaia", GFI, &["cosmos", "core", "go"]),
    ("solana-labs", "solana", GFI, &["solana", "core", "rust"]),
    ("solana-labs", "solana-program-library", GFI, &["solana", "smartcontracts", "rust"]),
    ("metaplex-foundation", "mpl-token-metadata", GFI, &["solana", "nft", "rust"]),
    ("bitcoin", "bitcoin", GFI, &["bitcoin", "core", "cpp"]),
    ("lightningnetwork", "lnd", GFI, &["bitcoin", "lightning", "go"]),
    ("ElementsProject", "lightning", GFI, &["bitcoin", "lightning", "c"]),
    ("ipfs", "kubo", GFI, &["ipfs", "web3", "go"]),
    ("Uniswap", "uniswap-interface", GFI, &["defi", "frontend", "react"]),
    // Ethereum tooling
    ("ethereum", "web3.js", GFI, &["ethereum", "tooling", "javascript"]),
    ("trufflesuite", "truffle", GFI, &["ethereum", "tooling", "javascript"]),
    ("ConsenSys", "mythril", GFI, &["ethereum", "security", "python"]),
    ("foundry-rs", "foundry", GFI, &["ethereum", "smartcontracts", "rust"]),
    ("ethereum", "remix-project", GFI, &["ethereum", "ide", "javascript"]),
    // Cardano
    ("input-output-hk", "cardano-node", GFI_TITLE, &["cardano", "core", "haskell"]),
    ("input-output-hk", "cardano-wallet", GFI_TITLE, &["cardano", "wallet", "haskell"]),
    ("input-output-hk", "plutus", GFI_TITLE, &["cardano", "smartcontracts", "haskell"]),
    // Polkadot / Substrate
    ("paritytech", "polkadot", GFI, &["polkadot", "core", "rust"]),
    ("paritytech", "substrate", GFI, &["polkadot", "framework", "rust"]),
    // Cosmos
    ("cosmos", "cosmos-sdk", GFI, &["cosmos", "framework", "go"]),
    ("tendermint", "tendermint", GFI, &["cosmos", "consensus", "go"]),
    // Solana
    ("solana-labs", "solana-web3.js", GFI, &["solana", "tooling", "javascript"]),
    ("metaplex-foundation", "metaplex", GFI, &["solana", "nft", "typescript"]),
    // Bitcoin
    ("btcsuite", "btcd", GFI, &["bitcoin", "core", "go"]),
    ("bitcoinjs", "bitcoinjs-lib", GFI, &["bitcoin", "tooling", "javascript"]),
    // DeFi
    ("aave", "protocol-v2", GFI, &["defi", "smartcontracts", "solidity"]),
    ("compound-finance", "compound-protocol", GFI, &["defi", "smartcontracts", "solidity"]),
    ("makerdao", "dai.js", GFI, &["defi", "tooling", "javascript"]),
    ("sushiswap", "sushiswap", GFI, &["defi", "smartcontracts", "solidity"]),
    ("yearn", "yearn-vaults", GFI, &["defi", "smartcontracts", "solidity"]),
    ("balancer-labs", "balancer-core", GFI, &["defi", "smartcontracts", "solidity"]),
    // NFT
    ("rarible", "protocol", GFI, &["nft", "smartcontracts", "solidity"]),
    ("decentraland", "marketplace", GFI, &["nft", "frontend", "react"]),
    // Layer 2
    ("ethereum-optimism", "optimism", GFI, &["layer2", "ethereum", "go"]),
    ("OffchainLabs", "arbitrum", GFI, &["layer2", "ethereum", "go"]),
    ("maticnetwork", "matic.js", GFI, &["layer2", "tooling", "javascript"]),
    ("zkSync-Community-Hub", "zksync", GFI, &["layer2", "smartcontracts", "solidity"]),
    // Interoperability and oracles
    ("smartcontractkit", "chainlink", GFI, &["oracles", "smartcontracts", "go"]),
    ("interledger", "rafiki", GFI, &["interoperability", "javascript"]),
    ("wormhole-foundation", "wormhole", GFI, &["interoperability", "smartcontracts", "solidity"]),
    // Storage
    ("filecoin-project", "lotus", GFI, &["storage", "go"]),
    ("storj", "storj", GFI, &["storage", "go"]),
    ("sia-tech", "siad", GFI, &["storage", "go"]),
    // Identity and governance
    ("ceramicnetwork", "js-ceramic", GFI, &["identity", "javascript"]),
    ("ensdomains", "ens", GFI, &["identity", "smartcontracts", "solidity"]),
    ("aragon", "aragon-ui", GFI, &["governance", "frontend", "react"]),
    ("gnosis", "conditional-tokens-contracts", GFI, &["defi", "smartcontracts", "solidity"]),
    // Privacy
    ("zcash", "zcash", GFI, &["privacy", "core", "cpp"]),
    ("monero-project", "monero", GFI, &["privacy", "core", "cpp"]),
    // Wallets
    ("MetaMask", "metamask-extension", GFI, &["wallet", "frontend", "javascript"]),
    ("trustwallet", "assets", GFI, &["wallet", "blockchain", "json"]),
    // Explorers and analytics
    ("poanetwork", "blockscout", GFI, &["explorer", "elixir"]),
    ("blockchain-etl", "ethereum-etl", GFI, &["analytics", "python"]),
    ("graphprotocol", "graph-node", GFI, &["indexing", "rust"]),
    // Stablecoins
    ("ampleforth", "ampleforth-protocol", GFI, &["stablecoin", "smartcontracts", "solidity"]),
    // Other ecosystems
    ("near", "nearcore", GFI, &["near", "core", "rust"]),
    ("avalanche-foundation", "avalanchego", GFI, &["avalanche", "core", "go"]),
    ("hedera-hashgraph", "hedera-services", GFI, &["hedera", "core", "java"]),
    ("stellar", "stellar-core", GFI, &["stellar", "core", "cpp"]),
    ("algorand", "go-algorand", GFI, &["algorand", "core", "go"]),
    ("tezos", "tezos", GFI, &["tezos", "core", "ocaml"]),
    ("radicle-dev", "radicle-link", GFI, &["web3", "p2p", "rust"]),
    ("hyperledger", "fabric", GFI, &["enterprise", "blockchain", "go"]),
];
