use serde::Serialize;

/// Chain the gateway signs transactions for. The chain id is mixed into
/// every transaction hash so receipts from different chains never collide.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub name: String,
    pub chain_id: u64,
    pub rpc_url: String,
}

// ── Pre-set networks ──────────────────────────────────────────────────────────

/// Local development chain.
pub fn hardhat() -> NetworkConfig {
    NetworkConfig {
        name: "hardhat".to_string(),
        chain_id: 31337,
        rpc_url: "http://127.0.0.1:8545".to_string(),
    }
}

/// Ethereum Sepolia testnet. Default network.
pub fn sepolia() -> NetworkConfig {
    NetworkConfig {
        name: "sepolia".to_string(),
        chain_id: 11155111,
        rpc_url: "https://ethereum-sepolia-rpc.publicnode.com".to_string(),
    }
}

pub fn polygon_mumbai() -> NetworkConfig {
    NetworkConfig {
        name: "polygon-mumbai".to_string(),
        chain_id: 80001,
        rpc_url: "https://rpc-mumbai.maticvigil.com".to_string(),
    }
}

pub fn ganache() -> NetworkConfig {
    NetworkConfig {
        name: "ganache".to_string(),
        chain_id: 1337,
        rpc_url: "http://localhost:8545".to_string(),
    }
}

/// All pre-set networks.
pub fn all_networks() -> Vec<NetworkConfig> {
    vec![hardhat(), sepolia(), polygon_mumbai(), ganache()]
}

/// Look up a pre-set network by name (case-insensitive).
pub fn by_name(name: &str) -> Option<NetworkConfig> {
    let wanted = name.trim().to_ascii_lowercase();
    all_networks().into_iter().find(|n| n.name == wanted)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
