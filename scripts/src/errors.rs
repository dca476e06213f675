//! Definitions of errors that can occur during the execution of the deploy & upgrade scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deploy & upgrade scripts
#[derive(Debug)]
pub enum ScriptError {
    /// The requested network has no entry in the network configuration table
    UnsupportedNetwork(String),
    /// The network configuration has a missing or placeholder field
    IncompleteConfig(String),
    /// The RPC endpoint serves a different chain than the network configuration expects
    ChainMismatch {
        /// The name of the configured network
        network: String,
        /// The chain ID the network configuration expects
        expected: u64,
        /// The chain ID reported by the RPC endpoint
        actual: u64,
    },
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error reading or parsing a Hardhat compilation artifact
    ArtifactParsing(String),
    /// Error constructing calldata for a contract method
    CalldataConstruction(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method or reading chain state
    ContractInteraction(String),
    /// The target address does not hold an EIP-1967 proxy
    NotAProxy(String),
    /// Error reading the deployments file
    ReadDeployments(String),
    /// Error writing the deployments file
    WriteDeployments(String),
}

impl ScriptError {
    /// Whether this error stems from the static network configuration,
    /// i.e. was raised before any transaction could be submitted
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ScriptError::UnsupportedNetwork(_)
                | ScriptError::IncompleteConfig(_)
                | ScriptError::ChainMismatch { .. }
        )
    }
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::UnsupportedNetwork(network) => write!(
                f,
                "Unsupported network: {}, please add configuration in NETWORK_CONFIG",
                network
            ),
            ScriptError::IncompleteConfig(s) => write!(f, "{}", s),
            ScriptError::ChainMismatch {
                network,
                expected,
                actual,
            } => write!(
                f,
                "network {} expects chain ID {}, but the RPC endpoint reports {}",
                network, expected, actual
            ),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::NotAProxy(s) => write!(f, "not an EIP-1967 proxy: {}", s),
            ScriptError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            ScriptError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
        }
    }
}

impl Error for ScriptError {}
