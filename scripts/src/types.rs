//! Type definitions used throughout the scripts

use alloy_primitives::{Address, Bytes, U256};
use serde::Deserialize;

use crate::errors::ScriptError;

/// A network configuration whose addresses have all been validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNetworkConfig {
    /// The name of the network
    pub name: String,
    /// The chain ID the network's RPC endpoint must report
    pub chain_id: u64,
    /// The PancakeSwap V2 factory address
    pub factory_v3: Address,
    /// The PancakeSwap V3 factory address
    pub pancake_factory_v3: Address,
    /// The wrapped native token address
    pub weth: Address,
    /// The swap fee rate, in basis points
    pub fee_rate_bps: u16,
    /// The ticker of the network's native token
    pub native_symbol: String,
}

impl ResolvedNetworkConfig {
    /// The fee rate as passed to the SwapX initializer
    pub fn fee_rate(&self) -> U256 {
        U256::from(self.fee_rate_bps)
    }
}

/// A Hardhat compilation artifact.
///
/// Only the fields the scripts need are deserialized, the ABI is left out.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    /// The name of the compiled contract
    pub contract_name: String,
    /// The creation bytecode of the contract
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// The creation code of the contract, with the ABI-encoded constructor
    /// arguments appended
    pub fn init_code(&self, constructor_args: &[u8]) -> Bytes {
        let mut code = self.bytecode.to_vec();
        code.extend_from_slice(constructor_args);
        code.into()
    }
}

/// The addresses making up a freshly deployed SwapX proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeploymentResult {
    /// The proxy contract, the address users interact with
    pub proxy: Address,
    /// The implementation contract the proxy delegates to
    pub implementation: Address,
    /// The `ProxyAdmin` contract allowed to upgrade the proxy
    pub admin: Address,
}

/// The addresses involved in upgrading a SwapX proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradeResult {
    /// The upgraded proxy contract
    pub proxy: Address,
    /// The implementation the proxy delegated to before the upgrade
    pub previous_implementation: Address,
    /// The `ProxyAdmin` contract which performed the upgrade
    pub admin: Address,
    /// The implementation the proxy delegates to after the upgrade
    pub new_implementation: Address,
}

/// The outcome of the read-only checks run against an upgraded proxy.
///
/// Each read is attempted independently, so one failure never hides the
/// others.
#[derive(Debug)]
pub struct VerificationReport {
    /// The result of `factory()`
    pub factory: Result<Address, ScriptError>,
    /// The result of `paused()`
    pub paused: Result<bool, ScriptError>,
    /// The result of `owner()`
    pub owner: Result<Address, ScriptError>,
}

impl VerificationReport {
    /// Whether every verification read succeeded
    pub fn all_succeeded(&self) -> bool {
        self.factory.is_ok() && self.paused.is_ok() && self.owner.is_ok()
    }
}
