//! The static per-network parameters for the SwapX initializer

use std::str::FromStr;

use alloy_primitives::Address;

use crate::{constants::ADDRESS_PLACEHOLDER, errors::ScriptError, types::ResolvedNetworkConfig};

/// The SwapX initializer parameters for a single network.
///
/// Addresses are kept as written in the table so that unfilled entries can
/// carry a placeholder; they are only parsed once [`NetworkConfig::resolve`]
/// has rejected placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkConfig {
    /// The chain ID the network's RPC endpoint must report
    pub chain_id: u64,
    /// The PancakeSwap V2 factory address
    pub factory_v3: &'static str,
    /// The PancakeSwap V3 factory address
    pub pancake_factory_v3: &'static str,
    /// The wrapped native token address
    pub weth: &'static str,
    /// The swap fee rate, in basis points
    pub fee_rate_bps: u16,
    /// The ticker of the network's native token
    pub native_symbol: &'static str,
}

/// The network configuration table, keyed by network name
pub const NETWORK_CONFIG: &[(&str, NetworkConfig)] = &[
    // BSC testnet
    (
        "bsctest",
        NetworkConfig {
            chain_id: 97,
            factory_v3: "0x...",
            pancake_factory_v3: "0x....",
            weth: "0x...",
            fee_rate_bps: 30,
            native_symbol: "tBNB",
        },
    ),
    // BSC mainnet
    (
        "bsc",
        NetworkConfig {
            chain_id: 56,
            factory_v3: "0x0BFbCF9fa4f9C56B0F40a671Ad40E0805A091865",
            pancake_factory_v3: "0x0BFbCF9fa4f9C56B0F40a671Ad40E0805A091865",
            weth: "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c",
            fee_rate_bps: 100,
            native_symbol: "BNB",
        },
    ),
    // Local hardhat / anvil node
    (
        "hardhat",
        NetworkConfig {
            chain_id: 31337,
            factory_v3: "0x...",
            pancake_factory_v3: "0x...",
            weth: "0x...",
            fee_rate_bps: 30,
            native_symbol: "ETH",
        },
    ),
];

/// Look up the configuration of the given network
pub fn network_config(network: &str) -> Result<&'static NetworkConfig, ScriptError> {
    NETWORK_CONFIG
        .iter()
        .find_map(|(name, config)| (*name == network).then_some(config))
        .ok_or_else(|| ScriptError::UnsupportedNetwork(network.to_string()))
}

/// Look up and validate the configuration of the given network
pub fn resolve_network(network: &str) -> Result<ResolvedNetworkConfig, ScriptError> {
    network_config(network)?.resolve(network)
}

impl NetworkConfig {
    /// Validate every address in the configuration, parsing them into
    /// [`Address`]es.
    ///
    /// Fails if any address is empty, still a placeholder, or malformed.
    pub fn resolve(&self, network: &str) -> Result<ResolvedNetworkConfig, ScriptError> {
        let incomplete = || {
            ScriptError::IncompleteConfig(format!(
                "Configuration for network {} is incomplete, please complete the configuration first",
                network
            ))
        };

        let factory_v3 = parse_config_address(self.factory_v3).ok_or_else(incomplete)?;
        let pancake_factory_v3 =
            parse_config_address(self.pancake_factory_v3).ok_or_else(incomplete)?;
        let weth = parse_config_address(self.weth).ok_or_else(incomplete)?;

        Ok(ResolvedNetworkConfig {
            name: network.to_string(),
            chain_id: self.chain_id,
            factory_v3,
            pancake_factory_v3,
            weth,
            fee_rate_bps: self.fee_rate_bps,
            native_symbol: self.native_symbol.to_string(),
        })
    }
}

/// Parse an address from the configuration table, returning `None` for
/// empty, placeholder, or malformed entries
fn parse_config_address(value: &str) -> Option<Address> {
    if value.is_empty() || value.contains(ADDRESS_PLACEHOLDER) {
        return None;
    }

    Address::from_str(value).ok()
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use crate::errors::ScriptError;

    use super::{network_config, resolve_network, NetworkConfig};

    /// A fully populated configuration
    const VALID_CONFIG: NetworkConfig = NetworkConfig {
        chain_id: 56,
        factory_v3: "0x0BFbCF9fa4f9C56B0F40a671Ad40E0805A091865",
        pancake_factory_v3: "0x0BFbCF9fa4f9C56B0F40a671Ad40E0805A091865",
        weth: "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c",
        fee_rate_bps: 100,
        native_symbol: "BNB",
    };

    #[test]
    fn test_resolve_bsc() {
        let config = resolve_network("bsc").unwrap();

        assert_eq!(config.name, "bsc");
        assert_eq!(config.chain_id, 56);
        assert_eq!(
            config.factory_v3,
            address!("0BFbCF9fa4f9C56B0F40a671Ad40E0805A091865")
        );
        assert_eq!(
            config.pancake_factory_v3,
            address!("0BFbCF9fa4f9C56B0F40a671Ad40E0805A091865")
        );
        assert_eq!(config.weth, address!("bb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c"));
        assert_eq!(config.fee_rate_bps, 100);
    }

    #[test]
    fn test_unknown_network() {
        let err = network_config("unknown").unwrap_err();

        assert!(matches!(err, ScriptError::UnsupportedNetwork(ref n) if n == "unknown"));
        assert!(err.is_config_error());
        assert_eq!(
            err.to_string(),
            "Unsupported network: unknown, please add configuration in NETWORK_CONFIG"
        );
    }

    #[test]
    fn test_placeholder_networks_are_incomplete() {
        for network in ["bsctest", "hardhat"] {
            let err = resolve_network(network).unwrap_err();
            assert!(matches!(err, ScriptError::IncompleteConfig(_)));
            assert!(err.to_string().contains(network));
        }
    }

    #[test]
    fn test_each_placeholder_field_is_rejected() {
        let configs = [
            NetworkConfig {
                factory_v3: "0x...",
                ..VALID_CONFIG
            },
            NetworkConfig {
                pancake_factory_v3: "0x....",
                ..VALID_CONFIG
            },
            NetworkConfig {
                weth: "",
                ..VALID_CONFIG
            },
            NetworkConfig {
                weth: "0x1234",
                ..VALID_CONFIG
            },
        ];

        for config in configs {
            let err = config.resolve("test").unwrap_err();
            assert!(matches!(err, ScriptError::IncompleteConfig(_)));
        }

        assert!(VALID_CONFIG.resolve("test").is_ok());
    }
}
