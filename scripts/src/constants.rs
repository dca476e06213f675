//! Constants used in the deploy & upgrade scripts

use alloy_primitives::{b256, B256};

/// The storage slot containing the implementation contract address in the upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#logic-contract-address
pub const PROXY_IMPLEMENTATION_STORAGE_SLOT: B256 =
    b256!("360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc");

/// The storage slot containing the proxy admin contract address in the upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#admin-address
pub const PROXY_ADMIN_STORAGE_SLOT: B256 =
    b256!("b53127684a568b3173ae13b9f8a6016e243e63b6e8ee1178d6a717850b5d6103");

/// The number of bytes stored in a single storage slot
pub const NUM_BYTES_STORAGE_SLOT: usize = 32;

/// The number of bytes in an Ethereum address
pub const NUM_BYTES_ADDRESS: usize = 20;

/// The marker identifying an unfilled address in the network configuration table
pub const ADDRESS_PLACEHOLDER: &str = "...";

/// The number of basis points in one percent
pub const BPS_PER_PERCENT: u16 = 100;

/// The address of the live SwapX proxy targeted by the upgrade script
pub const DEFAULT_SWAPX_PROXY_ADDRESS: &str = "0xb804EbB99cDE3CA1B13e9173163D9ac409d13945";

/// The name of the SwapX implementation contract deployed behind a fresh proxy
pub const SWAPX_CONTRACT_NAME: &str = "SwapX";

/// The name of the SwapX implementation contract the upgrade script moves to
pub const SWAPX_V2_CONTRACT_NAME: &str = "SwapXV2";

/// The default directory holding the Hardhat compilation artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The artifacts subdirectory holding the project's own contracts
pub const CONTRACTS_ARTIFACTS_SUBDIR: &str = "contracts";

/// The path, relative to the artifacts directory, of the
/// [`TransparentUpgradeableProxy`](https://docs.openzeppelin.com/contracts/5.x/api/proxy#transparent_proxy)
/// artifact compiled from the OpenZeppelin v5 contracts package
pub const PROXY_ARTIFACT_PATH: &str = "@openzeppelin/contracts/proxy/transparent/TransparentUpgradeableProxy.sol/TransparentUpgradeableProxy.json";

/// The extension of a Solidity source file, used as an artifact path segment
pub const SOLIDITY_EXTENSION: &str = "sol";

/// The extension of an artifact file
pub const ARTIFACT_EXTENSION: &str = "json";

/// The default network name, matching Hardhat's in-process network
pub const DEFAULT_NETWORK: &str = "hardhat";

/// The deployments key in the deployments file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The SwapX proxy contract key in the deployments file
pub const SWAPX_PROXY_CONTRACT_KEY: &str = "swapx_proxy_contract";

/// The SwapX implementation contract key in the deployments file
pub const SWAPX_IMPLEMENTATION_CONTRACT_KEY: &str = "swapx_implementation_contract";

/// The SwapX proxy admin contract key in the deployments file
pub const SWAPX_PROXY_ADMIN_CONTRACT_KEY: &str = "swapx_proxy_admin_contract";
