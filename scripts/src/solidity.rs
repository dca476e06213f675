//! Definitions of Solidity functions called during deployment and upgrades

#![allow(missing_docs, clippy::missing_docs_in_private_items)]

use alloy::sol;

sol! {
    /// The SwapX surface touched by the scripts
    #[sol(rpc)]
    interface ISwapX {
        function initialize(address factory_v3, address pancake_factory_v3, address weth, address fee_collector, uint256 fee_rate) external;
        function factory() external view returns (address);
        function paused() external view returns (bool);
        function owner() external view returns (address);
    }

    /// The OpenZeppelin `ProxyAdmin` managing a `TransparentUpgradeableProxy`.
    /// `upgrade` exists only on v4 admins, `UPGRADE_INTERFACE_VERSION` only on v5 ones.
    #[sol(rpc)]
    interface IProxyAdmin {
        function UPGRADE_INTERFACE_VERSION() external view returns (string memory);
        function upgrade(address proxy, address implementation) external;
        function upgradeAndCall(address proxy, address implementation, bytes memory data) external payable;
    }
}
