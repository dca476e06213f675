//! The chain client the scripts drive, and its alloy-backed implementation

use std::str::FromStr;

use alloy::{
    network::{Ethereum, EthereumWallet, TransactionBuilder},
    providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
    rpc::types::{TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use alloy_primitives::{Address, Bytes, TxHash, B256, U256};
use tracing::info;

use crate::{
    errors::ScriptError,
    solidity::{IProxyAdmin, ISwapX},
};

/// The chain operations needed to deploy and upgrade a SwapX proxy.
///
/// Every method maps onto a single RPC request or a single transaction, so
/// the scripts' ordering guarantees can be checked against an in-memory
/// implementation.
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    /// The address of the account signing transactions
    fn sender(&self) -> Address;

    /// The chain ID reported by the RPC endpoint
    async fn chain_id(&self) -> Result<u64, ScriptError>;

    /// The native token balance of the given address, in wei
    async fn balance(&self, address: Address) -> Result<U256, ScriptError>;

    /// Submit a contract creation transaction with the given init code,
    /// returning the address of the created contract once it is mined
    async fn deploy_contract(&self, init_code: Bytes) -> Result<Address, ScriptError>;

    /// Read a raw storage slot of the given contract
    async fn storage_at(&self, address: Address, slot: B256) -> Result<B256, ScriptError>;

    /// Read `UPGRADE_INTERFACE_VERSION()` from the given `ProxyAdmin`.
    /// Fails on admins predating OpenZeppelin v5, which lack the getter.
    async fn upgrade_interface_version(
        &self,
        proxy_admin: Address,
    ) -> Result<String, ScriptError>;

    /// Call `upgrade` on the given v4 `ProxyAdmin` and wait for it to be mined
    async fn upgrade(
        &self,
        proxy_admin: Address,
        proxy: Address,
        implementation: Address,
    ) -> Result<TxHash, ScriptError>;

    /// Call `upgradeAndCall` on the given `ProxyAdmin` and wait for it to be mined
    async fn upgrade_and_call(
        &self,
        proxy_admin: Address,
        proxy: Address,
        implementation: Address,
        data: Bytes,
    ) -> Result<TxHash, ScriptError>;

    /// Read `factory()` from a SwapX contract
    async fn factory(&self, swapx: Address) -> Result<Address, ScriptError>;

    /// Read `paused()` from a SwapX contract
    async fn paused(&self, swapx: Address) -> Result<bool, ScriptError>;

    /// Read `owner()` from a SwapX contract
    async fn owner(&self, swapx: Address) -> Result<Address, ScriptError>;
}

/// A [`ChainClient`] talking JSON-RPC over HTTP, signing with a local key
#[derive(Clone)]
pub struct RpcClient {
    /// The provider, with a wallet filler for the deployer key
    provider: DynProvider,
    /// The address of the deployer
    sender: Address,
}

/// Sets up the client with which to deploy and upgrade contracts from the
/// given private key and RPC url
pub fn setup_client(priv_key: &str, rpc_url: &str) -> Result<RpcClient, ScriptError> {
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let sender = signer.address();
    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .on_http(url);

    Ok(RpcClient {
        provider: DynProvider::new(provider),
        sender,
    })
}

/// Wait for a submitted transaction's receipt, failing if it reverted
async fn confirm(
    pending_tx: PendingTransactionBuilder<Ethereum>,
) -> Result<TransactionReceipt, String> {
    info!("Submitted transaction {:#x}", pending_tx.tx_hash());

    let receipt = pending_tx.get_receipt().await.map_err(|e| e.to_string())?;
    if !receipt.status() {
        return Err(format!(
            "transaction {:#x} reverted",
            receipt.transaction_hash
        ));
    }

    Ok(receipt)
}

impl ChainClient for RpcClient {
    fn sender(&self) -> Address {
        self.sender
    }

    async fn chain_id(&self) -> Result<u64, ScriptError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))
    }

    async fn balance(&self, address: Address) -> Result<U256, ScriptError> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
    }

    async fn deploy_contract(&self, init_code: Bytes) -> Result<Address, ScriptError> {
        let tx = TransactionRequest::default()
            .with_from(self.sender)
            .with_deploy_code(init_code);

        let pending_tx = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
        let receipt = confirm(pending_tx)
            .await
            .map_err(ScriptError::ContractDeployment)?;

        receipt.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment(format!(
                "no contract address in receipt of {:#x}",
                receipt.transaction_hash
            ))
        })
    }

    async fn storage_at(&self, address: Address, slot: B256) -> Result<B256, ScriptError> {
        let value = self
            .provider
            .get_storage_at(address, U256::from_be_bytes(slot.0))
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        Ok(B256::from(value.to_be_bytes::<32>()))
    }

    async fn upgrade_interface_version(
        &self,
        proxy_admin: Address,
    ) -> Result<String, ScriptError> {
        IProxyAdmin::new(proxy_admin, self.provider.clone())
            .UPGRADE_INTERFACE_VERSION()
            .call()
            .await
            .map(|ret| ret._0)
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
    }

    async fn upgrade(
        &self,
        proxy_admin: Address,
        proxy: Address,
        implementation: Address,
    ) -> Result<TxHash, ScriptError> {
        let pending_tx = IProxyAdmin::new(proxy_admin, self.provider.clone())
            .upgrade(proxy, implementation)
            .from(self.sender)
            .send()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
        let receipt = confirm(pending_tx)
            .await
            .map_err(ScriptError::ContractInteraction)?;

        Ok(receipt.transaction_hash)
    }

    async fn upgrade_and_call(
        &self,
        proxy_admin: Address,
        proxy: Address,
        implementation: Address,
        data: Bytes,
    ) -> Result<TxHash, ScriptError> {
        let pending_tx = IProxyAdmin::new(proxy_admin, self.provider.clone())
            .upgradeAndCall(proxy, implementation, data)
            .from(self.sender)
            .send()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
        let receipt = confirm(pending_tx)
            .await
            .map_err(ScriptError::ContractInteraction)?;

        Ok(receipt.transaction_hash)
    }

    async fn factory(&self, swapx: Address) -> Result<Address, ScriptError> {
        ISwapX::new(swapx, self.provider.clone())
            .factory()
            .call()
            .await
            .map(|ret| ret._0)
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
    }

    async fn paused(&self, swapx: Address) -> Result<bool, ScriptError> {
        ISwapX::new(swapx, self.provider.clone())
            .paused()
            .call()
            .await
            .map(|ret| ret._0)
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
    }

    async fn owner(&self, swapx: Address) -> Result<Address, ScriptError> {
        ISwapX::new(swapx, self.provider.clone())
            .owner()
            .call()
            .await
            .map(|ret| ret._0)
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
    }
}
