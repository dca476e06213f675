//! Implementations of the deploy & upgrade scripts

use std::{fmt::Display, path::Path};

use alloy_primitives::{utils::format_ether, Address, Bytes};
use alloy_sol_types::{SolCall, SolValue};
use tracing::{info, warn};

use crate::{
    cli::{DeployArgs, UpgradeArgs},
    client::ChainClient,
    constants::{
        DEFAULT_SWAPX_PROXY_ADDRESS, PROXY_ADMIN_STORAGE_SLOT, PROXY_IMPLEMENTATION_STORAGE_SLOT,
        SWAPX_IMPLEMENTATION_CONTRACT_KEY, SWAPX_PROXY_CONTRACT_KEY,
    },
    errors::ScriptError,
    networks::{network_config, resolve_network},
    solidity::ISwapX,
    types::{
        ContractArtifact, DeploymentResult, ResolvedNetworkConfig, UpgradeResult,
        VerificationReport,
    },
    utils::{
        address_from_slot, contract_artifact_path, format_fee_rate, load_artifact,
        parse_addr_from_deployments_file, parse_address, parse_calldata, proxy_artifact_path,
        record_deployment, write_deployed_address,
    },
};

// ----------
// | Deploy |
// ----------

/// Deploy a new SwapX proxy to the given network.
///
/// The network configuration and the RPC endpoint's chain ID are validated
/// before any transaction is submitted.
pub async fn deploy_proxy(
    args: DeployArgs,
    client: &impl ChainClient,
    network: &str,
    artifacts_dir: &Path,
    deployments_path: Option<&Path>,
) -> Result<DeploymentResult, ScriptError> {
    info!("Deploying to network: {}", network);

    let config = resolve_network(network)?;
    check_chain_id(client, &config.name, config.chain_id).await?;

    let implementation_artifact =
        load_artifact(&contract_artifact_path(artifacts_dir, &args.contract))?;
    let proxy_artifact = load_artifact(&proxy_artifact_path(artifacts_dir))?;

    let deployment =
        deploy_swapx(client, &config, &implementation_artifact, &proxy_artifact).await?;

    if let Some(deployments_path) = deployments_path {
        record_deployment(deployments_path, &config.name, &deployment)?;
        info!("Recorded deployment in {}", deployments_path.display());
    }

    info!("Deployment completed");
    Ok(deployment)
}

/// Ensure the RPC endpoint serves the chain the network configuration targets
async fn check_chain_id(
    client: &impl ChainClient,
    network: &str,
    expected: u64,
) -> Result<(), ScriptError> {
    let chain_id = client.chain_id().await?;
    if chain_id != expected {
        return Err(ScriptError::ChainMismatch {
            network: network.to_string(),
            expected,
            actual: chain_id,
        });
    }

    Ok(())
}

/// Prepare calldata for the SwapX contract's `initialize` method
pub fn swapx_initialize_calldata(config: &ResolvedNetworkConfig, fee_collector: Address) -> Bytes {
    ISwapX::initializeCall {
        factory_v3: config.factory_v3,
        pancake_factory_v3: config.pancake_factory_v3,
        weth: config.weth,
        fee_collector,
        fee_rate: config.fee_rate(),
    }
    .abi_encode()
    .into()
}

/// Deploy the SwapX implementation and a proxy initialized with the
/// network's parameters, with the deployer as fee collector and proxy owner
pub async fn deploy_swapx(
    client: &impl ChainClient,
    config: &ResolvedNetworkConfig,
    implementation_artifact: &ContractArtifact,
    proxy_artifact: &ContractArtifact,
) -> Result<DeploymentResult, ScriptError> {
    let deployer = client.sender();
    let balance = client.balance(deployer).await?;
    info!("Deploying contract account: {}", deployer);
    info!(
        "Account balance: {} {}",
        format_ether(balance),
        config.native_symbol
    );

    let fee_collector = deployer;
    info!("Using parameters:");
    info!("- FactoryV3: {}", config.factory_v3);
    info!("- PancakeFactoryV3: {}", config.pancake_factory_v3);
    info!("- WETH: {}", config.weth);
    info!("- Fee Collector: {}", fee_collector);
    info!("- Fee Rate: {}", format_fee_rate(config.fee_rate_bps));

    let initialize_calldata = swapx_initialize_calldata(config, fee_collector);

    info!(
        "Deploying {} implementation contract...",
        implementation_artifact.contract_name
    );
    let implementation = client
        .deploy_contract(implementation_artifact.bytecode.clone())
        .await?;

    info!(
        "Deploying {} upgradeable proxy contract...",
        implementation_artifact.contract_name
    );
    let constructor_args = (implementation, deployer, initialize_calldata).abi_encode_params();
    let proxy = client
        .deploy_contract(proxy_artifact.init_code(&constructor_args))
        .await?;

    let deployment = DeploymentResult {
        proxy,
        implementation: read_implementation_address(client, proxy).await?,
        admin: read_admin_address(client, proxy).await?,
    };

    info!(
        "{} proxy contract deployed to: {}",
        implementation_artifact.contract_name, deployment.proxy
    );
    info!(
        "{} implementation contract address: {}",
        implementation_artifact.contract_name, deployment.implementation
    );
    info!(
        "{} admin address: {}",
        implementation_artifact.contract_name, deployment.admin
    );

    Ok(deployment)
}

// -----------
// | Upgrade |
// -----------

/// Upgrade the SwapX proxy to a freshly deployed implementation, then run
/// the post-upgrade verification reads
pub async fn upgrade(
    args: UpgradeArgs,
    client: &impl ChainClient,
    network: &str,
    artifacts_dir: &Path,
    deployments_path: Option<&Path>,
) -> Result<(UpgradeResult, VerificationReport), ScriptError> {
    // The network keys the deployments file, so it must match the endpoint
    if deployments_path.is_some() {
        let config = network_config(network)?;
        check_chain_id(client, network, config.chain_id).await?;
    }

    let proxy = resolve_proxy_address(args.proxy.as_deref(), network, deployments_path)?;
    let calldata = parse_calldata(args.calldata.as_deref())?;
    let artifact = load_artifact(&contract_artifact_path(artifacts_dir, &args.contract))?;

    let (result, report) = upgrade_swapx(client, proxy, &artifact, calldata).await?;

    if let Some(deployments_path) = deployments_path {
        write_deployed_address(
            deployments_path,
            network,
            SWAPX_IMPLEMENTATION_CONTRACT_KEY,
            result.new_implementation,
        )?;
        info!("Recorded upgrade in {}", deployments_path.display());
    }

    Ok((result, report))
}

/// Pick the proxy to upgrade: the explicit address if given, else the one
/// recorded for the network in the deployments file, else the live SwapX proxy
fn resolve_proxy_address(
    proxy: Option<&str>,
    network: &str,
    deployments_path: Option<&Path>,
) -> Result<Address, ScriptError> {
    if let Some(proxy) = proxy {
        return parse_address(proxy);
    }

    if let Some(deployments_path) = deployments_path.filter(|path| path.exists()) {
        match parse_addr_from_deployments_file(deployments_path, network, SWAPX_PROXY_CONTRACT_KEY)
        {
            Ok(proxy) => return Ok(proxy),
            Err(e) => warn!("Falling back to the default proxy address: {}", e),
        }
    }

    parse_address(DEFAULT_SWAPX_PROXY_ADDRESS)
}

/// Repoint the given proxy at a new deployment of the given implementation.
///
/// The current implementation and admin are read before anything is
/// submitted. Verification failures after the upgrade are reported, never
/// propagated: the upgrade is already final by then.
pub async fn upgrade_swapx(
    client: &impl ChainClient,
    proxy: Address,
    artifact: &ContractArtifact,
    calldata: Bytes,
) -> Result<(UpgradeResult, VerificationReport), ScriptError> {
    info!("Current proxy contract address: {}", proxy);

    let previous_implementation = read_implementation_address(client, proxy).await?;
    if previous_implementation == Address::ZERO {
        return Err(ScriptError::NotAProxy(format!(
            "{} has no implementation set",
            proxy
        )));
    }
    info!(
        "Current implementation contract address: {}",
        previous_implementation
    );

    let admin = read_admin_address(client, proxy).await?;
    if admin == Address::ZERO {
        return Err(ScriptError::NotAProxy(format!("{} has no admin set", proxy)));
    }
    info!("Current admin address: {}", admin);

    info!("Upgrading to {}...", artifact.contract_name);
    let deployed_implementation = client.deploy_contract(artifact.bytecode.clone()).await?;
    submit_upgrade(client, admin, proxy, deployed_implementation, calldata).await?;

    let new_implementation = read_implementation_address(client, proxy).await?;
    if new_implementation != deployed_implementation {
        warn!(
            "Proxy points at {}, expected the deployed implementation {}",
            new_implementation, deployed_implementation
        );
    }

    info!("Upgrade completed!");
    info!("Proxy contract address: {}", proxy);
    info!("New implementation contract address: {}", new_implementation);

    let result = UpgradeResult {
        proxy,
        previous_implementation,
        admin,
        new_implementation,
    };
    let report = verify_upgrade(client, proxy).await;

    Ok((result, report))
}

/// Repoint the proxy through its admin.
///
/// A v4 `ProxyAdmin.upgradeAndCall` always delegatecalls the new
/// implementation, so an upgrade without calldata goes through `upgrade`
/// unless the admin reports a v5 `UPGRADE_INTERFACE_VERSION`.
async fn submit_upgrade(
    client: &impl ChainClient,
    admin: Address,
    proxy: Address,
    implementation: Address,
    calldata: Bytes,
) -> Result<(), ScriptError> {
    if calldata.is_empty() {
        match client.upgrade_interface_version(admin).await {
            Ok(version) => info!("Proxy admin upgrade interface version: {}", version),
            Err(_) => {
                info!("Proxy admin has no upgrade interface version, using `upgrade`");
                client.upgrade(admin, proxy, implementation).await?;
                return Ok(());
            }
        }
    }

    client
        .upgrade_and_call(admin, proxy, implementation, calldata)
        .await?;
    Ok(())
}

/// Run the read-only checks against an upgraded proxy, each independently
pub async fn verify_upgrade(client: &impl ChainClient, proxy: Address) -> VerificationReport {
    let factory = client.factory(proxy).await;
    log_verification("Factory address", "factory()", &factory);

    let paused = client.paused(proxy).await;
    log_verification("Is contract paused", "paused()", &paused);

    let owner = client.owner(proxy).await;
    log_verification("Contract owner", "owner()", &owner);

    VerificationReport {
        factory,
        paused,
        owner,
    }
}

/// Log the outcome of a single verification read
fn log_verification<T: Display>(label: &str, method: &str, result: &Result<T, ScriptError>) {
    match result {
        Ok(value) => info!("{}: {}", label, value),
        Err(e) => warn!("Error verifying new contract functionality ({}): {}", method, e),
    }
}

// -----------
// | Helpers |
// -----------

/// Read the implementation address from the proxy's EIP-1967 slot
async fn read_implementation_address(
    client: &impl ChainClient,
    proxy: Address,
) -> Result<Address, ScriptError> {
    client
        .storage_at(proxy, PROXY_IMPLEMENTATION_STORAGE_SLOT)
        .await
        .map(address_from_slot)
}

/// Read the proxy admin address from the proxy's EIP-1967 slot.
///
/// This is the recommended way to get the proxy admin address:
/// https://github.com/OpenZeppelin/openzeppelin-contracts/blob/v5.0.0/contracts/proxy/ERC1967/ERC1967Utils.sol#L104-L106
async fn read_admin_address(
    client: &impl ChainClient,
    proxy: Address,
) -> Result<Address, ScriptError> {
    client
        .storage_at(proxy, PROXY_ADMIN_STORAGE_SLOT)
        .await
        .map(address_from_slot)
}
