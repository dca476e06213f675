//! Definitions of CLI arguments and commands for the deploy & upgrade scripts

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand};

use crate::{
    client::ChainClient,
    commands::{deploy_proxy, upgrade},
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_NETWORK, SWAPX_CONTRACT_NAME, SWAPX_V2_CONTRACT_NAME,
    },
    errors::ScriptError,
};

/// Deploy and upgrade the SwapX upgradeable proxy
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Private key of the deployer
    #[arg(short, long, env = "PRIV_KEY")]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: String,

    /// Name of the target network, selecting its entry in the network configuration table
    #[arg(short, long, env = "NETWORK", default_value = DEFAULT_NETWORK)]
    pub network: String,

    /// Directory containing the Hardhat compilation artifacts
    #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// Path to a JSON file in which to record deployed addresses.
    /// Nothing is recorded if omitted.
    #[arg(long)]
    pub deployments_path: Option<PathBuf>,

    #[allow(missing_docs)]
    #[command(subcommand)]
    pub command: Command,
}

/// The scripts' subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy a new SwapX upgradeable proxy
    Deploy(DeployArgs),
    /// Upgrade an existing SwapX proxy to a new implementation
    Upgrade(UpgradeArgs),
}

impl Command {
    /// Run the subcommand against the given client
    pub async fn run(
        self,
        client: &impl ChainClient,
        network: &str,
        artifacts_dir: &Path,
        deployments_path: Option<&Path>,
    ) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => {
                deploy_proxy(args, client, network, artifacts_dir, deployments_path)
                    .await
                    .map(|_| ())
            }
            Command::Upgrade(args) => {
                upgrade(args, client, network, artifacts_dir, deployments_path)
                    .await
                    .map(|_| ())
            }
        }
    }
}

/// Deploy the SwapX upgradeable proxy.
///
/// Concretely, this deploys the SwapX implementation followed by a
/// [`TransparentUpgradeableProxy`](https://docs.openzeppelin.com/contracts/5.x/api/proxy#transparent_proxy)
/// initialized through `initialize`, which itself deploys a `ProxyAdmin` contract owned by the deployer.
#[derive(Args)]
pub struct DeployArgs {
    /// Name of the implementation contract in the artifacts directory
    #[arg(short, long, default_value = SWAPX_CONTRACT_NAME)]
    pub contract: String,
}

/// Upgrade the SwapX implementation behind an existing proxy
#[derive(Args)]
pub struct UpgradeArgs {
    /// Address of the proxy contract. Defaults to the proxy recorded for the
    /// network in the deployments file, then to the live SwapX proxy.
    #[arg(long)]
    pub proxy: Option<String>,

    /// Name of the new implementation contract in the artifacts directory
    #[arg(short, long, default_value = SWAPX_V2_CONTRACT_NAME)]
    pub contract: String,

    /// Optional calldata, in hex form, with which to
    /// call the implementation contract when upgrading
    #[arg(long)]
    pub calldata: Option<String>,
}

/// Report the outcome of a run, printing a fatal error in readable form to
/// `stderr`, and return the process exit code
pub fn exit_code(res: Result<(), ScriptError>, stderr: &mut impl Write) -> i32 {
    match res {
        Ok(()) => 0,
        Err(e) => {
            let _ = writeln!(stderr, "{}", e);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::ScriptError;

    use super::exit_code;

    #[test]
    fn test_exit_code() {
        let mut stderr = Vec::new();
        assert_eq!(exit_code(Ok(()), &mut stderr), 0);
        assert!(stderr.is_empty());

        let err = ScriptError::UnsupportedNetwork("unknown".to_string());
        assert_eq!(exit_code(Err(err), &mut stderr), 1);
        assert_eq!(
            String::from_utf8(stderr).unwrap(),
            "Unsupported network: unknown, please add configuration in NETWORK_CONFIG\n"
        );
    }
}
