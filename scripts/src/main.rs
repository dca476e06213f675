use std::{io, process};

use clap::Parser;
use swapx_scripts::{
    cli::{exit_code, Cli},
    client::setup_client,
};

#[tokio::main]
async fn main() {
    let Cli {
        priv_key,
        rpc_url,
        network,
        artifacts_dir,
        deployments_path,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    let res = match setup_client(&priv_key, &rpc_url) {
        Ok(client) => {
            command
                .run(
                    &client,
                    &network,
                    &artifacts_dir,
                    deployments_path.as_deref(),
                )
                .await
        }
        Err(e) => Err(e),
    };

    process::exit(exit_code(res, &mut io::stderr()));
}
