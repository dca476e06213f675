//! Utilities for the deploy & upgrade scripts.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy_primitives::{Address, Bytes, B256};
use serde_json::{Map, Value};

use crate::{
    constants::{
        ARTIFACT_EXTENSION, BPS_PER_PERCENT, CONTRACTS_ARTIFACTS_SUBDIR, DEPLOYMENTS_KEY,
        NUM_BYTES_ADDRESS, NUM_BYTES_STORAGE_SLOT, PROXY_ARTIFACT_PATH, SOLIDITY_EXTENSION,
        SWAPX_IMPLEMENTATION_CONTRACT_KEY, SWAPX_PROXY_ADMIN_CONTRACT_KEY,
        SWAPX_PROXY_CONTRACT_KEY,
    },
    errors::ScriptError,
    types::{ContractArtifact, DeploymentResult},
};

// -------------
// | Artifacts |
// -------------

/// The path of a project contract's Hardhat artifact, assuming the contract
/// lives in a source file of the same name
pub fn contract_artifact_path(artifacts_dir: &Path, contract_name: &str) -> PathBuf {
    artifacts_dir
        .join(CONTRACTS_ARTIFACTS_SUBDIR)
        .join(format!("{}.{}", contract_name, SOLIDITY_EXTENSION))
        .join(format!("{}.{}", contract_name, ARTIFACT_EXTENSION))
}

/// The path of the `TransparentUpgradeableProxy` artifact
pub fn proxy_artifact_path(artifacts_dir: &Path) -> PathBuf {
    artifacts_dir.join(PROXY_ARTIFACT_PATH)
}

/// Read and parse the Hardhat artifact at the given path
pub fn load_artifact(file_path: &Path) -> Result<ContractArtifact, ScriptError> {
    let contents = fs::read_to_string(file_path).map_err(|e| {
        ScriptError::ArtifactParsing(format!("{}: {}", file_path.display(), e))
    })?;

    parse_artifact(&contents)
}

/// Parse a Hardhat artifact, rejecting contracts without creation code
pub fn parse_artifact(contents: &str) -> Result<ContractArtifact, ScriptError> {
    let artifact: ContractArtifact =
        serde_json::from_str(contents).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    // Interfaces and abstract contracts compile to empty bytecode
    if artifact.bytecode.is_empty() {
        return Err(ScriptError::ArtifactParsing(format!(
            "{} has no deployable bytecode",
            artifact.contract_name
        )));
    }

    Ok(artifact)
}

// ----------------
// | Chain values |
// ----------------

/// Extract the address stored right-aligned in a storage slot
pub fn address_from_slot(slot_value: B256) -> Address {
    Address::from_slice(&slot_value[NUM_BYTES_STORAGE_SLOT - NUM_BYTES_ADDRESS..NUM_BYTES_STORAGE_SLOT])
}

/// Parse a hex-encoded address given on the command line
pub fn parse_address(address: &str) -> Result<Address, ScriptError> {
    Address::from_str(address).map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
}

/// Parse optional hex-encoded calldata given on the command line, defaulting
/// to empty calldata
pub fn parse_calldata(calldata: Option<&str>) -> Result<Bytes, ScriptError> {
    match calldata {
        Some(calldata) => hex::decode(calldata.trim_start_matches("0x"))
            .map(Bytes::from)
            .map_err(|e| ScriptError::CalldataConstruction(e.to_string())),
        None => Ok(Bytes::new()),
    }
}

/// Render a fee rate given in basis points as a percentage, e.g. `30` as `0.3%`
pub fn format_fee_rate(fee_rate_bps: u16) -> String {
    let whole = fee_rate_bps / BPS_PER_PERCENT;
    let frac = fee_rate_bps % BPS_PER_PERCENT;
    if frac == 0 {
        return format!("{}%", whole);
    }

    let frac_digits = format!("{:02}", frac);
    format!("{}.{}%", whole, frac_digits.trim_end_matches('0'))
}

// ---------------
// | Deployments |
// ---------------

/// Read the deployments file, treating a missing file as empty
fn read_deployments(file_path: &Path) -> Result<Value, ScriptError> {
    if !file_path.exists() {
        return Ok(Value::Object(Map::new()));
    }

    let contents =
        fs::read_to_string(file_path).map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;
    let parsed: Value =
        serde_json::from_str(&contents).map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;

    if !parsed.is_object() {
        return Err(ScriptError::ReadDeployments(
            "deployments file must hold a JSON object".to_string(),
        ));
    }

    Ok(parsed)
}

/// Get a mutable handle on the object under `key`, creating it if absent
fn object_entry<'a>(
    map: &'a mut Map<String, Value>,
    key: &str,
) -> Result<&'a mut Map<String, Value>, ScriptError> {
    map.entry(key)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| ScriptError::WriteDeployments(format!("`{}` is not a JSON object", key)))
}

/// Record the address of a deployed contract under the given network
pub fn write_deployed_address(
    file_path: &Path,
    network: &str,
    contract_key: &str,
    address: Address,
) -> Result<(), ScriptError> {
    let mut parsed = read_deployments(file_path)?;

    let root = parsed
        .as_object_mut()
        .ok_or_else(|| ScriptError::WriteDeployments("malformed deployments file".to_string()))?;
    let deployments = object_entry(root, DEPLOYMENTS_KEY)?;
    let network_deployments = object_entry(deployments, network)?;
    network_deployments.insert(
        contract_key.to_string(),
        Value::String(format!("{:#x}", address)),
    );

    let contents = serde_json::to_string_pretty(&parsed)
        .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    fs::write(file_path, contents).map_err(|e| ScriptError::WriteDeployments(e.to_string()))
}

/// Read the address of a deployed contract under the given network
pub fn parse_addr_from_deployments_file(
    file_path: &Path,
    network: &str,
    contract_key: &str,
) -> Result<Address, ScriptError> {
    let parsed = read_deployments(file_path)?;

    let address = parsed[DEPLOYMENTS_KEY][network][contract_key]
        .as_str()
        .ok_or_else(|| {
            ScriptError::ReadDeployments(format!(
                "no `{}` address for network {}",
                contract_key, network
            ))
        })?;

    Address::from_str(address).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Record all the addresses of a fresh SwapX deployment
pub fn record_deployment(
    file_path: &Path,
    network: &str,
    deployment: &DeploymentResult,
) -> Result<(), ScriptError> {
    write_deployed_address(file_path, network, SWAPX_PROXY_CONTRACT_KEY, deployment.proxy)?;
    write_deployed_address(
        file_path,
        network,
        SWAPX_IMPLEMENTATION_CONTRACT_KEY,
        deployment.implementation,
    )?;
    write_deployed_address(
        file_path,
        network,
        SWAPX_PROXY_ADMIN_CONTRACT_KEY,
        deployment.admin,
    )
}

#[cfg(test)]
mod tests {
    use std::{env, fs, path::PathBuf};

    use alloy_primitives::{address, b256, Address};

    use crate::{
        constants::{
            SWAPX_IMPLEMENTATION_CONTRACT_KEY, SWAPX_PROXY_ADMIN_CONTRACT_KEY,
            SWAPX_PROXY_CONTRACT_KEY,
        },
        errors::ScriptError,
        types::DeploymentResult,
    };

    use super::{
        address_from_slot, contract_artifact_path, format_fee_rate, parse_addr_from_deployments_file,
        parse_artifact, parse_calldata, record_deployment, write_deployed_address,
    };

    /// A deployments file path unique to the calling test
    fn temp_deployments_path(test_name: &str) -> PathBuf {
        let path = env::temp_dir().join(format!(
            "swapx-deployments-{}-{}.json",
            test_name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_format_fee_rate() {
        assert_eq!(format_fee_rate(100), "1%");
        assert_eq!(format_fee_rate(30), "0.3%");
        assert_eq!(format_fee_rate(5), "0.05%");
        assert_eq!(format_fee_rate(150), "1.5%");
        assert_eq!(format_fee_rate(0), "0%");
    }

    #[test]
    fn test_address_from_slot() {
        let slot = b256!("000000000000000000000000b804ebb99cde3ca1b13e9173163d9ac409d13945");
        assert_eq!(
            address_from_slot(slot),
            address!("b804EbB99cDE3CA1B13e9173163D9ac409d13945")
        );
    }

    #[test]
    fn test_parse_calldata() {
        assert!(parse_calldata(None).unwrap().is_empty());
        assert_eq!(parse_calldata(Some("0x8129fc1c")).unwrap().len(), 4);
        assert!(matches!(
            parse_calldata(Some("0xzz")),
            Err(ScriptError::CalldataConstruction(_))
        ));
    }

    #[test]
    fn test_artifact_path() {
        let path = contract_artifact_path(&PathBuf::from("artifacts"), "SwapXV2");
        assert_eq!(
            path,
            PathBuf::from("artifacts/contracts/SwapXV2.sol/SwapXV2.json")
        );
    }

    #[test]
    fn test_parse_artifact() {
        let artifact = parse_artifact(
            r#"{"_format": "hh-sol-artifact-1", "contractName": "SwapX", "abi": [], "bytecode": "0x6080604052"}"#,
        )
        .unwrap();
        assert_eq!(artifact.contract_name, "SwapX");
        assert_eq!(artifact.bytecode.len(), 5);

        let init_code = artifact.init_code(&[0xaa, 0xbb]);
        assert_eq!(
            init_code.to_vec(),
            vec![0x60, 0x80, 0x60, 0x40, 0x52, 0xaa, 0xbb]
        );
    }

    #[test]
    fn test_parse_interface_artifact() {
        let err = parse_artifact(r#"{"contractName": "ISwapX", "abi": [], "bytecode": "0x"}"#)
            .unwrap_err();
        assert!(matches!(err, ScriptError::ArtifactParsing(_)));
    }

    #[test]
    fn test_deployments_file() {
        let path = temp_deployments_path("record");
        let deployment = DeploymentResult {
            proxy: Address::repeat_byte(1),
            implementation: Address::repeat_byte(2),
            admin: Address::repeat_byte(3),
        };

        record_deployment(&path, "bsc", &deployment).unwrap();
        write_deployed_address(
            &path,
            "bsctest",
            SWAPX_PROXY_CONTRACT_KEY,
            Address::repeat_byte(4),
        )
        .unwrap();

        let read = |network, key| parse_addr_from_deployments_file(&path, network, key).unwrap();
        assert_eq!(read("bsc", SWAPX_PROXY_CONTRACT_KEY), deployment.proxy);
        assert_eq!(
            read("bsc", SWAPX_IMPLEMENTATION_CONTRACT_KEY),
            deployment.implementation
        );
        assert_eq!(read("bsc", SWAPX_PROXY_ADMIN_CONTRACT_KEY), deployment.admin);
        assert_eq!(
            read("bsctest", SWAPX_PROXY_CONTRACT_KEY),
            Address::repeat_byte(4)
        );

        assert!(matches!(
            parse_addr_from_deployments_file(&path, "hardhat", SWAPX_PROXY_CONTRACT_KEY),
            Err(ScriptError::ReadDeployments(_))
        ));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_malformed_deployments_file() {
        let path = temp_deployments_path("malformed");
        fs::write(&path, "[]").unwrap();

        let err = write_deployed_address(
            &path,
            "bsc",
            SWAPX_PROXY_CONTRACT_KEY,
            Address::repeat_byte(1),
        )
        .unwrap_err();
        assert!(matches!(err, ScriptError::ReadDeployments(_)));

        fs::remove_file(&path).unwrap();
    }
}
