//! Scripts for deploying and upgrading the SwapX upgradeable proxy.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod cli;
pub mod client;
mod commands;
pub mod constants;
pub mod errors;
pub mod networks;
mod solidity;
pub mod types;
pub mod utils;
