//! Scripts for deploying and exercising the Prism smart contracts.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod cli;
mod commands;
pub mod constants;
pub mod errors;
pub mod gateway;
pub mod orchestrator;
pub mod plan;
pub mod sequencer;
pub mod store;
pub mod utils;
