//! Types shared between the deploy scripts and the chain gateway boundary.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod types;
