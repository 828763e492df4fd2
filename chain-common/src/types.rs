//! Definitions of chain-side types: transaction results, emitted events,
//! funds, and signing credentials

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The event attribute key under which the chain reports a newly
/// instantiated contract's address
pub const CONTRACT_ADDRESS_ATTRIBUTE: &str = "contract_address";

/// Funds attached to an execute call, keyed by denomination.
///
/// An empty map means no funds are attached.
pub type Funds = BTreeMap<String, u128>;

/// A signing credential handed explicitly to every state-changing
/// gateway call
#[derive(Debug, Clone)]
pub struct Signer {
    /// The signer's account address, used as the sender of transactions
    /// and as the owner/operator in init messages
    pub address: String,
    /// The signer's private key material, forwarded opaquely to the
    /// signing endpoint
    pub key: String,
}

/// A single key/value attribute emitted within an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// The attribute key
    pub key: String,
    /// The attribute value
    pub value: String,
}

/// A single event emitted by a transaction, in emission order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The event type, e.g. `instantiate_contract` or `wasm`
    #[serde(rename = "type")]
    pub ty: String,
    /// The event's attributes, in emission order
    pub attributes: Vec<Attribute>,
}

/// The result of a broadcast transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResult {
    /// The transaction hash
    pub tx_hash: String,
    /// The raw log emitted by the node, preserved verbatim for diagnostics
    pub raw_log: String,
    /// The events emitted by the transaction, in emission order
    pub events: Vec<Event>,
}

impl TxResult {
    /// Extracts the address of a newly instantiated contract from the
    /// transaction's events.
    ///
    /// Scans events in emission order and returns the value of the first
    /// `contract_address` attribute found. The chain may emit more than one
    /// qualifying event (e.g. when an init message itself instantiates a
    /// contract); the first match wins, and callers must not assume
    /// uniqueness. Returns `None` if no event carries the attribute.
    pub fn contract_address(&self) -> Option<&str> {
        self.events
            .iter()
            .flat_map(|event| event.attributes.iter())
            .find(|attr| attr.key == CONTRACT_ADDRESS_ATTRIBUTE)
            .map(|attr| attr.value.as_str())
    }
}
