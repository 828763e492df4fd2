//! The gateway boundary between the scripts and the chain.
//!
//! The scripts never construct transactions themselves; every network
//! round trip goes through [`ChainGateway`]. The provided [`HttpGateway`]
//! is a thin JSON adapter over a node-side signing daemon.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chain_common::types::{Funds, Signer, TxResult};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::ScriptError;

/// The four chain operations the scripts are written against.
///
/// Each call is a single network round trip, awaited to completion:
/// a result or an error, never a partial outcome.
#[async_trait]
pub trait ChainGateway {
    /// Uploads a wasm blob to the chain, returning the assigned code id
    async fn upload_code(&self, signer: &Signer, wasm: &[u8]) -> Result<u64, ScriptError>;

    /// Instantiates an uploaded code id with the given init message.
    ///
    /// The new contract's address is not returned directly; callers extract
    /// it from the result's events via [`TxResult::contract_address`].
    async fn instantiate(
        &self,
        signer: &Signer,
        code_id: u64,
        init_msg: &Value,
    ) -> Result<TxResult, ScriptError>;

    /// Executes a message against a deployed contract, attaching the given
    /// funds (an empty map attaches none)
    async fn execute(
        &self,
        signer: &Signer,
        contract: &str,
        msg: &Value,
        funds: &Funds,
    ) -> Result<TxResult, ScriptError>;

    /// Runs a read-only smart query against a deployed contract
    async fn query(&self, contract: &str, msg: &Value) -> Result<Value, ScriptError>;
}

/// The response body of a code upload
#[derive(Deserialize)]
struct UploadResponse {
    /// The code id assigned to the uploaded blob
    code_id: u64,
}

/// A [`ChainGateway`] over the signing daemon's REST API
pub struct HttpGateway {
    /// The daemon's base URL, without a trailing slash
    base_url: String,
    /// The underlying HTTP client
    client: reqwest::Client,
}

impl HttpGateway {
    /// Creates a gateway against the given endpoint, validating the URL
    /// up front
    pub fn new(rpc_url: &str) -> Result<Self, ScriptError> {
        reqwest::Url::parse(rpc_url)
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

        Ok(Self {
            base_url: rpc_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        })
    }

    /// Posts a JSON body to the given path, collapsing transport errors and
    /// non-success statuses into the caller's error constructor
    async fn post(
        &self,
        path: &str,
        body: &Value,
        wrap: fn(String) -> ScriptError,
    ) -> Result<reqwest::Response, ScriptError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| wrap(e.to_string()))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            // Preserve the upstream body verbatim; for execute failures it
            // carries the contract's raw log
            let status = response.status();
            let log = response.text().await.unwrap_or_default();
            Err(wrap(format!("{}: {}", status, log)))
        }
    }
}

#[async_trait]
impl ChainGateway for HttpGateway {
    async fn upload_code(&self, signer: &Signer, wasm: &[u8]) -> Result<u64, ScriptError> {
        let body = json!({
            "sender": signer.address,
            "key": signer.key,
            "wasm_base64": BASE64.encode(wasm),
        });

        let response = self.post("/wasm/code", &body, ScriptError::UploadFailed).await?;
        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| ScriptError::UploadFailed(e.to_string()))?;

        Ok(parsed.code_id)
    }

    async fn instantiate(
        &self,
        signer: &Signer,
        code_id: u64,
        init_msg: &Value,
    ) -> Result<TxResult, ScriptError> {
        let body = json!({
            "sender": signer.address,
            "key": signer.key,
            "msg": init_msg,
        });

        let response = self
            .post(
                &format!("/wasm/code/{code_id}/instantiate"),
                &body,
                ScriptError::ExecuteFailed,
            )
            .await?;

        response
            .json()
            .await
            .map_err(|e| ScriptError::ExecuteFailed(e.to_string()))
    }

    async fn execute(
        &self,
        signer: &Signer,
        contract: &str,
        msg: &Value,
        funds: &Funds,
    ) -> Result<TxResult, ScriptError> {
        let body = json!({
            "sender": signer.address,
            "key": signer.key,
            "msg": msg,
            "funds": funds,
        });

        let response = self
            .post(
                &format!("/wasm/contract/{contract}/execute"),
                &body,
                ScriptError::ExecuteFailed,
            )
            .await?;

        response
            .json()
            .await
            .map_err(|e| ScriptError::ExecuteFailed(e.to_string()))
    }

    async fn query(&self, contract: &str, msg: &Value) -> Result<Value, ScriptError> {
        let body = json!({ "msg": msg });

        let response = self
            .post(
                &format!("/wasm/contract/{contract}/smart"),
                &body,
                ScriptError::QueryFailed,
            )
            .await?;

        response
            .json()
            .await
            .map_err(|e| ScriptError::QueryFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_endpoint() {
        let result = HttpGateway::new("not a url");
        assert!(matches!(result, Err(ScriptError::ClientInitialization(_))));
    }

    #[test]
    fn strips_trailing_slash_from_endpoint() {
        let gateway = HttpGateway::new("http://localhost:1317/").unwrap();
        assert_eq!(gateway.base_url, "http://localhost:1317");
    }
}
