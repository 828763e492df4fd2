//! End-to-end tests of the deployment orchestrator and interaction
//! sequencer against a recording mock gateway

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use async_trait::async_trait;
use chain_common::{
    artifacts::Artifact,
    types::{Attribute, Event, Funds, Signer, TxResult},
};
use scripts::{
    errors::ScriptError,
    gateway::ChainGateway,
    orchestrator::{run_plan, StepOutcome},
    plan::{DeploymentPlan, DeploymentStep},
    sequencer::{run_sequence, InteractionStep, Target},
    store::ArtifactStore,
};
use serde_json::{json, Value};

/// A single recorded gateway invocation
#[derive(Debug, Clone, PartialEq)]
enum GatewayCall {
    Upload,
    Instantiate { code_id: u64, msg: Value },
    Execute { contract: String },
    Query { contract: String },
}

/// A gateway double that records every call and mints deterministic
/// identifiers: code ids counting up from a seed, and addresses of the form
/// `terra1code{id}`
struct MockGateway {
    calls: Mutex<Vec<GatewayCall>>,
    next_code_id: Mutex<u64>,
    /// 1-based ordinal of the upload call to reject, if any
    fail_upload_on: Option<usize>,
    /// 1-based ordinal of the execute call to reject, if any
    fail_execute_on: Option<usize>,
    /// When set, instantiation results carry no contract_address attribute
    omit_addresses: bool,
}

impl MockGateway {
    fn new() -> Self {
        Self::with_code_ids(100)
    }

    fn with_code_ids(start: u64) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_code_id: Mutex::new(start),
            fail_upload_on: None,
            fail_execute_on: None,
            omit_addresses: false,
        }
    }

    fn fail_upload_on(mut self, ordinal: usize) -> Self {
        self.fail_upload_on = Some(ordinal);
        self
    }

    fn fail_execute_on(mut self, ordinal: usize) -> Self {
        self.fail_execute_on = Some(ordinal);
        self
    }

    fn omit_addresses(mut self) -> Self {
        self.omit_addresses = true;
        self
    }

    fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainGateway for MockGateway {
    async fn upload_code(&self, _signer: &Signer, _wasm: &[u8]) -> Result<u64, ScriptError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(GatewayCall::Upload);
        let uploads = calls
            .iter()
            .filter(|call| matches!(call, GatewayCall::Upload))
            .count();
        if self.fail_upload_on == Some(uploads) {
            return Err(ScriptError::UploadFailed("broadcast rejected".to_string()));
        }

        let mut next = self.next_code_id.lock().unwrap();
        let code_id = *next;
        *next += 1;
        Ok(code_id)
    }

    async fn instantiate(
        &self,
        _signer: &Signer,
        code_id: u64,
        init_msg: &Value,
    ) -> Result<TxResult, ScriptError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(GatewayCall::Instantiate { code_id, msg: init_msg.clone() });
        let tx_hash = format!("MOCKTX{}", calls.len());

        let events = if self.omit_addresses {
            vec![]
        } else {
            vec![Event {
                ty: "instantiate_contract".to_string(),
                attributes: vec![Attribute {
                    key: "contract_address".to_string(),
                    value: format!("terra1code{code_id}"),
                }],
            }]
        };

        Ok(TxResult { tx_hash, raw_log: String::new(), events })
    }

    async fn execute(
        &self,
        _signer: &Signer,
        contract: &str,
        _msg: &Value,
        _funds: &Funds,
    ) -> Result<TxResult, ScriptError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(GatewayCall::Execute { contract: contract.to_string() });
        let executes = calls
            .iter()
            .filter(|call| matches!(call, GatewayCall::Execute { .. }))
            .count();
        if self.fail_execute_on == Some(executes) {
            return Err(ScriptError::ExecuteFailed(
                "failed to execute message; message index: 0".to_string(),
            ));
        }

        Ok(TxResult {
            tx_hash: format!("MOCKTX{}", calls.len()),
            raw_log: String::new(),
            events: vec![],
        })
    }

    async fn query(&self, contract: &str, _msg: &Value) -> Result<Value, ScriptError> {
        self.calls
            .lock()
            .unwrap()
            .push(GatewayCall::Query { contract: contract.to_string() });
        Ok(json!({ "ok": true }))
    }
}

fn signer() -> Signer {
    Signer {
        address: "terra1sender".to_string(),
        key: "test-key".to_string(),
    }
}

/// Writes a placeholder wasm blob under the given dir
fn wasm_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"\0asm").unwrap();
    path
}

/// A two-step plan: upload the token code, then instantiate it
fn token_plan(dir: &Path) -> DeploymentPlan {
    DeploymentPlan::new(vec![
        DeploymentStep::upload("token_code", wasm_file(dir, "token.wasm")),
        DeploymentStep::instantiate("token", "token_code", &[], |_| {
            Ok(json!({ "name": "Fury", "symbol": "Fury" }))
        }),
    ])
}

#[tokio::test]
async fn second_run_performs_zero_gateway_calls() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path().join("deployments.json"));

    let first = MockGateway::new();
    let outcomes = run_plan(&first, &store, "testnet", &signer(), &token_plan(dir.path()))
        .await
        .unwrap();
    assert_eq!(first.calls().len(), 2);
    assert!(outcomes.iter().all(|(_, o)| *o == StepOutcome::Deployed));

    let recorded = store.list("testnet").unwrap();

    // Unchanged plan, unchanged store: the orchestrator must not touch
    // the gateway at all
    let second = MockGateway::new();
    let outcomes = run_plan(&second, &store, "testnet", &signer(), &token_plan(dir.path()))
        .await
        .unwrap();
    assert!(second.calls().is_empty());
    assert!(outcomes.iter().all(|(_, o)| *o == StepOutcome::Skipped));
    assert_eq!(store.list("testnet").unwrap(), recorded);
}

#[tokio::test]
async fn failed_run_resumes_where_it_left_off() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path().join("deployments.json"));
    let plan = DeploymentPlan::new(vec![
        DeploymentStep::upload("integration_code", wasm_file(dir.path(), "integration.wasm")),
        DeploymentStep::upload("forge_code", wasm_file(dir.path(), "forge.wasm")),
    ]);

    // The second upload is rejected; the first step's artifact must survive
    let failing = MockGateway::new().fail_upload_on(2);
    let err = run_plan(&failing, &store, "testnet", &signer(), &plan)
        .await
        .unwrap_err();
    assert!(matches!(err, ScriptError::StepFailed(name, _) if name == "forge_code"));
    assert_eq!(
        store.get("testnet", "integration_code").unwrap(),
        Some(Artifact::CodeId(100))
    );
    assert_eq!(store.get("testnet", "forge_code").unwrap(), None);

    // The next run re-executes only the failed step; a different code id
    // seed proves the first step was never re-uploaded
    let resumed = MockGateway::with_code_ids(200);
    run_plan(&resumed, &store, "testnet", &signer(), &plan)
        .await
        .unwrap();
    assert_eq!(resumed.calls(), vec![GatewayCall::Upload]);
    assert_eq!(
        store.get("testnet", "integration_code").unwrap(),
        Some(Artifact::CodeId(100))
    );
    assert_eq!(store.get("testnet", "forge_code").unwrap(), Some(Artifact::CodeId(200)));
}

#[tokio::test]
async fn instantiate_receives_exactly_the_uploaded_code_id() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path().join("deployments.json"));
    let plan = DeploymentPlan::new(vec![
        DeploymentStep::upload("token_code", wasm_file(dir.path(), "token.wasm")),
        DeploymentStep::upload("forge_code", wasm_file(dir.path(), "forge.wasm")),
        DeploymentStep::instantiate("token", "token_code", &[], |_| Ok(json!({}))),
        DeploymentStep::instantiate("forge", "forge_code", &["token"], |deps| {
            let token = deps
                .get("token")
                .and_then(Artifact::address)
                .expect("token address resolved");
            Ok(json!({ "token": token }))
        }),
    ]);

    let gateway = MockGateway::with_code_ids(7);
    run_plan(&gateway, &store, "testnet", &signer(), &plan)
        .await
        .unwrap();

    // token_code was assigned 7 and forge_code 8; each instantiate must
    // receive its own upload's id, and the forge's init message must carry
    // the token's freshly recorded address
    let calls = gateway.calls();
    assert!(calls.contains(&GatewayCall::Instantiate { code_id: 7, msg: json!({}) }));
    assert!(calls
        .contains(&GatewayCall::Instantiate { code_id: 8, msg: json!({ "token": "terra1code7" }) }));
    assert_eq!(
        store.get("testnet", "forge").unwrap(),
        Some(Artifact::Address("terra1code8".to_string()))
    );
}

#[tokio::test]
async fn missing_address_attribute_fails_the_step() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path().join("deployments.json"));

    let gateway = MockGateway::new().omit_addresses();
    let err = run_plan(&gateway, &store, "testnet", &signer(), &token_plan(dir.path()))
        .await
        .unwrap_err();

    match err {
        ScriptError::StepFailed(name, source) => {
            assert_eq!(name, "token");
            assert!(matches!(*source, ScriptError::AddressNotFound(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    // The upload's artifact is still recorded; only the instantiate failed
    assert_eq!(store.get("testnet", "token_code").unwrap(), Some(Artifact::CodeId(100)));
    assert_eq!(store.get("testnet", "token").unwrap(), None);
}

#[tokio::test]
async fn sequence_stops_at_the_first_failing_step() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path().join("deployments.json"));

    let steps: Vec<InteractionStep> = (1..=5)
        .map(|i| {
            InteractionStep::execute(
                &format!("step-{i}"),
                Target::Address("terra1contract".to_string()),
                |_| Ok(json!({ "noop": {} })),
            )
        })
        .collect();

    let gateway = MockGateway::new().fail_execute_on(3);
    let err = run_sequence(&gateway, &store, "testnet", &signer(), &steps)
        .await
        .unwrap_err();

    // Steps 1-3 ran, step 3 failed, steps 4-5 were never invoked
    assert!(matches!(err, ScriptError::StepFailed(name, _) if name == "step-3"));
    assert_eq!(gateway.calls().len(), 3);
}

#[tokio::test]
async fn sequence_resolves_stored_targets_and_reports_missing_ones() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path().join("deployments.json"));
    store
        .put("testnet", "token", Artifact::Address("terra1token".to_string()))
        .unwrap();

    let steps = vec![
        InteractionStep::query("balance", Target::Stored("token".to_string()), |_| {
            Ok(json!({ "balance": {} }))
        }),
        InteractionStep::query("state", Target::Stored("forge".to_string()), |_| {
            Ok(json!({ "get_state_info": {} }))
        }),
    ];

    let gateway = MockGateway::new();
    let err = run_sequence(&gateway, &store, "testnet", &signer(), &steps)
        .await
        .unwrap_err();

    // The first step resolved its address from the store; the second had
    // no recorded artifact to resolve
    assert_eq!(
        gateway.calls(),
        vec![GatewayCall::Query { contract: "terra1token".to_string() }]
    );
    match err {
        ScriptError::StepFailed(name, source) => {
            assert_eq!(name, "state");
            assert!(matches!(*source, ScriptError::UnresolvedDependency(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}
