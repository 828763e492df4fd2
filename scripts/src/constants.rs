//! Constants used in the deploy and exercise scripts

/// The default path of the deployments file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The default logical network name under which artifacts are recorded
pub const DEFAULT_NETWORK: &str = "localterra";

/// The prism integration code artifact key in the deployments file
pub const PRISM_INTEGRATION_CODE_KEY: &str = "prism_integration_code";

/// The prism integration contract key in the deployments file
pub const PRISM_INTEGRATION_KEY: &str = "prism_integration";

/// The prism forge code artifact key in the deployments file
pub const PRISM_FORGE_CODE_KEY: &str = "prism_forge_code";

/// The prism forge contract key in the deployments file
pub const PRISM_FORGE_KEY: &str = "prism_forge";

/// The token code artifact key in the deployments file
pub const TOKEN_CODE_KEY: &str = "token_code";

/// The token contract key in the deployments file
pub const TOKEN_KEY: &str = "token";

/// The default path to the prism integration wasm binary
pub const PRISM_INTEGRATION_WASM: &str = "artifacts/prism_integration.wasm";

/// The default path to the prism forge wasm binary
pub const PRISM_FORGE_WASM: &str = "artifacts/prism_forge.wasm";

/// The default path to the token wasm binary
pub const TOKEN_WASM: &str = "artifacts/fury_token.wasm";

/// The base denomination used by the integration and forge contracts
pub const BASE_DENOM: &str = "uusd";

/// The token's display name
pub const TOKEN_NAME: &str = "Fury";

/// The token's ticker symbol
pub const TOKEN_SYMBOL: &str = "Fury";

/// The token's decimal precision
pub const TOKEN_DECIMALS: u8 = 6;

/// The portion of deposits routed to the host, as a decimal string
pub const HOST_PORTION: &str = "0.1";

/// The amount of tokens minted to the operator before the deposit exercise.
///
/// CW20 amounts are decimal strings on the wire.
pub const MINT_AMOUNT: &str = "3000000";

/// The allowance granted to the forge over the operator's tokens
pub const ALLOWANCE_AMOUNT: &str = "3000000";

/// The amount of `uusd` attached to the exercise deposit
pub const DEPOSIT_AMOUNT: u128 = 1_000_000;

/// The launch amount passed to the forge's `post_initialize`
pub const LAUNCH_AMOUNT: &str = "100000";

/// Seconds from now until phase 1 of the launch opens
pub const PHASE1_LEAD_SECS: i64 = 60;

/// Duration of phase 1 in seconds
pub const PHASE1_DURATION_SECS: i64 = 1140;

/// Duration of phase 2 in seconds; also the phase 2 slot period
pub const PHASE2_DURATION_SECS: i64 = 3600;
