//! Utilities for the deploy and exercise scripts

use std::{fs, path::Path};

use chrono::{DateTime, Utc};

use crate::{
    constants::{PHASE1_DURATION_SECS, PHASE1_LEAD_SECS, PHASE2_DURATION_SECS},
    errors::ScriptError,
};

/// Reads a contract's wasm binary from disk.
///
/// An unreadable binary fails the upload before any network call is made.
pub fn read_wasm(path: &Path) -> Result<Vec<u8>, ScriptError> {
    fs::read(path)
        .map_err(|e| ScriptError::UploadFailed(format!("could not read {}: {}", path.display(), e)))
}

/// The phase timestamps (unix seconds) for the forge's launch config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchSchedule {
    /// When phase 1 opens
    pub phase1_start: i64,
    /// When phase 2 opens
    pub phase2_start: i64,
    /// When phase 2 closes
    pub phase2_end: i64,
    /// The phase 2 slot period in seconds
    pub phase2_slot_period: i64,
}

/// Derives a launch schedule relative to the given instant
pub fn launch_schedule(now: DateTime<Utc>) -> LaunchSchedule {
    let phase1_start = now.timestamp() + PHASE1_LEAD_SECS;
    let phase2_start = phase1_start + PHASE1_DURATION_SECS;
    let phase2_end = phase2_start + PHASE2_DURATION_SECS;

    LaunchSchedule {
        phase1_start,
        phase2_start,
        phase2_end,
        phase2_slot_period: PHASE2_DURATION_SECS,
    }
}
