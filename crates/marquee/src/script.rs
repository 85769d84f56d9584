//! Replay scripts: a RON list of `(at_ms, signal)` steps.

use std::{fs, path::Path};

use marquee_protocol::Signal;
use serde::Deserialize;

use crate::error::Error;

/// One scripted signal.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    /// Milliseconds after start at which to dispatch.
    pub at_ms: u64,
    /// Signal to dispatch.
    pub signal: Signal,
}

/// Parse a script from RON source. Steps are ordered by time; steps sharing a
/// time keep their written order.
pub fn parse(source: &str, path: &Path) -> Result<Vec<Step>, Error> {
    let mut steps: Vec<Step> = ron::from_str(source).map_err(|e| Error::Script {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    steps.sort_by_key(|s| s.at_ms);
    Ok(steps)
}

/// Read and parse the script at `path`.
pub fn load(path: &Path) -> Result<Vec<Step>, Error> {
    let source = fs::read_to_string(path).map_err(|e| Error::Script {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse(&source, path)
}
