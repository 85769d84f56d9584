//! Parse and load site configuration.

use std::{ffi::OsStr, fs, path::Path};

use tracing::debug;

use crate::{Config, Error, error::excerpt_at, validate::validate};

/// Source format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Rusty Object Notation (`.ron`).
    Ron,
    /// JSON (`.json`), as handed over by a browser host.
    Json,
}

impl Format {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(OsStr::to_str) {
            Some("ron") => Some(Self::Ron),
            Some("json") => Some(Self::Json),
            _ => None,
        }
    }
}

/// Load, parse and validate the configuration file at `path`.
pub fn load_from_path(path: &Path) -> Result<Config, Error> {
    let Some(format) = Format::from_path(path) else {
        return Err(Error::Read {
            path: Some(path.to_path_buf()),
            message: "Unsupported config format (expected a .ron or .json file)".to_string(),
        });
    };
    let source = fs::read_to_string(path).map_err(|e| Error::Read {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    })?;
    load_from_str(&source, format, Some(path))
}

/// Parse and validate a configuration document.
pub fn load_from_str(source: &str, format: Format, path: Option<&Path>) -> Result<Config, Error> {
    let parsed = match format {
        Format::Ron => parse_ron(source),
        Format::Json => parse_json(source),
    };
    let attach = |e: Error| match path {
        Some(p) => e.with_path(p),
        None => e,
    };
    let cfg = parsed.map_err(attach)?;
    validate(&cfg).map_err(attach)?;
    debug!(
        overlays = cfg.overlays.len(),
        carousels = cfg.carousels.len(),
        forms = cfg.forms.len(),
        "config_loaded"
    );
    Ok(cfg)
}

fn parse_ron(source: &str) -> Result<Config, Error> {
    ron::from_str::<Config>(source).map_err(|e| {
        let message = e.to_string();
        // RON renders errors as "line:col: message".
        let loc = ron_location(&message);
        Error::Parse {
            path: None,
            line: loc.map(|(l, _)| l),
            col: loc.map(|(_, c)| c),
            excerpt: loc.map(|(l, c)| excerpt_at(source, l, c)),
            message,
        }
    })
}

fn parse_json(source: &str) -> Result<Config, Error> {
    serde_json::from_str::<Config>(source).map_err(|e| {
        let (line, col) = (e.line(), e.column());
        let known = line > 0;
        Error::Parse {
            path: None,
            line: known.then_some(line),
            col: known.then_some(col),
            excerpt: known.then(|| excerpt_at(source, line, col)),
            message: e.to_string(),
        }
    })
}

/// Extract a leading `line:col` pair from a rendered RON error.
fn ron_location(message: &str) -> Option<(usize, usize)> {
    let mut parts = message.splitn(3, ':');
    let line = parts.next()?.trim().parse().ok()?;
    let col = parts.next()?.trim().parse().ok()?;
    Some((line, col))
}

impl Config {
    /// Parse and validate a RON document.
    pub fn from_ron(source: &str) -> Result<Self, Error> {
        load_from_str(source, Format::Ron, None)
    }

    /// Parse and validate a JSON document.
    pub fn from_json(source: &str) -> Result<Self, Error> {
        load_from_str(source, Format::Json, None)
    }
}
