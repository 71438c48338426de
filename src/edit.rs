//! Building full configuration records from files and `KEY=VALUE` edits.
//!
//! The API only accepts whole records, so edits are applied client-side to
//! the current record before it is sent back.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::{CliError, Result};
use crate::types::ConfigResource;

/// A dotted-path assignment such as `sta.ssid=warehouse`.
///
/// The raw text is typed against the field it replaces: string fields take
/// it verbatim (or unquoted, when written as a JSON string), other fields
/// read it as JSON (`true`, `8080`).
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub path: Vec<String>,
    pub raw: String,
}

impl Assignment {
    /// The value to store in place of `current`.
    pub fn value_for(&self, current: &Value) -> Value {
        match (current, serde_json::from_str::<Value>(&self.raw)) {
            (Value::String(_), Ok(Value::String(unquoted))) => Value::String(unquoted),
            (Value::String(_), _) => Value::String(self.raw.clone()),
            (_, Ok(parsed)) => parsed,
            (_, Err(_)) => Value::String(self.raw.clone()),
        }
    }
}

impl FromStr for Assignment {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        let (key, raw) = s
            .split_once('=')
            .ok_or_else(|| CliError::InvalidAssignment(s.to_string()))?;

        let path: Vec<String> = key.trim().split('.').map(str::to_string).collect();
        if path.iter().any(|segment| segment.is_empty()) {
            return Err(CliError::InvalidAssignment(s.to_string()));
        }

        Ok(Self {
            path,
            raw: raw.to_string(),
        })
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.path.join("."), self.raw)
    }
}

/// Set an existing field of `record`. New fields are never created.
pub fn apply(record: &mut Value, assignment: &Assignment) -> Result<()> {
    let (last, parents) = assignment
        .path
        .split_last()
        .ok_or_else(|| CliError::InvalidAssignment(assignment.to_string()))?;

    let mut current = record;
    let mut walked = Vec::with_capacity(parents.len());
    for segment in parents {
        let section = section_mut(current, &walked, segment)?;
        walked.push(segment.as_str());
        current = section
            .get_mut(segment.as_str())
            .ok_or_else(|| CliError::UnknownField(walked.join(".")))?;
    }

    let slot = section_mut(current, &walked, last)?
        .get_mut(last.as_str())
        .ok_or_else(|| CliError::UnknownField(assignment.path.join(".")))?;
    *slot = assignment.value_for(slot);
    Ok(())
}

fn section_mut<'a>(
    value: &'a mut Value,
    walked: &[&str],
    child: &str,
) -> Result<&'a mut Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::NotASection(walked.join("."), child.to_string())),
    }
}

/// Read a record from a `.json` or `.toml` file into a JSON value.
pub fn read_record_file(path: &Path) -> Result<Value> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let content = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let parse_error = |reason: String| CliError::Parse {
        path: path.to_path_buf(),
        reason,
    };

    match extension.as_str() {
        "json" => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string())),
        "toml" => toml::from_str(&content).map_err(|e| parse_error(e.to_string())),
        _ => Err(CliError::UnsupportedFile(path.display().to_string())),
    }
}

/// Decode `value` as `R` and check its value ranges.
pub fn decode_record<R: ConfigResource>(value: Value) -> Result<R> {
    let record: R = serde_json::from_value(value).map_err(|source| CliError::Schema {
        domain: R::DOMAIN.to_string(),
        source,
    })?;
    record.validate()?;
    Ok(record)
}
