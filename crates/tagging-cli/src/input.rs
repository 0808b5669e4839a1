use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use std::io::{self, Read};
use std::path::Path;
use tagging::TagSnapshot;

/// Read a snapshot from `path`, or from stdin when `path` is `None` or `-`.
pub fn read_snapshot(path: Option<&Path>) -> Result<TagSnapshot> {
    match path {
        Some(p) if p != Path::new("-") => {
            let content = std::fs::read_to_string(p)
                .with_context(|| format!("Failed to read {:?}", p))?;
            parse_snapshot(&content).with_context(|| format!("Failed to parse {:?}", p))
        }
        _ => parse_snapshot(&read_stdin()?).context("Failed to parse stdin"),
    }
}

/// Parse a snapshot document. A raw RPC response (`{"result": ..., "id": ...}`)
/// is unwrapped first.
pub fn parse_snapshot(content: &str) -> Result<TagSnapshot> {
    let value = match serde_json::from_str(content)? {
        Value::Object(mut map) if !map.contains_key("data") && map.contains_key("result") => {
            map.remove("result").unwrap_or(Value::Null)
        }
        other => other,
    };

    TagSnapshot::from_response(value)?
        .ok_or_else(|| anyhow!("input holds no snapshot (null or false)"))
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read stdin")?;
    Ok(buf)
}
