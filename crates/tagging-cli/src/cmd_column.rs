use crate::input::read_snapshot;
use anyhow::Result;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tagging::TagSnapshot;
use tagging::status::{STATUS_ID, STATUS_NAME, column_value};

pub fn run(input: Option<PathBuf>, tags: Vec<String>, json: bool, pretty: bool) -> Result<()> {
    let snapshot = read_snapshot(input.as_deref())?;

    if json {
        let rows = Value::Array(tags.iter().map(|tag| status_row(tag, &snapshot)).collect());
        let out = if pretty {
            serde_json::to_string_pretty(&rows)?
        } else {
            serde_json::to_string(&rows)?
        };
        println!("{}", out);
    } else {
        for tag in &tags {
            println!("{}\t{}", tag, column_value(tag, &snapshot.data));
        }
    }
    Ok(())
}

/// Status fields a torrent tagged `tag` would report.
fn status_row(tag: &str, snapshot: &TagSnapshot) -> Value {
    let mut row = Map::new();
    row.insert(STATUS_ID.to_string(), Value::String(tag.to_string()));
    row.insert(
        STATUS_NAME.to_string(),
        Value::String(column_value(tag, &snapshot.data)),
    );
    Value::Object(row)
}
