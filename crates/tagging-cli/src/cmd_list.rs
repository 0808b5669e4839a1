use crate::input::read_snapshot;
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use tagging::id::full_name;
use tagging::{TagSnapshot, build_hierarchy, sort_ids};

#[derive(Debug, Serialize)]
struct ListedTag<'a> {
    id: &'a str,
    name: &'a str,
    full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<u64>,
}

pub fn run(input: Option<PathBuf>, json: bool, pretty: bool) -> Result<()> {
    let snapshot = read_snapshot(input.as_deref())?;
    let tags = listed_tags(&snapshot);

    if json {
        let out = if pretty {
            serde_json::to_string_pretty(&tags)?
        } else {
            serde_json::to_string(&tags)?
        };
        println!("{}", out);
    } else {
        for tag in &tags {
            println!("{}", format_line(tag));
        }
    }
    Ok(())
}

/// Reachable tags in menu order. Orphans are left out.
fn listed_tags(snapshot: &TagSnapshot) -> Vec<ListedTag<'_>> {
    let hierarchy = build_hierarchy(&sort_ids(&snapshot.data), &snapshot.data);
    hierarchy
        .ids()
        .into_iter()
        .filter_map(|id| {
            let (id, record) = snapshot.data.get_key_value(id)?;
            Some(ListedTag {
                id: id.as_str(),
                name: record.name.as_str(),
                full_name: full_name(id, &snapshot.data)?,
                count: record.count,
            })
        })
        .collect()
}

fn format_line(tag: &ListedTag<'_>) -> String {
    match tag.count {
        Some(count) => format!("{}\t{}\t{}", tag.id, tag.full_name, count),
        None => format!("{}\t{}", tag.id, tag.full_name),
    }
}
