use crate::input::read_snapshot;
use anyhow::Result;
use std::path::PathBuf;
use tagging::render::render_text;
use tagging::{MenuNode, MenuOptions, TagSnapshot, build_menu, context_entry};

pub fn run(input: Option<PathBuf>, json: bool, counts: bool, pretty: bool) -> Result<()> {
    let snapshot = read_snapshot(input.as_deref())?;
    let menu = context_menu(&snapshot, counts);
    print!("{}", format_menu(&menu, json, pretty)?);
    Ok(())
}

fn context_menu(snapshot: &TagSnapshot, counts: bool) -> MenuNode {
    let options = MenuOptions::default().with_counts(counts);
    context_entry(build_menu(&snapshot.data, &options), &options)
}

fn format_menu(menu: &MenuNode, json: bool, pretty: bool) -> Result<String> {
    if !json {
        return Ok(render_text(menu));
    }
    let out = if pretty {
        serde_json::to_string_pretty(menu)?
    } else {
        serde_json::to_string(menu)?
    };
    Ok(format!("{}\n", out))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> TagSnapshot {
        TagSnapshot::from_json(
            r#"{"timestamp":"t","data":{
                "All":{"name":"All","count":3},
                "movies":{"name":"Movies","count":2},
                "movies:hd":{"name":"HD","count":1},
                "tv":{"name":"TV","count":1}
            }}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_render_text() {
        let menu = context_menu(&snapshot(), false);
        let text = format_menu(&menu, false, false).unwrap();
        assert_eq!(
            text,
            "Tagging >\n  Set Tag >\n    None [None]\n    ----\n    Movies >\n      Movies [movies]\n      ----\n      HD [movies:hd]\n    TV [tv]\n"
        );
    }

    #[test]
    fn test_render_counts() {
        let menu = context_menu(&snapshot(), true);
        let text = format_menu(&menu, false, false).unwrap();
        assert!(text.contains("Movies (2) >"));
        assert!(text.contains("HD (1) [movies:hd]"));
        assert!(!text.contains("All"));
    }

    #[test]
    fn test_render_json() {
        let menu = context_menu(&snapshot(), false);
        let out = format_menu(&menu, true, false).unwrap();
        assert!(out.ends_with('\n'));
        let back: MenuNode = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(back, menu);
    }

    #[test]
    fn test_render_json_pretty() {
        let menu = context_menu(&snapshot(), false);
        let out = format_menu(&menu, true, true).unwrap();
        assert!(out.contains("\n  \"kind\": \"submenu\""));
    }
}
