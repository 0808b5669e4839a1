//! Plain-text rendering of menus.

use crate::menu::MenuNode;

const INDENT: &str = "  ";

/// Render `node` as an indented outline.
///
/// Submenus end with ` >`, leaves show their tag id in brackets, separators
/// are drawn as `----`.
///
/// ```
/// use tagging::MenuNode;
/// use tagging::render::render_text;
///
/// let menu = MenuNode::Submenu {
///     label: "Set Tag".into(),
///     tag: None,
///     children: vec![MenuNode::leaf("None", "None"), MenuNode::Separator],
/// };
/// assert_eq!(render_text(&menu), "Set Tag >\n  None [None]\n  ----\n");
/// ```
pub fn render_text(node: &MenuNode) -> String {
    let mut out = String::new();
    render_node(node, 0, &mut out);
    out
}

fn render_node(node: &MenuNode, depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }

    match node {
        MenuNode::Leaf { label, tag } => {
            out.push_str(&format!("{} [{}]\n", label, tag));
        }
        MenuNode::Separator => out.push_str("----\n"),
        MenuNode::Submenu {
            label, children, ..
        } => {
            out.push_str(&format!("{} >\n", label));
            for child in children {
                render_node(child, depth + 1, out);
            }
        }
    }
}
