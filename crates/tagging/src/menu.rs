//! Projection of a tag hierarchy into a nested menu description.

use crate::id::ID_NONE;
use crate::tree::{TagHierarchy, build_hierarchy, sort_ids};
use crate::types::TagMap;
use serde::{Deserialize, Serialize};

/// One entry of a menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MenuNode {
    /// Selectable item that assigns `tag`.
    Leaf { label: String, tag: String },

    Separator,

    /// Nested menu. Tag submenus carry their tag id; the root and the
    /// context wrapper do not.
    Submenu {
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
        children: Vec<MenuNode>,
    },
}

impl MenuNode {
    pub fn leaf(label: impl Into<String>, tag: impl Into<String>) -> Self {
        MenuNode::Leaf {
            label: label.into(),
            tag: tag.into(),
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            MenuNode::Leaf { label, .. } | MenuNode::Submenu { label, .. } => Some(label.as_str()),
            MenuNode::Separator => None,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            MenuNode::Leaf { tag, .. } => Some(tag.as_str()),
            MenuNode::Submenu { tag, .. } => tag.as_deref(),
            MenuNode::Separator => None,
        }
    }

    pub fn children(&self) -> &[MenuNode] {
        match self {
            MenuNode::Submenu { children, .. } => children.as_slice(),
            _ => &[],
        }
    }

    pub fn is_submenu(&self) -> bool {
        matches!(self, MenuNode::Submenu { .. })
    }

    /// First node carrying `tag`, searching depth-first. A tag submenu is
    /// found before its own header leaf.
    pub fn find(&self, tag: &str) -> Option<&MenuNode> {
        if self.tag() == Some(tag) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(tag))
    }
}

/// Labels and display switches for projected menus.
#[derive(Debug, Clone)]
pub struct MenuOptions {
    /// Label of the projected tag menu.
    pub title: String,
    /// Label of the entry that clears a torrent's tag.
    pub none_label: String,
    /// Label of the entry attached to the torrent context menu.
    pub context_label: String,
    /// Append ` (n)` to tag labels when the server reports a count.
    pub show_counts: bool,
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            title: "Set Tag".to_string(),
            none_label: "None".to_string(),
            context_label: "Tagging".to_string(),
            show_counts: false,
        }
    }
}

impl MenuOptions {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_none_label(mut self, label: impl Into<String>) -> Self {
        self.none_label = label.into();
        self
    }

    pub fn with_context_label(mut self, label: impl Into<String>) -> Self {
        self.context_label = label.into();
        self
    }

    pub fn with_counts(mut self, show_counts: bool) -> Self {
        self.show_counts = show_counts;
        self
    }
}

/// Project `hierarchy` into the tag menu.
///
/// The menu opens with the "None" entry and a separator, followed by the
/// top-level tags in hierarchy order. A tag with children becomes a submenu
/// whose first entry selects the tag itself; a tag without children is a
/// plain leaf.
pub fn project(hierarchy: &TagHierarchy, data: &TagMap, options: &MenuOptions) -> MenuNode {
    let mut children = Vec::with_capacity(hierarchy.roots().len() + 2);
    children.push(MenuNode::leaf(&options.none_label, ID_NONE));
    children.push(MenuNode::Separator);
    children.extend(
        hierarchy
            .roots()
            .iter()
            .map(|id| project_tag(id, hierarchy, data, options)),
    );

    MenuNode::Submenu {
        label: options.title.clone(),
        tag: None,
        children,
    }
}

fn project_tag(id: &str, hierarchy: &TagHierarchy, data: &TagMap, options: &MenuOptions) -> MenuNode {
    let label = tag_label(id, data, options);
    let kids = hierarchy.children(id);

    if kids.is_empty() {
        return MenuNode::leaf(label, id);
    }

    let mut children = Vec::with_capacity(kids.len() + 2);
    children.push(MenuNode::leaf(label.clone(), id));
    children.push(MenuNode::Separator);
    children.extend(
        kids.iter()
            .map(|child| project_tag(child, hierarchy, data, options)),
    );

    MenuNode::Submenu {
        label,
        tag: Some(id.to_string()),
        children,
    }
}

fn tag_label(id: &str, data: &TagMap, options: &MenuOptions) -> String {
    match data.get(id) {
        Some(record) => match record.count {
            Some(count) if options.show_counts => format!("{} ({})", record.name, count),
            _ => record.name.clone(),
        },
        None => id.to_string(),
    }
}

/// Sort, build the hierarchy and project it in one go.
///
/// ```
/// use tagging::{MenuNode, MenuOptions, TagMap, TagRecord, build_menu};
///
/// let mut data = TagMap::new();
/// data.insert("tv".into(), TagRecord::new("TV"));
///
/// let menu = build_menu(&data, &MenuOptions::default());
/// assert_eq!(menu.children().len(), 3);
/// assert_eq!(menu.children()[2], MenuNode::leaf("TV", "tv"));
/// ```
pub fn build_menu(data: &TagMap, options: &MenuOptions) -> MenuNode {
    let sorted = sort_ids(data);
    let hierarchy = build_hierarchy(&sorted, data);
    project(&hierarchy, data, options)
}

/// Wrap a projected tag menu in the entry attached to the torrent context
/// menu.
pub fn context_entry(menu: MenuNode, options: &MenuOptions) -> MenuNode {
    MenuNode::Submenu {
        label: options.context_label.clone(),
        tag: None,
        children: vec![menu],
    }
}
