//! Ordering and hierarchy construction over a flat tag map.

use crate::id::{ID_ROOT, is_reserved, parent_of};
use crate::types::TagMap;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::warn;

/// Deepest tag path kept in the hierarchy, in segments. Anything below is
/// dropped like an orphan, which bounds the depth of every projected menu.
pub const MAX_DEPTH: usize = 64;

/// Sort all ids in `data`, reserved ids included.
///
/// Reserved ids come first, ordered by id. Other ids are grouped by parent
/// (parents compared as strings) and ordered by display name within a
/// parent. Equal names fall back to id order.
///
/// Because a parent id is always a strict prefix of its child, every parent
/// sorts before its children, so one linear pass over the result sees
/// parents first.
///
/// ```
/// use tagging::{TagMap, TagRecord, tree::sort_ids};
///
/// let mut data = TagMap::new();
/// data.insert("movies".into(), TagRecord::new("Movies"));
/// data.insert("movies:hd".into(), TagRecord::new("HD"));
/// data.insert("tv".into(), TagRecord::new("TV"));
///
/// assert_eq!(sort_ids(&data), vec!["movies", "tv", "movies:hd"]);
/// ```
pub fn sort_ids(data: &TagMap) -> Vec<String> {
    let mut ids: Vec<&str> = data.keys().map(String::as_str).collect();
    ids.sort_by(|a, b| compare_ids(a, b, data));
    ids.into_iter().map(str::to_string).collect()
}

fn compare_ids(a: &str, b: &str, data: &TagMap) -> Ordering {
    match (is_reserved(a), is_reserved(b)) {
        (true, true) => a.cmp(b),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => parent_of(a)
            .cmp(parent_of(b))
            .then_with(|| display_name(a, data).cmp(display_name(b, data)))
            .then_with(|| a.cmp(b)),
    }
}

fn display_name<'a>(id: &'a str, data: &'a TagMap) -> &'a str {
    data.get(id).map(|r| r.name.as_str()).unwrap_or(id)
}

/// Parent → ordered children, rebuilt from scratch for every snapshot.
///
/// Keys are the implicit root `""` plus every reachable non-reserved id;
/// leaves map to an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagHierarchy {
    children: BTreeMap<String, Vec<String>>,
}

impl TagHierarchy {
    /// Children of `id` in menu order. Empty for leaves and unknown ids.
    pub fn children(&self, id: &str) -> &[String] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Top-level tags.
    pub fn roots(&self) -> &[String] {
        self.children(ID_ROOT)
    }

    /// Whether `id` is reachable (the root counts).
    pub fn contains(&self, id: &str) -> bool {
        self.children.contains_key(id)
    }

    /// Whether `id` has at least one child.
    pub fn is_internal(&self, id: &str) -> bool {
        !self.children(id).is_empty()
    }

    /// Number of reachable tags, not counting the root.
    pub fn len(&self) -> usize {
        self.children.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reachable tag ids, depth-first in menu order.
    pub fn ids(&self) -> Vec<&str> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack: Vec<&str> = self.roots().iter().rev().map(String::as_str).collect();

        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().map(String::as_str));
        }

        out
    }

    /// The raw parent → children map.
    pub fn as_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.children
    }
}

/// Build the hierarchy from ids ordered by [`sort_ids`].
///
/// Reserved ids are skipped. An id whose parent has not been registered by
/// the time it is visited is an orphan and is dropped, along with anything
/// below it. Ids deeper than [`MAX_DEPTH`] segments are dropped the same way.
pub fn build_hierarchy(sorted_ids: &[String], data: &TagMap) -> TagHierarchy {
    let mut children: BTreeMap<String, Vec<String>> = BTreeMap::new();
    children.insert(ID_ROOT.to_string(), Vec::new());
    let mut too_deep = 0usize;

    for id in sorted_ids {
        if is_reserved(id) || !data.contains_key(id) {
            continue;
        }
        if depth_of(id) > MAX_DEPTH {
            too_deep += 1;
            continue;
        }

        match children.get_mut(parent_of(id)) {
            Some(siblings) => siblings.push(id.clone()),
            None => continue,
        }
        children.insert(id.clone(), Vec::new());
    }

    if too_deep > 0 {
        warn!(dropped = too_deep, max_depth = MAX_DEPTH, "dropped tags nested too deeply");
    }

    TagHierarchy { children }
}

/// Number of segments in `id`.
fn depth_of(id: &str) -> usize {
    id.matches(':').count() + 1
}
