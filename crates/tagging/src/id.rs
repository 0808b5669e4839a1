//! Tag id classification and path helpers.
//!
//! A tag id is a colon-delimited path. The parent of `"a:b:c"` is `"a:b"`,
//! the parent of `"a"` is the root `""`.

use crate::types::TagMap;

/// Pseudo-tag matching every torrent.
pub const ID_ALL: &str = "All";

/// Pseudo-tag for untagged torrents. Assigning it clears a torrent's tag.
pub const ID_NONE: &str = "None";

/// The implicit root of the hierarchy.
pub const ID_ROOT: &str = "";

const SEPARATOR: char = ':';

/// Whether `id` is one of the reserved ids (`""`, `"All"`, `"None"`).
///
/// Reserved ids are never tree nodes and never have children.
///
/// ```
/// use tagging::id::is_reserved;
///
/// assert!(is_reserved("None"));
/// assert!(is_reserved(""));
/// assert!(!is_reserved("movies"));
/// ```
pub fn is_reserved(id: &str) -> bool {
    id == ID_ALL || id == ID_NONE || id == ID_ROOT
}

/// The id with its last segment removed, or `""` for a top-level id.
///
/// ```
/// use tagging::id::parent_of;
///
/// assert_eq!(parent_of("movies:hd:1080"), "movies:hd");
/// assert_eq!(parent_of("movies"), "");
/// assert_eq!(parent_of(""), "");
/// ```
pub fn parent_of(id: &str) -> &str {
    match id.rfind(SEPARATOR) {
        Some(idx) => &id[..idx],
        None => ID_ROOT,
    }
}

/// Display names of `id` and its ancestors joined with `/`, root first.
///
/// Returns `None` for reserved ids and when `id` or any ancestor is missing
/// from `data`.
pub fn full_name(id: &str, data: &TagMap) -> Option<String> {
    if is_reserved(id) {
        return None;
    }

    let mut parts = Vec::new();
    let mut current = id;

    while current != ID_ROOT {
        parts.push(data.get(current)?.name.as_str());
        current = parent_of(current);
    }

    parts.reverse();
    Some(parts.join("/"))
}
