//! Values for the per-torrent tag column.

use crate::id::{ID_NONE, full_name};
use crate::types::TagMap;

/// Status field holding a torrent's tag display name.
pub const STATUS_NAME: &str = "tagging_name";

/// Status field holding a torrent's tag id.
pub const STATUS_ID: &str = "tagging_id";

/// Column text for a torrent tagged with `tag_id`.
///
/// Untagged torrents and tags missing from `data` show an empty cell.
pub fn column_value(tag_id: &str, data: &TagMap) -> String {
    if tag_id == ID_NONE {
        return String::new();
    }
    full_name(tag_id, data).unwrap_or_default()
}
