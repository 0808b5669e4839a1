#![doc = include_str!("../README.md")]

pub mod id;
pub mod menu;
pub mod render;
pub mod status;
pub mod tree;
pub mod types;

pub use menu::{MenuNode, MenuOptions, build_menu, context_entry, project};
pub use tree::{TagHierarchy, build_hierarchy, sort_ids};
pub use types::{TagMap, TagRecord, TagSnapshot, Timestamp};
