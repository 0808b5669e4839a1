#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
#[cfg(feature = "runtime")]
pub mod runtime;
pub mod schedule;
pub mod source;
pub mod sync;

pub use config::SyncConfig;
pub use error::{Result, SyncError};
#[cfg(feature = "runtime")]
pub use runtime::{ChannelView, MenuEvent, SyncHandle, spawn};
pub use schedule::{CancelToken, Scheduler, ThreadScheduler, VirtualClock};
pub use source::{HostStatus, MenuSlot, MenuView, TagSource};
pub use sync::{SyncLoop, SyncState, Tick, assign_tag};
