//! Collaborator traits at the edges of the sync loop.

use crate::error::Result;
use tagging::{MenuNode, TagSnapshot, Timestamp};

/// Readiness of the host console as seen from the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostStatus {
    /// The login prompt is showing; the user has not authenticated yet.
    pub login_visible: bool,
    /// The RPC session is connected and the tagging methods are available.
    pub rpc_ready: bool,
}

impl HostStatus {
    pub fn ready() -> Self {
        Self {
            login_visible: false,
            rpc_ready: true,
        }
    }

    pub fn login_pending() -> Self {
        Self {
            login_visible: true,
            rpc_ready: false,
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        !self.login_visible && self.rpc_ready
    }
}

/// The remote tag service.
///
/// Calls are made one at a time; an implementation never sees overlapping
/// requests from the same loop.
pub trait TagSource {
    /// Whether the session is usable and the login prompt is dismissed.
    fn host_status(&mut self) -> Result<HostStatus>;

    /// Whether the service finished loading its tag data.
    fn is_initialized(&mut self) -> Result<bool>;

    /// Full snapshot when `since` is `None`, otherwise changes since the
    /// cursor. `Ok(None)` means nothing changed.
    fn get_tag_updates(&mut self, since: Option<&Timestamp>) -> Result<Option<TagSnapshot>>;

    /// Tag the given torrents. `"None"` clears their tag.
    fn set_torrent_tags(&mut self, torrent_ids: &[String], tag_id: &str) -> Result<()>;
}

/// The host widget that displays the tag menu.
pub trait MenuView {
    /// Show `menu`. Any previous menu has already been torn down.
    fn install(&mut self, menu: MenuNode);

    /// Remove the currently shown menu.
    fn teardown(&mut self);
}

/// In-memory view holding whatever menu is installed.
#[derive(Debug, Default)]
pub struct MenuSlot {
    current: Option<MenuNode>,
    installs: usize,
    teardowns: usize,
}

impl MenuSlot {
    pub fn current(&self) -> Option<&MenuNode> {
        self.current.as_ref()
    }

    /// Number of menus installed so far.
    pub fn installs(&self) -> usize {
        self.installs
    }

    /// Number of menus torn down so far.
    pub fn teardowns(&self) -> usize {
        self.teardowns
    }
}

impl MenuView for MenuSlot {
    fn install(&mut self, menu: MenuNode) {
        self.current = Some(menu);
        self.installs += 1;
    }

    fn teardown(&mut self) {
        self.current = None;
        self.teardowns += 1;
    }
}
