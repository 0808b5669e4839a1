//! The polling state machine.

use crate::config::SyncConfig;
use crate::schedule::{CancelToken, Scheduler};
use crate::source::{MenuView, TagSource};
use std::time::Duration;
use tagging::{MenuOptions, TagSnapshot, Timestamp, build_menu, context_entry, status};
use tracing::{debug, info, trace, warn};

/// Where the loop is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Waiting for the host session and login.
    AwaitingHost { retries_left: u32 },
    /// Waiting for the remote tag service to finish loading.
    AwaitingCoreInit,
    /// Requesting the first full snapshot.
    AwaitingFirstSnapshot,
    /// Polling for incremental updates.
    Active,
    /// The host never became ready. Terminal.
    TimedOut,
    /// Shut down by the owner. Terminal.
    Disabled,
}

impl SyncState {
    pub fn is_active(&self) -> bool {
        matches!(self, SyncState::Active)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SyncState::TimedOut | SyncState::Disabled)
    }
}

/// What the driver should do after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Step again after this delay.
    Wait(Duration),
    /// Stop driving the loop.
    Halt,
}

/// Keeps a [`MenuView`] showing the current tag hierarchy of a
/// [`TagSource`].
///
/// The loop owns all of its state. Each [`step`](Self::step) issues at most
/// one request, so requests never overlap and updates apply in the order
/// they were requested.
pub struct SyncLoop<S, V> {
    source: S,
    view: V,
    config: SyncConfig,
    options: MenuOptions,
    state: SyncState,
    cursor: Option<Timestamp>,
    snapshot: Option<TagSnapshot>,
    installed: bool,
    cancel: CancelToken,
}

impl<S: TagSource, V: MenuView> SyncLoop<S, V> {
    pub fn new(source: S, view: V) -> Self {
        Self::with_config(source, view, SyncConfig::default())
    }

    pub fn with_config(source: S, view: V, config: SyncConfig) -> Self {
        Self {
            source,
            view,
            state: SyncState::AwaitingHost {
                retries_left: config.host_retries,
            },
            config,
            options: MenuOptions::default(),
            cursor: None,
            snapshot: None,
            installed: false,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_menu_options(mut self, options: MenuOptions) -> Self {
        self.options = options;
        self
    }

    /// Share an existing cancellation token instead of the loop's own.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Timestamp of the last applied snapshot.
    pub fn cursor(&self) -> Option<&Timestamp> {
        self.cursor.as_ref()
    }

    /// The last applied snapshot.
    pub fn snapshot(&self) -> Option<&TagSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Advance the state machine by at most one request.
    pub fn step(&mut self) -> Tick {
        if self.cancel.is_cancelled() {
            return Tick::Halt;
        }

        match self.state {
            SyncState::AwaitingHost { retries_left } => self.wait_for_host(retries_left),
            SyncState::AwaitingCoreInit => self.poll_init(),
            SyncState::AwaitingFirstSnapshot => self.fetch_initial(),
            SyncState::Active => self.fetch_update(),
            SyncState::TimedOut | SyncState::Disabled => Tick::Halt,
        }
    }

    /// Step until the loop halts or is cancelled, sleeping on `scheduler`
    /// between steps. A cancelled loop is shut down before returning.
    pub fn run(&mut self, scheduler: &mut impl Scheduler) {
        while let Tick::Wait(delay) = self.step() {
            if self.cancel.is_cancelled() {
                break;
            }
            scheduler.sleep(delay);
        }

        if self.cancel.is_cancelled() && !self.state.is_terminal() {
            self.shutdown();
        }
    }

    /// Stop polling and remove the installed menu.
    pub fn shutdown(&mut self) {
        self.cancel.cancel();
        self.teardown();
        self.state = SyncState::Disabled;
        info!("tagging disabled");
    }

    /// A menu entry for `tag_id` was chosen with `selection` highlighted.
    pub fn activate(&mut self, tag_id: &str, selection: &[String]) {
        assign_tag(&mut self.source, selection, tag_id);
    }

    /// Status-column text for a torrent tagged `tag_id`, resolved against
    /// the last applied snapshot.
    pub fn column_value(&self, tag_id: &str) -> String {
        match &self.snapshot {
            Some(snapshot) => status::column_value(tag_id, &snapshot.data),
            None => String::new(),
        }
    }

    fn wait_for_host(&mut self, retries_left: u32) -> Tick {
        if retries_left == 0 {
            return self.time_out();
        }

        let interval = self.config.host_poll_interval;
        match self.source.host_status() {
            Ok(status) if status.is_ready() => {
                info!("host session ready");
                self.state = SyncState::AwaitingCoreInit;
                Tick::Wait(Duration::ZERO)
            }
            Ok(status) if status.login_visible => {
                debug!("waiting for login");
                Tick::Wait(interval)
            }
            Ok(_) => {
                debug!(retries_left, "RPC session not available yet");
                self.consume_retry(retries_left, interval)
            }
            Err(e) => {
                debug!(retries_left, error = %e, "host status check failed");
                self.consume_retry(retries_left, interval)
            }
        }
    }

    fn consume_retry(&mut self, retries_left: u32, interval: Duration) -> Tick {
        let retries_left = retries_left - 1;
        if retries_left == 0 {
            return self.time_out();
        }
        self.state = SyncState::AwaitingHost { retries_left };
        Tick::Wait(interval)
    }

    fn time_out(&mut self) -> Tick {
        warn!("RPC configuration timed out");
        self.state = SyncState::TimedOut;
        Tick::Halt
    }

    fn poll_init(&mut self) -> Tick {
        debug!("waiting for tagging core to be initialized");

        match self.source.is_initialized() {
            Ok(true) => {
                info!("tagging core is initialized");
                self.state = SyncState::AwaitingFirstSnapshot;
                Tick::Wait(Duration::ZERO)
            }
            Ok(false) => Tick::Wait(self.config.init_poll_interval),
            Err(e) => {
                warn!(error = %e, "initialization check failed");
                Tick::Wait(self.config.init_poll_interval)
            }
        }
    }

    fn fetch_initial(&mut self) -> Tick {
        let result = self.source.get_tag_updates(None);
        if self.discard_late_response() {
            return Tick::Halt;
        }

        match result {
            Ok(Some(snapshot)) => {
                self.apply(snapshot);
                self.state = SyncState::Active;
                info!("tagging enabled");
                Tick::Wait(self.config.update_interval)
            }
            Ok(None) => {
                debug!("no initial snapshot yet");
                Tick::Wait(self.config.init_poll_interval)
            }
            Err(e) => {
                warn!(error = %e, "initial snapshot request failed");
                Tick::Wait(self.config.init_poll_interval)
            }
        }
    }

    fn fetch_update(&mut self) -> Tick {
        let result = self.source.get_tag_updates(self.cursor.as_ref());
        if self.discard_late_response() {
            return Tick::Halt;
        }

        match result {
            Ok(Some(snapshot)) => self.apply(snapshot),
            Ok(None) => trace!("no tag changes"),
            Err(e) => warn!(error = %e, "tag update request failed"),
        }

        Tick::Wait(self.config.update_interval)
    }

    fn discard_late_response(&self) -> bool {
        if self.cancel.is_cancelled() {
            debug!("discarding response received after shutdown");
            return true;
        }
        false
    }

    fn apply(&mut self, snapshot: TagSnapshot) {
        let menu = context_entry(build_menu(&snapshot.data, &self.options), &self.options);

        self.teardown();
        self.view.install(menu);
        self.installed = true;

        debug!(
            tags = snapshot.data.len(),
            timestamp = %snapshot.timestamp,
            "installed tag menu"
        );

        self.cursor = Some(snapshot.timestamp.clone());
        self.snapshot = Some(snapshot);
    }

    fn teardown(&mut self) {
        if self.installed {
            self.view.teardown();
            self.installed = false;
        }
    }
}

/// Tag `torrent_ids` with `tag_id`, fire-and-forget.
///
/// Empty selections send nothing. Failures are logged and not retried.
pub fn assign_tag<S: TagSource + ?Sized>(source: &mut S, torrent_ids: &[String], tag_id: &str) {
    if torrent_ids.is_empty() {
        debug!(tag = tag_id, "no torrents selected");
        return;
    }

    match source.set_torrent_tags(torrent_ids, tag_id) {
        Ok(()) => debug!(tag = tag_id, torrents = torrent_ids.len(), "tag assigned"),
        Err(e) => warn!(tag = tag_id, error = %e, "failed to assign tag"),
    }
}
