//! Tokio driver for a [`SyncLoop`].
//!
//! Each step runs on the blocking pool (sources may do blocking I/O), and the
//! delay between steps is a `tokio::time::sleep` that a stop signal can cut
//! short.

use crate::schedule::CancelToken;
use crate::source::{MenuView, TagSource};
use crate::sync::{SyncLoop, Tick};
use tagging::MenuNode;
use tokio::sync::mpsc;
use tracing::error;

/// Changes pushed to a [`ChannelView`] receiver.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuEvent {
    Installed(MenuNode),
    TornDown,
}

/// View that forwards installs and teardowns over a channel.
#[derive(Debug, Clone)]
pub struct ChannelView {
    tx: mpsc::UnboundedSender<MenuEvent>,
}

impl ChannelView {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<MenuEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl MenuView for ChannelView {
    fn install(&mut self, menu: MenuNode) {
        let _ = self.tx.send(MenuEvent::Installed(menu));
    }

    fn teardown(&mut self) {
        let _ = self.tx.send(MenuEvent::TornDown);
    }
}

/// Run `sync` on the current tokio runtime until it halts or is stopped.
pub fn spawn<S, V>(sync: SyncLoop<S, V>) -> SyncHandle
where
    S: TagSource + Send + 'static,
    V: MenuView + Send + 'static,
{
    let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
    let cancel = sync.cancel_token();

    let task = tokio::spawn(async move {
        let mut sync = sync;

        loop {
            let stepped = tokio::task::spawn_blocking(move || {
                let tick = sync.step();
                (sync, tick)
            })
            .await;

            let (returned, tick) = match stepped {
                Ok(pair) => pair,
                Err(e) => {
                    error!(error = %e, "sync step aborted");
                    return;
                }
            };
            sync = returned;

            let delay = match tick {
                Tick::Wait(delay) => delay,
                Tick::Halt => break,
            };

            tokio::select! {
                _ = stop_rx.recv() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        // Blocking sources may not be dropped on an async worker.
        let finished = tokio::task::spawn_blocking(move || {
            if sync.cancel_token().is_cancelled() {
                sync.shutdown();
            }
        })
        .await;
        if let Err(e) = finished {
            error!(error = %e, "sync shutdown aborted");
        }
    });

    SyncHandle {
        stop_tx,
        cancel,
        task,
    }
}

/// Handle to a loop started with [`spawn`].
pub struct SyncHandle {
    stop_tx: mpsc::Sender<()>,
    cancel: CancelToken,
    task: tokio::task::JoinHandle<()>,
}

impl SyncHandle {
    /// Whether the loop has halted (timed out or stopped).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the loop, tear down its menu and wait for it to finish. A request
    /// already in flight completes but its result is dropped.
    pub async fn stop(self) {
        self.cancel.cancel();
        let _ = self.stop_tx.send(()).await;
        let _ = self.task.await;
    }

    /// Wait for the loop to halt on its own.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}
