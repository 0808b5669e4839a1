use crate::server::ServerArgs;
use anyhow::{Context, Result, bail};
use std::time::Duration;
use tagging::render::render_text;
use tagging::{MenuNode, MenuOptions};
use tagging_deluge::DelugeClient;
use tagging_sync::{ChannelView, MenuEvent, SyncConfig, SyncLoop, spawn};
use tracing::{debug, info};

#[derive(Debug)]
pub struct WatchArgs {
    pub server: ServerArgs,
    pub interval_ms: u64,
    pub counts: bool,
    pub once: bool,
}

pub fn run(args: WatchArgs) -> Result<()> {
    // The blocking HTTP client is built outside the runtime.
    let client = DelugeClient::new(args.server.config())?;
    let config = sync_config(args.interval_ms);
    let options = MenuOptions::default().with_counts(args.counts);

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    runtime.block_on(watch(client, config, options, args.once, &args.server.url))
}

fn sync_config(interval_ms: u64) -> SyncConfig {
    SyncConfig::default().with_update_interval(Duration::from_millis(interval_ms))
}

async fn watch(
    client: DelugeClient,
    config: SyncConfig,
    options: MenuOptions,
    once: bool,
    url: &str,
) -> Result<()> {
    let (view, mut events) = ChannelView::new();
    let sync = SyncLoop::with_config(client, view, config).with_menu_options(options);
    let handle = spawn(sync);
    info!(url, "watching tags");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(MenuEvent::Installed(menu)) => {
                    print_menu(&menu);
                    if once {
                        handle.stop().await;
                        return Ok(());
                    }
                }
                Some(MenuEvent::TornDown) => debug!("menu torn down"),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                handle.stop().await;
                return Ok(());
            }
        }
    }

    handle.join().await;
    bail!("Gave up waiting for {} (not reachable, not logged in, or Tagging plugin disabled)", url)
}

fn print_menu(menu: &MenuNode) {
    println!("{}", header(chrono::Local::now()));
    print!("{}", render_text(menu));
}

fn header<Tz: chrono::TimeZone>(at: chrono::DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("# {}", at.format("%Y-%m-%d %H:%M:%S"))
}
