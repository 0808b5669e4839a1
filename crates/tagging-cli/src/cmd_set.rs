use crate::server::ServerArgs;
use anyhow::{Context, Result, bail};
use tagging::id::{ID_ALL, ID_ROOT};
use tagging_deluge::DelugeClient;
use tagging_sync::TagSource;
use tracing::info;

pub fn run(server: ServerArgs, tag: String, torrents: Vec<String>) -> Result<()> {
    check_tag(&tag)?;

    let mut client = DelugeClient::new(server.config())?;
    let status = client
        .host_status()
        .with_context(|| format!("Failed to reach {}", server.url))?;
    if status.login_visible {
        bail!("Not logged in to {} (pass --password)", server.url);
    }
    if !status.is_ready() {
        bail!("{} is not connected or the Tagging plugin is disabled", server.url);
    }

    client
        .set_torrent_tags(&torrents, &tag)
        .with_context(|| format!("Failed to tag {} torrent(s) with {:?}", torrents.len(), tag))?;
    info!(tag = %tag, torrents = torrents.len(), "tag assigned");
    println!("Tagged {} torrent(s) with {}", torrents.len(), tag);
    Ok(())
}

/// "None" clears a tag; the other reserved ids cannot be assigned.
fn check_tag(tag: &str) -> Result<()> {
    if tag == ID_ALL || tag == ID_ROOT {
        bail!("{:?} is not an assignable tag", tag);
    }
    Ok(())
}
