mod cmd_column;
mod cmd_list;
mod cmd_render;
mod cmd_set;
mod cmd_watch;
mod input;
mod server;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "tagging")]
#[command(about = "Render, watch, and assign hierarchical Deluge tags")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the tag menu for a snapshot
    Render {
        /// Snapshot file (stdin when omitted or -)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output the menu as JSON
        #[arg(long)]
        json: bool,

        /// Show torrent counts next to tag names
        #[arg(long)]
        counts: bool,
    },
    /// List reachable tags in menu order
    List {
        /// Snapshot file (stdin when omitted or -)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the status-column value for torrents carrying the given tags
    Column {
        /// Snapshot file (stdin when omitted or -)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Tag ids
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Follow a live server and print the menu whenever it changes
    Watch {
        #[command(flatten)]
        server: server::ServerArgs,

        /// Delay between update polls, in milliseconds
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,

        /// Show torrent counts next to tag names
        #[arg(long)]
        counts: bool,

        /// Exit after the first menu is printed
        #[arg(long)]
        once: bool,
    },
    /// Assign a tag to torrents ("None" clears it)
    Set {
        #[command(flatten)]
        server: server::ServerArgs,

        /// Tag id to assign
        #[arg(long)]
        tag: String,

        /// Torrent ids
        #[arg(required = true)]
        torrents: Vec<String>,
    },
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Render {
            input,
            json,
            counts,
        } => cmd_render::run(input, json, counts, cli.pretty),
        Commands::List { input, json } => cmd_list::run(input, json, cli.pretty),
        Commands::Column { input, json, tags } => cmd_column::run(input, tags, json, cli.pretty),
        Commands::Watch {
            server,
            interval_ms,
            counts,
            once,
        } => cmd_watch::run(cmd_watch::WatchArgs {
            server,
            interval_ms,
            counts,
            once,
        }),
        Commands::Set {
            server,
            tag,
            torrents,
        } => cmd_set::run(server, tag, torrents),
    }
}
