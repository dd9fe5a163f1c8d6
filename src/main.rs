mod commands;
mod error;

use crate::error::{ErrorKind, Result};
use clap::{ArgAction, Parser, Subcommand};
use exn::ResultExt;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use verstage_config::Config;

#[derive(Parser)]
#[command(name = "verstage", version, about = "Archive versioned build outputs and switch between them")]
struct Cli {
    /// Configuration file (TOML, YAML or JSON); replaces `verstage.*` in the
    /// working directory.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More logging; repeat for more detail. `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy a build directory into the archive and refresh the index.
    Archive(commands::archive::Args),
    /// Rebuild the index files and landing page of the archive.
    Index(commands::index::Args),
    /// List archived versions, newest first.
    List(commands::list::Args),
    /// Show which version a page path belongs to.
    Resolve(commands::resolve::Args),
    /// Show where selecting a version leads from a page path.
    Switch(commands::switch::Args),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    let mut out = io::stdout();
    match cli.command {
        Command::Archive(args) => commands::archive::run(args, &config, &mut out),
        Command::Index(args) => commands::index::run(args, &config, &mut out),
        Command::List(args) => commands::list::run(args, &config, &mut out),
        Command::Resolve(args) => commands::resolve::run(args, &config, &mut out).await,
        Command::Switch(args) => commands::switch::run(args, &config, &mut out).await,
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}
