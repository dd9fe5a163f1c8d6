use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::io::Write;
use std::path::PathBuf;
use verstage_config::Config;

#[derive(clap::Args)]
pub struct Args {
    /// Archive root (overrides `archive.root`).
    #[arg(short, long)]
    root: Option<PathBuf>,
}

pub fn run(args: Args, config: &Config, out: &mut impl Write) -> Result<()> {
    let root = super::archive_root(args.root, config);
    let indexes = super::index_builder(&root, config).and_then(|b| b.rebuild()).or_raise(|| ErrorKind::Index)?;
    let latest = indexes.full.latest.as_ref().map(|l| l.version()).unwrap_or("none");
    writeln!(out, "Indexed {} versions in {} (latest: {latest})", indexes.full.count, root.display())
        .or_raise(|| ErrorKind::Output)
}
