use super::PageArgs;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::io::Write;
use verstage_config::Config;
use verstage_switcher::{Catalog, Origin, resolve_current_version};

#[derive(clap::Args)]
pub struct Args {
    #[command(flatten)]
    page: PageArgs,
}

pub async fn run(args: Args, config: &Config, out: &mut impl Write) -> Result<()> {
    let context = args.page.context();
    let catalog = Catalog::load(&args.page.sources(config), &context).await;
    if let Origin::Loaded(source) = &catalog.origin {
        tracing::info!(%source, "Using version catalog");
    }
    writeln!(out, "{}", resolve_current_version(&context, &catalog)).or_raise(|| ErrorKind::Output)
}
