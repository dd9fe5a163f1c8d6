use super::PageArgs;
use crate::error::{ErrorKind, Result};
use clap::ValueEnum;
use exn::ResultExt;
use std::io::Write;
use std::sync::Arc;
use verstage_config::{Config, NavigationMode};
use verstage_index::segment;
use verstage_switcher::error::Result as SwitcherResult;
use verstage_switcher::{Arrival, Embed, Event, Host, HostHandle, Outcome, Page, Redirect, StrategyHandle};

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Redirect,
    Embed,
}
impl From<Mode> for NavigationMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Redirect => NavigationMode::Redirect,
            Mode::Embed => NavigationMode::Embed,
        }
    }
}

#[derive(clap::Args)]
pub struct Args {
    #[command(flatten)]
    page: PageArgs,

    /// Version to switch to (`1.2.0` or `v1.2.0`).
    version: String,

    /// Navigation mode (overrides `switcher.mode`).
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,
}

/// Accepts every navigation without performing it.
struct DryRun;

impl Host for DryRun {
    fn assign_location(&self, url: &str) -> SwitcherResult<()> {
        tracing::debug!(url, "Would leave the page");
        Ok(())
    }

    fn load_frame(&self, url: &str) -> SwitcherResult<()> {
        tracing::debug!(url, "Would load the frame");
        Ok(())
    }
}

pub async fn run(args: Args, config: &Config, out: &mut impl Write) -> Result<()> {
    let outcome = switch(&args, config, Arc::new(DryRun)).await?;
    let written = match outcome {
        Outcome::Navigated { target, arrival: Arrival::Departed } => writeln!(out, "location {target}"),
        Outcome::Navigated { target, arrival: Arrival::Embedded } => writeln!(out, "frame {target}"),
        _ => writeln!(out, "already showing {}", args.version),
    };
    written.or_raise(|| ErrorKind::Output)
}

async fn switch(args: &Args, config: &Config, host: HostHandle) -> Result<Outcome> {
    let strategy: StrategyHandle = match args.mode.map(NavigationMode::from).unwrap_or(config.switcher.mode) {
        NavigationMode::Redirect => Box::new(Redirect::new(host)),
        NavigationMode::Embed => Box::new(Embed::new(host)),
    };
    let mut page = Page::new(args.page.context()).with_build_date_matching(config.switcher.match_build_date);
    let switcher = page.mount(strategy, &args.page.sources(config)).await.or_raise(|| ErrorKind::Switch)?;
    let version = segment::parse(&args.version).unwrap_or(&args.version).to_string();
    switcher.handle(Event::Select(version)).or_raise(|| ErrorKind::Switch)
}
