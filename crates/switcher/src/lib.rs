//! Version resolution and navigation for archived sites.
//!
//! A [`Switcher`] loads the simplified index written by
//! [`verstage_index`] through one or more [`CatalogSource`]s, works out which
//! version the current page belongs to and, when a visitor picks another
//! one, computes where to go and hands that to the page's [`Host`] through a
//! navigation [`Strategy`].
//!
//! Everything except catalog loading is synchronous and free of I/O, so the
//! whole state machine can be driven without a browser.

mod catalog;
mod context;
pub mod error;
mod host;
mod page;
mod resolve;
pub mod source;
mod strategy;
mod switcher;
mod view;

pub use crate::catalog::{Catalog, Origin};
pub use crate::context::Context;
#[cfg(any(test, feature = "mock"))]
pub use crate::host::{MockHost, Navigation};
pub use crate::host::Host;
pub use crate::page::Page;
pub use crate::resolve::{UNKNOWN_VERSION, filter, resolve_current_version};
pub use crate::source::{CatalogSource, FileSource, SourceHandle, StaticSource};
pub use crate::strategy::{Arrival, Embed, Redirect, Strategy, StrategyHandle};
pub use crate::switcher::{Event, Outcome, Phase, Switcher};
pub use crate::view::{Item, View};
use std::sync::Arc;

pub type HostHandle = Arc<dyn Host + Send + Sync>;
