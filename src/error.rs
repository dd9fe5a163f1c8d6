//! Command-line Error Types
//!
//! Each sub-command raises one of these over the error tree of the crate it
//! drives, so the printed tree reads from the command down to the cause.

use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("unable to load configuration")]
    Config,
    #[display("unable to archive version")]
    Archive,
    #[display("unable to update the version index")]
    Index,
    #[display("unable to switch version")]
    Switch,
    #[display("unable to write output")]
    Output,
}
