use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use verstage_index::models::{UNKNOWN_COMMIT, VersionMetadata};

/// Stamps metadata for a version archived at `now`.
///
/// The timestamp is stored in UTC; the display date and time keep the offset
/// of `now`, which is the local time when it can be determined.
pub(crate) fn stamp(version: &str, clean_version: &str, commit: Option<&str>, now: OffsetDateTime) -> Result<VersionMetadata> {
    let build_date = now
        .format(format_description!("[year]/[month padding:none]/[day padding:none]"))
        .or_raise(|| ErrorKind::Metadata)?;
    let build_time = now.format(format_description!("[hour]:[minute]:[second]")).or_raise(|| ErrorKind::Metadata)?;
    Ok(VersionMetadata {
        version: version.to_string(),
        clean_version: clean_version.to_string(),
        timestamp: now.to_offset(UtcOffset::UTC),
        commit: commit.map(str::trim).filter(|c| !c.is_empty()).unwrap_or(UNKNOWN_COMMIT).to_string(),
        build_date,
        build_time,
    })
}

pub(crate) fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
