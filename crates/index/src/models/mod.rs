mod index;
mod record;

pub use self::index::{CatalogEntry, LatestEntry, SimplifiedIndex, VersionIndex};
pub use self::record::{UNKNOWN_COMMIT, VersionMetadata, VersionRecord};
