use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Commit identifier recorded when the archiving environment doesn't know it.
pub const UNKNOWN_COMMIT: &str = "unknown";

fn unknown_commit() -> String {
    UNKNOWN_COMMIT.to_string()
}

fn unix_epoch() -> OffsetDateTime {
    OffsetDateTime::UNIX_EPOCH
}

/// Contents of the metadata file written into every archived version
/// directory.
///
/// `build_date` and `build_time` are display strings only; ordering always
/// goes through `clean_version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionMetadata {
    /// Display label, conventionally `v`-prefixed (`v1.2.0`).
    pub version: String,
    /// Normalized version used for comparison and equality (`1.2.0`).
    pub clean_version: String,
    #[serde(with = "timestamp", default = "unix_epoch")]
    pub timestamp: OffsetDateTime,
    #[serde(default = "unknown_commit")]
    pub commit: String,
    #[serde(default)]
    pub build_date: String,
    #[serde(default)]
    pub build_time: String,
}

/// RFC 3339 on output. On input, any ISO 8601 date-time is accepted and one
/// without an offset is read as UTC.
mod timestamp {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use time::format_description::well_known::{Iso8601, Rfc3339};
    use time::{OffsetDateTime, PrimitiveDateTime};

    pub(super) fn serialize<S: Serializer>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        time::serde::rfc3339::serialize(value, serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OffsetDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("unrecognized timestamp {raw:?}")))
    }

    pub(super) fn parse(raw: &str) -> Option<OffsetDateTime> {
        let raw = raw.trim();
        OffsetDateTime::parse(raw, &Rfc3339)
            .or_else(|_| OffsetDateTime::parse(raw, &Iso8601::DEFAULT))
            .ok()
            .or_else(|| PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT).ok().map(PrimitiveDateTime::assume_utc))
    }
}

/// One archived build, as listed in the full index.
///
/// Records are derived from [`VersionMetadata`] on every rebuild and never
/// modified afterwards. `path` is the name of the version directory relative
/// to the archive root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    #[serde(flatten)]
    pub metadata: VersionMetadata,
    pub path: String,
}
impl VersionRecord {
    pub fn new(metadata: VersionMetadata, path: impl Into<String>) -> Self {
        Self { metadata, path: path.into() }
    }

    pub fn version(&self) -> &str {
        &self.metadata.version
    }

    pub fn clean_version(&self) -> &str {
        &self.metadata.clean_version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_metadata_uses_camel_case() {
        let metadata = VersionMetadata {
            version: "v1.0.0".into(),
            clean_version: "1.0.0".into(),
            timestamp: datetime!(2024-05-01 12:30:00 UTC),
            commit: "abc123".into(),
            build_date: "2024/5/1".into(),
            build_time: "12:30:00".into(),
        };
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["cleanVersion"], "1.0.0");
        assert_eq!(json["buildDate"], "2024/5/1");
        assert_eq!(json["timestamp"], "2024-05-01T12:30:00Z");
    }

    #[test]
    fn test_metadata_accepts_javascript_timestamps() {
        let json = r#"{
            "version": "v1.0.1",
            "cleanVersion": "1.0.1",
            "timestamp": "2025-03-14T09:26:53.589Z",
            "commit": "unknown",
            "buildDate": "2025/3/14",
            "buildTime": "17:26:53"
        }"#;
        let metadata: VersionMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.clean_version, "1.0.1");
        assert_eq!(metadata.timestamp.year(), 2025);
    }

    #[test]
    fn test_metadata_accepts_timestamps_without_offset() {
        let json = r#"{"version":"v1.0.0","cleanVersion":"1.0.0","timestamp":"2024-01-01T08:15:00"}"#;
        let metadata: VersionMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.timestamp, datetime!(2024-01-01 08:15:00 UTC));
        assert_eq!(metadata.build_date, "");
        assert_eq!(metadata.build_time, "");
        assert_eq!(serde_json::to_value(&metadata).unwrap()["timestamp"], "2024-01-01T08:15:00Z");
    }

    #[test]
    fn test_metadata_without_timestamp() {
        let json = r#"{"version":"v1.0.0","cleanVersion":"1.0.0","buildDate":"2024/1/1"}"#;
        let metadata: VersionMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.timestamp, OffsetDateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_unrecognized_timestamp_is_rejected() {
        let json = r#"{"version":"v1.0.0","cleanVersion":"1.0.0","timestamp":"last tuesday"}"#;
        assert!(serde_json::from_str::<VersionMetadata>(json).is_err());
    }

    #[test]
    fn test_missing_commit_defaults_to_unknown() {
        let json = r#"{"version":"v2","cleanVersion":"2.0.0","timestamp":"2024-01-01T00:00:00Z","buildDate":"","buildTime":""}"#;
        let metadata: VersionMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.commit, UNKNOWN_COMMIT);
    }

    #[test]
    fn test_record_flattens_metadata() {
        let json = r#"{
            "version": "v1.0.0",
            "cleanVersion": "1.0.0",
            "timestamp": "2024-01-01T00:00:00Z",
            "commit": "deadbeef",
            "buildDate": "2024/1/1",
            "buildTime": "00:00:00",
            "path": "1.0.0"
        }"#;
        let record: VersionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.clean_version(), "1.0.0");
        assert_eq!(record.path, "1.0.0");
        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["path"], "1.0.0");
        assert_eq!(back["commit"], "deadbeef");
    }
}
