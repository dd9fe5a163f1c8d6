use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::io::Write;
use std::path::PathBuf;
use verstage_config::Config;
use verstage_index::IndexBuilder;
use verstage_index::models::SimplifiedIndex;

#[derive(clap::Args)]
pub struct Args {
    /// Archive root (overrides `archive.root`).
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Print the catalog as the switcher would fetch it.
    #[arg(long)]
    json: bool,
}

/// Lists what an index rebuild would produce, without writing anything.
pub fn run(args: Args, config: &Config, out: &mut impl Write) -> Result<()> {
    let root = super::archive_root(args.root, config);
    let indexes = IndexBuilder::new(&root).or_raise(|| ErrorKind::Index)?.scan();
    if args.json {
        let catalog = SimplifiedIndex::from(&indexes.full);
        let json = serde_json::to_string_pretty(&catalog).or_raise(|| ErrorKind::Output)?;
        return writeln!(out, "{json}").or_raise(|| ErrorKind::Output);
    }
    if indexes.full.is_empty() {
        return writeln!(out, "No versions archived in {}", root.display()).or_raise(|| ErrorKind::Output);
    }
    for (i, record) in indexes.full.versions.iter().enumerate() {
        let marker = if i == 0 { " (latest)" } else { "" };
        writeln!(
            out,
            "{:<16} {:<12} {} {} {}{marker}",
            record.version(),
            record.path,
            record.metadata.build_date,
            record.metadata.build_time,
            record.metadata.commit,
        )
        .or_raise(|| ErrorKind::Output)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use verstage_archive::Archiver;

    #[test]
    fn test_lists_newest_first_without_writing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let build = temp_dir.path().join("site");
        fs::create_dir_all(&build).unwrap();
        fs::write(build.join("index.html"), "").unwrap();
        let root = temp_dir.path().join("versions");
        let archiver = Archiver::new(&root).with_commit(Some("abc"));
        archiver.archive("v1.2.0", None, &build).unwrap();
        archiver.archive("v1.10.0", None, &build).unwrap();

        let mut out = Vec::new();
        run(Args { root: Some(root.clone()), json: false }, &Config::default(), &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("v1.10.0") && lines[0].ends_with("abc (latest)"));
        assert!(lines[1].starts_with("v1.2.0"));
        assert!(!root.join("versions.json").exists());
    }

    #[test]
    fn test_json_output() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        run(Args { root: Some(temp_dir.path().join("missing")), json: true }, &Config::default(), &mut out).unwrap();
        let catalog: SimplifiedIndex = serde_json::from_slice(&out).unwrap();
        assert_eq!(catalog, SimplifiedIndex::default());
    }
}
