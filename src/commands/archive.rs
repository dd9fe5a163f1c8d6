use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::io::Write;
use std::path::PathBuf;
use verstage_archive::Archiver;
use verstage_config::Config;

#[derive(clap::Args)]
pub struct Args {
    /// Display label of the version (`v1.2.0`).
    version: String,

    /// Version naming the archive directory. Defaults to VERSION without its
    /// `v` prefix.
    #[arg(long)]
    clean_version: Option<String>,

    /// Build output to archive.
    #[arg(short, long)]
    build_dir: PathBuf,

    /// Archive root (overrides `archive.root`).
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Replace the version if it is already archived.
    #[arg(short, long)]
    force: bool,

    /// Absolute URL prefix to rewrite (`/my-project/`).
    #[arg(long)]
    path_prefix: Option<String>,

    /// Leave absolute paths in archived HTML untouched.
    #[arg(long)]
    no_rewrite: bool,

    /// Don't write the switcher injector script.
    #[arg(long)]
    no_inject: bool,

    /// Don't rebuild the index afterwards.
    #[arg(long)]
    no_index: bool,
}

pub fn run(args: Args, config: &Config, out: &mut impl Write) -> Result<()> {
    let root = super::archive_root(args.root, config);
    let archiver = Archiver::new(&root)
        .with_exclude(config.archive.exclude.iter().cloned())
        .with_force(args.force || config.archive.force)
        .with_path_prefix(args.path_prefix.or_else(|| config.archive.path_prefix.clone()))
        .with_rewrite(!args.no_rewrite && config.archive.rewrite_paths)
        .with_inject(!args.no_inject && config.archive.inject)
        .with_commit(config.archive.commit.clone());
    let archived = archiver
        .archive(&args.version, args.clean_version.as_deref(), &args.build_dir)
        .or_raise(|| ErrorKind::Archive)?;
    writeln!(
        out,
        "Archived {} ({} files) to {}",
        archived.metadata.version,
        archived.files,
        archived.directory.display()
    )
    .or_raise(|| ErrorKind::Output)?;
    if archived.rewritten.references > 0 {
        writeln!(
            out,
            "Rewrote {} absolute paths in {} HTML files",
            archived.rewritten.references, archived.rewritten.files
        )
        .or_raise(|| ErrorKind::Output)?;
    }

    if !args.no_index {
        let indexes = super::index_builder(&root, config).and_then(|b| b.rebuild()).or_raise(|| ErrorKind::Index)?;
        writeln!(out, "Indexed {} versions", indexes.full.count).or_raise(|| ErrorKind::Output)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use std::ops::Deref;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        args: Args,
    }

    fn args(argv: &[&str]) -> Args {
        Cli::try_parse_from(std::iter::once("archive").chain(argv.iter().copied())).unwrap().args
    }

    #[test]
    fn test_archive_and_index() {
        let temp_dir = tempfile::tempdir().unwrap();
        let build = temp_dir.path().join("dist");
        let root = temp_dir.path().join("versions");
        fs::create_dir_all(&build).unwrap();
        fs::write(build.join("index.html"), "<h1>hello</h1>").unwrap();
        let build_arg = build.to_str().unwrap();
        let root_arg = root.to_str().unwrap();

        let mut out = Vec::new();
        run(args(&["v1.0.0", "-b", build_arg, "-r", root_arg]), &Config::default(), &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Archived v1.0.0 (1 files)"));
        assert!(output.contains("Indexed 1 versions"));
        assert!(root.join("1.0.0/index.html").exists());
        assert!(root.join("versions.json").exists());
        assert!(root.join("index.html").exists());

        let err = run(args(&["v1.0.0", "-b", build_arg, "-r", root_arg]), &Config::default(), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err.deref(), ErrorKind::Archive));

        let mut config = Config::default();
        config.archive.force = true;
        run(args(&["v1.0.0", "-b", build_arg, "-r", root_arg, "--no-index"]), &config, &mut Vec::new()).unwrap();
    }
}
