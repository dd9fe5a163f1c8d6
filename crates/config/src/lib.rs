//! Layered configuration for verstage.
//!
//! Sources are merged in increasing order of precedence:
//!
//! 1. built-in defaults,
//! 2. `config.toml` in the user's configuration directory,
//! 3. an explicit `--config` file, or else `verstage.{toml,yaml,json}` found
//!    in the working directory,
//! 4. `GITHUB_SHA` (as `archive.commit`),
//! 5. `VERSTAGE_*` environment variables, with `__` separating sections
//!    (`VERSTAGE_ARCHIVE__ROOT=public/versions`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APPLICATION: &str = "verstage";
const ENV_PREFIX: &str = "VERSTAGE_";
const LOCAL_FILES: &[&str] = &["verstage.toml", "verstage.yaml", "verstage.yml", "verstage.json"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub archive: ArchiveConfig,
    pub index: IndexConfig,
    pub switcher: SwitcherConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Directory holding one subdirectory per archived version.
    pub root: PathBuf,
    /// File and directory names never copied from the build directory.
    pub exclude: Vec<String>,
    /// Replace an already-archived version instead of refusing.
    pub force: bool,
    /// Absolute URL prefix to rewrite in archived HTML (`/my-project/`).
    /// When unset, prefixes are detected from the HTML itself.
    pub path_prefix: Option<String>,
    /// Rewrite absolute asset paths in archived HTML files.
    pub rewrite_paths: bool,
    /// Write the switcher injector script into each version directory.
    pub inject: bool,
    /// Source-control identifier recorded in the version metadata.
    pub commit: Option<String>,
}
impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("archive/versions"),
            exclude: ["archive", "node_modules", ".git", ".github", ".version-archive-tools", "dist", "build"]
                .map(String::from)
                .to_vec(),
            force: false,
            path_prefix: None,
            rewrite_paths: true,
            inject: true,
            commit: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Title of the generated landing page.
    pub title: String,
}
impl Default for IndexConfig {
    fn default() -> Self {
        Self { title: "Version Archive".to_string() }
    }
}

/// How the switcher takes a visitor to another version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    /// Leave the current page for the selected version's directory.
    #[default]
    Redirect,
    /// Load the selected version into an embedded frame.
    Embed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitcherConfig {
    /// Locations of the simplified index, tried in order.
    pub catalog: Vec<String>,
    pub mode: NavigationMode,
    /// Also match search queries against build dates.
    pub match_build_date: bool,
}
impl Default for SwitcherConfig {
    fn default() -> Self {
        Self {
            catalog: vec!["/versions.json".to_string(), "../versions.json".to_string()],
            mode: NavigationMode::Redirect,
            match_build_date: false,
        }
    }
}

impl Config {
    /// Loads configuration from every source, optionally with an explicit
    /// configuration file taking the place of the local ones.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let figment = Self::figment(explicit)?;
        let config: Self = figment.extract().or_raise(|| ErrorKind::Extract)?;
        config.validate()?;
        tracing::debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// The merged [`Figment`] before extraction, exposed for callers that
    /// want to layer additional providers.
    pub fn figment(explicit: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(dirs) = ProjectDirs::from("", "", APPLICATION) {
            figment = figment.merge(Toml::file(dirs.config_dir().join("config.toml")));
        }
        figment = match explicit {
            Some(path) => {
                if !path.is_file() {
                    exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
                }
                merge_file(figment, path)?
            },
            None => LOCAL_FILES.iter().try_fold(figment, |f, name| merge_file(f, Path::new(name)))?,
        };
        Ok(figment
            .merge(Env::raw().only(&["GITHUB_SHA"]).map(|_| "archive.commit".into()))
            .merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    pub fn validate(&self) -> Result<()> {
        if self.archive.root.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Invalid { field: "archive.root", reason: "must not be empty" });
        }
        if self.switcher.catalog.iter().all(|c| c.trim().is_empty()) {
            exn::bail!(ErrorKind::Invalid { field: "switcher.catalog", reason: "at least one location is required" });
        }
        if self.archive.path_prefix.as_deref().is_some_and(|p| p.trim_matches('/').is_empty()) {
            exn::bail!(ErrorKind::Invalid { field: "archive.path_prefix", reason: "must name a directory" });
        }
        Ok(())
    }
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    Ok(match extension.as_deref() {
        Some("toml") => figment.merge(Toml::file(path)),
        Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
        Some("json") => figment.merge(Json::file(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.archive.root, PathBuf::from("archive/versions"));
        assert!(config.archive.exclude.iter().any(|e| e == "node_modules"));
        assert_eq!(config.switcher.mode, NavigationMode::Redirect);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_local_file_and_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "verstage.toml",
                r#"
                [archive]
                root = "public/versions"
                force = true

                [switcher]
                mode = "embed"
                "#,
            )?;
            jail.set_env("VERSTAGE_INDEX__TITLE", "Docs Archive");
            jail.set_env("VERSTAGE_ARCHIVE__FORCE", "false");
            let config = Config::load(None).unwrap();
            assert_eq!(config.archive.root, PathBuf::from("public/versions"));
            assert!(!config.archive.force);
            assert_eq!(config.index.title, "Docs Archive");
            assert_eq!(config.switcher.mode, NavigationMode::Embed);
            // Untouched values keep their defaults.
            assert!(config.archive.inject);
            Ok(())
        });
    }

    #[test]
    fn test_github_sha_becomes_commit() {
        Jail::expect_with(|jail| {
            jail.set_env("GITHUB_SHA", "0123abcd");
            assert_eq!(Config::load(None).unwrap().archive.commit.as_deref(), Some("0123abcd"));
            jail.set_env("VERSTAGE_ARCHIVE__COMMIT", "override");
            assert_eq!(Config::load(None).unwrap().archive.commit.as_deref(), Some("override"));
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.json", r#"{"switcher": {"catalog": ["/docs/versions.json"]}}"#)?;
            let config = Config::load(Some(Path::new("custom.json"))).unwrap();
            assert_eq!(config.switcher.catalog, ["/docs/versions.json"]);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[test]
    fn test_unsupported_format() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.ini");
        std::fs::write(&path, "root = x").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnsupportedFormat(_)));
    }

    #[test]
    fn test_validation_rejects_empty_catalog() {
        let mut config = Config::default();
        config.switcher.catalog = vec![" ".to_string()];
        let err = config.validate().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid { field: "switcher.catalog", .. }));
    }
}
