use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs;
use std::path::Path;

/// Recursively copies `source` into `target`, returning the number of files
/// copied.
///
/// Entries whose file name is in `exclude` are skipped at every depth, as is
/// `skip` (the archive root, when it lives inside the build directory).
/// Symlinks are followed.
pub(crate) fn copy_tree(source: &Path, target: &Path, exclude: &[String], skip: Option<&Path>) -> Result<usize> {
    fs::create_dir_all(target).or_raise(|| ErrorKind::Io(target.to_path_buf()))?;
    let mut copied = 0;
    for entry in fs::read_dir(source).or_raise(|| ErrorKind::Io(source.to_path_buf()))? {
        let entry = entry.or_raise(|| ErrorKind::Io(source.to_path_buf()))?;
        let name = entry.file_name();
        let path = entry.path();
        if exclude.iter().any(|e| name.as_os_str() == e.as_str()) || skip.is_some_and(|s| s == path) {
            tracing::debug!(path = %path.display(), "Skipping excluded entry");
            continue;
        }
        let destination = target.join(&name);
        let metadata = fs::metadata(&path).or_raise(|| ErrorKind::Io(path.clone()))?;
        if metadata.is_dir() {
            copied += copy_tree(&path, &destination, exclude, skip)?;
        } else {
            fs::copy(&path, &destination).or_raise(|| ErrorKind::Io(path.clone()))?;
            copied += 1;
        }
    }
    Ok(copied)
}
