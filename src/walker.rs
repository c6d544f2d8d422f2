use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Lazily yields every regular file under `root`.
///
/// The walk is depth-first with entries sorted by file name, so two walks
/// over an unchanged tree produce the same order. No ignore files are
/// honoured, hidden entries are included, and symbolic links are neither
/// followed nor yielded.
///
/// A directory that cannot be listed is skipped silently (logged at debug
/// level); the rest of the tree is still walked.
pub fn regular_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    let mut walker = WalkBuilder::new(root);
    walker
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    walker.build().filter_map(|entry| match entry {
        Ok(entry) => {
            let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
            is_file.then(|| entry.into_path())
        }
        Err(e) => {
            debug!("Skipping unreadable entry: {}", e);
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_walk_is_exhaustive_and_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("b/nested")).unwrap();
        fs::write(root.join("c.txt"), "").unwrap();
        fs::write(root.join("a.txt"), "").unwrap();
        fs::write(root.join("b/nested/d.php"), "").unwrap();
        fs::write(root.join(".hidden"), "").unwrap();

        let files: Vec<PathBuf> = regular_files(root)
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            files,
            vec![
                PathBuf::from(".hidden"),
                PathBuf::from("a.txt"),
                PathBuf::from("b/nested/d.php"),
                PathBuf::from("c.txt"),
            ]
        );
    }

    #[test]
    fn test_ignore_files_are_not_honoured() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join(".gitignore"), "*.log\n").unwrap();
        fs::write(root.join(".ignore"), "*.log\n").unwrap();
        fs::write(root.join("app.log"), "").unwrap();

        let files: Vec<PathBuf> = regular_files(root).collect();
        assert!(files.contains(&root.join("app.log")));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_yielded() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("real.txt"), "").unwrap();
        std::os::unix::fs::symlink(root.join("real.txt"), root.join("link.txt")).unwrap();

        let files: Vec<PathBuf> = regular_files(root).collect();
        assert_eq!(files, vec![root.join("real.txt")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let locked = root.join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("inside.txt"), "").unwrap();
        fs::write(root.join("outside.txt"), "").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let enforced = fs::read_dir(&locked).is_err();
        let files: Vec<PathBuf> = regular_files(root).collect();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(files.contains(&root.join("outside.txt")));
        if enforced {
            assert_eq!(files, vec![root.join("outside.txt")]);
        }
    }
}
