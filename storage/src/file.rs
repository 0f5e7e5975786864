use path_absolutize::Absolutize;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Absolute, lexically normalized form of `path`. Symlinks are not resolved.
pub fn normalize_path(path: &Path) -> io::Result<PathBuf> {
    Ok(path.absolutize()?.into_owned())
}

/// Local directory tree rooted at one audit root.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    follow_links: bool,
}

impl LocalStorage {
    /// Create new local storage instance
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_links: false,
        }
    }

    pub fn follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the root is an existing directory.
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Every non-directory entry below the root, depth first, siblings sorted by name.
    ///
    /// Entries that cannot be read are skipped: an unreadable directory simply
    /// contributes nothing.
    pub fn files(&self) -> impl Iterator<Item = PathBuf> {
        WalkDir::new(&self.root)
            .follow_links(self.follow_links)
            .max_open(100)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::trace!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| {
                let file_type = entry.file_type();
                file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
            })
            .map(walkdir::DirEntry::into_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_resolves_relative_and_dot_segments() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(normalize_path(Path::new("a/./b/../c.txt")).unwrap(), cwd.join("a/c.txt"));
        assert_eq!(
            normalize_path(Path::new("/srv/data/../logs")).unwrap(),
            PathBuf::from("/srv/logs")
        );
    }

    #[test]
    fn missing_root_does_not_exist() {
        assert!(!LocalStorage::new("/no/such/permscan/root").exists());
        assert_eq!(LocalStorage::new("/no/such/permscan/root").files().count(), 0);
    }
}
