use std::path::{Path, MAIN_SEPARATOR};

use storage::normalize_path;
use utils::error::Result;

use super::observer::AuditObserver;
use super::FileCandidate;

/// Normalized absolute path prefixes whose contents are never audited.
///
/// Matching is a case-insensitive string prefix test; there are no wildcards
/// and no component boundary check, so `/srv/data` also covers `/srv/database`.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    prefixes: Vec<String>,
}

impl ExclusionSet {
    /// Normalize every entry once. Blank entries are ignored.
    pub fn new<I, S>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut prefixes = Vec::new();
        for raw in paths {
            let raw = raw.as_ref().trim();
            if raw.is_empty() {
                continue;
            }
            let normalized = normalize_path(Path::new(raw)).map_err(|e| {
                utils::error::Error::with_source(
                    &format!("Failed to normalize exclusion path {}", raw),
                    Box::new(e),
                )
            })?;
            let mut prefix = normalized.to_string_lossy().to_lowercase();
            // A trailing separator limits the match to the directory's contents
            if (raw.ends_with('/') || raw.ends_with('\\')) && !prefix.ends_with(MAIN_SEPARATOR) {
                prefix.push(MAIN_SEPARATOR);
            }
            prefixes.push(prefix);
        }
        Ok(Self { prefixes })
    }

    pub fn matches(&self, path: &Path) -> bool {
        if self.is_empty() {
            return false;
        }
        let path = path.to_string_lossy().to_lowercase();
        self.prefixes.iter().any(|prefix| path.starts_with(prefix))
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

/// Decides which enumerated files are handed to the evaluator.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    exclusions: ExclusionSet,
    extensions: Vec<String>,
    names: Vec<String>,
}

impl PathFilter {
    /// `extensions` may be given with or without the leading dot.
    pub fn new<E, N>(exclusions: ExclusionSet, extensions: E, names: N) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .map(|e| format!(".{}", e))
            .collect();
        let names = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .collect();

        Self {
            exclusions,
            extensions,
            names,
        }
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    /// Exclusion first, then extension, then name.
    pub fn include(&self, candidate: &FileCandidate, observer: &dyn AuditObserver) -> bool {
        if self.is_excluded(candidate) {
            observer.on_excluded(candidate.path());
            return false;
        }
        self.matches_extension(candidate) && self.matches_name(candidate)
    }

    pub fn is_excluded(&self, candidate: &FileCandidate) -> bool {
        self.exclusions.matches(candidate.path())
    }

    pub fn matches_extension(&self, candidate: &FileCandidate) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        match candidate.extension() {
            Some(ext) => {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|wanted| *wanted == ext)
            }
            None => false,
        }
    }

    pub fn matches_name(&self, candidate: &FileCandidate) -> bool {
        if self.names.is_empty() {
            return true;
        }
        let name = candidate.file_name().to_lowercase();
        self.names.iter().any(|wanted| name.contains(wanted.as_str()))
    }
}
