use std::path::Path;

use storage::{normalize_path, LocalStorage};

use super::evaluator::AccessEvaluator;
use super::observer::AuditObserver;
use super::{AuditConfig, FileCandidate};

/// Enumerate the files under `root` that survive filtering and, in stealth
/// mode, the strict access gate.
///
/// Nothing found during the walk aborts it: unreadable entries, excluded
/// paths and inaccessible files are all just dropped.
pub fn traverse(
    root: &Path, config: &AuditConfig, evaluator: &AccessEvaluator, observer: &dyn AuditObserver,
) -> Vec<FileCandidate> {
    let storage = LocalStorage::new(root).follow_links(config.follow_links);
    let mut accepted = Vec::new();

    for path in storage.files() {
        let path = match normalize_path(&path) {
            Ok(path) => path,
            Err(e) => {
                log::trace!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };
        let candidate = FileCandidate::new(path);

        if !config.filter.include(&candidate, observer) {
            continue;
        }

        if config.stealth && !evaluator.is_accessible(candidate.path()) {
            continue;
        }

        observer.on_included(candidate.path());
        accepted.push(candidate);
    }

    accepted
}
