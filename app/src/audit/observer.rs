use std::path::Path;

use storage::AclError;

/// Per-file diagnostics emitted during an audit. Never changes control flow.
pub trait AuditObserver: Send + Sync {
    fn on_excluded(&self, path: &Path);
    fn on_included(&self, path: &Path);
    fn on_error(&self, path: &Path, error: &AclError);
}

/// Routes audit diagnostics to the `log` facade.
///
/// Inclusion and exclusion lines are only written in verbose mode; ACL
/// failures always produce one line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver {
    verbose: bool,
}

impl LogObserver {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl AuditObserver for LogObserver {
    fn on_excluded(&self, path: &Path) {
        if self.verbose {
            log::info!("Excluding file: {}", path.display());
        }
    }

    fn on_included(&self, path: &Path) {
        if self.verbose {
            log::info!("Enumerating file: {}", path.display());
        }
    }

    fn on_error(&self, path: &Path, error: &AclError) {
        match error {
            AclError::PermissionDenied(_) => {
                log::error!(
                    "Access denied when processing security information for file: {}",
                    path.display()
                )
            }
            other => log::error!(
                "An error occurred while processing file: {}: {}",
                path.display(),
                other
            ),
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl AuditObserver for NullObserver {
    fn on_excluded(&self, _path: &Path) {}
    fn on_included(&self, _path: &Path) {}
    fn on_error(&self, _path: &Path, _error: &AclError) {}
}
