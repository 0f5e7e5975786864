use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use storage::{PosixAclSource, PrincipalProvider, ProcessPrincipalProvider};
use utils::error::{Error, Result};

use crate::report::{ReportConfig, SinkManager};

pub mod evaluator;
pub mod filter;
pub mod observer;
mod walker;

#[cfg(test)]
mod tests;

pub use evaluator::{can_access, effective_rights, AccessEvaluator, AccessResult, EffectiveRights};
pub use filter::{ExclusionSet, PathFilter};
pub use observer::{AuditObserver, LogObserver, NullObserver};
pub use walker::traverse;

// ============================================================================
// Types
// ============================================================================

/// Audit parameters as collected by the CLI, already merged with configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditParams {
    /// Root directories, audited in order.
    pub directories: Vec<String>,

    /// Path prefixes never descended into.
    pub exclude: Vec<String>,

    /// Extension allow-list (`txt` or `.txt`).
    pub extensions: Vec<String>,

    /// File name substrings.
    pub names: Vec<String>,

    pub verbose: bool,
    pub suppress: bool,

    /// Drop files the current principal cannot read during traversal.
    pub stealth: bool,

    pub follow_links: bool,
}

/// Immutable per-run configuration shared by every root.
#[derive(Debug, Clone, Default)]
pub struct AuditConfig {
    pub filter: PathFilter,
    pub stealth: bool,
    pub follow_links: bool,
}

impl AuditConfig {
    pub fn from_params(params: &AuditParams) -> Result<Self> {
        let exclusions = ExclusionSet::new(&params.exclude)?;
        Ok(Self {
            filter: PathFilter::new(exclusions, &params.extensions, &params.names),
            stealth: params.stealth,
            follow_links: params.follow_links,
        })
    }
}

/// A normalized absolute path produced by the walker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FileCandidate {
    path: PathBuf,
}

impl FileCandidate {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }

    pub fn file_name(&self) -> Cow<'_, str> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default()
    }

    /// Everything from the last `.` of the file name, dot included.
    ///
    /// Dot files count as all extension (`.bashrc`); a trailing dot means none.
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(pos) if pos + 1 < name.len() => Some(name[pos..].to_string()),
            _ => None,
        }
    }
}

/// Everything the sinks receive for one root.
#[derive(Debug, Clone, Serialize)]
pub struct RootReport {
    /// The root exactly as given on the command line.
    pub root: String,
    /// Files accepted by the walker.
    pub files_found: usize,
    /// Path-deduplicated results with at least one granted right, in walk order.
    pub results: Vec<AccessResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub roots_audited: usize,
    pub roots_missing: Vec<String>,
    pub files_found: usize,
    pub files_reported: usize,
}

// ============================================================================
// Orchestration
// ============================================================================

/// Runs the walk and the aggregate pass for each root.
#[derive(Clone)]
pub struct Auditor {
    config: Arc<AuditConfig>,
    evaluator: AccessEvaluator,
    observer: Arc<dyn AuditObserver>,
}

impl Auditor {
    pub fn new(config: AuditConfig, evaluator: AccessEvaluator, observer: Arc<dyn AuditObserver>) -> Self {
        Self {
            config: Arc::new(config),
            evaluator,
            observer,
        }
    }

    /// Aggregate pass over accepted files.
    ///
    /// Stealth mode re-applies the strict gate since the file may have changed
    /// since it was enumerated.
    pub fn assess(&self, candidates: &[FileCandidate]) -> Vec<AccessResult> {
        let mut seen = HashSet::new();
        candidates
            .iter()
            .filter(|candidate| seen.insert(candidate.path().to_path_buf()))
            .filter(|candidate| !self.config.stealth || self.evaluator.is_accessible(candidate.path()))
            .map(|candidate| self.evaluator.evaluate(candidate.path(), self.observer.as_ref()))
            .filter(AccessResult::is_reportable)
            .collect()
    }

    /// Walk and evaluate one root synchronously.
    pub fn audit_root(&self, root: &str) -> Result<RootReport> {
        let root_path = Path::new(root);
        if !root_path.is_dir() {
            return Err(Error::RootMissing(root.to_string()));
        }

        let candidates = traverse(root_path, &self.config, &self.evaluator, self.observer.as_ref());
        log::info!("Found {} candidate files in {}", candidates.len(), root);

        let results = self.assess(&candidates);

        Ok(RootReport {
            root: root.to_string(),
            files_found: candidates.len(),
            results,
        })
    }

    /// Audit each root in turn and publish its report before starting the next.
    ///
    /// A missing root is logged and skipped; any other failure ends the run.
    pub async fn run(&self, roots: &[String], sinks: &mut SinkManager) -> Result<AuditSummary> {
        let mut summary = AuditSummary::default();

        for root in roots {
            let auditor = self.clone();
            let task_root = root.clone();
            let outcome = tokio::task::spawn_blocking(move || auditor.audit_root(&task_root))
                .await
                .map_err(|e| Error::with_source("Audit task failed", Box::new(e)))?;

            match outcome {
                Ok(report) => {
                    summary.roots_audited += 1;
                    summary.files_found += report.files_found;
                    summary.files_reported += report.results.len();
                    sinks.publish(&report).await?;
                }
                Err(e) if !e.is_fatal() => {
                    log::error!("{}", e);
                    summary.roots_missing.push(root.clone());
                }
                Err(e) => return Err(e),
            }
        }

        log::info!(
            "Audit finished: {} roots audited, {} missing, {} files found, {} reported",
            summary.roots_audited,
            summary.roots_missing.len(),
            summary.files_found,
            summary.files_reported
        );

        Ok(summary)
    }
}

/// Main audit entry point: resolve the principal once, then audit every root
/// with the platform ACL source.
pub async fn audit(params: AuditParams, report_config: ReportConfig) -> Result<AuditSummary> {
    log::info!("Starting audit with params: {:?}", params);

    let config = AuditConfig::from_params(&params)?;
    let exclusions = config.filter.exclusions();
    if !exclusions.is_empty() {
        log::info!("Skipping {} excluded path prefixes", exclusions.len());
    }

    let principal = ProcessPrincipalProvider.current().map_err(|e| {
        utils::error::Error::with_source("Failed to resolve current principal", Box::new(e))
    })?;
    log::info!("Evaluating access as {}", principal);

    let evaluator = AccessEvaluator::new(Arc::new(PosixAclSource), Arc::new(principal));
    let observer: Arc<dyn AuditObserver> = Arc::new(LogObserver::new(params.verbose));
    let auditor = Auditor::new(config, evaluator, observer);

    let mut sinks = SinkManager::with_config(&report_config);
    auditor.run(&params.directories, &mut sinks).await
}
