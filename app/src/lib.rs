pub mod audit;
pub mod report;

/// Common types, importable with `use app::prelude::*`.
pub mod prelude {
    pub use crate::audit::{
        audit, AccessEvaluator, AccessResult, AuditConfig, AuditObserver, AuditParams,
        AuditSummary, Auditor, ExclusionSet, FileCandidate, PathFilter, RootReport,
    };
    pub use crate::report::{ReportConfig, ReportSink, SinkManager};
}
