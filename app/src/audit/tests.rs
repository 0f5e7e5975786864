use super::*;
use crate::report::{ReportSink, SinkManager};
use std::collections::HashMap;
use std::fs;
use std::sync::Mutex;
use storage::{AccessControlList, AccessRule, AclError, AclSource, Identity, Principal, Rights};
use tempfile::tempdir;

const ME: u32 = 1000;

/// ACLs keyed by file name; unknown files get an empty list.
#[derive(Default)]
struct FakeAclSource {
    acls: HashMap<String, AccessControlList>,
    failing: Vec<String>,
}

impl FakeAclSource {
    fn with(mut self, name: &str, rules: Vec<AccessRule>) -> Self {
        self.acls.insert(name.to_string(), AccessControlList::new(rules));
        self
    }

    fn failing(mut self, name: &str) -> Self {
        self.failing.push(name.to_string());
        self
    }
}

impl AclSource for FakeAclSource {
    fn access_control_list(&self, path: &Path) -> std::result::Result<AccessControlList, AclError> {
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        if self.failing.contains(&name) {
            return Err(AclError::PermissionDenied(path.to_path_buf()));
        }
        Ok(self.acls.get(&name).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
struct RecordingObserver {
    excluded: Mutex<Vec<PathBuf>>,
    included: Mutex<Vec<PathBuf>>,
    errors: Mutex<Vec<PathBuf>>,
}

impl AuditObserver for RecordingObserver {
    fn on_excluded(&self, path: &Path) {
        self.excluded.lock().unwrap().push(path.to_path_buf());
    }

    fn on_included(&self, path: &Path) {
        self.included.lock().unwrap().push(path.to_path_buf());
    }

    fn on_error(&self, path: &Path, _error: &AclError) {
        self.errors.lock().unwrap().push(path.to_path_buf());
    }
}

/// Collects every report it is handed.
struct RecordingSink {
    reports: Arc<Mutex<Vec<RootReport>>>,
}

#[async_trait::async_trait]
impl ReportSink for RecordingSink {
    async fn write(&mut self, report: &RootReport) -> Result<()> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording_sink"
    }
}

fn auditor(params: &AuditParams, source: FakeAclSource, observer: Arc<RecordingObserver>) -> Auditor {
    let evaluator = AccessEvaluator::new(Arc::new(source), Arc::new(Principal::new(ME, [ME])));
    Auditor::new(AuditConfig::from_params(params).unwrap(), evaluator, observer)
}

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"x").unwrap();
}

fn names(candidates: &[FileCandidate]) -> Vec<String> {
    candidates.iter().map(|c| c.file_name().into_owned()).collect()
}

#[test]
fn test_extension_keeps_leading_dot() {
    assert_eq!(FileCandidate::new("/a/b/report.TXT").extension().as_deref(), Some(".TXT"));
    assert_eq!(FileCandidate::new("/a/b/archive.tar.gz").extension().as_deref(), Some(".gz"));
    assert_eq!(FileCandidate::new("/home/u/.bashrc").extension().as_deref(), Some(".bashrc"));
    assert_eq!(FileCandidate::new("/a/b/Makefile").extension(), None);
    assert_eq!(FileCandidate::new("/a/b/odd.").extension(), None);
}

#[test]
fn test_only_matching_extension_with_rights_is_reported() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("a.txt"));
    touch(&dir.path().join("b.log"));

    let source = FakeAclSource::default()
        .with("a.txt", vec![AccessRule::allow(Identity::User(ME), Rights::READ)])
        .with("b.log", vec![AccessRule::deny(Identity::User(ME), Rights::READ)]);
    let params = AuditParams {
        extensions: vec!["txt".to_string()],
        ..Default::default()
    };

    let report = auditor(&params, source, Arc::default())
        .audit_root(&dir.path().to_string_lossy())
        .unwrap();

    assert_eq!(report.files_found, 1);
    assert_eq!(
        report.results,
        vec![AccessResult {
            path: dir.path().join("a.txt"),
            can_read: true,
            can_write: false,
        }]
    );
}

#[test]
fn test_excluded_subdirectory_is_never_yielded() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("keep/x.txt"));
    touch(&root.join("skip/y.txt"));
    touch(&root.join("skip/deeper/z.txt"));

    let params = AuditParams {
        // differently cased and with a dot segment, both normalized away
        exclude: vec![root.join("keep/../SKIP").to_string_lossy().to_string()],
        ..Default::default()
    };
    let observer = Arc::new(RecordingObserver::default());
    let auditor = auditor(&params, FakeAclSource::default(), observer.clone());

    let found = traverse(root, &auditor.config, &auditor.evaluator, observer.as_ref());

    assert_eq!(names(&found), ["x.txt"]);
    assert_eq!(observer.excluded.lock().unwrap().len(), 2);
    assert_eq!(*observer.included.lock().unwrap(), vec![root.join("keep/x.txt")]);
}

#[test]
fn test_stealth_drops_read_denied_files_during_traversal() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("denied_shared.txt"));
    touch(&root.join("denied_only.txt"));
    touch(&root.join("open.txt"));

    let source = || {
        FakeAclSource::default()
            .with(
                "denied_shared.txt",
                vec![
                    AccessRule::deny(Identity::User(ME), Rights::READ),
                    AccessRule::allow(Identity::Group(500), Rights::READ | Rights::WRITE),
                ],
            )
            .with("denied_only.txt", vec![AccessRule::deny(Identity::User(ME), Rights::READ)])
            .with("open.txt", vec![AccessRule::allow(Identity::Everyone, Rights::READ)])
    };

    let stealth = AuditParams {
        stealth: true,
        ..Default::default()
    };
    let stealthy = auditor(&stealth, source(), Arc::default());
    let found = traverse(root, &stealthy.config, &stealthy.evaluator, &NullObserver);
    assert_eq!(names(&found), ["open.txt"]);

    let loud = auditor(&AuditParams::default(), source(), Arc::default());
    let found = traverse(root, &loud.config, &loud.evaluator, &NullObserver);
    assert_eq!(names(&found), ["denied_only.txt", "denied_shared.txt", "open.txt"]);

    // denied_only has no Allow rule at all, so only the aggregate pass drops it
    let reported: Vec<_> = loud.assess(&found).into_iter().map(|r| r.path).collect();
    assert_eq!(reported, vec![root.join("denied_shared.txt"), root.join("open.txt")]);
}

#[test]
fn test_acl_failure_is_contained_to_one_file() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("a_ok.txt"));
    touch(&root.join("b_broken.txt"));
    touch(&root.join("c_ok.txt"));

    let source = FakeAclSource::default()
        .with("a_ok.txt", vec![AccessRule::allow(Identity::Everyone, Rights::READ)])
        .with("c_ok.txt", vec![AccessRule::allow(Identity::Everyone, Rights::WRITE)])
        .failing("b_broken.txt");
    let observer = Arc::new(RecordingObserver::default());

    let report = auditor(&AuditParams::default(), source, observer.clone())
        .audit_root(&root.to_string_lossy())
        .unwrap();

    assert_eq!(report.files_found, 3);
    let reported: Vec<_> = report.results.iter().map(|r| r.path.clone()).collect();
    assert_eq!(reported, vec![root.join("a_ok.txt"), root.join("c_ok.txt")]);
    assert_eq!(*observer.errors.lock().unwrap(), vec![root.join("b_broken.txt")]);
}

#[test]
fn test_acl_failure_under_stealth_fails_closed_without_diagnostic() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("broken.txt"));

    let params = AuditParams {
        stealth: true,
        ..Default::default()
    };
    let observer = Arc::new(RecordingObserver::default());
    let report = auditor(&params, FakeAclSource::default().failing("broken.txt"), observer.clone())
        .audit_root(&dir.path().to_string_lossy())
        .unwrap();

    assert_eq!(report.files_found, 0);
    assert!(observer.errors.lock().unwrap().is_empty());
}

#[test]
fn test_file_without_rules_passes_stealth_but_is_not_reported() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("bare.txt"));

    let params = AuditParams {
        stealth: true,
        ..Default::default()
    };
    let report = auditor(&params, FakeAclSource::default(), Arc::default())
        .audit_root(&dir.path().to_string_lossy())
        .unwrap();

    assert_eq!(report.files_found, 1);
    assert!(report.results.is_empty());
}

#[test]
fn test_traversal_is_idempotent() {
    let dir = tempdir().unwrap();
    for name in ["b/2.txt", "a/1.txt", "c.txt", "a/z/3.txt"] {
        touch(&dir.path().join(name));
    }
    let auditor = auditor(&AuditParams::default(), FakeAclSource::default(), Arc::default());

    let first = traverse(dir.path(), &auditor.config, &auditor.evaluator, &NullObserver);
    let second = traverse(dir.path(), &auditor.config, &auditor.evaluator, &NullObserver);

    assert_eq!(first.len(), 4);
    assert_eq!(first, second);
}

#[test]
fn test_assess_deduplicates_by_path() {
    let source = FakeAclSource::default().with("a.txt", vec![AccessRule::allow(Identity::Everyone, Rights::READ)]);
    let auditor = auditor(&AuditParams::default(), source, Arc::default());
    let candidate = FileCandidate::new("/virtual/a.txt");

    let results = auditor.assess(&[candidate.clone(), candidate.clone(), candidate]);

    assert_eq!(results.len(), 1);
}

#[test]
fn test_missing_root_is_reported_as_root_missing() {
    let auditor = auditor(&AuditParams::default(), FakeAclSource::default(), Arc::default());

    let err = auditor.audit_root("/no/such/permscan/root").unwrap_err();

    assert!(matches!(err, Error::RootMissing(ref root) if root == "/no/such/permscan/root"));
}

#[tokio::test]
async fn test_run_publishes_each_root_and_skips_missing_ones() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    touch(&first.path().join("one.txt"));
    touch(&second.path().join("two.txt"));
    touch(&second.path().join("three.txt"));

    let source = FakeAclSource::default()
        .with("one.txt", vec![AccessRule::allow(Identity::Everyone, Rights::READ)])
        .with("two.txt", vec![AccessRule::allow(Identity::Group(7), Rights::WRITE)]);
    let auditor = auditor(&AuditParams::default(), source, Arc::default());

    let reports = Arc::new(Mutex::new(Vec::new()));
    let mut sinks = SinkManager::new();
    sinks.add_sink(Box::new(RecordingSink {
        reports: reports.clone(),
    }));

    let roots = vec![
        first.path().to_string_lossy().to_string(),
        "/no/such/permscan/root".to_string(),
        second.path().to_string_lossy().to_string(),
    ];
    let summary = auditor.run(&roots, &mut sinks).await.unwrap();

    assert_eq!(
        summary,
        AuditSummary {
            roots_audited: 2,
            roots_missing: vec!["/no/such/permscan/root".to_string()],
            files_found: 3,
            files_reported: 2,
        }
    );

    let reports = reports.lock().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].root, roots[0]);
    assert_eq!(reports[1].root, roots[2]);
    assert_eq!(reports[1].results.len(), 1);
    assert!(reports[1].results[0].can_write);
}

#[tokio::test]
async fn test_run_with_suppressed_sinks_still_audits() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("one.txt"));
    let source = FakeAclSource::default().with("one.txt", vec![AccessRule::allow(Identity::Everyone, Rights::READ)]);
    let auditor = auditor(&AuditParams::default(), source, Arc::default());

    let mut sinks = SinkManager::with_config(&crate::report::ReportConfig::suppressed());
    let summary = auditor
        .run(&[dir.path().to_string_lossy().to_string()], &mut sinks)
        .await
        .unwrap();

    assert_eq!(sinks.get_sink_count(), 0);
    assert_eq!(summary.files_reported, 1);
}
