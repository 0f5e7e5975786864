//! Access evaluation over an ACL snapshot.
//!
//! Two policies share the same input and deliberately disagree:
//!
//! * **strict** ([`can_access`]) walks the rules in order, looks only at rules
//!   naming the principal or one of its groups and carrying Read, and stops at
//!   the first one. No such rule means accessible. It gates traversal in
//!   stealth mode.
//! * **aggregate** ([`effective_rights`]) ORs together every Allow rule no
//!   matter whom it names and never looks at Deny rules. It answers "what does
//!   this ACL hand out to anyone" and feeds the report.
//!
//! Unifying the two would change which files are reported, so they stay apart.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use storage::{AccessControlList, AclError, AclSource, Effect, Principal, Rights};

use super::observer::AuditObserver;

/// Read/write capability granted by an ACL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EffectiveRights {
    pub can_read: bool,
    pub can_write: bool,
}

impl EffectiveRights {
    pub fn read_write(&self) -> bool {
        self.can_read && self.can_write
    }

    pub fn any(&self) -> bool {
        self.can_read || self.can_write
    }
}

/// Per-file outcome of the aggregate pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessResult {
    pub path: PathBuf,
    pub can_read: bool,
    pub can_write: bool,
}

impl AccessResult {
    pub fn new(path: impl Into<PathBuf>, rights: EffectiveRights) -> Self {
        Self {
            path: path.into(),
            can_read: rights.can_read,
            can_write: rights.can_write,
        }
    }

    /// Conjunction of the two columns, not an independent rule check.
    pub fn read_write(&self) -> bool {
        self.can_read && self.can_write
    }

    /// Only files with at least one granted right reach the report.
    pub fn is_reportable(&self) -> bool {
        self.can_read || self.can_write
    }
}

/// Strict policy: first principal-matching Read rule decides, default allow.
pub fn can_access(acl: &AccessControlList, principal: &Principal) -> bool {
    for rule in acl.rules() {
        if !principal.has_role(&rule.identity) || !rule.rights.contains(Rights::READ) {
            continue;
        }
        return match rule.effect {
            Effect::Allow => true,
            Effect::Deny => false,
        };
    }
    true
}

/// Aggregate policy: union of all Allow rules, identity ignored.
///
/// The principal is accepted so both policies share a signature; it does not
/// influence the result.
pub fn effective_rights(acl: &AccessControlList, _principal: &Principal) -> EffectiveRights {
    acl.rules()
        .iter()
        .filter(|rule| rule.effect == Effect::Allow)
        .fold(EffectiveRights::default(), |mut acc, rule| {
            acc.can_read |= rule.rights.contains(Rights::READ);
            acc.can_write |= rule.rights.contains(Rights::WRITE);
            acc
        })
}

/// Binds an ACL source to the run's principal.
#[derive(Clone)]
pub struct AccessEvaluator {
    source: Arc<dyn AclSource>,
    principal: Arc<Principal>,
}

impl AccessEvaluator {
    pub fn new(source: Arc<dyn AclSource>, principal: Arc<Principal>) -> Self {
        Self { source, principal }
    }

    /// Strict gate. An unreadable ACL counts as no access.
    pub fn is_accessible(&self, path: &Path) -> bool {
        match self.source.access_control_list(path) {
            Ok(acl) => can_access(&acl, &self.principal),
            Err(e) => {
                log::trace!("Treating {} as inaccessible: {}", path.display(), e);
                false
            }
        }
    }

    /// Aggregate rights, or the ACL failure.
    pub fn rights(&self, path: &Path) -> Result<EffectiveRights, AclError> {
        let acl = self.source.access_control_list(path)?;
        Ok(effective_rights(&acl, &self.principal))
    }

    /// Aggregate pass for one file. A failed ACL query is reported to the
    /// observer and yields no rights.
    pub fn evaluate(&self, path: &Path, observer: &dyn AuditObserver) -> AccessResult {
        let rights = self.rights(path).unwrap_or_else(|e| {
            observer.on_error(path, &e);
            EffectiveRights::default()
        });
        AccessResult::new(path, rights)
    }
}
