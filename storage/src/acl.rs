//! Access control lists as seen by the audit.
//!
//! Rules are kept in the order the platform hands them out. Nothing here
//! reorders deny before allow or explicit before inherited; evaluation policy
//! lives with the caller.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::principal::Identity;

bitflags! {
    /// Rights carried by a rule. Only READ and WRITE drive decisions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Rights: u8 {
        const READ    = 0b0000_0001;
        const WRITE   = 0b0000_0010;
        const EXECUTE = 0b0000_0100;
    }
}

/// ACL access type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// One grant or denial on a file's ACL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    pub identity: Identity,
    pub rights: Rights,
    pub effect: Effect,
}

impl AccessRule {
    pub fn allow(identity: Identity, rights: Rights) -> Self {
        Self {
            identity,
            rights,
            effect: Effect::Allow,
        }
    }

    pub fn deny(identity: Identity, rights: Rights) -> Self {
        Self {
            identity,
            rights,
            effect: Effect::Deny,
        }
    }
}

/// Ordered snapshot of one file's rules. Fetched per file and never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlList {
    rules: Vec<AccessRule>,
}

impl AccessControlList {
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[AccessRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<AccessRule> for AccessControlList {
    fn from_iter<I: IntoIterator<Item = AccessRule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Failure to obtain a file's ACL.
#[derive(Error, Debug)]
pub enum AclError {
    #[error("Access denied reading security information for {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("ACL query not supported for {}", .0.display())]
    Unsupported(PathBuf),

    #[error("Failed to read security information for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AclError {
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => AclError::PermissionDenied(path.to_path_buf()),
            io::ErrorKind::NotFound => AclError::NotFound(path.to_path_buf()),
            io::ErrorKind::Unsupported => AclError::Unsupported(path.to_path_buf()),
            _ => AclError::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

/// Platform security-descriptor query.
pub trait AclSource: Send + Sync {
    fn access_control_list(&self, path: &Path) -> Result<AccessControlList, AclError>;
}

/// Translates POSIX mode bits into owner, group and other rules.
///
/// Each class yields an Allow rule for the bits it has and a Deny rule for the
/// bits it lacks, owner first. Evaluated first-match, this picks the same class
/// the kernel would.
#[derive(Debug, Default, Clone, Copy)]
pub struct PosixAclSource;

impl PosixAclSource {
    /// Build the rule list for a raw `st_mode`, owner and group.
    pub fn rules_from_mode(mode: u32, uid: u32, gid: u32) -> AccessControlList {
        let classes = [
            (Identity::User(uid), (mode >> 6) & 0o7),
            (Identity::Group(gid), (mode >> 3) & 0o7),
            (Identity::Everyone, mode & 0o7),
        ];

        let mut rules = Vec::with_capacity(6);
        for (identity, bits) in classes {
            let granted = rights_from_bits(bits);
            let missing = Rights::all().difference(granted);
            if !granted.is_empty() {
                rules.push(AccessRule::allow(identity, granted));
            }
            if !missing.is_empty() {
                rules.push(AccessRule::deny(identity, missing));
            }
        }
        AccessControlList::new(rules)
    }
}

fn rights_from_bits(bits: u32) -> Rights {
    let mut rights = Rights::empty();
    if bits & 0o4 != 0 {
        rights |= Rights::READ;
    }
    if bits & 0o2 != 0 {
        rights |= Rights::WRITE;
    }
    if bits & 0o1 != 0 {
        rights |= Rights::EXECUTE;
    }
    rights
}

#[cfg(unix)]
impl AclSource for PosixAclSource {
    fn access_control_list(&self, path: &Path) -> Result<AccessControlList, AclError> {
        use std::os::unix::fs::MetadataExt;

        let metadata = std::fs::metadata(path).map_err(|e| AclError::from_io(path, e))?;
        Ok(Self::rules_from_mode(
            metadata.mode(),
            metadata.uid(),
            metadata.gid(),
        ))
    }
}

#[cfg(not(unix))]
impl AclSource for PosixAclSource {
    fn access_control_list(&self, path: &Path) -> Result<AccessControlList, AclError> {
        Err(AclError::Unsupported(path.to_path_buf()))
    }
}
