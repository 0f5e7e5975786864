//! Security principal the audit runs on behalf of.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Identity referenced by an access rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Identity {
    User(u32),
    Group(u32),
    /// Matches every principal (POSIX "other").
    Everyone,
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::User(uid) => write!(f, "user:{}", uid),
            Identity::Group(gid) => write!(f, "group:{}", gid),
            Identity::Everyone => write!(f, "everyone"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PrincipalError {
    #[cfg(unix)]
    #[error("Failed to resolve current identity: {0}")]
    Lookup(#[from] nix::errno::Errno),

    #[error("Principal lookup is not supported on this platform")]
    Unsupported,
}

/// The current process identity plus the groups it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    name: Option<String>,
    uid: u32,
    groups: BTreeSet<u32>,
}

impl Principal {
    pub fn new(uid: u32, groups: impl IntoIterator<Item = u32>) -> Self {
        Self {
            name: None,
            uid,
            groups: groups.into_iter().collect(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn uid(&self) -> u32 {
        self.uid
    }

    pub fn groups(&self) -> impl Iterator<Item = u32> + '_ {
        self.groups.iter().copied()
    }

    /// Direct identity or group membership match.
    pub fn has_role(&self, identity: &Identity) -> bool {
        match identity {
            Identity::User(uid) => *uid == self.uid,
            Identity::Group(gid) => self.groups.contains(gid),
            Identity::Everyone => true,
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let groups: Vec<String> = self.groups.iter().map(|g| g.to_string()).collect();
        match &self.name {
            Some(name) => write!(f, "{} (uid={}, groups=[{}])", name, self.uid, groups.join(",")),
            None => write!(f, "uid={} (groups=[{}])", self.uid, groups.join(",")),
        }
    }
}

/// Supplies the principal once per run.
pub trait PrincipalProvider {
    fn current(&self) -> Result<Principal, PrincipalError>;
}

/// Reads the effective identity of this process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessPrincipalProvider;

#[cfg(unix)]
impl PrincipalProvider for ProcessPrincipalProvider {
    fn current(&self) -> Result<Principal, PrincipalError> {
        use nix::unistd::{getegid, geteuid, User};

        let uid = geteuid();
        let mut groups = vec![getegid().as_raw()];

        #[cfg(target_os = "linux")]
        groups.extend(nix::unistd::getgroups()?.into_iter().map(|g| g.as_raw()));

        let principal = Principal::new(uid.as_raw(), groups);

        // A uid without a passwd entry is still a valid principal.
        match User::from_uid(uid) {
            Ok(Some(user)) => Ok(principal.with_name(user.name)),
            Ok(None) => Ok(principal),
            Err(e) => {
                log::debug!("No passwd entry for uid {}: {}", uid, e);
                Ok(principal)
            }
        }
    }
}

#[cfg(not(unix))]
impl PrincipalProvider for ProcessPrincipalProvider {
    fn current(&self) -> Result<Principal, PrincipalError> {
        Err(PrincipalError::Unsupported)
    }
}
