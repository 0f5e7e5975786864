pub mod acl;
pub mod file;
pub mod principal;

pub use acl::{AccessControlList, AccessRule, AclError, AclSource, Effect, PosixAclSource, Rights};
pub use file::{normalize_path, LocalStorage};
pub use principal::{Identity, Principal, PrincipalError, PrincipalProvider, ProcessPrincipalProvider};
