//! Decision engine and collaborator contracts

pub mod authenticator;
pub mod directory;
pub mod policy;
pub mod validator;

pub use authenticator::SamlAuthenticator;
pub use directory::{DirectoryRecord, UserDirectory};
pub use policy::{
    DirectoryEntitlements, EarliestSessionExpiry, EntitlementPolicy, ExpirationPolicy,
    NameIdPrincipal, PrincipalPolicy,
};
pub use validator::ResponseValidator;
