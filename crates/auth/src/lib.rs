//! `userdir-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: credential
//! hashing, token issuance/verification and the authorization policy live
//! here; wiring them to requests and accounts is the caller's job.

pub mod password;
pub mod policy;
pub mod role;
pub mod token;

pub use password::{HashError, PasswordHasher};
pub use policy::{Action, PolicyError, authorize};
pub use role::Role;
pub use token::{Claims, IssuedToken, TokenError, TokenService};
