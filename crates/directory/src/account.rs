//! The account record and its input/patch shapes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use userdir_auth::Role;
use userdir_core::AccountId;

/// The authoritative identity record.
///
/// # Invariants
/// - `id` is assigned at creation and never changes.
/// - `username` and `email` are each globally unique and non-empty.
/// - `password_hash` is never empty and never a raw password.
/// - Exactly one `role` per account.
///
/// Deliberately not `Serialize`: the HTTP layer builds redacted responses,
/// so the hash cannot leak through a careless `Json(account)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Optional profile attributes shared by the registration and create paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Profile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub birthdate: Option<NaiveDate>,
}

/// Self-service registration input. The role is always forced to `user`.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub email: String,
    pub profile: Profile,
}

/// Admin-initiated account creation. Unlike registration the role is
/// settable, but an explicit password is still required.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password: Option<String>,
    pub email: String,
    pub profile: Profile,
    pub role: Role,
}

/// Partial update: only fields present are applied. `id` is not patchable.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub role: Option<Role>,
}

impl AccountPatch {
    /// Whether this patch assigns a role (the policy restricts that to admins).
    pub fn sets_role(&self) -> bool {
        self.role.is_some()
    }
}
