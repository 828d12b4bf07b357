//! Role/ownership authorization policy.
//!
//! This is the single source of truth for per-endpoint access decisions;
//! the HTTP layer must not duplicate ad hoc role checks.

use thiserror::Error;

use userdir_core::AccountId;

use crate::Claims;

/// An operation a caller is attempting, with its target where relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Register,
    Login,
    /// Read the caller's own account.
    ReadSelf(AccountId),
    /// Read an arbitrary account.
    ReadAny(AccountId),
    ListUsers,
    CreateUser,
    /// Update an account. `sets_role` is true when the patch assigns a
    /// role; only admins may do that, even to themselves.
    UpdateUser { target: AccountId, sets_role: bool },
    DeleteUser(AccountId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// Missing or invalid claims for a protected action.
    #[error("authentication required")]
    Unauthenticated,

    /// Authenticated, but the role/ownership rules deny the action.
    #[error("forbidden")]
    Forbidden,
}

/// Decide whether `claims` may perform `action`.
///
/// - No IO
/// - No panics
/// - Pure decision: (claims, action) → allow/deny
///
/// Rules are evaluated in precedence order; the first match decides.
/// Note that nothing here blocks an admin from deleting their own
/// account: the policy checks role and ownership only, and discouraging
/// self-deletion is a client concern.
pub fn authorize(claims: Option<&Claims>, action: &Action) -> Result<(), PolicyError> {
    // 1. Anonymous endpoints need no claims.
    if matches!(action, Action::Register | Action::Login) {
        return Ok(());
    }

    // 2. Everything else requires an authenticated caller.
    let Some(claims) = claims else {
        return Err(PolicyError::Unauthenticated);
    };

    // 3. Admins may list, create, delete, update anyone and read anyone.
    if claims.role.is_admin()
        && matches!(
            action,
            Action::ListUsers
                | Action::CreateUser
                | Action::DeleteUser(_)
                | Action::UpdateUser { .. }
                | Action::ReadAny(_)
        )
    {
        return Ok(());
    }

    // 4. Ownership: callers may read themselves and update their own
    //    non-privileged fields.
    match action {
        Action::ReadSelf(target) if *target == claims.sub => return Ok(()),
        Action::UpdateUser {
            target,
            sets_role: false,
        } if *target == claims.sub => return Ok(()),
        _ => {}
    }

    // 5. Everything else is denied.
    Err(PolicyError::Forbidden)
}
