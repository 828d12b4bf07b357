use userdir_auth::Claims;
use userdir_core::AccountId;

/// Authenticated caller context for a request.
///
/// Inserted by the auth middleware; immutable for the rest of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    claims: Claims,
}

impl CallerContext {
    pub fn new(claims: Claims) -> Self {
        Self { claims }
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn account_id(&self) -> AccountId {
        self.claims.sub
    }
}
