//! The user directory service: CRUD + query over account records.

use std::sync::Arc;

use chrono::Utc;

use userdir_auth::{HashError, PasswordHasher, Role};
use userdir_core::{AccountId, DirectoryError, DirectoryResult};

use crate::account::{Account, AccountPatch, NewAccount, Registration};
use crate::query::{Page, QuerySpec};
use crate::store::AccountStore;

/// CRUD + query engine over user records.
///
/// Composes the credential hasher with the storage seam. Authorization is
/// enforced upstream by the policy; every operation here assumes the caller
/// was already allowed to perform it.
#[derive(Clone)]
pub struct UserDirectory {
    store: Arc<dyn AccountStore>,
    hasher: PasswordHasher,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn AccountStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Self-service registration. The role is always `user`.
    pub fn register(&self, reg: Registration) -> DirectoryResult<Account> {
        if reg.username.trim().is_empty()
            || reg.password.is_empty()
            || reg.email.trim().is_empty()
        {
            return Err(DirectoryError::validation(
                "username, password and email are required",
            ));
        }

        let password_hash = self.hash_password(&reg.password)?;
        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            username: reg.username,
            password_hash,
            email: reg.email,
            first_name: reg.profile.first_name,
            last_name: reg.profile.last_name,
            gender: reg.profile.gender,
            birthdate: reg.profile.birthdate,
            role: Role::User,
            created_at: now,
            updated_at: now,
        };

        self.store.insert(account.clone())?;
        tracing::info!(account_id = %account.id, username = %account.username, "account registered");
        Ok(account)
    }

    /// Look up by username and verify the password.
    ///
    /// Unknown username and wrong password both surface as
    /// `InvalidCredentials` so callers cannot enumerate usernames; the
    /// distinction only appears in internal logs.
    pub fn authenticate(&self, username: &str, password: &str) -> DirectoryResult<Account> {
        let Some(account) = self.store.find_by_username(username) else {
            tracing::debug!(username, "authentication failed: unknown username");
            return Err(DirectoryError::InvalidCredentials);
        };

        match self.hasher.verify(password, &account.password_hash) {
            Ok(true) => {
                tracing::info!(account_id = %account.id, "authentication succeeded");
                Ok(account)
            }
            Ok(false) => {
                tracing::debug!(account_id = %account.id, "authentication failed: password mismatch");
                Err(DirectoryError::InvalidCredentials)
            }
            Err(HashError::Malformed) => {
                // Unusable stored credential: an authentication failure for
                // the caller, a loud signal for the operator.
                tracing::warn!(account_id = %account.id, "stored password hash is malformed");
                Err(DirectoryError::InvalidCredentials)
            }
            Err(e) => {
                tracing::warn!(account_id = %account.id, error = %e, "password verification failed");
                Err(DirectoryError::InvalidCredentials)
            }
        }
    }

    pub fn find_by_id(&self, id: AccountId) -> DirectoryResult<Account> {
        self.store.get(id).ok_or(DirectoryError::NotFound)
    }

    /// Run a listing query over the full account set.
    pub fn list(&self, spec: &QuerySpec) -> DirectoryResult<Page> {
        spec.execute(self.store.all())
    }

    /// Admin-initiated creation. The role is settable, but an explicit
    /// password is required on every creation path.
    pub fn create(&self, new: NewAccount) -> DirectoryResult<Account> {
        if new.username.trim().is_empty() || new.email.trim().is_empty() {
            return Err(DirectoryError::validation(
                "username and email are required",
            ));
        }
        let password = new
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| DirectoryError::validation("an explicit password is required"))?;

        let password_hash = self.hash_password(&password)?;
        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            username: new.username,
            password_hash,
            email: new.email,
            first_name: new.profile.first_name,
            last_name: new.profile.last_name,
            gender: new.profile.gender,
            birthdate: new.profile.birthdate,
            role: new.role,
            created_at: now,
            updated_at: now,
        };

        self.store.insert(account.clone())?;
        tracing::info!(account_id = %account.id, role = %account.role, "account created");
        Ok(account)
    }

    /// Apply a partial update. Only fields present in the patch change;
    /// the id never does. Last writer wins on concurrent updates.
    pub fn update(&self, id: AccountId, patch: AccountPatch) -> DirectoryResult<Account> {
        let mut account = self.store.get(id).ok_or(DirectoryError::NotFound)?;

        if let Some(username) = patch.username {
            account.username = username;
        }
        if let Some(email) = patch.email {
            account.email = email;
        }
        if let Some(password) = patch.password {
            if password.is_empty() {
                return Err(DirectoryError::validation("password must not be empty"));
            }
            // Hash the raw replacement exactly once; the stored value is
            // never re-hashed.
            account.password_hash = self.hash_password(&password)?;
        }
        if let Some(first_name) = patch.first_name {
            account.first_name = Some(first_name);
        }
        if let Some(last_name) = patch.last_name {
            account.last_name = Some(last_name);
        }
        if let Some(gender) = patch.gender {
            account.gender = Some(gender);
        }
        if let Some(birthdate) = patch.birthdate {
            account.birthdate = Some(birthdate);
        }
        if let Some(role) = patch.role {
            account.role = role;
        }
        account.updated_at = Utc::now();

        self.store.update(account.clone())?;
        tracing::info!(account_id = %account.id, "account updated");
        Ok(account)
    }

    /// Immediate, irreversible deletion (no soft-delete).
    pub fn delete(&self, id: AccountId) -> DirectoryResult<()> {
        self.store.remove(id)?;
        tracing::info!(account_id = %id, "account deleted");
        Ok(())
    }

    fn hash_password(&self, raw: &str) -> DirectoryResult<String> {
        self.hasher
            .hash(raw)
            .map_err(|e| DirectoryError::validation(format!("password could not be hashed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Profile;
    use crate::query::SortDirection;
    use crate::store::InMemoryAccountStore;

    fn directory() -> UserDirectory {
        // Minimum bcrypt cost keeps these tests fast.
        UserDirectory::new(Arc::new(InMemoryAccountStore::new()), PasswordHasher::new(4))
    }

    fn registration(username: &str, password: &str, email: &str) -> Registration {
        Registration {
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
            profile: Profile::default(),
        }
    }

    #[test]
    fn register_then_authenticate_round_trip() {
        let dir = directory();
        let account = dir
            .register(registration("alice", "secret1", "a@x.com"))
            .unwrap();
        assert_eq!(account.role, Role::User);
        assert_ne!(account.password_hash, "secret1");

        let authed = dir.authenticate("alice", "secret1").unwrap();
        assert_eq!(authed.id, account.id);
    }

    #[test]
    fn register_requires_username_password_and_email() {
        let dir = directory();
        for reg in [
            registration("", "secret1", "a@x.com"),
            registration("alice", "", "a@x.com"),
            registration("alice", "secret1", ""),
        ] {
            let err = dir.register(reg).unwrap_err();
            assert!(matches!(err, DirectoryError::Validation(_)));
        }
    }

    #[test]
    fn duplicate_registration_conflicts() {
        let dir = directory();
        dir.register(registration("alice", "secret1", "a@x.com"))
            .unwrap();
        let err = dir
            .register(registration("alice", "other", "b@x.com"))
            .unwrap_err();
        assert!(matches!(err, DirectoryError::Conflict(_)));
    }

    #[test]
    fn registration_always_yields_user_role() {
        let dir = directory();
        let account = dir
            .register(registration("alice", "secret1", "a@x.com"))
            .unwrap();
        assert_eq!(account.role, Role::User);
    }

    #[test]
    fn unknown_user_and_wrong_password_are_indistinguishable() {
        let dir = directory();
        dir.register(registration("alice", "secret1", "a@x.com"))
            .unwrap();

        let unknown = dir.authenticate("nobody", "whatever").unwrap_err();
        let wrong = dir.authenticate("alice", "wrong").unwrap_err();
        assert_eq!(unknown, wrong);
        assert_eq!(unknown, DirectoryError::InvalidCredentials);
    }

    #[test]
    fn create_requires_an_explicit_password() {
        let dir = directory();
        let err = dir
            .create(NewAccount {
                username: "bob".to_string(),
                password: None,
                email: "b@x.com".to_string(),
                profile: Profile::default(),
                role: Role::User,
            })
            .unwrap_err();
        assert!(matches!(err, DirectoryError::Validation(_)));

        let err = dir
            .create(NewAccount {
                username: "bob".to_string(),
                password: Some(String::new()),
                email: "b@x.com".to_string(),
                profile: Profile::default(),
                role: Role::User,
            })
            .unwrap_err();
        assert!(matches!(err, DirectoryError::Validation(_)));
    }

    #[test]
    fn create_with_role_shows_up_in_filtered_list() {
        let dir = directory();
        dir.register(registration("alice", "secret1", "a@x.com"))
            .unwrap();
        dir.create(NewAccount {
            username: "bob".to_string(),
            password: Some("hunter2".to_string()),
            email: "bob@x.com".to_string(),
            profile: Profile::default(),
            role: Role::Admin,
        })
        .unwrap();

        let spec = QuerySpec {
            role: Some(Role::Admin),
            ..QuerySpec::default()
        };
        let page = dir.list(&spec).unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].username, "bob");
    }

    #[test]
    fn update_applies_only_present_fields() {
        let dir = directory();
        let account = dir
            .register(registration("alice", "secret1", "a@x.com"))
            .unwrap();

        let updated = dir
            .update(
                account.id,
                AccountPatch {
                    first_name: Some("Alice".to_string()),
                    ..AccountPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.first_name.as_deref(), Some("Alice"));
        assert_eq!(updated.username, "alice");
        assert_eq!(updated.email, "a@x.com");
        assert_eq!(updated.password_hash, account.password_hash);
    }

    #[test]
    fn update_password_rehashes_and_old_password_stops_working() {
        let dir = directory();
        let account = dir
            .register(registration("alice", "secret1", "a@x.com"))
            .unwrap();

        dir.update(
            account.id,
            AccountPatch {
                password: Some("new-password".to_string()),
                ..AccountPatch::default()
            },
        )
        .unwrap();

        assert!(dir.authenticate("alice", "new-password").is_ok());
        assert_eq!(
            dir.authenticate("alice", "secret1").unwrap_err(),
            DirectoryError::InvalidCredentials
        );
    }

    #[test]
    fn update_into_taken_username_surfaces_conflict() {
        let dir = directory();
        dir.register(registration("alice", "secret1", "a@x.com"))
            .unwrap();
        let bob = dir
            .register(registration("bob", "secret2", "b@x.com"))
            .unwrap();

        let err = dir
            .update(
                bob.id,
                AccountPatch {
                    username: Some("alice".to_string()),
                    ..AccountPatch::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, DirectoryError::Conflict(_)));
    }

    #[test]
    fn update_and_delete_unknown_id_are_not_found() {
        let dir = directory();
        let ghost = AccountId::new();
        assert_eq!(
            dir.update(ghost, AccountPatch::default()).unwrap_err(),
            DirectoryError::NotFound
        );
        assert_eq!(dir.delete(ghost).unwrap_err(), DirectoryError::NotFound);
    }

    #[test]
    fn delete_then_find_is_not_found() {
        let dir = directory();
        let account = dir
            .register(registration("alice", "secret1", "a@x.com"))
            .unwrap();
        dir.delete(account.id).unwrap();
        assert_eq!(
            dir.find_by_id(account.id).unwrap_err(),
            DirectoryError::NotFound
        );
    }

    #[test]
    fn list_sorts_descending_with_ties_by_id() {
        let dir = directory();
        for name in ["carol", "alice", "bob"] {
            dir.register(registration(name, "pw123456", &format!("{name}@x.com")))
                .unwrap();
        }

        let spec = QuerySpec {
            direction: SortDirection::Desc,
            ..QuerySpec::default()
        };
        let page = dir.list(&spec).unwrap();
        let names: Vec<_> = page.items.iter().map(|a| a.username.clone()).collect();
        assert_eq!(names, ["carol", "bob", "alice"]);
    }
}
