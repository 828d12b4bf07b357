//! Record-collection storage seam for accounts.
//!
//! The directory only needs create/find/update/delete plus a full scan for
//! the query engine; anything relational behind that contract will do. The
//! storage layer owns the uniqueness constraints: concurrent inserts with
//! the same username/email must serialize there and surface as `Conflict`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use userdir_core::{AccountId, DirectoryError, DirectoryResult};

use crate::account::Account;

/// Storage contract the directory requires from its persistence engine.
pub trait AccountStore: Send + Sync {
    /// Insert a new account. Fails with `Conflict` if the username or email
    /// is already taken.
    fn insert(&self, account: Account) -> DirectoryResult<()>;

    fn get(&self, id: AccountId) -> Option<Account>;

    fn find_by_username(&self, username: &str) -> Option<Account>;

    /// Replace an existing account. Fails with `NotFound` if the id is
    /// unknown and `Conflict` if the new username/email clashes with a
    /// different account.
    fn update(&self, account: Account) -> DirectoryResult<()>;

    /// Delete an account. Fails with `NotFound` if the id is unknown.
    fn remove(&self, id: AccountId) -> DirectoryResult<()>;

    /// Full scan, unordered. The query engine filters/sorts/slices on top.
    fn all(&self) -> Vec<Account>;
}

impl<S> AccountStore for Arc<S>
where
    S: AccountStore + ?Sized,
{
    fn insert(&self, account: Account) -> DirectoryResult<()> {
        (**self).insert(account)
    }

    fn get(&self, id: AccountId) -> Option<Account> {
        (**self).get(id)
    }

    fn find_by_username(&self, username: &str) -> Option<Account> {
        (**self).find_by_username(username)
    }

    fn update(&self, account: Account) -> DirectoryResult<()> {
        (**self).update(account)
    }

    fn remove(&self, id: AccountId) -> DirectoryResult<()> {
        (**self).remove(id)
    }

    fn all(&self) -> Vec<Account> {
        (**self).all()
    }
}

/// In-memory account store for tests/dev.
///
/// Uniqueness is enforced under the write lock, which serializes concurrent
/// inserts the same way a relational unique index would.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    inner: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn conflict(map: &HashMap<AccountId, Account>, candidate: &Account) -> Option<DirectoryError> {
        for existing in map.values() {
            if existing.id == candidate.id {
                continue;
            }
            if existing.username == candidate.username {
                return Some(DirectoryError::conflict("username already taken"));
            }
            if existing.email == candidate.email {
                return Some(DirectoryError::conflict("email already taken"));
            }
        }
        None
    }
}

impl AccountStore for InMemoryAccountStore {
    fn insert(&self, account: Account) -> DirectoryResult<()> {
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if let Some(conflict) = Self::conflict(&map, &account) {
            return Err(conflict);
        }
        map.insert(account.id, account);
        Ok(())
    }

    fn get(&self, id: AccountId) -> Option<Account> {
        let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
        map.get(&id).cloned()
    }

    fn find_by_username(&self, username: &str) -> Option<Account> {
        let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
        map.values().find(|a| a.username == username).cloned()
    }

    fn update(&self, account: Account) -> DirectoryResult<()> {
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if !map.contains_key(&account.id) {
            return Err(DirectoryError::NotFound);
        }
        if let Some(conflict) = Self::conflict(&map, &account) {
            return Err(conflict);
        }
        map.insert(account.id, account);
        Ok(())
    }

    fn remove(&self, id: AccountId) -> DirectoryResult<()> {
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        match map.remove(&id) {
            Some(_) => Ok(()),
            None => Err(DirectoryError::NotFound),
        }
    }

    fn all(&self) -> Vec<Account> {
        let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
        map.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use userdir_auth::Role;

    fn account(username: &str, email: &str) -> Account {
        let now = Utc::now();
        Account {
            id: AccountId::new(),
            username: username.to_string(),
            password_hash: "$2b$04$placeholderplaceholderpl".to_string(),
            email: email.to_string(),
            first_name: None,
            last_name: None,
            gender: None,
            birthdate: None,
            role: Role::User,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn insert_and_get_round_trip() {
        let store = InMemoryAccountStore::new();
        let a = account("alice", "a@x.com");
        store.insert(a.clone()).unwrap();
        assert_eq!(store.get(a.id).unwrap().username, "alice");
        assert_eq!(store.find_by_username("alice").unwrap().id, a.id);
    }

    #[test]
    fn duplicate_username_conflicts() {
        let store = InMemoryAccountStore::new();
        store.insert(account("alice", "a@x.com")).unwrap();
        let err = store.insert(account("alice", "other@x.com")).unwrap_err();
        assert!(matches!(err, DirectoryError::Conflict(_)));
    }

    #[test]
    fn duplicate_email_conflicts() {
        let store = InMemoryAccountStore::new();
        store.insert(account("alice", "a@x.com")).unwrap();
        let err = store.insert(account("bob", "a@x.com")).unwrap_err();
        assert!(matches!(err, DirectoryError::Conflict(_)));
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let store = InMemoryAccountStore::new();
        let err = store.update(account("ghost", "g@x.com")).unwrap_err();
        assert_eq!(err, DirectoryError::NotFound);
    }

    #[test]
    fn update_into_taken_username_conflicts() {
        let store = InMemoryAccountStore::new();
        store.insert(account("alice", "a@x.com")).unwrap();
        let mut bob = account("bob", "b@x.com");
        store.insert(bob.clone()).unwrap();

        bob.username = "alice".to_string();
        let err = store.update(bob).unwrap_err();
        assert!(matches!(err, DirectoryError::Conflict(_)));
    }

    #[test]
    fn remove_is_immediate_and_not_found_after() {
        let store = InMemoryAccountStore::new();
        let a = account("alice", "a@x.com");
        store.insert(a.clone()).unwrap();
        store.remove(a.id).unwrap();
        assert!(store.get(a.id).is_none());
        assert_eq!(store.remove(a.id).unwrap_err(), DirectoryError::NotFound);
    }
}
