//! `userdir-directory` — account records, storage contract and the
//! filtered/sorted/paginated query engine.
//!
//! The directory composes the credential hasher from `userdir-auth` with a
//! record-collection storage seam ([`AccountStore`]); authorization is the
//! caller's responsibility and happens before any operation here.

pub mod account;
pub mod directory;
pub mod query;
pub mod store;

pub use account::{Account, AccountPatch, NewAccount, Profile, Registration};
pub use directory::UserDirectory;
pub use query::{DEFAULT_PAGE_SIZE, Page, QuerySpec, SortDirection, SortField};
pub use store::{AccountStore, InMemoryAccountStore};
