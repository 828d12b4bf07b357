//! The listing query engine: search/filter/sort/paginate composition.

use core::cmp::Ordering;
use core::str::FromStr;

use userdir_auth::Role;
use userdir_core::{DirectoryError, DirectoryResult};

use crate::account::Account;

/// Page size used when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            other => Err(DirectoryError::validation(format!(
                "unknown sort direction '{other}': must be ASC or DESC"
            ))),
        }
    }
}

/// Allow-listed account attributes a listing may sort by.
///
/// Anything not named here is rejected up front; caller-supplied sort keys
/// never reach the ordering code unchecked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Id,
    #[default]
    Username,
    Email,
    FirstName,
    LastName,
    Gender,
    Birthdate,
    Role,
}

impl FromStr for SortField {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortField::Id),
            "username" => Ok(SortField::Username),
            "email" => Ok(SortField::Email),
            "first_name" => Ok(SortField::FirstName),
            "last_name" => Ok(SortField::LastName),
            "gender" => Ok(SortField::Gender),
            "birthdate" => Ok(SortField::Birthdate),
            "role" => Ok(SortField::Role),
            other => Err(DirectoryError::validation(format!(
                "unknown sort field '{other}'"
            ))),
        }
    }
}

/// Transient description of one listing request; constructed per request
/// and consumed once.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
    pub sort_field: SortField,
    pub direction: SortDirection,
    /// Case-insensitive substring match over username/first_name/last_name.
    pub search: Option<String>,
    /// Exact-match filters.
    pub gender: Option<String>,
    pub role: Option<Role>,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort_field: SortField::default(),
            direction: SortDirection::default(),
            search: None,
            gender: None,
            role: None,
        }
    }
}

/// One page of listing results.
#[derive(Debug, Clone)]
pub struct Page {
    pub items: Vec<Account>,
    /// Number of accounts matching the predicate, before slicing.
    pub total_count: usize,
}

impl QuerySpec {
    fn validate(&self) -> DirectoryResult<()> {
        if self.page < 1 {
            return Err(DirectoryError::validation("page must be >= 1"));
        }
        if self.page_size < 1 {
            return Err(DirectoryError::validation("page size must be >= 1"));
        }
        Ok(())
    }

    /// Predicate: conjunction of the exact filters, AND (when present) a
    /// disjunction of case-insensitive substring matches over the text
    /// fields.
    fn matches(&self, account: &Account) -> bool {
        if let Some(gender) = &self.gender {
            if account.gender.as_deref() != Some(gender.as_str()) {
                return false;
            }
        }

        if let Some(role) = self.role {
            if account.role != role {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = contains_ci(&account.username, &needle)
                || account
                    .first_name
                    .as_deref()
                    .is_some_and(|v| contains_ci(v, &needle))
                || account
                    .last_name
                    .as_deref()
                    .is_some_and(|v| contains_ci(v, &needle));
            if !hit {
                return false;
            }
        }

        true
    }

    fn compare(&self, a: &Account, b: &Account) -> Ordering {
        let by_field = match self.sort_field {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Username => a.username.cmp(&b.username),
            SortField::Email => a.email.cmp(&b.email),
            SortField::FirstName => a.first_name.cmp(&b.first_name),
            SortField::LastName => a.last_name.cmp(&b.last_name),
            SortField::Gender => a.gender.cmp(&b.gender),
            SortField::Birthdate => a.birthdate.cmp(&b.birthdate),
            SortField::Role => a.role.as_str().cmp(b.role.as_str()),
        };

        let directed = match self.direction {
            SortDirection::Asc => by_field,
            SortDirection::Desc => by_field.reverse(),
        };

        // Ties always break by ascending id, independent of direction, so
        // pagination stays deterministic.
        directed.then_with(|| a.id.cmp(&b.id))
    }

    /// Run the query over the full account set.
    ///
    /// Counts matches before slicing; an offset past the end yields an
    /// empty page, not an error.
    pub fn execute(&self, accounts: Vec<Account>) -> DirectoryResult<Page> {
        self.validate()?;

        let mut matched: Vec<Account> =
            accounts.into_iter().filter(|a| self.matches(a)).collect();
        let total_count = matched.len();

        matched.sort_by(|a, b| self.compare(a, b));

        let offset = (self.page as usize - 1).saturating_mul(self.page_size as usize);
        let items = matched
            .into_iter()
            .skip(offset)
            .take(self.page_size as usize)
            .collect();

        Ok(Page { items, total_count })
    }
}

fn contains_ci(haystack: &str, lowercase_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowercase_needle)
}
