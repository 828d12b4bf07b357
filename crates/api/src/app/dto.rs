use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};

use userdir_directory::{Account, Profile, Registration};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub birthdate: Option<NaiveDate>,
}

impl RegisterRequest {
    pub fn into_registration(self) -> Registration {
        Registration {
            username: self.username,
            password: self.password,
            email: self.email,
            profile: Profile {
                first_name: self.first_name,
                last_name: self.last_name,
                gender: self.gender,
                birthdate: self.birthdate,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: Option<String>,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub birthdate: Option<NaiveDate>,
    /// "user" or "admin"; defaults to "user".
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub role: Option<String>,
}

/// Listing query string: `?page&limit&sortBy&order&search&gender&role`.
#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub search: Option<String>,
    pub gender: Option<String>,
    pub role: Option<String>,
}

// -------------------------
// Response mapping
// -------------------------

/// Serialize an account for the wire. The password hash is never included.
pub fn account_to_json(account: &Account) -> Value {
    json!({
        "id": account.id.to_string(),
        "username": account.username,
        "email": account.email,
        "first_name": account.first_name,
        "last_name": account.last_name,
        "gender": account.gender,
        "birthdate": account.birthdate,
        "role": account.role.as_str(),
        "created_at": account.created_at,
        "updated_at": account.updated_at,
    })
}
