//! Process configuration, loaded once at startup.
//!
//! The signing secret and hash cost are injected into the services at
//! construction; nothing reads them from the environment after boot.

use anyhow::{Context, bail};

/// Seed admin created at startup when its username is not yet present.
///
/// Requires an explicit password; there is no default credential.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address (`USERDIR_ADDR`).
    pub addr: String,
    /// Token signing secret (`JWT_SECRET`). Required: startup fails closed
    /// without it rather than falling back to a guessable constant.
    pub jwt_secret: String,
    /// bcrypt cost factor (`BCRYPT_COST`); the library default when unset.
    pub bcrypt_cost: Option<u32>,
    /// Optional seed admin (`BOOTSTRAP_ADMIN_USERNAME` / `_PASSWORD` / `_EMAIL`).
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(s) if !s.trim().is_empty() => s,
            _ => bail!("JWT_SECRET must be set; refusing to start without a signing secret"),
        };

        let addr =
            std::env::var("USERDIR_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let bcrypt_cost = match std::env::var("BCRYPT_COST") {
            Ok(s) => Some(s.parse::<u32>().context("BCRYPT_COST must be an integer")?),
            Err(_) => None,
        };

        let admin_username = std::env::var("BOOTSTRAP_ADMIN_USERNAME").ok();
        let admin_password = std::env::var("BOOTSTRAP_ADMIN_PASSWORD").ok();
        let admin_email = std::env::var("BOOTSTRAP_ADMIN_EMAIL").ok();
        let bootstrap_admin = match (admin_username, admin_password, admin_email) {
            (Some(username), Some(password), Some(email)) => Some(BootstrapAdmin {
                username,
                password,
                email,
            }),
            (None, None, None) => None,
            _ => bail!(
                "BOOTSTRAP_ADMIN_USERNAME, BOOTSTRAP_ADMIN_PASSWORD and \
                 BOOTSTRAP_ADMIN_EMAIL must be set together"
            ),
        };

        Ok(Self {
            addr,
            jwt_secret,
            bcrypt_cost,
            bootstrap_admin,
        })
    }
}
