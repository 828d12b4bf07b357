//! Service wiring: the directory and token service behind the handlers.

use std::sync::Arc;

use chrono::Duration;

use userdir_auth::{PasswordHasher, Role, TokenService};
use userdir_directory::{InMemoryAccountStore, NewAccount, Profile, UserDirectory};

use crate::config::{BootstrapAdmin, Config};

/// Bearer tokens live this long; re-authentication is the only refresh.
const TOKEN_TTL_HOURS: i64 = 1;

/// Shared service handles for request handlers.
pub struct AppServices {
    pub directory: UserDirectory,
    pub tokens: TokenService,
}

/// Wire the directory and token service from configuration.
///
/// Seeds the bootstrap admin when configured and not already present.
pub fn build_services(config: &Config) -> anyhow::Result<Arc<AppServices>> {
    let hasher = match config.bcrypt_cost {
        Some(cost) => PasswordHasher::new(cost),
        None => PasswordHasher::default(),
    };
    let directory = UserDirectory::new(Arc::new(InMemoryAccountStore::new()), hasher);
    let tokens = TokenService::new(
        config.jwt_secret.as_bytes(),
        Duration::hours(TOKEN_TTL_HOURS),
    );

    if let Some(admin) = &config.bootstrap_admin {
        seed_admin(&directory, admin)?;
    }

    Ok(Arc::new(AppServices { directory, tokens }))
}

fn seed_admin(directory: &UserDirectory, admin: &BootstrapAdmin) -> anyhow::Result<()> {
    let created = directory.create(NewAccount {
        username: admin.username.clone(),
        password: Some(admin.password.clone()),
        email: admin.email.clone(),
        profile: Profile::default(),
        role: Role::Admin,
    });

    match created {
        Ok(account) => {
            tracing::info!(account_id = %account.id, username = %account.username, "bootstrap admin created");
            Ok(())
        }
        Err(userdir_core::DirectoryError::Conflict(_)) => {
            tracing::debug!(username = %admin.username, "bootstrap admin already present");
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("failed to seed bootstrap admin: {e}")),
    }
}
