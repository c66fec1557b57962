//! Authentication Service
//!
//! Credential verification and the idempotent default-admin bootstrap.

use crate::auth::{hash_password, verify_password};
use crate::core::Config;
use crate::db::StoreHandle;
use crate::db::models::Admin;
use crate::db::repository::AdminRepository;
use crate::utils::{AppError, AppResult};

pub struct AuthService {
    admins: AdminRepository,
    config: Config,
}

impl AuthService {
    pub fn new(store: StoreHandle, config: Config) -> Self {
        Self {
            admins: AdminRepository::new(store),
            config,
        }
    }

    /// Verify a credential pair
    ///
    /// Returns `None` for both an unknown email and a wrong password; the
    /// caller must not be able to tell the two apart.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<Option<Admin>> {
        let admin = match self.admins.find_by_email(email).await? {
            Some(admin) => admin,
            None => {
                tracing::warn!(email = %email, "Login failed - admin not found");
                return Ok(None);
            }
        };

        let password_valid = verify_password(password, &admin.password_hash)
            .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

        if !password_valid {
            tracing::warn!(email = %email, "Login failed - invalid credentials");
            return Ok(None);
        }

        Ok(Some(admin))
    }

    /// Reconcile the default admin account to the configured desired state
    ///
    /// Creates the account if it does not exist. If it does and
    /// `SYNC_ADMIN_PASSWORD_ON_STARTUP` is set, the stored hash is replaced
    /// with a hash of the configured password, keeping the credential in sync
    /// with the deployment's configuration across restarts.
    pub async fn ensure_default_admin(&self) -> AppResult<()> {
        let email = &self.config.admin_email;

        match self.admins.find_by_email(email).await? {
            Some(admin) => {
                if self.config.sync_admin_password {
                    let hash = hash_password(&self.config.admin_password).map_err(|e| {
                        AppError::internal(format!("Failed to hash admin password: {}", e))
                    })?;
                    self.admins.update_password(admin.id, &hash).await?;
                    tracing::info!(email = %email, "Admin password reset from configured value");
                } else {
                    tracing::debug!(email = %email, "Default admin already exists");
                }
            }
            None => {
                let hash = hash_password(&self.config.admin_password).map_err(|e| {
                    AppError::internal(format!("Failed to hash admin password: {}", e))
                })?;
                self.admins.create(email, &hash).await?;
                tracing::info!(email = %email, "Default admin created");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::JwtConfig;
    use crate::db::{Filter, MemoryStore, Store, StoreHandle};

    fn test_config() -> Config {
        Config {
            http_port: 0,
            public_url: "http://localhost:8000".to_string(),
            allowed_origins: vec![],
            store_url: None,
            store_service_key: String::new(),
            storage_url: None,
            storage_bucket: None,
            upload_dir: "uploads".to_string(),
            jwt: JwtConfig {
                secret: "test-secret-key-that-is-long-enough-for-hs256".to_string(),
                expiration_minutes: 60,
                issuer: "atelier-server".to_string(),
            },
            admin_email: "admin@atelier.shop".to_string(),
            admin_password: "admin123".to_string(),
            sync_admin_password: false,
            environment: "development".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ensure_default_admin_is_idempotent() {
        let store: StoreHandle = Arc::new(MemoryStore::new());
        let service = AuthService::new(store.clone(), test_config());

        service.ensure_default_admin().await.unwrap();
        service.ensure_default_admin().await.unwrap();

        let admins = store
            .list("admins", &Filter::new(), None)
            .await
            .unwrap();
        assert_eq!(admins.len(), 1);

        // the credential still works after the second run
        let admin = service
            .authenticate("admin@atelier.shop", "admin123")
            .await
            .unwrap();
        assert!(admin.is_some());
    }

    #[tokio::test]
    async fn test_password_sync_reconciles_credential() {
        let store: StoreHandle = Arc::new(MemoryStore::new());
        AuthService::new(store.clone(), test_config())
            .ensure_default_admin()
            .await
            .unwrap();

        // restart with a changed configured password and sync enabled
        let mut config = test_config();
        config.admin_password = "new-password".to_string();
        config.sync_admin_password = true;
        let service = AuthService::new(store.clone(), config);
        service.ensure_default_admin().await.unwrap();

        assert!(
            service
                .authenticate("admin@atelier.shop", "new-password")
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            service
                .authenticate("admin@atelier.shop", "admin123")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_authenticate_does_not_distinguish_failures() {
        let store: StoreHandle = Arc::new(MemoryStore::new());
        let service = AuthService::new(store, test_config());
        service.ensure_default_admin().await.unwrap();

        // unknown email and wrong password produce the same result
        let unknown = service
            .authenticate("nobody@atelier.shop", "admin123")
            .await
            .unwrap();
        let wrong = service
            .authenticate("admin@atelier.shop", "wrong")
            .await
            .unwrap();
        assert!(unknown.is_none());
        assert!(wrong.is_none());
    }
}
