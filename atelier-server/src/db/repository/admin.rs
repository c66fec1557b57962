//! Admin Repository

use chrono::Utc;
use serde_json::json;

use super::{BaseRepository, decode};
use crate::db::models::Admin;
use crate::db::store::{Filter, StoreHandle, StoreResult};

const ADMIN_TABLE: &str = "admins";

#[derive(Clone)]
pub struct AdminRepository {
    base: BaseRepository,
}

impl AdminRepository {
    pub fn new(store: StoreHandle) -> Self {
        Self {
            base: BaseRepository::new(store),
        }
    }

    /// Find admin by email (unique key)
    pub async fn find_by_email(&self, email: &str) -> StoreResult<Option<Admin>> {
        let row = self
            .base
            .store()
            .get(ADMIN_TABLE, &Filter::new().eq("email", email))
            .await?;
        row.map(decode).transpose()
    }

    /// Create a new admin record
    pub async fn create(&self, email: &str, password_hash: &str) -> StoreResult<Admin> {
        let row = self
            .base
            .store()
            .insert(
                ADMIN_TABLE,
                json!({
                    "email": email,
                    "password_hash": password_hash,
                    "is_active": true,
                    "created_at": Utc::now(),
                }),
            )
            .await?;
        decode(row)
    }

    /// Replace the stored password hash
    pub async fn update_password(&self, id: i64, password_hash: &str) -> StoreResult<Option<Admin>> {
        let row = self
            .base
            .store()
            .update(ADMIN_TABLE, id, json!({ "password_hash": password_hash }))
            .await?;
        row.map(decode).transpose()
    }
}
