//! Admin Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::default_true;

/// Admin account
///
/// Created once at startup by the bootstrap routine; mutated only by password
/// reset. The stored hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
