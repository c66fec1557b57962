//! 认证模块
//!
//! JWT + Argon2 认证体系：
//!
//! - [`jwt`] - 令牌签发与校验
//! - [`password`] - 密码散列与校验
//! - [`extractor`] - 受保护路由的 [`CurrentAdmin`] 提取器

pub mod extractor;
pub mod jwt;
pub mod password;

pub use extractor::CurrentAdmin;
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use password::{hash_password, verify_password};
