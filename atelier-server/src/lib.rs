//! Atelier Server - 手工艺品商店后端服务
//!
//! # 架构概述
//!
//! 本模块是 API 服务器的主入口，提供以下核心功能：
//!
//! - **商品目录** (`api/products`): 商品 CRUD、分类、搜索
//! - **订单** (`services/order`): 下单、库存扣减、状态管理
//! - **认证** (`auth`): JWT + Argon2 管理员认证体系
//! - **文件上传** (`api/upload`): 图片上传，内容寻址去重
//! - **数据访问** (`db`): 托管数据库服务 (PostgREST) 适配层
//!
//! # 模块结构
//!
//! ```text
//! atelier-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT、密码散列、提取器
//! ├── services/      # 订单、目录、认证、文件存储
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 存储适配层 (PostgREST / 内存)
//! └── utils/         # 错误、日志、金额工具
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentAdmin, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{ApiMessage, AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置进程环境 (dotenv + 日志)
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logger();
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ___   __       ___
   /   | / /____  / (_)__  _____
  / /| |/ __/ _ \/ / / _ \/ ___/
 / ___ / /_/  __/ / /  __/ /
/_/  |_\__/\___/_/_/\___/_/
    "#
    );
}
