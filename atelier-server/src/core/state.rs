use std::sync::Arc;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::{MemoryStore, PostgrestStore, StoreHandle};
use crate::services::auth::AuthService;
use crate::services::blob::BlobService;
use crate::utils::AppResult;

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是请求处理的核心数据结构。
/// 使用 Arc 实现浅拷贝，克隆成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | StoreHandle | 存储后端 (托管服务或内存) |
/// | blob | Arc<BlobService> | 文件存储 (托管 + 本地回退) |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 存储后端
    store: StoreHandle,
    /// 文件存储
    blob: Arc<BlobService>,
    /// JWT 认证服务 (Arc 共享所有权)
    jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`initialize()`](Self::initialize) 方法代替；测试场景用它注入
    /// 自定义存储后端。
    pub fn with_store(config: Config, store: StoreHandle) -> Self {
        let blob = Arc::new(BlobService::from_config(&config));
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            config,
            store,
            blob,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 存储后端 (STORE_URL 未设置时回退到内存存储)
    /// 2. 文件存储 (托管 + 本地回退)
    /// 3. JWT 服务
    /// 4. 默认管理员 (幂等)
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let store: StoreHandle = match &config.store_url {
            Some(url) => {
                tracing::info!("Using hosted store at {}", url);
                Arc::new(PostgrestStore::new(url, &config.store_service_key)?)
            }
            None => {
                tracing::warn!(
                    "STORE_URL not set; using in-memory store (data will not survive restarts)"
                );
                Arc::new(MemoryStore::new())
            }
        };

        let state = Self::with_store(config.clone(), store);

        // Bootstrap the default admin (idempotent)
        AuthService::new(state.store(), state.config.clone())
            .ensure_default_admin()
            .await?;

        Ok(state)
    }

    /// 获取存储后端句柄
    pub fn store(&self) -> StoreHandle {
        self.store.clone()
    }

    /// 获取文件存储服务
    pub fn blob_service(&self) -> Arc<BlobService> {
        self.blob.clone()
    }

    /// 获取 JWT 服务
    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
