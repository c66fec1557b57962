use crate::auth::JwtConfig;

/// 服务器配置 - 所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 8000 | HTTP 服务端口 |
/// | PUBLIC_URL | http://localhost:8000 | 生成文件链接用的对外地址 |
/// | ALLOWED_ORIGINS | localhost:3000 | CORS 允许的来源 (逗号分隔) |
/// | STORE_URL | (未设置) | 托管数据库服务 (PostgREST) 地址 |
/// | STORE_SERVICE_KEY | (空) | 托管服务的 service-role 密钥 |
/// | STORAGE_URL | (未设置) | 托管文件存储地址 |
/// | STORAGE_BUCKET | (未设置) | 托管文件存储桶 |
/// | UPLOAD_DIR | uploads | 本地上传目录 (托管存储不可用时的回退) |
/// | ADMIN_EMAIL | admin@atelier.shop | 默认管理员邮箱 |
/// | ADMIN_DEFAULT_PASSWORD | admin123 | 默认管理员密码 |
/// | SYNC_ADMIN_PASSWORD_ON_STARTUP | false | 启动时将存储的密码散列同步到配置值 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// STORE_URL=https://xyz.supabase.co/rest/v1 HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 对外地址，用于拼接上传文件的公开 URL
    pub public_url: String,
    /// CORS 允许的来源
    pub allowed_origins: Vec<String>,
    /// 托管数据库服务地址；未设置时使用内存存储 (仅开发/测试)
    pub store_url: Option<String>,
    /// 托管服务密钥
    pub store_service_key: String,
    /// 托管文件存储地址
    pub storage_url: Option<String>,
    /// 托管文件存储桶
    pub storage_bucket: Option<String>,
    /// 本地上传目录
    pub upload_dir: String,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 默认管理员邮箱
    pub admin_email: String,
    /// 默认管理员密码
    pub admin_password: String,
    /// 启动时是否把存储的密码散列同步到配置值
    pub sync_admin_password: bool,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            public_url: std::env::var("PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:8000".into())
                .trim_end_matches('/')
                .to_string(),
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".into())
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            store_url: std::env::var("STORE_URL").ok().filter(|v| !v.is_empty()),
            store_service_key: std::env::var("STORE_SERVICE_KEY").unwrap_or_default(),
            storage_url: std::env::var("STORAGE_URL").ok().filter(|v| !v.is_empty()),
            storage_bucket: std::env::var("STORAGE_BUCKET")
                .ok()
                .filter(|v| !v.is_empty()),
            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()),
            jwt: JwtConfig::default(),
            admin_email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@atelier.shop".into()),
            admin_password: std::env::var("ADMIN_DEFAULT_PASSWORD")
                .unwrap_or_else(|_| "admin123".into()),
            sync_admin_password: std::env::var("SYNC_ADMIN_PASSWORD_ON_STARTUP")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(upload_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.upload_dir = upload_dir.into();
        config.http_port = http_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
