//! 业务服务层
//!
//! - [`auth`] - 管理员认证与启动引导
//! - [`catalog`] - 商品目录
//! - [`order`] - 下单与库存扣减
//! - [`blob`] - 文件存储 (托管 + 本地回退)

pub mod auth;
pub mod blob;
pub mod catalog;
pub mod order;

pub use auth::AuthService;
pub use blob::{BlobService, BlobStore, HostedBlobStore, LocalBlobStore};
pub use catalog::CatalogService;
pub use order::{AllowAny, OrderService, TransitionPolicy};
