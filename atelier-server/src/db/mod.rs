//! 数据访问层
//!
//! 持久化委托给托管数据库服务 (PostgREST 风格)，本层只做适配：
//!
//! - [`store`] - 存储适配接口 ([`Store`]) 与过滤器
//! - [`postgrest`] - 托管服务实现 (reqwest)
//! - [`memory`] - 内存实现 (开发 / 测试)
//! - [`models`] - 领域模型
//! - [`repository`] - 按表封装的类型化仓库

pub mod memory;
pub mod models;
pub mod postgrest;
pub mod repository;
pub mod store;

pub use memory::MemoryStore;
pub use postgrest::PostgrestStore;
pub use store::{Filter, Store, StoreError, StoreHandle, StoreResult};
