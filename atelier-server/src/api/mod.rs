//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 管理员认证接口
//! - [`products`] - 商品目录接口 (含分类、搜索)
//! - [`orders`] - 订单接口
//! - [`upload`] - 文件上传接口
//! - [`dashboard`] - 仪表盘统计接口

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod orders;
pub mod products;
pub mod upload;
