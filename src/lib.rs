//! xlet-demo - Xlet 风格的最小演示应用
//!
//! 加载两个属性资源并记录内容，再用四种方式解析示例家庭记录，
//! 每种方式记录一次 `lastName`。
//!
//! # 模块
//!
//! - **resources**: 按名称解析打包资源，作用域内消费字节流
//! - **properties**: 属性报告器
//! - **family**: XML（树形、拉取式）和 JSON（两个库）解析
//! - **lifecycle**: 宿主规定的四个生命周期回调
//! - **logging / config / error**: 日志、配置、错误处理

pub mod config;
pub mod error;
pub mod family;
pub mod lifecycle;
pub mod logging;
pub mod properties;
pub mod resources;

// 重新导出核心类型
pub use config::DemoConfig;
pub use error::*;
pub use family::{FamilyStrategy, StartReport, StrategyOutcome, XmlParserFactory};
pub use lifecycle::{Xlet, XletState};
pub use logging::{LogHandle, LoggingSettings};
pub use resources::{consume, DirectoryBundle, EmbeddedBundle, ResourceBundle};

/// 应用信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APPLICATION_NAME: &str = "xlet-demo";
