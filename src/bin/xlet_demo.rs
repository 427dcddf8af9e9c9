//! xlet-demo 命令行入口
//!
//! 忽略命令行参数，只报告两个属性资源后退出

use anyhow::Context;
use xlet_demo::{
    config::DemoConfig, logging::LogHandle, properties::print_properties, ResourceBundle, APPLICATION_NAME,
    VERSION,
};

/// 程序入口点
fn main() {
    let config = match DemoConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ 配置加载失败: {}", e);
            std::process::exit(1);
        }
    };
    let bundle = match config.bundle() {
        Ok(bundle) => bundle,
        Err(e) => {
            eprintln!("❌ 资源加载失败: {}", e);
            std::process::exit(1);
        }
    };

    // 初始化日志系统
    let mut logging = LogHandle::init(bundle.as_ref(), &config.resources.logging_properties);

    // 运行主逻辑并处理错误
    let result = logging.scope(|| run_main(bundle.as_ref(), &config));
    if let Err(e) = &result {
        logging.scope(|| tracing::error!("❌ 程序运行失败: {:#}", e));
    }
    logging.shutdown();

    if result.is_err() {
        std::process::exit(1);
    }
}

/// 主要逻辑函数
fn run_main(bundle: &dyn ResourceBundle, config: &DemoConfig) -> anyhow::Result<()> {
    tracing::info!("🚀 {} v{}", APPLICATION_NAME, VERSION);

    let resources = &config.resources;
    let mut reported = 0;
    for name in [&resources.application_properties, &resources.logging_properties] {
        reported += print_properties(bundle, name).with_context(|| format!("failed to print {}", name))?;
    }

    tracing::info!("✅ reported {} properties", reported);
    Ok(())
}
