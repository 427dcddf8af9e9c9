//! Xlet 生命周期
//!
//! 宿主规定的四个回调：初始化、启动、暂停、销毁。
//! 状态迁移 Loaded → Paused ⇄ Active → Destroyed，非法迁移会被拒绝且不改变状态。
//! 宿主保证回调串行执行。

use crate::config::DemoConfig;
use crate::family::{StartReport, XmlParserFactory};
use crate::logging::LogHandle;
use crate::properties::print_properties;
use crate::resources::ResourceBundle;
use crate::{Result, XletError};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

/// 生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum XletState {
    /// 已加载
    Loaded,
    /// 已暂停
    Paused,
    /// 运行中
    Active,
    /// 已销毁
    Destroyed,
}

impl XletState {
    /// 是否允许迁移到目标状态
    pub fn can_transition_to(self, to: XletState) -> bool {
        use XletState::*;
        matches!(
            (self, to),
            (Loaded, Paused) | (Paused, Active) | (Active, Paused) | (Loaded | Paused | Active, Destroyed)
        )
    }
}

/// 演示应用
pub struct Xlet {
    state: XletState,
    config: DemoConfig,
    bundle: Box<dyn ResourceBundle>,
    logging: LogHandle,
}

impl Xlet {
    /// 按配置创建，日志系统在这里初始化一次
    pub fn new(config: DemoConfig) -> Result<Self> {
        let bundle = config.bundle()?;
        let logging = LogHandle::init(bundle.as_ref(), &config.resources.logging_properties);
        Ok(Self::with_parts(config, bundle, logging))
    }

    /// 使用现成的资源包和日志句柄创建
    pub fn with_parts(config: DemoConfig, bundle: Box<dyn ResourceBundle>, logging: LogHandle) -> Self {
        Self {
            state: XletState::Loaded,
            config,
            bundle,
            logging,
        }
    }

    pub fn state(&self) -> XletState {
        self.state
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    pub fn logging(&self) -> &LogHandle {
        &self.logging
    }

    /// 检查当前状态是否为该回调允许的源状态
    fn guard(&self, from: &[XletState], to: XletState) -> Result<()> {
        if from.contains(&self.state) && self.state.can_transition_to(to) {
            Ok(())
        } else {
            error!("invalid transition {:?} -> {:?}", self.state, to);
            Err(XletError::InvalidTransition { from: self.state, to })
        }
    }

    /// Loaded → Paused：报告两个属性资源，失败只记录日志
    pub fn init_xlet(&mut self) -> Result<()> {
        let logging = self.logging.clone();
        logging.scope(|| {
            debug!("initXlet()");
            self.guard(&[XletState::Loaded], XletState::Paused)?;

            let resources = &self.config.resources;
            for name in [&resources.application_properties, &resources.logging_properties] {
                if let Err(e) = print_properties(self.bundle.as_ref(), name) {
                    error!("failed to print {}: {}", name, e);
                }
            }

            self.state = XletState::Paused;
            Ok(())
        })
    }

    /// Paused → Active：创建 XML 解析器工厂并执行全部解析方式
    ///
    /// 只有工厂创建失败会让迁移失败，此时状态保持 Paused。
    pub fn start_xlet(&mut self) -> Result<StartReport> {
        let logging = self.logging.clone();
        logging.scope(|| {
            debug!("startXlet()");
            self.guard(&[XletState::Paused], XletState::Active)?;

            let factory = match XmlParserFactory::new(&self.config.xml) {
                Ok(factory) => factory,
                Err(e) => {
                    error!("failed to create XML parser factory: {}", e);
                    return Err(XletError::state_change(&e.to_string()));
                }
            };

            let report = StartReport::run_all(self.bundle.as_ref(), &self.config.resources, &factory);
            if report.failures() > 0 {
                info!("{} of {} family parsers failed", report.failures(), report.outcomes.len());
            }

            self.state = XletState::Active;
            Ok(report)
        })
    }

    /// Active → Paused：只记录日志
    pub fn pause_xlet(&mut self) -> Result<()> {
        let logging = self.logging.clone();
        logging.scope(|| {
            debug!("pauseXlet()");
            self.guard(&[XletState::Active], XletState::Paused)?;
            self.state = XletState::Paused;
            Ok(())
        })
    }

    /// 销毁并关闭日志系统，不可逆
    ///
    /// 运行中且非无条件销毁时拒绝，状态不变。
    pub fn destroy_xlet(&mut self, unconditional: bool) -> Result<()> {
        let logging = self.logging.clone();
        logging.scope(|| {
            debug!("destroyXlet({})", unconditional);
            self.guard(
                &[XletState::Loaded, XletState::Paused, XletState::Active],
                XletState::Destroyed,
            )?;

            if self.state == XletState::Active && !unconditional {
                info!("conditional destroy refused while active");
                return Err(XletError::state_change("xlet is active; destroy is not unconditional"));
            }

            self.state = XletState::Destroyed;
            Ok(())
        })?;

        self.logging.shutdown();
        Ok(())
    }
}

impl std::fmt::Debug for Xlet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Xlet")
            .field("state", &self.state)
            .field("config", &self.config)
            .field("logging", &self.logging)
            .finish()
    }
}
