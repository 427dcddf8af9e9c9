//! 日志系统
//!
//! 日志输出由日志属性资源配置。`LogHandle` 显式创建、显式关闭，
//! 生命周期回调在 `LogHandle::scope` 内执行。

use crate::properties::load_properties;
use crate::resources::ResourceBundle;
use crate::Result;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, Dispatch};
use tracing_subscriber::fmt::MakeWriter;

/// 日志输出目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    Stderr,
    File(PathBuf),
}

/// 日志格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Full,
    Compact,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// 日志级别
    pub level: LevelFilter,
    /// 输出目标
    pub target: LogTarget,
    /// 输出格式
    pub format: LogFormat,
    /// 是否使用ANSI颜色
    pub ansi: bool,
    /// 是否输出时间戳
    pub timestamps: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LevelFilter::DEBUG,
            target: LogTarget::Stderr,
            format: LogFormat::Full,
            ansi: false,
            timestamps: true,
        }
    }
}

impl LoggingSettings {
    /// 从属性集合读取配置，无法识别的值沿用默认值
    pub fn from_properties(properties: &HashMap<String, String>) -> Self {
        let mut settings = Self::default();
        let get = |key: &str| properties.get(key).map(|v| v.trim());

        if let Some(level) = get("log.level").and_then(|v| v.parse::<LevelFilter>().ok()) {
            settings.level = level;
        }

        match get("log.target").map(str::to_ascii_lowercase).as_deref() {
            Some("stdout") => settings.target = LogTarget::Stdout,
            Some("file") => {
                if let Some(path) = get("log.file").filter(|p| !p.is_empty()) {
                    settings.target = LogTarget::File(PathBuf::from(path));
                }
            }
            _ => {}
        }

        if let Some("compact") = get("log.format").map(str::to_ascii_lowercase).as_deref() {
            settings.format = LogFormat::Compact;
        }
        if let Some(ansi) = get("log.ansi").and_then(|v| v.parse::<bool>().ok()) {
            settings.ansi = ansi;
        }
        if let Some(timestamps) = get("log.timestamps").and_then(|v| v.parse::<bool>().ok()) {
            settings.timestamps = timestamps;
        }

        settings
    }
}

/// 日志句柄
///
/// 关闭后 `scope` 内的日志全部丢弃，没有重新初始化的途径。
#[derive(Clone)]
pub struct LogHandle {
    dispatch: Option<Dispatch>,
}

impl LogHandle {
    /// 从日志属性资源初始化
    ///
    /// 配置缺失或无法读取时使用默认配置，不会失败。
    pub fn init(bundle: &dyn ResourceBundle, name: &str) -> Self {
        let (settings, load_error) = match load_properties(bundle, name) {
            Ok(properties) => (LoggingSettings::from_properties(&properties), None),
            Err(e) => (LoggingSettings::default(), Some(e)),
        };

        let (handle, sink_error) = match Self::from_settings(&settings) {
            Ok(handle) => (handle, None),
            Err(e) => (Self::with_writer(&settings, std::io::stderr), Some(e)),
        };

        handle.scope(|| {
            if let Some(e) = load_error {
                error!("failed to load logging configuration {}: {}", name, e);
            }
            if let Some(e) = sink_error {
                error!("failed to open log sink {:?}, using stderr: {}", settings.target, e);
            }
            debug!("logging configured from {}: {:?}", name, settings);
        });

        handle
    }

    /// 按配置的目标创建
    pub fn from_settings(settings: &LoggingSettings) -> Result<Self> {
        match &settings.target {
            LogTarget::Stdout => Ok(Self::with_writer(settings, std::io::stdout)),
            LogTarget::Stderr => Ok(Self::with_writer(settings, std::io::stderr)),
            LogTarget::File(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                Ok(Self::with_writer(settings, Mutex::new(file)))
            }
        }
    }

    /// 使用指定的 writer 创建
    pub fn with_writer<W>(settings: &LoggingSettings, writer: W) -> Self
    where
        W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
    {
        let builder = tracing_subscriber::fmt()
            .with_max_level(settings.level)
            .with_ansi(settings.ansi)
            .with_writer(writer);

        let dispatch = match (settings.format, settings.timestamps) {
            (LogFormat::Full, true) => Dispatch::new(builder.finish()),
            (LogFormat::Full, false) => Dispatch::new(builder.without_time().finish()),
            (LogFormat::Compact, true) => Dispatch::new(builder.compact().finish()),
            (LogFormat::Compact, false) => Dispatch::new(builder.compact().without_time().finish()),
        };

        Self {
            dispatch: Some(dispatch),
        }
    }

    /// 在本句柄的日志上下文中执行
    pub fn scope<T, F: FnOnce() -> T>(&self, f: F) -> T {
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, f),
            None => tracing::dispatcher::with_default(&Dispatch::none(), f),
        }
    }

    pub fn is_active(&self) -> bool {
        self.dispatch.is_some()
    }

    /// 关闭日志系统
    pub fn shutdown(&mut self) {
        self.dispatch = None;
    }
}

impl std::fmt::Debug for LogHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogHandle")
            .field("active", &self.is_active())
            .finish()
    }
}
