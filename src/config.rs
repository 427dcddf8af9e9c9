//! xlet-demo 配置管理
//!
//! 支持 YAML 配置文件和环境变量，缺省时使用内置默认值

use crate::resources::{
    DirectoryBundle, EmbeddedBundle, ResourceBundle, APPLICATION_PROPERTIES, FAMILY_JSON, FAMILY_XML,
    LOGGING_PROPERTIES,
};
use crate::{Result, XletError};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// 配置文件路径的环境变量
pub const CONFIG_ENV: &str = "XLET_DEMO_CONFIG";
/// 资源目录的环境变量
pub const RESOURCES_ENV: &str = "XLET_DEMO_RESOURCES";

/// 家庭记录所在的命名空间
pub const FAMILY_NAMESPACE: &str = "http://github.com/jinahya/test";

/// 应用配置
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// 资源配置
    pub resources: ResourceSettings,
    /// XML 解析配置
    pub xml: XmlSettings,
}

/// 资源配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceSettings {
    /// 资源目录，未设置时使用内置资源
    pub root: Option<PathBuf>,
    pub application_properties: String,
    pub logging_properties: String,
    pub family_xml: String,
    pub family_json: String,
}

impl Default for ResourceSettings {
    fn default() -> Self {
        Self {
            root: None,
            application_properties: APPLICATION_PROPERTIES.to_string(),
            logging_properties: LOGGING_PROPERTIES.to_string(),
            family_xml: FAMILY_XML.to_string(),
            family_json: FAMILY_JSON.to_string(),
        }
    }
}

/// XML 解析配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XmlSettings {
    /// 是否解析命名空间
    pub namespace_aware: bool,
    /// 根元素要求的命名空间
    pub family_namespace: String,
    /// 根元素要求的名称
    pub family_element: String,
}

impl Default for XmlSettings {
    fn default() -> Self {
        Self {
            namespace_aware: true,
            family_namespace: FAMILY_NAMESPACE.to_string(),
            family_element: "family".to_string(),
        }
    }
}

impl DemoConfig {
    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            XletError::config(&format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        Self::from_yaml_str(&content)
    }

    /// 从 YAML 文本解析配置
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| XletError::config(&format!("Failed to parse config file: {}", e)))
    }

    /// 序列化为 YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| XletError::config(&format!("Failed to serialize config: {}", e)))
    }

    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        Self::resolve(std::env::var_os(CONFIG_ENV), std::env::var_os(RESOURCES_ENV))
    }

    /// 合并配置文件和资源目录覆盖
    pub fn resolve(config_path: Option<OsString>, resources_root: Option<OsString>) -> Result<Self> {
        let mut config = match config_path.filter(|p| !p.is_empty()) {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };

        if let Some(root) = resources_root.filter(|r| !r.is_empty()) {
            config.resources.root = Some(PathBuf::from(root));
        }

        Ok(config)
    }

    /// 创建配置的资源包
    pub fn bundle(&self) -> Result<Box<dyn ResourceBundle>> {
        match &self.resources.root {
            Some(root) => Ok(Box::new(DirectoryBundle::new(root)?)),
            None => Ok(Box::new(EmbeddedBundle::new())),
        }
    }
}
