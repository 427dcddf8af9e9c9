//! 家庭记录解析
//!
//! 四种相互独立的解析方式：XML 树形、XML 拉取式、两个 JSON 库。
//! 每种方式都只提取 `lastName` 并记录一行日志。

pub mod json;
pub mod xml;

pub use json::{json_object_last_name, json_value_last_name};
pub use xml::{xml_pull_last_name, xml_tree_last_name, XmlParserFactory};

use crate::config::ResourceSettings;
use crate::resources::ResourceBundle;
use crate::Result;
use std::io::Read;
use tracing::error;

/// 提取的字段名
pub const LAST_NAME: &str = "lastName";

/// 解析方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FamilyStrategy {
    /// XML 树形解析
    XmlTree,
    /// XML 拉取式解析
    XmlPull,
    /// serde_json 通用值
    JsonValue,
    /// json 库对象模型
    JsonObject,
}

impl FamilyStrategy {
    /// 按执行顺序排列的全部方式
    pub const ALL: [FamilyStrategy; 4] = [
        FamilyStrategy::XmlTree,
        FamilyStrategy::XmlPull,
        FamilyStrategy::JsonValue,
        FamilyStrategy::JsonObject,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FamilyStrategy::XmlTree => "xml-tree",
            FamilyStrategy::XmlPull => "xml-pull",
            FamilyStrategy::JsonValue => "json-value",
            FamilyStrategy::JsonObject => "json-object",
        }
    }

    /// 执行解析，资源缺失时返回 `Ok(None)`
    pub fn run(
        &self,
        bundle: &dyn ResourceBundle,
        resources: &ResourceSettings,
        factory: &XmlParserFactory,
    ) -> Result<Option<String>> {
        match self {
            FamilyStrategy::XmlTree => xml_tree_last_name(bundle, &resources.family_xml, factory),
            FamilyStrategy::XmlPull => xml_pull_last_name(bundle, &resources.family_xml, factory),
            FamilyStrategy::JsonValue => json_value_last_name(bundle, &resources.family_json),
            FamilyStrategy::JsonObject => json_object_last_name(bundle, &resources.family_json),
        }
    }
}

/// 单个解析方式的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyOutcome {
    pub strategy: FamilyStrategy,
    /// 提取到的值，资源缺失或失败时为空
    pub last_name: Option<String>,
    /// 失败信息
    pub error: Option<String>,
}

impl StrategyOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// 一次启动中全部解析方式的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartReport {
    pub outcomes: Vec<StrategyOutcome>,
}

impl StartReport {
    /// 依次执行全部解析方式，单个失败只记录日志
    pub fn run_all(bundle: &dyn ResourceBundle, resources: &ResourceSettings, factory: &XmlParserFactory) -> Self {
        let outcomes = FamilyStrategy::ALL
            .iter()
            .map(|strategy| match strategy.run(bundle, resources, factory) {
                Ok(last_name) => StrategyOutcome {
                    strategy: *strategy,
                    last_name,
                    error: None,
                },
                Err(e) => {
                    error!("{} parse failed: {}", strategy.name(), e);
                    StrategyOutcome {
                        strategy: *strategy,
                        last_name: None,
                        error: Some(e.to_string()),
                    }
                }
            })
            .collect();

        Self { outcomes }
    }

    pub fn outcome(&self, strategy: FamilyStrategy) -> Option<&StrategyOutcome> {
        self.outcomes.iter().find(|o| o.strategy == strategy)
    }

    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }
}

/// 按 UTF-8 读取整个流
pub(crate) fn read_utf8(stream: &mut dyn Read) -> Result<String> {
    let mut text = String::new();
    stream.read_to_string(&mut text)?;
    Ok(text)
}
