//! XML 家庭记录解析
//!
//! 树形解析基于 roxmltree，拉取式解析基于 quick-xml 的 `NsReader`。

use super::{read_utf8, LAST_NAME};
use crate::config::XmlSettings;
use crate::resources::{consume, ResourceBundle};
use crate::{Result, XletError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use std::io::{BufRead, BufReader};
use tracing::{debug, info};

/// XML 解析器工厂
///
/// 每次启动只创建一次，所有 XML 解析方式共用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlParserFactory {
    namespace_aware: bool,
    family_namespace: String,
    family_element: String,
}

impl XmlParserFactory {
    pub fn new(settings: &XmlSettings) -> Result<Self> {
        if !is_nc_name(&settings.family_element) {
            return Err(XletError::parser_factory(&format!(
                "invalid element name: {:?}",
                settings.family_element
            )));
        }
        if settings.namespace_aware && settings.family_namespace.trim().is_empty() {
            return Err(XletError::parser_factory(
                "namespace-aware parsing requires a family namespace",
            ));
        }

        debug!(
            "XML parser factory: namespace_aware={}, element={{{}}}{}",
            settings.namespace_aware, settings.family_namespace, settings.family_element
        );

        Ok(Self {
            namespace_aware: settings.namespace_aware,
            family_namespace: settings.family_namespace.clone(),
            family_element: settings.family_element.clone(),
        })
    }

    pub fn is_namespace_aware(&self) -> bool {
        self.namespace_aware
    }

    /// 创建拉取式解析器
    pub fn new_pull_parser<R: BufRead>(&self, input: R) -> NsReader<R> {
        NsReader::from_reader(input)
    }

    /// 解析为文档树
    pub fn parse_tree<'input>(&self, text: &'input str) -> Result<roxmltree::Document<'input>> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        Ok(roxmltree::Document::parse_with_options(text, options)?)
    }

    fn expected(&self) -> String {
        format!("{{{}}}{}", self.family_namespace, self.family_element)
    }

    /// 要求元素是指定命名空间下的家庭根元素
    fn require_family(&self, namespace: &ResolveResult, element: &BytesStart) -> Result<()> {
        let (found_namespace, found_name) = if self.namespace_aware {
            let namespace = match namespace {
                ResolveResult::Bound(Namespace(ns)) => String::from_utf8_lossy(ns).into_owned(),
                _ => String::new(),
            };
            (namespace, String::from_utf8_lossy(element.local_name().as_ref()).into_owned())
        } else {
            // 不解析命名空间时，元素没有命名空间
            (String::new(), String::from_utf8_lossy(element.name().as_ref()).into_owned())
        };

        if found_namespace != self.family_namespace || found_name != self.family_element {
            return Err(XletError::UnexpectedElement {
                expected: self.expected(),
                found: format!("{{{}}}{}", found_namespace, found_name),
            });
        }

        Ok(())
    }
}

/// XML NCName 检查（不含冒号）
fn is_nc_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// 读取无前缀属性
fn unprefixed_attribute(element: &BytesStart, name: &str) -> Result<Option<String>> {
    for attribute in element.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        if attribute.key.prefix().is_none() && attribute.key.local_name().as_ref() == name.as_bytes() {
            return Ok(Some(attribute.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// 树形解析：读取根元素的 `lastName` 属性
pub fn xml_tree_last_name(
    bundle: &dyn ResourceBundle,
    name: &str,
    factory: &XmlParserFactory,
) -> Result<Option<String>> {
    consume(bundle, name, |stream| {
        let text = read_utf8(stream)?;
        let document = factory.parse_tree(&text)?;
        let family = document.root_element();
        let last_name = family
            .attribute(LAST_NAME)
            .ok_or_else(|| XletError::missing_field("family/@lastName"))?;

        info!("family/@lastName: {}", last_name);
        Ok(last_name.to_string())
    })
}

/// 拉取式解析：读到第一个开始标签，要求其为家庭根元素，再读取 `lastName` 属性
pub fn xml_pull_last_name(
    bundle: &dyn ResourceBundle,
    name: &str,
    factory: &XmlParserFactory,
) -> Result<Option<String>> {
    consume(bundle, name, |stream| {
        let mut reader = factory.new_pull_parser(BufReader::new(stream));
        let mut buf = Vec::new();

        loop {
            let (namespace, event) = reader.read_resolved_event_into(&mut buf)?;
            match event {
                Event::Start(element) | Event::Empty(element) => {
                    factory.require_family(&namespace, &element)?;
                    let last_name = unprefixed_attribute(&element, LAST_NAME)?
                        .ok_or_else(|| XletError::missing_field("family/@lastName"))?;

                    info!("family/@lastName: {}", last_name);
                    return Ok(last_name);
                }
                Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => {}
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Eof => {
                    return Err(XletError::UnexpectedElement {
                        expected: factory.expected(),
                        found: "end of document".to_string(),
                    })
                }
                other => {
                    return Err(XletError::UnexpectedElement {
                        expected: factory.expected(),
                        found: format!("{:?}", other),
                    })
                }
            }
            buf.clear();
        }
    })
}
