//! 资源包
//!
//! 按名称解析随程序分发的只读资源，并以作用域方式把字节流交给消费者

use crate::Result;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Component, Path, PathBuf};
use tracing::{error, info};

/// 应用属性资源
pub const APPLICATION_PROPERTIES: &str = "application.properties";
/// 日志配置资源
pub const LOGGING_PROPERTIES: &str = "logging.properties";
/// XML 家庭记录
pub const FAMILY_XML: &str = "example/family.xml";
/// JSON 家庭记录
pub const FAMILY_JSON: &str = "example/family.json";

/// 资源包接口
///
/// `Ok(None)` 表示资源不存在，不属于错误。
#[cfg_attr(test, mockall::automock)]
pub trait ResourceBundle {
    fn open(&self, name: &str) -> io::Result<Option<Box<dyn Read>>>;
}

/// 去掉类路径风格的前导 `/`
fn relative_name(name: &str) -> &str {
    name.trim_start_matches('/')
}

/// 基于文件系统目录的资源包
#[derive(Debug, Clone)]
pub struct DirectoryBundle {
    root: PathBuf,
}

impl DirectoryBundle {
    /// 创建目录资源包，根目录必须存在
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(crate::XletError::config(&format!(
                "Resource root is not a directory: {}",
                root.display()
            )));
        }

        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceBundle for DirectoryBundle {
    fn open(&self, name: &str) -> io::Result<Option<Box<dyn Read>>> {
        let relative = Path::new(relative_name(name));
        // 不允许跳出根目录
        if relative.as_os_str().is_empty()
            || relative.components().any(|c| !matches!(c, Component::Normal(_)))
        {
            return Ok(None);
        }

        let file = match File::open(self.root.join(relative)) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        // 目录等非普通文件视为不存在
        if !file.metadata()?.is_file() {
            return Ok(None);
        }

        Ok(Some(Box::new(file)))
    }
}

static EMBEDDED: Lazy<HashMap<&'static str, &'static [u8]>> = Lazy::new(|| {
    let mut resources: HashMap<&'static str, &'static [u8]> = HashMap::new();
    resources.insert(
        APPLICATION_PROPERTIES,
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/application.properties")),
    );
    resources.insert(
        LOGGING_PROPERTIES,
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/logging.properties")),
    );
    resources.insert(
        FAMILY_XML,
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/example/family.xml")),
    );
    resources.insert(
        FAMILY_JSON,
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/example/family.json")),
    );
    resources
});

/// 编译进二进制的资源包（默认）
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedBundle;

impl EmbeddedBundle {
    pub fn new() -> Self {
        Self
    }

    /// 已打包的资源名称
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = EMBEDDED.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl ResourceBundle for EmbeddedBundle {
    fn open(&self, name: &str) -> io::Result<Option<Box<dyn Read>>> {
        Ok(EMBEDDED
            .get(relative_name(name))
            .map(|bytes| Box::new(Cursor::new(*bytes)) as Box<dyn Read>))
    }
}

/// 打开资源并交给消费者
///
/// 资源不存在时记录一条错误日志并返回 `Ok(None)`，消费者不会被调用。
/// 否则消费者恰好被调用一次，流在所有退出路径上都会被释放，
/// 消费者的错误原样向上传递。
pub fn consume<T, F>(bundle: &dyn ResourceBundle, name: &str, consumer: F) -> Result<Option<T>>
where
    F: FnOnce(&mut dyn Read) -> Result<T>,
{
    info!("consuming resource: {}", name);

    let mut stream = match bundle.open(name)? {
        Some(stream) => stream,
        None => {
            error!("failed to load {}", name);
            return Ok(None);
        }
    };

    let value = consumer(stream.as_mut())?;
    Ok(Some(value))
}
