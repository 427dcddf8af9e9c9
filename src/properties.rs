//! 属性报告器
//!
//! 加载 `key=value` 属性资源并逐条记录

use crate::resources::ResourceBundle;
use crate::{Result, XletError};
use std::collections::HashMap;
use std::io::BufReader;
use tracing::{debug, info};

/// 加载属性资源
///
/// 资源不存在时返回空集合。
pub fn load_properties(bundle: &dyn ResourceBundle, name: &str) -> Result<HashMap<String, String>> {
    debug!("loading properties: {}", name);

    match bundle.open(name)? {
        Some(stream) => java_properties::read(BufReader::new(stream))
            .map_err(|e| XletError::properties(name, &e.to_string())),
        None => Ok(HashMap::new()),
    }
}

/// 记录属性资源中的每一项，返回记录的条数
pub fn print_properties(bundle: &dyn ResourceBundle, name: &str) -> Result<usize> {
    info!("printing properties: {}", name);

    let properties = load_properties(bundle, name)?;
    for (key, value) in &properties {
        info!("{}={}", key, value);
    }

    Ok(properties.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::capture::CapturedLogs;
    use crate::resources::testing::{FailingStream, TrackedStream};
    use crate::resources::{EmbeddedBundle, MockResourceBundle, APPLICATION_PROPERTIES, LOGGING_PROPERTIES};
    use std::io::Read;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_load_application_properties() {
        let properties = load_properties(&EmbeddedBundle::new(), APPLICATION_PROPERTIES).unwrap();

        assert_eq!(properties.len(), 4);
        assert_eq!(properties["application.name"], "xlet-demo");
        assert_eq!(
            properties["application.description"],
            "Minimal Xlet demonstration: properties, XML and JSON"
        );
    }

    #[test]
    fn test_print_logs_one_line_per_key() {
        let logs = CapturedLogs::default();
        let handle = logs.handle();
        let bundle = EmbeddedBundle::new();

        let count = handle.scope(|| print_properties(&bundle, LOGGING_PROPERTIES)).unwrap();

        assert_eq!(count, 5);
        // 一条 "printing properties" 加每个键一条
        assert_eq!(logs.count_containing(" INFO "), count + 1);
        assert_eq!(logs.count_containing("log.level=debug"), 1);
        assert_eq!(logs.count_containing("loading properties: logging.properties"), 1);
    }

    #[test]
    fn test_missing_resource_is_empty() {
        let logs = CapturedLogs::default();
        let handle = logs.handle();

        let mut bundle = MockResourceBundle::new();
        bundle.expect_open().returning(|_| Ok(None));

        let count = handle.scope(|| print_properties(&bundle, "absent.properties")).unwrap();

        assert_eq!(count, 0);
        assert_eq!(logs.count_containing(" INFO "), 1);
        assert_eq!(logs.count_containing("ERROR"), 0);
    }

    #[test]
    fn test_stream_released_after_load() {
        let closed = Arc::new(AtomicUsize::new(0));
        let tracked = closed.clone();

        let mut bundle = MockResourceBundle::new();
        bundle
            .expect_open()
            .times(1)
            .returning(move |_| Ok(Some(Box::new(TrackedStream::new(b"a=1\nb : 2\n", tracked.clone())) as Box<dyn Read>)));

        let properties = load_properties(&bundle, "tracked.properties").unwrap();

        assert_eq!(properties.len(), 2);
        assert_eq!(properties["b"], "2");
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_read_failure_propagates() {
        let mut bundle = MockResourceBundle::new();
        bundle
            .expect_open()
            .returning(|_| Ok(Some(Box::new(FailingStream) as Box<dyn Read>)));

        let result = print_properties(&bundle, "broken.properties");
        assert!(matches!(result, Err(XletError::Properties { .. })));
    }
}
