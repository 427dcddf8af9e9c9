//! JSON 家庭记录解析
//!
//! 两个互不依赖的 JSON 库：serde_json 的 `Value` 和 json 库的 `JsonValue`。

use super::{read_utf8, LAST_NAME};
use crate::resources::{consume, ResourceBundle};
use crate::{Result, XletError};
use tracing::info;

/// 使用 serde_json 通用值模型读取顶层 `lastName`
pub fn json_value_last_name(bundle: &dyn ResourceBundle, name: &str) -> Result<Option<String>> {
    consume(bundle, name, |stream| {
        let text = read_utf8(stream)?;
        let family: serde_json::Value = serde_json::from_str(&text)?;
        let last_name = match family.get(LAST_NAME) {
            Some(serde_json::Value::String(value)) => value.clone(),
            Some(other) => other.to_string(),
            None => return Err(XletError::missing_field("family.lastName")),
        };

        info!("family.lastName: {}", last_name);
        Ok(last_name)
    })
}

/// 使用 json 库的对象模型读取顶层 `lastName`
pub fn json_object_last_name(bundle: &dyn ResourceBundle, name: &str) -> Result<Option<String>> {
    consume(bundle, name, |stream| {
        let text = read_utf8(stream)?;
        let family = json::parse(&text)?;
        if !family.is_object() {
            return Err(XletError::UnexpectedElement {
                expected: "JSON object".to_string(),
                found: family.dump(),
            });
        }
        if !family.has_key(LAST_NAME) {
            return Err(XletError::missing_field("family.lastName"));
        }

        let value = &family[LAST_NAME];
        let last_name = value.as_str().map(str::to_owned).unwrap_or_else(|| value.dump());

        info!("family.lastName: {}", last_name);
        Ok(last_name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::capture::CapturedLogs;
    use crate::resources::testing::TrackedStream;
    use crate::resources::{EmbeddedBundle, MockResourceBundle, FAMILY_JSON};
    use std::io::{Cursor, Read};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn bundle_with(text: &'static str) -> MockResourceBundle {
        let mut bundle = MockResourceBundle::new();
        bundle
            .expect_open()
            .returning(move |_| Ok(Some(Box::new(Cursor::new(text.as_bytes())) as Box<dyn Read>)));
        bundle
    }

    #[test]
    fn test_both_libraries_agree() {
        let logs = CapturedLogs::default();
        let handle = logs.handle();
        let bundle = EmbeddedBundle::new();

        let (value, object) = handle.scope(|| {
            (
                json_value_last_name(&bundle, FAMILY_JSON).unwrap(),
                json_object_last_name(&bundle, FAMILY_JSON).unwrap(),
            )
        });

        assert_eq!(value.as_deref(), Some("Doe"));
        assert_eq!(value, object);
        assert_eq!(logs.count_containing("family.lastName: Doe"), 2);
    }

    #[test]
    fn test_non_string_values_use_json_text() {
        let bundle = bundle_with(r#"{"lastName": 42}"#);

        assert_eq!(json_value_last_name(&bundle, "family.json").unwrap().as_deref(), Some("42"));
        assert_eq!(json_object_last_name(&bundle, "family.json").unwrap().as_deref(), Some("42"));
    }

    #[test]
    fn test_missing_key() {
        let bundle = bundle_with(r#"{"firstName": "John"}"#);

        assert!(matches!(
            json_value_last_name(&bundle, "family.json"),
            Err(XletError::MissingField { .. })
        ));
        assert!(matches!(
            json_object_last_name(&bundle, "family.json"),
            Err(XletError::MissingField { .. })
        ));
    }

    #[test]
    fn test_top_level_array() {
        let bundle = bundle_with(r#"["Doe"]"#);

        assert!(matches!(
            json_value_last_name(&bundle, "family.json"),
            Err(XletError::MissingField { .. })
        ));
        assert!(matches!(
            json_object_last_name(&bundle, "family.json"),
            Err(XletError::UnexpectedElement { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        let bundle = bundle_with(r#"{"lastName": "Doe""#);

        assert!(matches!(json_value_last_name(&bundle, "family.json"), Err(XletError::Json(_))));
        assert!(matches!(
            json_object_last_name(&bundle, "family.json"),
            Err(XletError::JsonObject(_))
        ));
    }

    #[test]
    fn test_stream_released_once_per_call() {
        let closed = Arc::new(AtomicUsize::new(0));
        let tracked = closed.clone();
        let mut bundle = MockResourceBundle::new();
        bundle.expect_open().times(2).returning(move |_| {
            Ok(Some(Box::new(TrackedStream::new(br#"{"lastName":"Doe"}"#, tracked.clone())) as Box<dyn Read>))
        });

        json_value_last_name(&bundle, "family.json").unwrap();
        json_object_last_name(&bundle, "family.json").unwrap();
        assert_eq!(closed.load(Ordering::SeqCst), 2);
    }
}
