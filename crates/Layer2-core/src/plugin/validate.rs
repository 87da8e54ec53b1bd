//! Plugin 구조 검증
//!
//! 호출 가능 여부나 필드 타입은 타입 시스템이 보장하므로, 여기서는 값 수준의
//! 계약만 검사합니다.

use super::types::Plugin;
use kiln_foundation::{Error, Result};

/// ID가 비어 있을 때 에러 메시지에 사용하는 이름
const UNNAMED: &str = "<unnamed>";

/// 플러그인 구조 검증
pub fn validate_plugin(plugin: &Plugin) -> Result<()> {
    if plugin.id.trim().is_empty() {
        return Err(Error::plugin_validation(UNNAMED, "id", "must not be empty"));
    }

    if let Some(package) = &plugin.package {
        if package.trim().is_empty() {
            return Err(Error::plugin_validation(
                &plugin.id,
                "package",
                "must not be blank when present",
            ));
        }
    }

    for (index, task) in plugin.tasks.iter().enumerate() {
        if task.name.is_empty() {
            return Err(Error::plugin_validation(
                &plugin.id,
                format!("tasks[{}].name", index),
                "must not be empty",
            ));
        }

        if task.name.chars().any(char::is_whitespace) {
            return Err(Error::plugin_validation(
                &plugin.id,
                format!("tasks[{}].name", index),
                format!("'{}' must not contain whitespace", task.name),
            ));
        }

        if task.dependencies.iter().any(|dep| dep.trim().is_empty()) {
            return Err(Error::plugin_validation(
                &plugin.id,
                format!("tasks[{}].dependencies", index),
                "must not contain empty task names",
            ));
        }

        if task.params.keys().any(|param| param.trim().is_empty()) {
            return Err(Error::plugin_validation(
                &plugin.id,
                format!("tasks[{}].params", index),
                "must not contain empty parameter names",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskDefinition;
    use serde_json::Value;

    fn noop(name: &str) -> TaskDefinition {
        TaskDefinition::new(name, "noop", |_| async { Ok(Value::Null) })
    }

    fn field_of(result: Result<()>) -> (String, String) {
        match result {
            Err(Error::PluginValidation {
                plugin_id, field, ..
            }) => (plugin_id, field),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_valid_plugin() {
        let plugin = Plugin::new("kiln-ethers")
            .with_package("@kiln/ethers")
            .with_task(noop("console"));
        assert!(validate_plugin(&plugin).is_ok());
    }

    #[test]
    fn test_empty_id() {
        let (id, field) = field_of(validate_plugin(&Plugin::new("  ")));
        assert_eq!(id, UNNAMED);
        assert_eq!(field, "id");
    }

    #[test]
    fn test_blank_package() {
        let plugin = Plugin::new("p").with_package("");
        assert_eq!(field_of(validate_plugin(&plugin)), ("p".into(), "package".into()));
    }

    #[test]
    fn test_task_without_name() {
        let plugin = Plugin::new("p").with_task(noop("ok")).with_task(noop(""));
        assert_eq!(
            field_of(validate_plugin(&plugin)),
            ("p".into(), "tasks[1].name".into())
        );
    }

    #[test]
    fn test_task_with_empty_dependency() {
        let plugin = Plugin::new("p").with_task(noop("deploy").depends_on(""));
        assert_eq!(
            field_of(validate_plugin(&plugin)),
            ("p".into(), "tasks[0].dependencies".into())
        );
    }
}
