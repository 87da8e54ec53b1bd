//! 설정 파일에 선언된 Task
//!
//! `command`가 있으면 플랫폼 셸로 실행하고, 없으면 의존성만 묶는 별칭입니다.

use super::context::TaskContext;
use super::definition::TaskDefinition;
use kiln_foundation::TaskConfig;
use serde_json::Value;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// 설정 항목으로 Task 정의 생성
pub fn script_task(name: &str, config: &TaskConfig) -> TaskDefinition {
    let description = config.description.clone().unwrap_or_else(|| match &config.command {
        Some(command) => format!("Run `{}`", command),
        None => format!("Run {}", config.dependencies.join(", ")),
    });

    let command = config.command.clone();
    let mut task = TaskDefinition::new(name, description, move |ctx: TaskContext| {
        let command = command.clone();
        async move {
            match command {
                Some(command) => run_command(&command, &ctx).await,
                None => Ok(Value::Null),
            }
        }
    });

    task.dependencies = config.dependencies.clone();
    task.params = config.params.clone();
    task
}

async fn run_command(command: &str, ctx: &TaskContext) -> anyhow::Result<Value> {
    let (shell, shell_arg) = if cfg!(windows) { ("cmd", "/C") } else { ("sh", "-c") };

    let mut env = vec![("KILN_NETWORK".to_string(), ctx.network_name.clone())];
    if let Some(url) = &ctx.network.url {
        env.push(("KILN_NETWORK_URL".to_string(), url.clone()));
    }
    for (name, value) in &ctx.params {
        let value = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        env.push((param_env_name(name), value));
    }

    debug!("Executing task command: {}", command);

    let status = Command::new(shell)
        .arg(shell_arg)
        .arg(command)
        .envs(env)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await?;

    if !status.success() {
        anyhow::bail!("`{}` failed with exit code: {:?}", command, status.code());
    }

    Ok(Value::Null)
}

fn param_env_name(name: &str) -> String {
    let normalized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    format!("KILN_PARAM_{}", normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolvedConfig;
    use std::sync::Arc;

    fn context() -> TaskContext {
        TaskContext::new(Arc::new(ResolvedConfig::default()), "localhost", Default::default())
    }

    #[test]
    fn test_param_env_name() {
        assert_eq!(param_env_name("gas-limit"), "KILN_PARAM_GAS_LIMIT");
        assert_eq!(param_env_name("tag"), "KILN_PARAM_TAG");
    }

    #[test]
    fn test_alias_description() {
        let config = TaskConfig {
            dependencies: vec!["compile".into(), "test".into()],
            ..Default::default()
        };
        let task = script_task("ci", &config);
        assert_eq!(task.description, "Run compile, test");
        assert_eq!(task.dependencies, vec!["compile", "test"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_receives_params() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        let config = TaskConfig {
            command: Some(format!(
                "printf '%s@%s' \"$KILN_PARAM_TAG\" \"$KILN_NETWORK\" > {}",
                out.display()
            )),
            ..Default::default()
        };

        let task = script_task("write", &config);
        let mut params = crate::task::TaskParams::new();
        params.insert("tag".into(), Value::String("v1".into()));

        (task.action)(context().with_params(params)).await.unwrap();
        assert_eq!(std::fs::read_to_string(out).unwrap(), "v1@localhost");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_command() {
        let config = TaskConfig {
            command: Some("exit 3".into()),
            ..Default::default()
        };
        let err = (script_task("fail", &config).action)(context()).await.unwrap_err();
        assert!(err.to_string().contains("exit code"));
    }
}
