//! 시작 순서 전체 시나리오 테스트
//!
//! 설정 확장, Task 제공/재정의, 네임스페이스 부착, created Hook까지
//! 플러그인이 참여하는 전 과정을 검증합니다.

use kiln_core::{
    ConfigHooks, EnvironmentScope, Error, Kiln, KilnConfig, Plugin, PluginLoader,
    RuntimeCreatedContext, RuntimeHooks, TaskContext, TaskDefinition, TaskParams,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;

type Log = Arc<Mutex<Vec<String>>>;

/// 컴파일러 역할 플러그인: compile Task, artifacts 네임스페이스
fn compiler_plugin(log: &Log) -> Plugin {
    let extend_log = Arc::clone(log);

    Plugin::new("kiln-compiler")
        .with_package("@kiln/compiler")
        .with_task(TaskDefinition::new(
            "compile",
            "Compile contracts",
            |_| async { Ok(json!("compiled")) },
        ))
        .with_config_hooks(ConfigHooks::new().on_extend(|mut config| async move {
            if config.settings.extension("solidity").is_none() {
                config
                    .settings
                    .set_extension("solidity", json!({ "version": "0.8.24" }));
            }
            Ok(config)
        }))
        .with_runtime_hooks(RuntimeHooks::new().on_extend_environment(
            move |scope: EnvironmentScope| {
                let log = Arc::clone(&extend_log);
                async move {
                    scope.attach("artifacts", vec!["Token".to_string()])?;
                    log.lock().push(format!("extend:{}", scope.plugin_id()));
                    Ok(())
                }
            },
        ))
}

/// compile을 감싸는 플러그인 (compiler에 의존)
fn gas_plugin(compiler: &Arc<Plugin>, log: &Log) -> Plugin {
    let created_log = Arc::clone(log);

    Plugin::new("kiln-gas")
        .depends_on(compiler)
        .with_task(TaskDefinition::new(
            "compile",
            "Compile contracts and report gas",
            |ctx: TaskContext| async move {
                let inner = ctx.run_super().await?;
                Ok(json!(format!("{} + gas", inner.as_str().unwrap_or_default())))
            },
        ))
        .with_config_hooks(ConfigHooks::new().on_validate(|config| async move {
            let version = config
                .settings
                .extension("solidity")
                .and_then(|s| s.get("version"))
                .and_then(Value::as_str);
            Ok(match version {
                Some(_) => vec![],
                None => vec!["solidity.version is required".to_string()],
            })
        }))
        .with_runtime_hooks(RuntimeHooks::new().on_created(
            move |ctx: RuntimeCreatedContext| {
                let log = Arc::clone(&created_log);
                async move {
                    let artifacts = ctx
                        .namespace::<Vec<String>>("artifacts")
                        .ok_or_else(|| anyhow::anyhow!("artifacts not attached"))?;
                    log.lock()
                        .push(format!("created:{}:{}", ctx.plugin_id(), artifacts.len()));
                    Ok(())
                }
            },
        ))
}

#[tokio::test]
async fn test_full_bootstrap() {
    let log: Log = Arc::default();
    let compiler = Arc::new(compiler_plugin(&log));
    let gas = Arc::new(gas_plugin(&compiler, &log));

    let kiln = Kiln::builder()
        .plugin(gas)
        .bootstrap()
        .await
        .expect("bootstrap");

    // 의존성 순서
    assert_eq!(kiln.config().plugin_ids(), vec!["kiln-compiler", "kiln-gas"]);

    // extend 결과가 최종 설정에 반영됨
    assert_eq!(
        kiln.config().settings.extension("solidity"),
        Some(&json!({ "version": "0.8.24" }))
    );

    // 런타임 Hook 순서
    assert_eq!(
        *log.lock(),
        vec!["extend:kiln-compiler", "created:kiln-gas:1"]
    );

    // 재정의된 Task는 run_super로 이전 정의 호출
    let results = kiln.run("compile", TaskParams::new()).await.unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].success);
    assert_eq!(results[0].output, Some(json!("compiled + gas")));

    // 환경을 통한 실행
    let output = kiln
        .environment()
        .run_task("compile", TaskParams::new())
        .await
        .unwrap();
    assert_eq!(output, json!("compiled + gas"));
}

#[tokio::test]
async fn test_validation_reports_every_plugin() {
    let rejecting = |id: &'static str| {
        Arc::new(Plugin::new(id).with_config_hooks(
            ConfigHooks::new().on_validate(move |_| async move { Ok(vec![format!("{} says no", id)]) }),
        ))
    };

    let err = Kiln::builder()
        .plugin(rejecting("first"))
        .plugin(rejecting("second"))
        .bootstrap()
        .await
        .unwrap_err();

    match err {
        Error::ConfigValidation { messages } => assert_eq!(
            messages,
            vec!["[first] first says no", "[second] second says no"]
        ),
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn test_lazy_loader_failure_stops_bootstrap() {
    let plugin = Arc::new(Plugin::new("kiln-verify").with_dependency(PluginLoader::new(
        || async { Err::<Arc<Plugin>, _>(anyhow::anyhow!("package @kiln/ethers not found")) },
    )));

    let err = Kiln::builder().plugin(plugin).bootstrap().await.unwrap_err();
    match err {
        Error::PluginLoad { plugin_id, cause } => {
            assert_eq!(plugin_id, "kiln-verify");
            assert!(cause.contains("@kiln/ethers"));
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn test_config_tasks_and_failure_halt() {
    let mut settings: KilnConfig = serde_json::from_value(json!({
        "defaultNetwork": "hardhat",
        "networks": { "hardhat": { "url": "http://127.0.0.1:8545", "chainId": 31337 } },
        "tasks": { "ci": { "dependencies": ["fail", "after"] } }
    }))
    .unwrap();
    settings.set_extension("plugins", json!([]));

    let plugin = Arc::new(
        Plugin::new("p")
            .with_task(TaskDefinition::new("fail", "", |_| async {
                Err::<Value, _>(anyhow::anyhow!("revert"))
            }))
            .with_task(TaskDefinition::new("after", "", |_| async { Ok(Value::Null) })),
    );

    let kiln = Kiln::builder()
        .settings(settings)
        .plugin(plugin)
        .bootstrap()
        .await
        .unwrap();

    assert_eq!(kiln.network_name(), "hardhat");
    assert!(kiln.config().settings.extension("plugins").is_none());
    assert_eq!(kiln.plan("ci").unwrap(), vec!["fail", "after", "ci"]);

    let results = kiln.run("ci", TaskParams::new()).await.unwrap();
    assert_eq!(results.len(), 1);
    assert!(!results[0].success);
    assert!(results[0].error.as_deref().unwrap_or_default().contains("revert"));
}

#[tokio::test]
async fn test_unknown_task_suggestions() {
    let kiln = Kiln::builder().bootstrap().await.unwrap();

    match kiln.run("netwroks", TaskParams::new()).await {
        Err(Error::UnknownTask { suggestions, .. }) => {
            assert_eq!(suggestions, vec!["networks"]);
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn test_third_definition_calls_second() {
    let first = Arc::new(Plugin::new("first").with_task(TaskDefinition::new(
        "foo",
        "",
        |_| async { Ok(json!("first")) },
    )));
    let second = Arc::new(Plugin::new("second").with_task(TaskDefinition::new(
        "foo",
        "",
        |_| async { Ok(json!("second")) },
    )));
    let third = Arc::new(Plugin::new("third").with_task(TaskDefinition::new(
        "foo",
        "",
        |ctx: TaskContext| async move { ctx.run_super().await },
    )));

    let kiln = Kiln::builder()
        .plugins([first, second, third])
        .bootstrap()
        .await
        .unwrap();

    let results = kiln.run("foo", TaskParams::new()).await.unwrap();
    assert_eq!(results[0].output, Some(json!("second")));
}
