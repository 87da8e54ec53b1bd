//! Kiln - 시작 순서를 묶는 통합 인터페이스
//!
//! ## 시작 순서
//! 1. 플러그인 의존성 해석 (`PluginResolver`)
//! 2. Hook 등록 후 설정 파이프라인 실행 (`HookManager::run_config_hooks`)
//! 3. Task 등록: 내장 -> 설정 파일 -> 플러그인
//! 4. 런타임 환경 생성 후 런타임 파이프라인 실행
//! 5. 요청한 Task 실행 (`TaskRunner`)
//!
//! ## 사용 예시
//! ```ignore
//! let kiln = Kiln::builder()
//!     .settings(config)
//!     .plugin(Arc::new(ethers_plugin()))
//!     .network("sepolia")
//!     .bootstrap()
//!     .await?;
//!
//! let params = kiln.parse_params("deploy", &raw_params)?;
//! let results = kiln.run("deploy", params).await?;
//! ```

use crate::config::{ResolvedConfig, UserConfig};
use crate::hook::HookManager;
use crate::plugin::{Plugin, PluginResolver};
use crate::runtime::{RuntimeEnvironment, TaskInvoker};
use crate::task::{
    builtin_tasks, script_task, TaskAction, TaskContext, TaskOverride, TaskParams, TaskRegistry,
    TaskResult, TaskRunner,
};
use async_trait::async_trait;
use kiln_foundation::{Error, KilnConfig, NetworkConfig, Result};
use serde_json::Value;
use std::sync::{Arc, Weak};
use tracing::{debug, info};

// ============================================================================
// TaskDispatch - 이름으로 Task 실행
// ============================================================================

/// 파라미터 바인딩과 run_super 연결을 포함한 Task 실행기
#[derive(Clone)]
struct TaskDispatch {
    registry: Arc<TaskRegistry>,
    config: Arc<ResolvedConfig>,
    network_name: String,
    network: NetworkConfig,
    verbose: bool,
    env: Weak<RuntimeEnvironment>,
}

impl TaskDispatch {
    fn bound_to(&self, env: Weak<RuntimeEnvironment>) -> Self {
        Self {
            env,
            ..self.clone()
        }
    }

    /// 요청한 Task용 컨텍스트 생성
    fn context(&self, name: &str, params: TaskParams) -> Result<TaskContext> {
        let task = self
            .registry
            .get(name)
            .ok_or_else(|| Error::unknown_task(name, self.registry.suggestions(name)))?;
        let params = task.bind_params(params)?;

        Ok(TaskContext::new(
            Arc::clone(&self.config),
            self.network_name.clone(),
            self.network.clone(),
        )
        .with_params(params)
        .with_verbose(self.verbose)
        .with_env(self.env.upgrade())
        .with_run_super(self.original_action(name)))
    }

    fn original_action(&self, name: &str) -> Option<TaskAction> {
        self.registry
            .original(name)
            .map(|original| Arc::clone(&original.action))
    }

    /// 의존성 Task도 각자의 이전 정의를 run_super로 받음
    async fn run(&self, name: &str, params: TaskParams) -> Result<Vec<TaskResult>> {
        let context = self.context(name, params)?;
        TaskRunner::new(&self.registry)
            .run_with(name, |task| context.clone().with_run_super(self.original_action(task)))
            .await
    }
}

#[async_trait]
impl TaskInvoker for TaskDispatch {
    async fn run_task(&self, name: &str, params: TaskParams) -> anyhow::Result<Value> {
        let results = self.run(name, params).await?;

        if let Some(failed) = results.iter().find(|r| !r.success) {
            anyhow::bail!(
                "Task '{}' failed: {}",
                failed.name,
                failed.error.as_deref().unwrap_or("unknown error")
            );
        }

        Ok(results
            .into_iter()
            .last()
            .and_then(|r| r.output)
            .unwrap_or(Value::Null))
    }
}

// ============================================================================
// Kiln
// ============================================================================

/// 초기화가 끝난 실행 환경
pub struct Kiln {
    config: Arc<ResolvedConfig>,
    registry: Arc<TaskRegistry>,
    env: Arc<RuntimeEnvironment>,
    dispatch: TaskDispatch,
}

impl Kiln {
    pub fn builder() -> KilnBuilder {
        KilnBuilder::new()
    }

    /// 최종 설정
    pub fn config(&self) -> &Arc<ResolvedConfig> {
        &self.config
    }

    /// Task 레지스트리
    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// 런타임 환경
    pub fn environment(&self) -> &Arc<RuntimeEnvironment> {
        &self.env
    }

    /// 선택된 네트워크 이름
    pub fn network_name(&self) -> &str {
        &self.dispatch.network_name
    }

    /// `KEY[=VALUE]` 목록을 Task 파라미터로 변환
    pub fn parse_params(&self, task_name: &str, raw: &[(String, Option<String>)]) -> Result<TaskParams> {
        let task = self
            .registry
            .get(task_name)
            .ok_or_else(|| Error::unknown_task(task_name, self.registry.suggestions(task_name)))?;
        task.parse_params(raw)
    }

    /// 실행 계획 (실행하지 않음)
    pub fn plan(&self, task_name: &str) -> Result<Vec<String>> {
        TaskRunner::new(&self.registry).plan(task_name)
    }

    /// Task 실행
    ///
    /// 해석 에러는 `Err`, Task 실패는 결과 목록에 기록됩니다.
    pub async fn run(&self, task_name: &str, params: TaskParams) -> Result<Vec<TaskResult>> {
        self.dispatch.run(task_name, params).await
    }
}

impl std::fmt::Debug for Kiln {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kiln")
            .field("network", &self.dispatch.network_name)
            .field("plugins", &self.config.plugin_ids())
            .field("tasks", &self.registry.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// KilnBuilder
// ============================================================================

/// Kiln 빌더
pub struct KilnBuilder {
    settings: KilnConfig,
    plugins: Vec<Arc<Plugin>>,
    overrides: Vec<(String, TaskOverride)>,
    network: Option<String>,
    verbose: bool,
    builtins: bool,
}

impl Default for KilnBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl KilnBuilder {
    pub fn new() -> Self {
        Self {
            settings: KilnConfig::default(),
            plugins: Vec::new(),
            overrides: Vec::new(),
            network: None,
            verbose: false,
            builtins: true,
        }
    }

    /// 설정 파일 내용
    pub fn settings(mut self, settings: KilnConfig) -> Self {
        self.settings = settings;
        self
    }

    /// 최상위 플러그인 추가
    pub fn plugin(mut self, plugin: Arc<Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn plugins(mut self, plugins: impl IntoIterator<Item = Arc<Plugin>>) -> Self {
        self.plugins.extend(plugins);
        self
    }

    /// 등록이 끝난 Task의 일부 필드 교체
    pub fn override_task(mut self, name: impl Into<String>, partial: TaskOverride) -> Self {
        self.overrides.push((name.into(), partial));
        self
    }

    /// 네트워크 선택 (없으면 `defaultNetwork`, 그것도 없으면 `localhost`)
    pub fn network(mut self, name: impl Into<String>) -> Self {
        self.network = Some(name.into());
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// 내장 Task 제외
    pub fn without_builtins(mut self) -> Self {
        self.builtins = false;
        self
    }

    /// 시작 순서대로 초기화
    pub async fn bootstrap(self) -> Result<Kiln> {
        let user_config = UserConfig::new(self.settings).with_plugins(self.plugins);

        // 1. 플러그인 해석
        let resolved_plugins = PluginResolver::new().resolve(&user_config.plugins).await?;

        // 2. 설정 파이프라인
        let mut hooks = HookManager::new();
        for plugin in &resolved_plugins {
            hooks.register_plugin(plugin);
        }
        let config = Arc::new(hooks.run_config_hooks(user_config, &resolved_plugins).await?);

        // 3. Task 등록
        let mut registry = build_registry(&config, self.builtins);
        for (name, partial) in self.overrides {
            registry.override_task(&name, partial)?;
        }
        let registry = Arc::new(registry);
        info!("Registered {} tasks", registry.len());

        let network_name = config.settings.network_name(self.network.as_deref());
        let network = config.settings.network(&network_name)?;
        debug!("Using network {}", network_name);

        // 4. 런타임 환경
        let dispatch = TaskDispatch {
            registry: Arc::clone(&registry),
            config: Arc::clone(&config),
            network_name,
            network,
            verbose: self.verbose,
            env: Weak::new(),
        };
        let env = Arc::new_cyclic(|weak| {
            RuntimeEnvironment::new(Arc::clone(&config), Arc::new(dispatch.bound_to(weak.clone())))
        });
        let dispatch = dispatch.bound_to(Arc::downgrade(&env));

        hooks.run_extend_environment_hooks(&env).await?;
        hooks.run_runtime_created_hooks(&env).await?;

        Ok(Kiln {
            config,
            registry,
            env,
            dispatch,
        })
    }
}

/// 내장 -> 설정 파일 -> 플러그인(해석 순서) 순으로 등록
fn build_registry(config: &ResolvedConfig, builtins: bool) -> TaskRegistry {
    let mut registry = TaskRegistry::new();

    if builtins {
        for task in builtin_tasks() {
            registry.register(task);
        }
    }

    for (name, task_config) in &config.settings.tasks {
        registry.register(script_task(name, task_config));
    }

    for plugin in &config.plugins {
        for task in &plugin.tasks {
            debug!("Plugin {} provides task {}", plugin.id, task.name);
            registry.register(task.clone());
        }
    }

    registry
}
