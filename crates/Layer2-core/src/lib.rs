//! kiln-core: Orchestration core for Kiln
//!
//! Layer2 - Task, Plugin, Hook 실행 레이어
//!
//! # 주요 모듈
//!
//! - `task`: Task 정의, 레지스트리, 의존성 순서 실행
//! - `plugin`: Plugin 모델, 구조 검증, 의존성 해석
//! - `hook`: 설정 파이프라인 (extend -> validate -> resolve) 및 런타임 파이프라인
//! - `runtime`: 플러그인이 확장하는 공유 런타임 환경
//! - `config`: 사용자 설정 / 해석된 설정
//! - `kiln`: 시작 순서를 묶는 통합 인터페이스
//!
//! # 사용 예시
//!
//! ```ignore
//! use kiln_core::{Kiln, Plugin, TaskDefinition};
//!
//! let plugin = Plugin::new("kiln-greeter").with_task(TaskDefinition::new(
//!     "greet",
//!     "Say hello",
//!     |ctx| async move {
//!         println!("hello from {}", ctx.network_name);
//!         Ok(serde_json::Value::Null)
//!     },
//! ));
//!
//! let kiln = Kiln::builder().plugin(Arc::new(plugin)).bootstrap().await?;
//! let results = kiln.run("greet", Default::default()).await?;
//! ```

pub mod config;
pub mod hook;
pub mod kiln;
pub mod plugin;
pub mod runtime;
pub mod task;

// Re-exports: Facade
pub use kiln::{Kiln, KilnBuilder};

// Re-exports: Config
pub use config::{ResolvedConfig, UserConfig, PLUGINS_KEY};

// Re-exports: Task
pub use task::{
    action, builtin_tasks, script_task, TaskAction, TaskContext, TaskDefinition, TaskFuture,
    TaskOverride, TaskParams, TaskRegistry, TaskResult, TaskRunner,
};

// Re-exports: Plugin
pub use plugin::{validate_plugin, Plugin, PluginFuture, PluginLoader, PluginResolver};

// Re-exports: Hook
pub use hook::{
    ConfigHooks, HookHandlers, HookManager, ResolveNext, ResolverChain, RuntimeHooks,
};

// Re-exports: Runtime
pub use runtime::{EnvironmentScope, RuntimeCreatedContext, RuntimeEnvironment, TaskInvoker};

// Re-exports: Foundation
pub use kiln_foundation::{Error, KilnConfig, NetworkConfig, ParamDefinition, ParamKind, Result};
