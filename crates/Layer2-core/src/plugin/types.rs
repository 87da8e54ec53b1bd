//! Plugin 타입 정의

use crate::hook::{ConfigHooks, HookHandlers, RuntimeHooks};
use crate::task::TaskDefinition;
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

// ============================================================================
// PluginLoader - 지연 로딩되는 의존성
// ============================================================================

/// 로더가 반환하는 Future
pub type PluginFuture = BoxFuture<'static, anyhow::Result<Arc<Plugin>>>;

/// 다른 플러그인을 지연 로드하는 인자 없는 함수
#[derive(Clone)]
pub struct PluginLoader(Arc<dyn Fn() -> PluginFuture + Send + Sync>);

impl PluginLoader {
    /// 비동기 클로저로 로더 생성
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Arc<Plugin>>> + Send + 'static,
    {
        Self(Arc::new(move || Box::pin(f())))
    }

    /// 이미 만들어진 플러그인을 그대로 반환하는 로더
    pub fn ready(plugin: Arc<Plugin>) -> Self {
        Self::new(move || {
            let plugin = Arc::clone(&plugin);
            async move { Ok(plugin) }
        })
    }

    /// 로드 실행
    pub async fn load(&self) -> anyhow::Result<Arc<Plugin>> {
        (self.0)().await
    }
}

impl std::fmt::Debug for PluginLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PluginLoader")
    }
}

// ============================================================================
// Plugin
// ============================================================================

/// 플러그인
///
/// Task를 제공하거나 Hook을 구현하는 묶음입니다. `Arc<Plugin>`으로 공유되며,
/// 인스턴스 동일성은 포인터 동일성(`Arc::ptr_eq`)으로 판단합니다.
#[derive(Clone, Default)]
pub struct Plugin {
    /// 고유 ID
    pub id: String,

    /// 패키지 이름 (표시용)
    pub package: Option<String>,

    /// 의존 플러그인 로더들 (순서 유지)
    pub dependencies: Vec<PluginLoader>,

    /// Hook 핸들러
    pub hook_handlers: Option<HookHandlers>,

    /// 제공하는 Task들
    pub tasks: Vec<TaskDefinition>,
}

impl Plugin {
    /// 새 플러그인 생성
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// 패키지 이름 설정
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// 지연 로더로 의존성 추가
    pub fn with_dependency(mut self, loader: PluginLoader) -> Self {
        self.dependencies.push(loader);
        self
    }

    /// 이미 만들어진 플러그인을 의존성으로 추가
    pub fn depends_on(self, plugin: &Arc<Plugin>) -> Self {
        self.with_dependency(PluginLoader::ready(Arc::clone(plugin)))
    }

    /// Task 추가
    pub fn with_task(mut self, task: TaskDefinition) -> Self {
        self.tasks.push(task);
        self
    }

    /// 설정 Hook 등록
    pub fn with_config_hooks(mut self, hooks: ConfigHooks) -> Self {
        self.hook_handlers.get_or_insert_with(HookHandlers::default).config = Some(hooks);
        self
    }

    /// 런타임 Hook 등록
    pub fn with_runtime_hooks(mut self, hooks: RuntimeHooks) -> Self {
        self.hook_handlers.get_or_insert_with(HookHandlers::default).runtime = Some(hooks);
        self
    }

    /// 설정 Hook 조회
    pub fn config_hooks(&self) -> Option<&ConfigHooks> {
        self.hook_handlers.as_ref().and_then(|h| h.config.as_ref())
    }

    /// 런타임 Hook 조회
    pub fn runtime_hooks(&self) -> Option<&RuntimeHooks> {
        self.hook_handlers.as_ref().and_then(|h| h.runtime.as_ref())
    }
}

impl std::fmt::Debug for Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("id", &self.id)
            .field("package", &self.package)
            .field("dependencies", &self.dependencies.len())
            .field(
                "tasks",
                &self.tasks.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
