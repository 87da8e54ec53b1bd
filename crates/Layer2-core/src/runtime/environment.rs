//! RuntimeEnvironment 구현

use crate::config::ResolvedConfig;
use crate::task::TaskParams;
use async_trait::async_trait;
use kiln_foundation::{Error, Result};
use parking_lot::RwLock;
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// TaskInvoker
// ============================================================================

/// `run_task` 기능 제공자
#[async_trait]
pub trait TaskInvoker: Send + Sync {
    /// Task와 의존성을 실행하고 요청한 Task의 결과를 반환
    ///
    /// 실행 중 하나라도 실패하면 에러입니다.
    async fn run_task(&self, name: &str, params: TaskParams) -> anyhow::Result<Value>;
}

// ============================================================================
// RuntimeEnvironment
// ============================================================================

struct Namespace {
    name: String,
    owner: String,
    value: Arc<dyn Any + Send + Sync>,
}

/// 플러그인이 확장하는 공유 런타임 환경
pub struct RuntimeEnvironment {
    config: Arc<ResolvedConfig>,
    invoker: Arc<dyn TaskInvoker>,
    namespaces: RwLock<Vec<Namespace>>,
}

impl RuntimeEnvironment {
    pub fn new(config: Arc<ResolvedConfig>, invoker: Arc<dyn TaskInvoker>) -> Self {
        Self {
            config,
            invoker,
            namespaces: RwLock::new(Vec::new()),
        }
    }

    /// 최종 설정
    pub fn config(&self) -> &Arc<ResolvedConfig> {
        &self.config
    }

    /// Task 실행
    pub async fn run_task(&self, name: &str, params: TaskParams) -> anyhow::Result<Value> {
        self.invoker.run_task(name, params).await
    }

    /// 네임스페이스 부착 (추가만 가능)
    pub fn attach<T>(&self, owner: &str, name: &str, value: T) -> Result<()>
    where
        T: Any + Send + Sync,
    {
        let mut namespaces = self.namespaces.write();

        if let Some(existing) = namespaces.iter().find(|ns| ns.name == name) {
            return Err(Error::NamespaceConflict {
                namespace: name.to_string(),
                owner: existing.owner.clone(),
            });
        }

        debug!("Plugin {} attached namespace '{}'", owner, name);
        namespaces.push(Namespace {
            name: name.to_string(),
            owner: owner.to_string(),
            value: Arc::new(value),
        });
        Ok(())
    }

    /// 네임스페이스 조회 (타입이 다르면 None)
    pub fn namespace<T>(&self, name: &str) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let namespaces = self.namespaces.read();
        let entry = namespaces.iter().find(|ns| ns.name == name)?;
        Arc::clone(&entry.value).downcast::<T>().ok()
    }

    pub fn has_namespace(&self, name: &str) -> bool {
        self.namespaces.read().iter().any(|ns| ns.name == name)
    }

    /// (이름, 소유 플러그인) 목록, 부착 순서
    pub fn namespaces(&self) -> Vec<(String, String)> {
        self.namespaces
            .read()
            .iter()
            .map(|ns| (ns.name.clone(), ns.owner.clone()))
            .collect()
    }
}

impl std::fmt::Debug for RuntimeEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeEnvironment")
            .field("plugins", &self.config.plugin_ids())
            .field("namespaces", &self.namespaces())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Hook 인자
// ============================================================================

/// `extend_environment` Hook 인자: 플러그인 ID에 묶인 환경 핸들
#[derive(Clone)]
pub struct EnvironmentScope {
    plugin_id: String,
    env: Arc<RuntimeEnvironment>,
}

impl EnvironmentScope {
    pub fn new(plugin_id: impl Into<String>, env: Arc<RuntimeEnvironment>) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            env,
        }
    }

    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    pub fn config(&self) -> &Arc<ResolvedConfig> {
        self.env.config()
    }

    pub fn env(&self) -> &Arc<RuntimeEnvironment> {
        &self.env
    }

    /// 이 플러그인 소유로 네임스페이스 부착
    pub fn attach<T>(&self, name: &str, value: T) -> Result<()>
    where
        T: Any + Send + Sync,
    {
        self.env.attach(&self.plugin_id, name, value)
    }
}

/// `created` Hook 인자
#[derive(Clone)]
pub struct RuntimeCreatedContext {
    plugin_id: String,
    env: Arc<RuntimeEnvironment>,
}

impl RuntimeCreatedContext {
    pub fn new(plugin_id: impl Into<String>, env: Arc<RuntimeEnvironment>) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            env,
        }
    }

    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    pub fn config(&self) -> &Arc<ResolvedConfig> {
        self.env.config()
    }

    pub async fn run_task(&self, name: &str, params: TaskParams) -> anyhow::Result<Value> {
        self.env.run_task(name, params).await
    }

    pub fn namespace<T>(&self, name: &str) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.env.namespace(name)
    }
}
