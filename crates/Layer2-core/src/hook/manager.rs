//! Hook Manager - 설정/런타임 파이프라인 실행

use super::chain::ResolverChain;
use super::types::{ConfigHooks, RuntimeHooks};
use crate::config::{ResolvedConfig, UserConfig};
use crate::plugin::Plugin;
use crate::runtime::{EnvironmentScope, RuntimeCreatedContext, RuntimeEnvironment};
use futures::future::join_all;
use kiln_foundation::{Error, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// 플러그인 Hook 등록 및 실행
///
/// 핸들러는 등록 순서(= 플러그인 의존성 순서)대로 실행됩니다.
#[derive(Default)]
pub struct HookManager {
    config_handlers: Vec<(String, ConfigHooks)>,
    runtime_handlers: Vec<(String, RuntimeHooks)>,
}

impl HookManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 플러그인의 Hook 등록
    pub fn register_plugin(&mut self, plugin: &Plugin) {
        if let Some(hooks) = plugin.config_hooks() {
            debug!("Registered config hooks from {}", plugin.id);
            self.config_handlers.push((plugin.id.clone(), hooks.clone()));
        }
        if let Some(hooks) = plugin.runtime_hooks() {
            debug!("Registered runtime hooks from {}", plugin.id);
            self.runtime_handlers.push((plugin.id.clone(), hooks.clone()));
        }
    }

    /// 등록된 (설정, 런타임) 핸들러 수
    pub fn handler_counts(&self) -> (usize, usize) {
        (self.config_handlers.len(), self.runtime_handlers.len())
    }

    // ========================================================================
    // 설정 파이프라인
    // ========================================================================

    /// extend -> validate -> resolve
    pub async fn run_config_hooks(
        &self,
        user_config: UserConfig,
        resolved_plugins: &[Arc<Plugin>],
    ) -> Result<ResolvedConfig> {
        let extended = Arc::new(self.extend(user_config).await?);
        self.validate(&extended).await?;
        self.resolve(extended, resolved_plugins).await
    }

    async fn extend(&self, user_config: UserConfig) -> Result<UserConfig> {
        let mut working = user_config;

        for (plugin_id, hooks) in &self.config_handlers {
            if let Some(handler) = &hooks.extend_user_config {
                debug!("extend_user_config: {}", plugin_id);
                working = handler(working)
                    .await
                    .map_err(|e| Error::hook(plugin_id, "extend_user_config", format!("{:#}", e)))?;
            }
        }

        Ok(working)
    }

    async fn validate(&self, extended: &Arc<UserConfig>) -> Result<()> {
        let validators: Vec<_> = self
            .config_handlers
            .iter()
            .filter_map(|(plugin_id, hooks)| {
                hooks
                    .validate_user_config
                    .as_ref()
                    .map(|handler| (plugin_id, handler))
            })
            .collect();

        // 서로 독립적이므로 동시에 실행, 결과는 등록 순서로 모음
        let outcomes = join_all(
            validators
                .iter()
                .map(|(_, handler)| handler(Arc::clone(extended))),
        )
        .await;

        let mut messages = Vec::new();
        for ((plugin_id, _), outcome) in validators.iter().zip(outcomes) {
            let errors = outcome
                .map_err(|e| Error::hook(*plugin_id, "validate_user_config", format!("{:#}", e)))?;
            messages.extend(errors.into_iter().map(|m| format!("[{}] {}", plugin_id, m)));
        }

        if messages.is_empty() {
            Ok(())
        } else {
            Err(Error::ConfigValidation { messages })
        }
    }

    async fn resolve(
        &self,
        extended: Arc<UserConfig>,
        resolved_plugins: &[Arc<Plugin>],
    ) -> Result<ResolvedConfig> {
        let handlers = self
            .config_handlers
            .iter()
            .filter_map(|(plugin_id, hooks)| {
                hooks
                    .resolve_user_config
                    .as_ref()
                    .map(|handler| (plugin_id.clone(), Arc::clone(handler)))
            })
            .collect();

        let chain = ResolverChain::new(resolved_plugins.to_vec(), handlers);
        debug!("Resolving config through {} handlers", chain.len());
        chain.resolve(extended).await
    }

    // ========================================================================
    // 런타임 파이프라인
    // ========================================================================

    /// 각 플러그인이 환경에 네임스페이스를 부착
    pub async fn run_extend_environment_hooks(&self, env: &Arc<RuntimeEnvironment>) -> Result<()> {
        for (plugin_id, hooks) in &self.runtime_handlers {
            if let Some(handler) = &hooks.extend_environment {
                debug!("extend_environment: {}", plugin_id);
                handler(EnvironmentScope::new(plugin_id.as_str(), Arc::clone(env)))
                    .await
                    .map_err(|e| Error::hook(plugin_id, "extend_environment", format!("{:#}", e)))?;
            }
        }

        info!("Runtime environment extended: {:?}", env.namespaces());
        Ok(())
    }

    /// 환경 확장이 모두 끝난 뒤 호출
    pub async fn run_runtime_created_hooks(&self, env: &Arc<RuntimeEnvironment>) -> Result<()> {
        for (plugin_id, hooks) in &self.runtime_handlers {
            if let Some(handler) = &hooks.created {
                debug!("created: {}", plugin_id);
                handler(RuntimeCreatedContext::new(plugin_id.as_str(), Arc::clone(env)))
                    .await
                    .map_err(|e| Error::hook(plugin_id, "created", format!("{:#}", e)))?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for HookManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookManager")
            .field("config", &plugin_ids(&self.config_handlers))
            .field("runtime", &plugin_ids(&self.runtime_handlers))
            .finish()
    }
}

fn plugin_ids<H>(handlers: &[(String, H)]) -> Vec<&str> {
    handlers.iter().map(|(id, _)| id.as_str()).collect()
}
