//! Hook 타입 정의
//!
//! 모든 Hook은 `Arc<dyn Fn(..) -> BoxFuture<..>>` 형태의 비동기 함수입니다.

use super::chain::ResolveNext;
use crate::config::{ResolvedConfig, UserConfig};
use crate::runtime::{EnvironmentScope, RuntimeCreatedContext};
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

// ============================================================================
// Hook 함수 타입
// ============================================================================

/// `extend_user_config`: 작업 중인 설정을 받아 확장된 설정을 반환
pub type ExtendUserConfigHook =
    Arc<dyn Fn(UserConfig) -> BoxFuture<'static, anyhow::Result<UserConfig>> + Send + Sync>;

/// `validate_user_config`: 완전히 확장된 설정을 검사하여 에러 메시지 목록을 반환
pub type ValidateUserConfigHook =
    Arc<dyn Fn(Arc<UserConfig>) -> BoxFuture<'static, anyhow::Result<Vec<String>>> + Send + Sync>;

/// `resolve_user_config`: (사용자 설정, 기본 해석 결과, 다음 단계) -> 최종 설정
pub type ResolveUserConfigHook = Arc<
    dyn Fn(Arc<UserConfig>, ResolvedConfig, ResolveNext) -> BoxFuture<'static, anyhow::Result<ResolvedConfig>>
        + Send
        + Sync,
>;

/// `extend_environment`: 런타임 환경에 네임스페이스 부착
pub type ExtendEnvironmentHook =
    Arc<dyn Fn(EnvironmentScope) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// `created`: 런타임 환경 완성 후 호출
pub type RuntimeCreatedHook =
    Arc<dyn Fn(RuntimeCreatedContext) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

// ============================================================================
// ConfigHooks
// ============================================================================

/// 설정 단계 Hook 모음
#[derive(Clone, Default)]
pub struct ConfigHooks {
    pub extend_user_config: Option<ExtendUserConfigHook>,
    pub validate_user_config: Option<ValidateUserConfigHook>,
    pub resolve_user_config: Option<ResolveUserConfigHook>,
}

impl ConfigHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_extend<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(UserConfig) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<UserConfig>> + Send + 'static,
    {
        let hook: ExtendUserConfigHook = Arc::new(move |config| Box::pin(f(config)));
        self.extend_user_config = Some(hook);
        self
    }

    pub fn on_validate<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Arc<UserConfig>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Vec<String>>> + Send + 'static,
    {
        let hook: ValidateUserConfigHook = Arc::new(move |config| Box::pin(f(config)));
        self.validate_user_config = Some(hook);
        self
    }

    pub fn on_resolve<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Arc<UserConfig>, ResolvedConfig, ResolveNext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<ResolvedConfig>> + Send + 'static,
    {
        let hook: ResolveUserConfigHook =
            Arc::new(move |user, base, next| Box::pin(f(user, base, next)));
        self.resolve_user_config = Some(hook);
        self
    }
}

// ============================================================================
// RuntimeHooks
// ============================================================================

/// 런타임 단계 Hook 모음
#[derive(Clone, Default)]
pub struct RuntimeHooks {
    pub extend_environment: Option<ExtendEnvironmentHook>,
    pub created: Option<RuntimeCreatedHook>,
}

impl RuntimeHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_extend_environment<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(EnvironmentScope) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let hook: ExtendEnvironmentHook = Arc::new(move |scope| Box::pin(f(scope)));
        self.extend_environment = Some(hook);
        self
    }

    pub fn on_created<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(RuntimeCreatedContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let hook: RuntimeCreatedHook = Arc::new(move |ctx| Box::pin(f(ctx)));
        self.created = Some(hook);
        self
    }
}

// ============================================================================
// HookHandlers
// ============================================================================

/// 플러그인이 제공하는 Hook 핸들러
#[derive(Clone, Default)]
pub struct HookHandlers {
    pub config: Option<ConfigHooks>,
    pub runtime: Option<RuntimeHooks>,
}

impl std::fmt::Debug for HookHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookHandlers")
            .field("config", &self.config.is_some())
            .field("runtime", &self.runtime.is_some())
            .finish()
    }
}
