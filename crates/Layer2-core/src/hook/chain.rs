//! Resolve 단계 미들웨어 체인
//!
//! 등록 순서대로 핸들러를 나열하고, 각 핸들러는 `ResolveNext`로 다음 핸들러를
//! 호출합니다. 마지막 다음은 기본 해석기입니다.
//!
//! ```text
//! handler[0] ─ start ─▶ handler[1] ─ start ─▶ base
//!            ◀─ end ───            ◀─ end ───
//! ```

use super::types::ResolveUserConfigHook;
use crate::config::{ResolvedConfig, UserConfig};
use crate::plugin::Plugin;
use futures::future::BoxFuture;
use kiln_foundation::{Error, Result};
use std::sync::Arc;

const HOOK_NAME: &str = "resolve_user_config";

struct ChainInner {
    handlers: Vec<(String, ResolveUserConfigHook)>,
    resolved_plugins: Vec<Arc<Plugin>>,
}

/// 한 번 만들어 한 번 실행하는 해석 체인
pub struct ResolverChain {
    inner: Arc<ChainInner>,
}

impl ResolverChain {
    /// `handlers`는 (plugin id, handler) 쌍, 등록 순서
    pub fn new(
        resolved_plugins: Vec<Arc<Plugin>>,
        handlers: Vec<(String, ResolveUserConfigHook)>,
    ) -> Self {
        Self {
            inner: Arc::new(ChainInner {
                handlers,
                resolved_plugins,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.handlers.is_empty()
    }

    /// 가장 바깥 핸들러부터 실행
    pub async fn resolve(&self, user_config: Arc<UserConfig>) -> Result<ResolvedConfig> {
        ResolveNext {
            chain: Arc::clone(&self.inner),
            index: 0,
        }
        .step(user_config)
        .await
    }
}

/// 안쪽 단계에서 올라온 에러 표시
///
/// 바깥 핸들러는 이 에러를 다시 감싸지 않고 그대로 전달합니다.
#[derive(Debug)]
struct Forwarded(Error);

impl std::fmt::Display for Forwarded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Forwarded {}

/// 체인의 다음 단계
pub struct ResolveNext {
    chain: Arc<ChainInner>,
    index: usize,
}

impl ResolveNext {
    /// 다음 핸들러 (또는 기본 해석기) 실행
    pub fn run(
        self,
        user_config: Arc<UserConfig>,
    ) -> BoxFuture<'static, anyhow::Result<ResolvedConfig>> {
        Box::pin(async move {
            self.step(user_config)
                .await
                .map_err(|e| anyhow::Error::new(Forwarded(e)))
        })
    }

    fn step(self, user_config: Arc<UserConfig>) -> BoxFuture<'static, Result<ResolvedConfig>> {
        Box::pin(async move {
            let base = ResolvedConfig::from_user_config(&user_config, &self.chain.resolved_plugins);

            let Some((plugin_id, handler)) = self.chain.handlers.get(self.index) else {
                return Ok(base);
            };
            let plugin_id = plugin_id.clone();
            let handler = Arc::clone(handler);
            let next = ResolveNext {
                chain: Arc::clone(&self.chain),
                index: self.index + 1,
            };

            handler(user_config, base, next)
                .await
                .map_err(|e| match e.downcast::<Forwarded>() {
                    Ok(Forwarded(inner)) => inner,
                    Err(e) => Error::hook(plugin_id, HOOK_NAME, format!("{:#}", e)),
                })
        })
    }
}

impl std::fmt::Debug for ResolveNext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolveNext")
            .field("index", &self.index)
            .field("len", &self.chain.handlers.len())
            .finish()
    }
}
