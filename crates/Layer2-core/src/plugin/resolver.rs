//! Plugin Resolver - 의존성 순서 정렬
//!
//! 깊이 우선 탐색으로 플러그인을 위상 정렬합니다.
//!
//! - 의존성은 항상 의존하는 플러그인보다 먼저 위치
//! - 같은 인스턴스가 여러 경로로 도달하면 한 번만 포함 (다이아몬드)
//! - 같은 ID의 다른 인스턴스는 에러
//! - 순환 의존성은 최상위부터의 경로와 함께 에러

use super::types::Plugin;
use super::validate::validate_plugin;
use futures::future::BoxFuture;
use kiln_foundation::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// 플러그인 의존성 해석기
///
/// 한 번의 `resolve` 호출 동안만 상태를 유지합니다.
#[derive(Default)]
pub struct PluginResolver {
    /// 배치 완료된 플러그인 (ID -> 인스턴스)
    seen: HashMap<String, Arc<Plugin>>,

    /// 현재 탐색 경로에 있는 ID
    visiting: HashSet<String>,

    /// 결과 (의존성 순서)
    resolved: Vec<Arc<Plugin>>,
}

impl PluginResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 플러그인 목록을 의존성 순서로 정렬
    pub async fn resolve(mut self, plugins: &[Arc<Plugin>]) -> Result<Vec<Arc<Plugin>>> {
        for plugin in plugins {
            self.visit(Arc::clone(plugin), Vec::new()).await?;
        }

        info!(
            "Resolved {} plugins: {:?}",
            self.resolved.len(),
            self.resolved.iter().map(|p| p.id.as_str()).collect::<Vec<_>>()
        );
        Ok(self.resolved)
    }

    fn visit(&mut self, plugin: Arc<Plugin>, path: Vec<String>) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            validate_plugin(&plugin)?;

            if self.visiting.contains(&plugin.id) {
                let mut cycle = path;
                cycle.push(plugin.id.clone());
                return Err(Error::PluginCycle { cycle });
            }

            if let Some(existing) = self.seen.get(&plugin.id) {
                if Arc::ptr_eq(existing, &plugin) {
                    return Ok(());
                }
                return Err(Error::DuplicatePlugin {
                    plugin_id: plugin.id.clone(),
                });
            }

            self.visiting.insert(plugin.id.clone());

            let mut child_path = path;
            child_path.push(plugin.id.clone());

            for loader in &plugin.dependencies {
                let dependency = loader.load().await.map_err(|e| Error::PluginLoad {
                    plugin_id: plugin.id.clone(),
                    cause: format!("{:#}", e),
                })?;
                debug!("Plugin {} depends on {}", plugin.id, dependency.id);
                self.visit(dependency, child_path.clone()).await?;
            }

            self.visiting.remove(&plugin.id);
            self.seen.insert(plugin.id.clone(), Arc::clone(&plugin));
            self.resolved.push(plugin);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::PluginLoader;

    fn ids(plugins: &[Arc<Plugin>]) -> Vec<&str> {
        plugins.iter().map(|p| p.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_dependencies_first() {
        let base = Arc::new(Plugin::new("base"));
        let top = Arc::new(Plugin::new("top").depends_on(&base));

        let resolved = PluginResolver::new().resolve(&[top]).await.unwrap();
        assert_eq!(ids(&resolved), vec!["base", "top"]);
    }

    #[tokio::test]
    async fn test_diamond() {
        let bottom = Arc::new(Plugin::new("bottom"));
        let left = Arc::new(Plugin::new("left").depends_on(&bottom));
        let right = Arc::new(Plugin::new("right").depends_on(&bottom));
        let top = Arc::new(Plugin::new("top").depends_on(&left).depends_on(&right));

        let resolved = PluginResolver::new().resolve(&[top]).await.unwrap();
        assert_eq!(ids(&resolved), vec!["bottom", "left", "right", "top"]);
    }

    #[tokio::test]
    async fn test_same_instance_listed_twice() {
        let shared = Arc::new(Plugin::new("shared"));
        let user = Arc::new(Plugin::new("user").depends_on(&shared));

        let resolved = PluginResolver::new()
            .resolve(&[Arc::clone(&shared), user, shared])
            .await
            .unwrap();
        assert_eq!(ids(&resolved), vec!["shared", "user"]);
    }

    #[tokio::test]
    async fn test_duplicate_id_different_instances() {
        let first = Arc::new(Plugin::new("dup"));
        let second = Arc::new(Plugin::new("dup"));

        match PluginResolver::new().resolve(&[first, second]).await {
            Err(Error::DuplicatePlugin { plugin_id }) => assert_eq!(plugin_id, "dup"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cycle_path() {
        // a -> b -> (새로 만든) a
        let b = Arc::new(Plugin::new("b").with_dependency(PluginLoader::new(|| async {
            Ok(Arc::new(Plugin::new("a")))
        })));
        let a = Arc::new(Plugin::new("a").depends_on(&b));
        let root = Arc::new(Plugin::new("root").depends_on(&a));

        match PluginResolver::new().resolve(&[root]).await {
            Err(Error::PluginCycle { cycle }) => {
                assert_eq!(cycle, vec!["root", "a", "b", "a"]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_loader_failure() {
        let broken = Arc::new(Plugin::new("broken").with_dependency(PluginLoader::new(|| async {
            Err::<Arc<Plugin>, _>(anyhow::anyhow!("module not installed"))
        })));

        match PluginResolver::new().resolve(&[broken]).await {
            Err(Error::PluginLoad { plugin_id, cause }) => {
                assert_eq!(plugin_id, "broken");
                assert!(cause.contains("module not installed"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_dependency_rejected() {
        let invalid = Arc::new(Plugin::new(""));
        let top = Arc::new(Plugin::new("top").depends_on(&invalid));

        let err = PluginResolver::new().resolve(&[top]).await.unwrap_err();
        assert!(matches!(err, Error::PluginValidation { field, .. } if field == "id"));
    }
}
