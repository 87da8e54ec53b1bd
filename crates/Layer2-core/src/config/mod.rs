//! Configuration - 사용자 설정과 해석된 설정
//!
//! - `UserConfig`: 로더가 만든 설정 + 사용자가 지정한 플러그인 목록
//! - `ResolvedConfig`: 설정 Hook을 모두 거친 최종 설정 (이후 불변)
//!
//! 플러그인별 확장 값은 `KilnConfig::extra` 사이드 테이블에 둡니다.

use crate::plugin::Plugin;
use kiln_foundation::KilnConfig;
use serde_json::{json, Value};
use std::sync::Arc;

/// 설정 파일에서 `plugins` 섹션으로 취급되는 키
pub const PLUGINS_KEY: &str = "plugins";

// ============================================================================
// UserConfig
// ============================================================================

/// 원본 사용자 설정
#[derive(Debug, Clone, Default)]
pub struct UserConfig {
    /// 설정 파일 내용
    pub settings: KilnConfig,

    /// 최상위 플러그인 목록 (의존성은 아직 해석 전)
    pub plugins: Vec<Arc<Plugin>>,
}

impl UserConfig {
    pub fn new(settings: KilnConfig) -> Self {
        Self {
            settings,
            plugins: Vec::new(),
        }
    }

    pub fn with_plugins(mut self, plugins: Vec<Arc<Plugin>>) -> Self {
        self.plugins = plugins;
        self
    }
}

// ============================================================================
// ResolvedConfig
// ============================================================================

/// 최종 해석된 설정
#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    /// Hook 변환이 적용된 설정
    pub settings: KilnConfig,

    /// 의존성 순서로 정렬된 플러그인 목록
    pub plugins: Vec<Arc<Plugin>>,
}

impl ResolvedConfig {
    /// 기본 해석: `plugins` 필드를 제거하고 해석된 플러그인 목록을 붙임
    pub fn from_user_config(user_config: &UserConfig, resolved_plugins: &[Arc<Plugin>]) -> Self {
        let mut settings = user_config.settings.clone();
        settings.extra.remove(PLUGINS_KEY);

        Self {
            settings,
            plugins: resolved_plugins.to_vec(),
        }
    }

    /// 플러그인 ID 목록 (해석 순서)
    pub fn plugin_ids(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.id.as_str()).collect()
    }

    /// 출력용 JSON (플러그인은 ID로 표시)
    pub fn to_json(&self) -> Value {
        let mut value = serde_json::to_value(&self.settings).unwrap_or_else(|_| json!({}));
        if let Value::Object(map) = &mut value {
            map.insert(PLUGINS_KEY.to_string(), json!(self.plugin_ids()));
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_resolution_replaces_plugins() {
        let mut settings = KilnConfig::new();
        settings.set_extension(PLUGINS_KEY, json!(["raw"]));
        settings.set_extension("gasReporter", json!({ "enabled": true }));

        let top = Arc::new(Plugin::new("top"));
        let dep = Arc::new(Plugin::new("dep"));
        let user = UserConfig::new(settings).with_plugins(vec![Arc::clone(&top)]);

        let resolved = ResolvedConfig::from_user_config(&user, &[dep, top]);

        assert!(resolved.settings.extension(PLUGINS_KEY).is_none());
        assert!(resolved.settings.extension("gasReporter").is_some());
        assert_eq!(resolved.plugin_ids(), vec!["dep", "top"]);
        assert_eq!(resolved.to_json()[PLUGINS_KEY], json!(["dep", "top"]));
    }
}
