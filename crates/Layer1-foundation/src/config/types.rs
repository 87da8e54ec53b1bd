//! Configuration 타입 정의
//!
//! `kiln.config.json` 스키마. 플러그인이 추가하는 섹션은 `extra`에 그대로 보존됩니다.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 네트워크를 지정하지 않았을 때 사용하는 이름
pub const DEFAULT_NETWORK: &str = "localhost";

/// `localhost` 네트워크의 기본 RPC 주소
pub const DEFAULT_LOCALHOST_URL: &str = "http://127.0.0.1:8545";

// ============================================================================
// KilnConfig - 프로젝트 설정
// ============================================================================

/// Kiln 프로젝트 설정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KilnConfig {
    /// 기본 네트워크 이름
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_network: Option<String>,

    /// 네트워크 설정들
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkConfig>,

    /// 사용자 정의 Task들
    #[serde(default)]
    pub tasks: BTreeMap<String, TaskConfig>,

    /// 확장 설정 (플러그인 섹션)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl KilnConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 사용할 네트워크 이름 결정
    ///
    /// 명시적 선택 > `defaultNetwork` > `localhost`
    pub fn network_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_string)
            .or_else(|| self.default_network.clone())
            .unwrap_or_else(|| DEFAULT_NETWORK.to_string())
    }

    /// 네트워크 설정 조회
    ///
    /// `localhost`는 설정에 없어도 기본값으로 제공됩니다.
    pub fn network(&self, name: &str) -> Result<NetworkConfig> {
        if let Some(network) = self.networks.get(name) {
            return Ok(network.clone());
        }

        if name == DEFAULT_NETWORK {
            return Ok(NetworkConfig::localhost());
        }

        Err(Error::UnknownNetwork {
            name: name.to_string(),
            available: self.networks.keys().cloned().collect(),
        })
    }

    /// 확장 섹션 조회
    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// 확장 섹션 설정 (기존 값은 교체)
    pub fn set_extension(&mut self, key: impl Into<String>, value: Value) {
        self.extra.insert(key.into(), value);
    }
}

// ============================================================================
// NetworkConfig
// ============================================================================

/// 네트워크 설정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    /// JSON-RPC 엔드포인트
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// 체인 ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,

    /// 계정 목록
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<String>,

    /// 네트워크별 확장 설정
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl NetworkConfig {
    /// 로컬 개발 노드 설정
    pub fn localhost() -> Self {
        Self {
            url: Some(DEFAULT_LOCALHOST_URL.to_string()),
            ..Default::default()
        }
    }
}

// ============================================================================
// TaskConfig - 설정 파일에 선언된 Task
// ============================================================================

/// 설정 파일에 선언된 Task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskConfig {
    /// 설명
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// 먼저 실행할 Task 이름들
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    /// 실행할 셸 명령 (없으면 의존성만 실행하는 alias)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// 파라미터 정의
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, ParamDefinition>,
}

// ============================================================================
// ParamDefinition
// ============================================================================

/// 파라미터 타입
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    #[default]
    String,
    Boolean,
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Boolean => write!(f, "boolean"),
        }
    }
}

/// Task 파라미터 정의
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamDefinition {
    #[serde(default, rename = "type")]
    pub kind: ParamKind,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParamDefinition {
    pub fn string() -> Self {
        Self::default()
    }

    pub fn boolean() -> Self {
        Self {
            kind: ParamKind::Boolean,
            ..Default::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// CLI 문자열 값을 타입에 맞게 변환
    ///
    /// 실패 시 사람이 읽을 수 있는 메시지를 반환합니다.
    pub fn parse(&self, raw: &str) -> std::result::Result<Value, String> {
        match self.kind {
            ParamKind::String => Ok(Value::String(raw.to_string())),
            ParamKind::Boolean => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(Value::Bool(true)),
                "false" | "0" | "no" => Ok(Value::Bool(false)),
                other => Err(format!("expected a boolean, got '{}'", other)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_with_extensions() {
        let config: KilnConfig = serde_json::from_value(json!({
            "defaultNetwork": "sepolia",
            "networks": {
                "sepolia": { "url": "https://rpc.example", "chainId": 11155111, "timeout": 30 }
            },
            "tasks": {
                "deploy": { "dependencies": ["compile"], "command": "echo deploy" }
            },
            "gasReporter": { "enabled": true }
        }))
        .unwrap();

        assert_eq!(config.default_network.as_deref(), Some("sepolia"));
        let sepolia = &config.networks["sepolia"];
        assert_eq!(sepolia.chain_id, Some(11155111));
        assert_eq!(sepolia.extra["timeout"], json!(30));
        assert_eq!(config.tasks["deploy"].dependencies, vec!["compile"]);
        assert_eq!(config.extension("gasReporter"), Some(&json!({ "enabled": true })));
    }

    #[test]
    fn test_network_selection() {
        let mut config = KilnConfig::new();
        assert_eq!(config.network_name(None), "localhost");

        config.default_network = Some("sepolia".into());
        assert_eq!(config.network_name(None), "sepolia");
        assert_eq!(config.network_name(Some("mainnet")), "mainnet");
    }

    #[test]
    fn test_localhost_fallback() {
        let config = KilnConfig::new();
        let network = config.network("localhost").unwrap();
        assert_eq!(network.url.as_deref(), Some(DEFAULT_LOCALHOST_URL));

        match config.network("mainnet") {
            Err(Error::UnknownNetwork { name, .. }) => assert_eq!(name, "mainnet"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_param_parse() {
        let flag = ParamDefinition::boolean();
        assert_eq!(flag.parse("true").unwrap(), json!(true));
        assert_eq!(flag.parse("No").unwrap(), json!(false));
        assert!(flag.parse("maybe").is_err());

        let text = ParamDefinition::string();
        assert_eq!(text.parse("abc").unwrap(), json!("abc"));
    }
}
