//! Error types for Kiln
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Kiln 에러 타입
///
/// 표시 계층이 종류별로 다르게 렌더링할 수 있도록 구조화된 필드를 가집니다.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Task 관련
    // ========================================================================
    #[error("Unknown task: {name}")]
    UnknownTask {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("Circular task dependency: {}", .cycle.join(" -> "))]
    TaskCycle { cycle: Vec<String> },

    #[error("Missing required parameter '{param}' for task {task}")]
    MissingParam { task: String, param: String },

    #[error("Invalid parameter '{param}' for task {task}: {message}")]
    InvalidParam {
        task: String,
        param: String,
        message: String,
    },

    // ========================================================================
    // Plugin 관련
    // ========================================================================
    #[error("Invalid plugin {plugin_id}: field '{field}' {message}")]
    PluginValidation {
        plugin_id: String,
        field: String,
        message: String,
    },

    #[error("Circular plugin dependency: {}", .cycle.join(" -> "))]
    PluginCycle { cycle: Vec<String> },

    #[error("Failed to load a dependency of plugin {plugin_id}: {cause}")]
    PluginLoad { plugin_id: String, cause: String },

    #[error("Duplicate plugin id {plugin_id}: two different plugin instances share it")]
    DuplicatePlugin { plugin_id: String },

    // ========================================================================
    // Hook / 설정 관련
    // ========================================================================
    #[error("Configuration validation failed:\n{}", .messages.join("\n"))]
    ConfigValidation { messages: Vec<String> },

    #[error("Hook {hook} of plugin {plugin_id} failed: {cause}")]
    Hook {
        plugin_id: String,
        hook: &'static str,
        cause: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown network: {name}")]
    UnknownNetwork {
        name: String,
        available: Vec<String>,
    },

    // ========================================================================
    // Runtime environment 관련
    // ========================================================================
    #[error("Namespace '{namespace}' is already attached by plugin {owner}")]
    NamespaceConflict { namespace: String, owner: String },

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// 알 수 없는 Task 에러 생성 헬퍼
    pub fn unknown_task(name: impl Into<String>, suggestions: Vec<String>) -> Self {
        Error::UnknownTask {
            name: name.into(),
            suggestions,
        }
    }

    /// Plugin 검증 에러 생성 헬퍼
    pub fn plugin_validation(
        plugin_id: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::PluginValidation {
            plugin_id: plugin_id.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Hook 실패 에러 생성 헬퍼
    pub fn hook(
        plugin_id: impl Into<String>,
        hook: &'static str,
        cause: impl std::fmt::Display,
    ) -> Self {
        Error::Hook {
            plugin_id: plugin_id.into(),
            hook,
            cause: cause.to_string(),
        }
    }
}
