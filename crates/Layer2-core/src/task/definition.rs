//! Task 정의와 실행 결과 타입

use super::context::{TaskContext, TaskParams};
use futures::future::BoxFuture;
use kiln_foundation::{Error, ParamDefinition, ParamKind, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Task 액션이 반환하는 Future
pub type TaskFuture = BoxFuture<'static, anyhow::Result<Value>>;

/// 지연 실행되는 Task 본문
///
/// 결과가 없으면 `Value::Null`을 반환합니다.
pub type TaskAction = Arc<dyn Fn(TaskContext) -> TaskFuture + Send + Sync>;

/// async 클로저를 [`TaskAction`]으로 변환
pub fn action<F, Fut>(f: F) -> TaskAction
where
    F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    Arc::new(move |ctx| Box::pin(f(ctx)))
}

// ============================================================================
// TaskDefinition
// ============================================================================

/// 이름과 파라미터를 가진 작업 단위
#[derive(Clone)]
pub struct TaskDefinition {
    /// 고유 Task 이름
    pub name: String,

    /// 도움말에 표시할 설명
    pub description: String,

    /// 먼저 실행할 Task (순서대로)
    pub dependencies: Vec<String>,

    /// 허용 파라미터
    pub params: BTreeMap<String, ParamDefinition>,

    /// Task 본문
    pub action: TaskAction,
}

impl TaskDefinition {
    /// async 클로저로 Task 생성
    pub fn new<F, Fut>(name: impl Into<String>, description: impl Into<String>, f: F) -> Self
    where
        F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        Self::with_action(name, description, action(f))
    }

    /// 기존 액션으로 Task 생성
    pub fn with_action(
        name: impl Into<String>,
        description: impl Into<String>,
        action: TaskAction,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            dependencies: Vec::new(),
            params: BTreeMap::new(),
            action,
        }
    }

    /// 의존성 추가
    pub fn depends_on(mut self, task: impl Into<String>) -> Self {
        self.dependencies.push(task.into());
        self
    }

    /// 파라미터 추가
    pub fn with_param(mut self, name: impl Into<String>, param: ParamDefinition) -> Self {
        self.params.insert(name.into(), param);
        self
    }

    /// CLI 입력 쌍을 타입이 있는 파라미터 값으로 변환
    ///
    /// 값 없는 키는 불리언 파라미터에만 허용되며 `true`를 뜻합니다.
    pub fn parse_params(&self, raw: &[(String, Option<String>)]) -> Result<TaskParams> {
        let mut params = TaskParams::new();

        for (key, value) in raw {
            let definition = self.params.get(key).ok_or_else(|| Error::InvalidParam {
                task: self.name.clone(),
                param: key.clone(),
                message: "unknown parameter".to_string(),
            })?;

            let parsed = match (value, definition.kind) {
                (Some(raw), _) => definition.parse(raw).map_err(|message| Error::InvalidParam {
                    task: self.name.clone(),
                    param: key.clone(),
                    message,
                })?,
                (None, ParamKind::Boolean) => Value::Bool(true),
                (None, ParamKind::String) => {
                    return Err(Error::InvalidParam {
                        task: self.name.clone(),
                        param: key.clone(),
                        message: "expected a value".to_string(),
                    })
                }
            };

            params.insert(key.clone(), parsed);
        }

        Ok(params)
    }

    /// 선언된 파라미터로 값을 검사하고 기본값을 채움
    pub fn bind_params(&self, mut supplied: TaskParams) -> Result<TaskParams> {
        for (name, definition) in &self.params {
            match supplied.get(name) {
                Some(value) => {
                    let matches = match definition.kind {
                        ParamKind::String => value.is_string(),
                        ParamKind::Boolean => value.is_boolean(),
                    };
                    if !matches {
                        return Err(Error::InvalidParam {
                            task: self.name.clone(),
                            param: name.clone(),
                            message: format!("expected a {} value", definition.kind),
                        });
                    }
                }
                None => {
                    if let Some(default) = &definition.default {
                        supplied.insert(name.clone(), default.clone());
                    } else if definition.required {
                        return Err(Error::MissingParam {
                            task: self.name.clone(),
                            param: name.clone(),
                        });
                    }
                }
            }
        }

        Ok(supplied)
    }
}

impl std::fmt::Debug for TaskDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("dependencies", &self.dependencies)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// TaskOverride
// ============================================================================

/// [`TaskRegistry::override_task`](super::TaskRegistry::override_task)에 쓰는 부분 Task
///
/// 비어 있는 필드는 기존 값을 유지합니다.
#[derive(Clone, Default)]
pub struct TaskOverride {
    pub description: Option<String>,
    pub dependencies: Option<Vec<String>>,
    pub params: Option<BTreeMap<String, ParamDefinition>>,
    pub action: Option<TaskAction>,
}

impl TaskOverride {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = Some(dependencies);
        self
    }

    pub fn params(mut self, params: BTreeMap<String, ParamDefinition>) -> Self {
        self.params = Some(params);
        self
    }

    pub fn action<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        self.action = Some(action(f));
        self
    }

    /// 기존 정의에 얕게 병합
    pub(crate) fn apply(self, task: &mut TaskDefinition) {
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(dependencies) = self.dependencies {
            task.dependencies = dependencies;
        }
        if let Some(params) = self.params {
            task.params = params;
        }
        if let Some(action) = self.action {
            task.action = action;
        }
    }
}

// ============================================================================
// TaskResult
// ============================================================================

/// 실행된 Task 하나의 결과
#[derive(Debug, Clone)]
pub struct TaskResult {
    /// Task 이름
    pub name: String,

    /// 에러 없이 완료되었는지 여부
    pub success: bool,

    /// 액션 실행 시간
    pub duration: Duration,

    /// 에러 메시지 (실패 시)
    pub error: Option<String>,

    /// 액션이 반환한 값
    pub output: Option<Value>,
}

impl TaskResult {
    pub(crate) fn success(name: &str, duration: Duration, output: Value) -> Self {
        Self {
            name: name.to_string(),
            success: true,
            duration,
            error: None,
            output: (!output.is_null()).then_some(output),
        }
    }

    pub(crate) fn failure(name: &str, duration: Duration, error: &anyhow::Error) -> Self {
        Self {
            name: name.to_string(),
            success: false,
            duration,
            error: Some(format!("{:#}", error)),
            output: None,
        }
    }
}
