//! Task 실행 컨텍스트 (호출 단위)

use super::definition::TaskAction;
use crate::config::ResolvedConfig;
use crate::runtime::RuntimeEnvironment;
use kiln_foundation::NetworkConfig;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 파라미터 이름별 값
pub type TaskParams = BTreeMap<String, Value>;

/// 한 번의 최상위 호출에서 모든 Task 액션이 받는 컨텍스트
#[derive(Clone)]
pub struct TaskContext {
    /// 최종 설정
    pub config: Arc<ResolvedConfig>,

    /// 선택된 네트워크 이름
    pub network_name: String,

    /// 선택된 네트워크 설정
    pub network: NetworkConfig,

    /// 파라미터 값
    pub params: TaskParams,

    /// 상세 출력 여부
    pub verbose: bool,

    /// 플러그인이 확장한 공유 런타임 환경
    pub env: Option<Arc<RuntimeEnvironment>>,

    /// 이 Task가 대체한 이전 정의의 액션
    pub run_super: Option<TaskAction>,
}

impl TaskContext {
    pub fn new(
        config: Arc<ResolvedConfig>,
        network_name: impl Into<String>,
        network: NetworkConfig,
    ) -> Self {
        Self {
            config,
            network_name: network_name.into(),
            network,
            params: TaskParams::new(),
            verbose: false,
            env: None,
            run_super: None,
        }
    }

    pub fn with_params(mut self, params: TaskParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_env(mut self, env: Option<Arc<RuntimeEnvironment>>) -> Self {
        self.env = env;
        self
    }

    pub fn with_run_super(mut self, run_super: Option<TaskAction>) -> Self {
        self.run_super = run_super;
        self
    }

    /// 파라미터 값 조회
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// 문자열 파라미터 값
    pub fn param_str(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_str)
    }

    /// 불리언 파라미터 값 (없으면 false)
    pub fn flag(&self, name: &str) -> bool {
        self.params
            .get(name)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// 이전 정의를 대체한 Task인지 여부
    pub fn has_super(&self) -> bool {
        self.run_super.is_some()
    }

    /// 이 Task가 대체한 이전 정의 호출
    ///
    /// 이전 정의는 `run_super`가 비워진 컨텍스트를 받습니다.
    /// 재정의 이력은 한 단계만 보관합니다.
    pub async fn run_super(&self) -> anyhow::Result<Value> {
        let original = self
            .run_super
            .clone()
            .ok_or_else(|| anyhow::anyhow!("task has no earlier definition to call"))?;

        original(self.clone().with_run_super(None)).await
    }

    /// 런타임 환경 (환경 없이 실행 중이면 에러)
    pub fn env(&self) -> anyhow::Result<&Arc<RuntimeEnvironment>> {
        self.env
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no runtime environment attached"))
    }
}

impl std::fmt::Debug for TaskContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskContext")
            .field("network_name", &self.network_name)
            .field("params", &self.params)
            .field("verbose", &self.verbose)
            .field("has_env", &self.env.is_some())
            .field("has_super", &self.run_super.is_some())
            .finish()
    }
}
