//! Task 실행기
//!
//! 깊이 우선 후위 순회로 의존성 순서를 정하고, 순서대로 실행하다가
//! 첫 실패에서 멈춥니다.

use super::context::TaskContext;
use super::definition::TaskResult;
use super::registry::TaskRegistry;
use kiln_foundation::{Error, Result};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info, warn};

/// 레지스트리의 Task 실행기
pub struct TaskRunner<'a> {
    registry: &'a TaskRegistry,
}

impl<'a> TaskRunner<'a> {
    pub fn new(registry: &'a TaskRegistry) -> Self {
        Self { registry }
    }

    /// `task_name`의 실행 순서 (의존성 먼저, 요청한 Task는 마지막)
    pub fn plan(&self, task_name: &str) -> Result<Vec<String>> {
        let mut visited = HashSet::new();
        let mut path = Vec::new();
        let mut order = Vec::new();

        self.visit(task_name, &mut visited, &mut path, &mut order)?;
        Ok(order)
    }

    fn visit(
        &self,
        name: &str,
        visited: &mut HashSet<String>,
        path: &mut Vec<String>,
        order: &mut Vec<String>,
    ) -> Result<()> {
        if visited.contains(name) {
            return Ok(());
        }

        if let Some(start) = path.iter().position(|entry| entry == name) {
            let mut cycle = path[start..].to_vec();
            cycle.push(name.to_string());
            return Err(Error::TaskCycle { cycle });
        }

        let task = self
            .registry
            .get(name)
            .ok_or_else(|| Error::unknown_task(name, self.registry.suggestions(name)))?;

        path.push(name.to_string());
        for dependency in &task.dependencies {
            self.visit(dependency, visited, path, order)?;
        }
        path.pop();

        visited.insert(name.to_string());
        order.push(name.to_string());
        Ok(())
    }

    /// `task_name`과 의존성을 실행합니다.
    ///
    /// 모든 Task가 `context`를 그대로 받습니다 (`run_super` 포함).
    /// 해석 에러는 `Err`, Task 실패는 결과 목록에 기록되고 첫 실패에서 중단합니다.
    pub async fn run(&self, task_name: &str, context: &TaskContext) -> Result<Vec<TaskResult>> {
        self.run_with(task_name, |_| context.clone()).await
    }

    /// Task마다 `make_context`로 컨텍스트를 만들어 실행합니다.
    pub async fn run_with<F>(&self, task_name: &str, make_context: F) -> Result<Vec<TaskResult>>
    where
        F: Fn(&str) -> TaskContext,
    {
        let order = self.plan(task_name)?;
        debug!("Execution order for {}: {:?}", task_name, order);

        let mut results = Vec::with_capacity(order.len());

        for name in &order {
            let task = self
                .registry
                .get(name)
                .ok_or_else(|| Error::unknown_task(name.as_str(), Vec::new()))?;
            let task_context = make_context(name.as_str());

            info!("Running task: {}", name);
            let start = Instant::now();
            let outcome = (task.action)(task_context).await;
            let duration = start.elapsed();

            match outcome {
                Ok(output) => {
                    debug!("Task {} finished in {:?}", name, duration);
                    results.push(TaskResult::success(name, duration, output));
                }
                Err(e) => {
                    warn!("Task {} failed: {:#}", name, e);
                    results.push(TaskResult::failure(name, duration, &e));
                    break;
                }
            }
        }

        Ok(results)
    }
}
