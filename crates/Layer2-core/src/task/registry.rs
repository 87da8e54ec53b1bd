//! Task 레지스트리
//!
//! 이름으로 Task 정의를 보관합니다. 같은 이름을 다시 등록하면 대체된 정의를
//! 재정의 이력으로 남겨 새 정의가 호출할 수 있게 합니다.

use super::definition::{TaskDefinition, TaskOverride};
use kiln_foundation::{Error, Result};
use std::collections::HashMap;
use tracing::debug;

/// 이름 추천에 쓰는 최대 편집 거리
const SUGGESTION_DISTANCE: usize = 2;

/// 등록 순서를 유지하는 Task 레지스트리
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: Vec<TaskDefinition>,
    index: HashMap<String, usize>,
    overrides: HashMap<String, TaskDefinition>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Task 등록 (이전 정의는 original로 보관)
    ///
    /// 바로 이전 정의 하나만 보관합니다.
    pub fn register(&mut self, task: TaskDefinition) {
        match self.index.get(&task.name) {
            Some(&slot) => {
                debug!("Task {} overridden", task.name);
                let previous = std::mem::replace(&mut self.tasks[slot], task);
                self.overrides.insert(previous.name.clone(), previous);
            }
            None => {
                debug!("Task {} registered", task.name);
                self.index.insert(task.name.clone(), self.tasks.len());
                self.tasks.push(task);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&TaskDefinition> {
        self.index.get(name).map(|&slot| &self.tasks[slot])
    }

    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// 등록 순서대로 모든 Task
    pub fn all_tasks(&self) -> &[TaskDefinition] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// `partial`과 비슷한 이름 목록
    ///
    /// 대소문자 무시 부분 문자열 일치(양방향)와 편집 거리가 작은 이름을 포함합니다.
    pub fn suggestions(&self, partial: &str) -> Vec<String> {
        let needle = partial.to_lowercase();

        self.tasks
            .iter()
            .map(|task| task.name.as_str())
            .filter(|name| {
                let candidate = name.to_lowercase();
                candidate.contains(&needle)
                    || needle.contains(&candidate)
                    || levenshtein(&candidate, &needle) <= SUGGESTION_DISTANCE
            })
            .map(str::to_string)
            .collect()
    }

    /// 등록된 Task에 `partial`을 얕게 병합
    pub fn override_task(&mut self, name: &str, partial: TaskOverride) -> Result<()> {
        let slot = match self.index.get(name) {
            Some(&slot) => slot,
            None => return Err(Error::unknown_task(name, self.suggestions(name))),
        };

        partial.apply(&mut self.tasks[slot]);
        debug!("Task {} patched", name);
        Ok(())
    }

    /// 현재 정의가 대체한 이전 정의
    pub fn original(&self, name: &str) -> Option<&TaskDefinition> {
        self.overrides.get(name)
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut current = vec![i + 1; b_chars.len() + 1];
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        previous = current;
    }

    previous[b_chars.len()]
}
