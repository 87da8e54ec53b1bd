//! Task System
//!
//! 이름과 파라미터를 가진 작업 단위와 그 실행 관리
//!
//! - `definition`: TaskDefinition / TaskOverride / TaskResult
//! - `context`: 호출 단위 TaskContext
//! - `registry`: TaskRegistry (재정의 이력, 이름 추천)
//! - `runner`: TaskRunner (의존성 순서, 순차 실행)
//! - `script`: 설정 파일에 선언된 Task
//! - `builtin`: 모든 프로젝트에 있는 내장 Task

mod builtin;
mod context;
mod definition;
mod registry;
mod runner;
mod script;

pub use builtin::builtin_tasks;
pub use context::{TaskContext, TaskParams};
pub use definition::{action, TaskAction, TaskDefinition, TaskFuture, TaskOverride, TaskResult};
pub use registry::TaskRegistry;
pub use runner::TaskRunner;
pub use script::script_task;
