//! Runtime Environment
//!
//! 설정 해석 후 한 번 만들어지는 공유 객체입니다. 플러그인은
//! `extend_environment` 단계에서 네임스페이스를 부착하고, 이후에는 읽기만 합니다.

mod environment;

pub use environment::{EnvironmentScope, RuntimeCreatedContext, RuntimeEnvironment, TaskInvoker};
