//! # Hook System
//!
//! 플러그인이 제공하는 Hook을 두 개의 파이프라인으로 실행합니다.
//!
//! ## 설정 파이프라인
//!
//! 1. `extend_user_config`: 등록 순서대로 설정을 차례로 변환 (fold)
//! 2. `validate_user_config`: 확장이 끝난 설정을 검사, 모든 플러그인의 에러를 모아서 보고
//! 3. `resolve_user_config`: 미들웨어 체인 (먼저 등록된 핸들러가 가장 바깥)
//!
//! ## 런타임 파이프라인
//!
//! 1. `extend_environment`: 런타임 환경에 네임스페이스 부착
//! 2. `created`: 모든 확장이 끝난 뒤 호출
//!
//! ## 예시
//!
//! ```ignore
//! let hooks = ConfigHooks::new()
//!     .on_validate(|config| async move {
//!         Ok(match config.settings.extension("etherscan") {
//!             Some(_) => vec![],
//!             None => vec!["etherscan.apiKey is required".into()],
//!         })
//!     })
//!     .on_resolve(|user, base, next| async move {
//!         let resolved = next.run(user).await?;
//!         Ok(resolved)
//!     });
//! ```

mod chain;
mod manager;
mod types;

pub use chain::{ResolveNext, ResolverChain};
pub use manager::HookManager;
pub use types::{
    ConfigHooks, ExtendEnvironmentHook, ExtendUserConfigHook, HookHandlers, ResolveUserConfigHook,
    RuntimeCreatedHook, RuntimeHooks, ValidateUserConfigHook,
};
