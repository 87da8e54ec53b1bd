//! # Plugin System
//!
//! Task와 Hook을 제공하는 확장 단위
//!
//! ## 개요
//!
//! - `Plugin`: ID, 패키지 이름, 지연 로딩 의존성, Hook 핸들러, Task 목록
//! - `PluginLoader`: 의존 플러그인을 비동기로 로드하는 함수
//! - `PluginResolver`: 검증 + 의존성 위상 정렬
//!
//! ## 예시
//!
//! ```ignore
//! let ethers = Arc::new(Plugin::new("kiln-ethers").with_task(console_task()));
//! let verify = Arc::new(
//!     Plugin::new("kiln-verify")
//!         .with_package("@kiln/verify")
//!         .depends_on(&ethers),
//! );
//!
//! let plugins = PluginResolver::new().resolve(&[verify]).await?;
//! // -> [kiln-ethers, kiln-verify]
//! ```

mod resolver;
mod types;
mod validate;

pub use resolver::PluginResolver;
pub use types::{Plugin, PluginFuture, PluginLoader};
pub use validate::validate_plugin;
