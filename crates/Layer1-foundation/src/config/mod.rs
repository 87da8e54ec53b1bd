//! Config - 프로젝트 설정
//!
//! - `types.rs` - KilnConfig 스키마
//! - `loader.rs` - 설정 파일 로더

mod loader;
mod types;

pub use loader::{load_config_from_file, strip_json_comments, ConfigLoader, CONFIG_FILE_NAME};
pub use types::{
    KilnConfig, NetworkConfig, ParamDefinition, ParamKind, TaskConfig, DEFAULT_LOCALHOST_URL,
    DEFAULT_NETWORK,
};
