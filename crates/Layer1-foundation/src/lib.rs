//! # kiln-foundation
//!
//! Foundation layer for Kiln:
//! - Error: 공통 에러 타입 (`Error`, `Result`)
//! - Config: 프로젝트 설정 스키마 및 로더 (`KilnConfig`, `ConfigLoader`)

pub mod config;
pub mod error;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config
// ============================================================================
pub use config::{
    load_config_from_file, ConfigLoader, KilnConfig, NetworkConfig, ParamDefinition, ParamKind,
    TaskConfig, CONFIG_FILE_NAME, DEFAULT_NETWORK,
};
