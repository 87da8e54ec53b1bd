//! Configuration Loader
//!
//! 단일 JSON 설정 파일(`kiln.config.json`)을 읽습니다.
//!
//! - 경로를 지정하지 않으면 작업 디렉토리의 기본 파일을 사용하고, 없으면 빈 설정
//! - 경로를 명시했는데 파일이 없으면 에러
//! - `//`, `/* */` 주석 허용

use super::types::KilnConfig;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 기본 설정 파일 이름
pub const CONFIG_FILE_NAME: &str = "kiln.config.json";

// ============================================================================
// ConfigLoader - 설정 로더
// ============================================================================

/// 설정 로더
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// 설정 파일 경로
    path: PathBuf,
    /// 사용자가 직접 지정한 경로인지 여부
    explicit: bool,
}

impl ConfigLoader {
    /// 작업 디렉토리의 기본 설정 파일을 사용하는 로더
    pub fn new(working_dir: &Path) -> Self {
        Self {
            path: working_dir.join(CONFIG_FILE_NAME),
            explicit: false,
        }
    }

    /// 명시적 경로를 사용하는 로더
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            explicit: true,
        }
    }

    /// 설정 파일 경로
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 설정 로드
    pub fn load(&self) -> Result<KilnConfig> {
        if !self.path.exists() {
            if self.explicit {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    self.path.display()
                )));
            }
            debug!("No config file at {}, using defaults", self.path.display());
            return Ok(KilnConfig::new());
        }

        let config = load_config_from_file(&self.path)?;
        info!("Loaded config from: {}", self.path.display());
        Ok(config)
    }
}

// ============================================================================
// 유틸리티 함수
// ============================================================================

/// 파일에서 설정 로드
pub fn load_config_from_file(path: &Path) -> Result<KilnConfig> {
    let content = std::fs::read_to_string(path)?;
    let content = strip_json_comments(&content);

    let config: KilnConfig = serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Invalid config file at {}: {}", path.display(), e))
    })?;

    debug!(
        "Parsed config {}: {} networks, {} tasks, {} extension sections",
        path.display(),
        config.networks.len(),
        config.tasks.len(),
        config.extra.len()
    );

    Ok(config)
}

/// JSON 주석 제거 (문자열 내부는 유지)
pub fn strip_json_comments(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            output.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        output.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        let next = chars.peek().copied();
        match (c, next) {
            ('"', _) => {
                in_string = true;
                output.push(c);
            }
            ('/', Some('/')) => {
                // 라인 주석 스킵
                for c in chars.by_ref() {
                    if c == '\n' {
                        output.push(c);
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                // 블록 주석 스킵
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => output.push(c),
        }
    }

    output
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_default_file_is_empty() {
        let dir = tempdir().unwrap();
        let config = ConfigLoader::new(dir.path()).load().unwrap();
        assert_eq!(config, KilnConfig::new());
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempdir().unwrap();
        let loader = ConfigLoader::with_path(dir.path().join("nope.json"));
        assert!(matches!(loader.load(), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_with_comments() {
        let dir = tempdir().unwrap();
        let file = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &file,
            r#"{
                // 기본 네트워크
                "defaultNetwork": "dev",
                /* block */
                "networks": { "dev": { "url": "http://localhost:8545//rpc" } }
            }"#,
        )
        .unwrap();

        let config = ConfigLoader::new(dir.path()).load().unwrap();
        assert_eq!(config.default_network.as_deref(), Some("dev"));
        assert_eq!(
            config.networks["dev"].url.as_deref(),
            Some("http://localhost:8545//rpc")
        );
    }

    #[test]
    fn test_malformed_file_names_path() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("broken.json");
        fs::write(&file, "{ not json").unwrap();

        match load_config_from_file(&file) {
            Err(Error::Config(message)) => assert!(message.contains("broken.json")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_strip_keeps_escaped_quotes() {
        let input = r#"{"a": "x\"//y"} // trailing"#;
        assert_eq!(strip_json_comments(input).trim(), r#"{"a": "x\"//y"}"#);
    }
}
