use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::constants::GAMMA_STEAM;
use crate::efficiency::TypicalEfficiency;
use crate::matching::ApproachTemperatures;

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 효율 관련 기본값.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EfficiencyDefaults {
    /// 케이스 파일에 효율 입력이 없을 때 쓰는 대표 구간
    pub default_bucket: TypicalEfficiency,
}

/// MVR 관련 기본값.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MvrDefaults {
    /// 수증기 비열비
    pub gamma: f64,
}

impl Default for MvrDefaults {
    fn default() -> Self {
        Self { gamma: GAMMA_STEAM }
    }
}

/// 출력 형식 설정.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// 보고서 소수 자릿수
    pub decimals: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { decimals: 2 }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub approach: ApproachTemperatures,
    pub efficiency: EfficiencyDefaults,
    pub mvr: MvrDefaults,
    pub output: OutputSettings,
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Serde(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 설정 파일을 로드하거나 없으면 기본 설정으로 새로 만든다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    } else {
        let cfg = Config::default();
        cfg.save(path)?;
        Ok(cfg)
    }
}

impl Config {
    /// 설정을 TOML 파일로 저장한다.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
