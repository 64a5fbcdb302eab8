use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::units::TemperatureUnit;
use crate::water::{CalculationError, RecommendationPolicy, TargetOverride, TargetRangeConfig};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

fn default_log_level() -> String {
    "warn".to_string()
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ko / en / auto. 없으면 시스템 로케일
    pub language: Option<String>,
    /// 언어팩(TOML) 디렉터리
    pub language_pack_dir: Option<String>,
    /// error / warn / info / debug / trace
    pub log_level: String,
    /// 대화형 입력의 온도 단위
    pub temperature_unit: TemperatureUnit,
    /// 권고 규칙 임계값
    pub policy: RecommendationPolicy,
    /// 플랜트 목표 범위
    pub targets: TargetRangeConfig,
    /// 수계 단위 덮어쓰기
    pub overrides: Vec<TargetOverride>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: None,
            language_pack_dir: None,
            log_level: default_log_level(),
            temperature_unit: TemperatureUnit::Celsius,
            policy: RecommendationPolicy::default(),
            targets: TargetRangeConfig::default(),
            overrides: Vec::new(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// 목표 범위가 잘못됨
    #[error("목표 범위 오류: {0}")]
    Targets(#[from] CalculationError),
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        cfg.resolved_targets()?;
        Ok(cfg)
    } else {
        let cfg = Config::default();
        cfg.save(path)?;
        Ok(cfg)
    }
}

impl Config {
    /// 설정을 파일에 저장한다.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 플랜트 목표 범위에 수계 덮어쓰기를 적용한 최종 설정.
    pub fn resolved_targets(&self) -> Result<TargetRangeConfig, CalculationError> {
        TargetRangeConfig::resolve(Some(&self.targets), &self.overrides)
    }
}
