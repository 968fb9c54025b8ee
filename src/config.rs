use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::engine::EngineConstants;

const CONFIG_FILE: &str = "config.toml";

fn default_language() -> String {
    "auto".into()
}

fn default_output_dir() -> String {
    "output".into()
}

fn default_chart_width() -> u32 {
    1600
}

fn default_chart_height() -> u32 {
    960
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// 언어 코드 (auto/ko/en-us)
    #[serde(default = "default_language")]
    pub language: String,
    /// 외부 언어팩 폴더
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_pack_dir: Option<String>,
    /// CSV/PNG 내보내기 폴더
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_chart_width")]
    pub chart_width: u32,
    #[serde(default = "default_chart_height")]
    pub chart_height: u32,
    /// 시험 설비 상수
    #[serde(default)]
    pub constants: EngineConstants,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            language_pack_dir: None,
            output_dir: default_output_dir(),
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
            constants: EngineConstants::default(),
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
    Serde(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// config.toml을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    load_from(Path::new(CONFIG_FILE))
}

/// 지정 경로의 설정을 로드한다. 파일이 없으면 기본값으로 새로 만든다.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        Ok(cfg)
    } else {
        let cfg = Config::default();
        save_to(&cfg, path)?;
        Ok(cfg)
    }
}

fn save_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write(path, content)?;
    Ok(())
}

impl Config {
    /// 설정을 config.toml에 저장한다.
    pub fn save(&self) -> Result<(), ConfigError> {
        save_to(self, Path::new(CONFIG_FILE))
    }

    /// PNG 크기 (가로, 세로)
    pub fn chart_size(&self) -> (u32, u32) {
        (self.chart_width, self.chart_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrips_through_toml() {
        let cfg = Config::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn partial_constants_fall_back_to_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            language = "en-us"
            [constants]
            voltage_v = 230.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.language, "en-us");
        assert_eq!(cfg.output_dir, "output");
        assert_eq!(cfg.constants.voltage_v, 230.0);
        assert_eq!(cfg.constants.calorific_value_kj_per_kg, 42886.0);
    }
}
