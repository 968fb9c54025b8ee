//! 시험 시트(TOML) 로드.
//!
//! ```toml
//! [constants]            # 선택. 지정한 항목만 기본값을 덮어쓴다.
//! voltage_v = 230.0
//!
//! [[readings]]
//! load_current_a = 5.0
//! fuel_time_s = 25.0
//! ...
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::engine::{capture_batch, EngineConstants, Reading, ReadingInput};

/// 한 번의 시험에서 받을 수 있는 최대 측정 횟수.
pub const MAX_READINGS: usize = 10;

/// 시험 시트 로드 중 발생 가능한 오류.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("시험 시트 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("시험 시트 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("측정값이 없습니다.")]
    Empty,
    #[error("측정값은 최대 {max}개까지 입력할 수 있습니다 (입력: {count}개).")]
    TooMany { count: usize, max: usize },
}

/// 파일에 기록된 시험 시트.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestSheet {
    /// 이 시트에만 적용할 상수. 없으면 설정 파일의 상수를 쓴다.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constants: Option<EngineConstants>,
    #[serde(default)]
    pub readings: Vec<ReadingInput>,
}

impl TestSheet {
    /// 측정 횟수가 1..=MAX_READINGS 범위인지 확인한다.
    pub fn check_count(&self) -> Result<(), SheetError> {
        match self.readings.len() {
            0 => Err(SheetError::Empty),
            n if n > MAX_READINGS => Err(SheetError::TooMany {
                count: n,
                max: MAX_READINGS,
            }),
            _ => Ok(()),
        }
    }

    /// 시트 상수가 있으면 그것을, 없으면 `fallback`을 사용한다.
    pub fn effective_constants(&self, fallback: &EngineConstants) -> EngineConstants {
        self.constants.unwrap_or(*fallback)
    }

    /// 측정 기록 배치를 만든다.
    pub fn readings(&self, constants: &EngineConstants) -> Vec<Reading> {
        capture_batch(&self.readings, constants)
    }
}

/// TOML 문자열에서 시험 시트를 파싱한다.
pub fn parse_sheet(src: &str) -> Result<TestSheet, SheetError> {
    let sheet: TestSheet = toml::from_str(src)?;
    sheet.check_count()?;
    Ok(sheet)
}

/// 파일에서 시험 시트를 읽는다.
pub fn load_sheet(path: &Path) -> Result<TestSheet, SheetError> {
    let content = fs::read_to_string(path)?;
    parse_sheet(&content)
}
