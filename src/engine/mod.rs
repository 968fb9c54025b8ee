//! 4행정 디젤 기관 전기 부하 시험의 열정산(heat balance) 계산 모듈.
//! 측정값 기록(reading), 배치 검증, 열정산 계산기로 구성한다.

pub mod calculator;
pub mod constants;
pub mod error;
pub mod reading;
pub mod validator;

pub use calculator::{
    calculate, calculate_batch, flow_detail, round2, run_batch, BalanceRun, DerivedResult,
    FlowDetail,
};
pub use constants::EngineConstants;
pub use error::HeatBalanceError;
pub use reading::{capture_batch, Reading, ReadingInput};
pub use validator::{is_valid_batch, validate_batch};
