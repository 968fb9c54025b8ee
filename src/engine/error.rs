use thiserror::Error;

/// 열정산 계산 전에 검출되는 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HeatBalanceError {
    /// 연료 소비 시간이 0 이하(또는 유한하지 않음)인 측정값이 배치에 포함됨
    #[error("{index}번 측정값의 연료 소비 시간({fuel_time_s} s)은 0보다 커야 합니다.")]
    InvalidReading { index: usize, fuel_time_s: f64 },
    /// 기관 상수가 물리적으로 유효하지 않음
    #[error("기관 상수 `{0}` 값이 유효하지 않습니다 (유한한 양수여야 함).")]
    InvalidConstants(&'static str),
}
