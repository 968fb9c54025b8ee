use tracing::warn;

use super::error::HeatBalanceError;
use super::reading::Reading;

fn fuel_time_ok(reading: &Reading) -> bool {
    reading.fuel_time_s.is_finite() && reading.fuel_time_s > 0.0
}

/// 배치 전체의 통과 여부만 반환한다.
pub fn is_valid_batch(readings: &[Reading]) -> bool {
    readings.iter().all(fuel_time_ok)
}

/// 연료 소비 시간이 0 이하인 측정값이 하나라도 있으면 배치 전체를 거부한다.
/// 오류에는 처음 발견된 측정값의 순번이 담긴다.
pub fn validate_batch(readings: &[Reading]) -> Result<(), HeatBalanceError> {
    match readings.iter().find(|r| !fuel_time_ok(r)) {
        Some(bad) => {
            warn!(
                index = bad.index,
                fuel_time_s = bad.fuel_time_s,
                "rejecting reading batch"
            );
            Err(HeatBalanceError::InvalidReading {
                index: bad.index,
                fuel_time_s: bad.fuel_time_s,
            })
        }
        None => Ok(()),
    }
}
