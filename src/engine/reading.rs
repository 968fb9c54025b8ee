use serde::{Deserialize, Serialize};

use super::constants::EngineConstants;

/// 한 번의 측정에서 사용자가 입력하는 원시 값.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingInput {
    /// 부하 전류 [A]
    pub load_current_a: f64,
    /// 연료 25 cc 소비 시간 [s]
    pub fuel_time_s: f64,
    /// 냉각수 입구 온도 [°C]
    pub water_inlet_c: f64,
    /// 냉각수 출구 온도 [°C]
    pub water_outlet_c: f64,
    /// 30초 동안 받은 냉각수 질량 [kg]
    pub water_mass_kg: f64,
    /// 배기가스 입구 온도 [°C]
    pub gas_inlet_c: f64,
    /// 배기가스 출구 온도 [°C]
    pub gas_outlet_c: f64,
    /// 마노미터 높은 쪽 액주 h1 [cm]
    pub manometer_high_cm: f64,
    /// 마노미터 낮은 쪽 액주 h2 [cm]
    pub manometer_low_cm: f64,
}

/// 검증/계산에 쓰이는 측정 기록. 생성 후에는 변경하지 않는다.
///
/// 전압, 회전수, 오리피스 직경은 상수에서 복사하고 온도 상승과 마노미터
/// 차압은 입력값으로부터 계산한다. 음수 차이도 그대로 둔다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    /// 1부터 시작하는 순번
    pub index: usize,
    pub load_current_a: f64,
    pub voltage_v: f64,
    pub speed_rpm: f64,
    pub fuel_time_s: f64,
    pub water_inlet_c: f64,
    pub water_outlet_c: f64,
    /// 출구 - 입구
    pub water_rise_c: f64,
    pub water_mass_kg: f64,
    pub gas_inlet_c: f64,
    pub gas_outlet_c: f64,
    /// 출구 - 입구
    pub gas_rise_c: f64,
    pub manometer_high_cm: f64,
    pub manometer_low_cm: f64,
    /// h1 - h2
    pub manometer_diff_cm: f64,
    pub orifice_diameter_m: f64,
}

impl Reading {
    /// 사용자 입력과 상수로부터 측정 기록을 만든다.
    pub fn capture(index: usize, input: &ReadingInput, constants: &EngineConstants) -> Self {
        Self {
            index,
            load_current_a: input.load_current_a,
            voltage_v: constants.voltage_v,
            speed_rpm: constants.speed_rpm,
            fuel_time_s: input.fuel_time_s,
            water_inlet_c: input.water_inlet_c,
            water_outlet_c: input.water_outlet_c,
            water_rise_c: input.water_outlet_c - input.water_inlet_c,
            water_mass_kg: input.water_mass_kg,
            gas_inlet_c: input.gas_inlet_c,
            gas_outlet_c: input.gas_outlet_c,
            gas_rise_c: input.gas_outlet_c - input.gas_inlet_c,
            manometer_high_cm: input.manometer_high_cm,
            manometer_low_cm: input.manometer_low_cm,
            manometer_diff_cm: input.manometer_high_cm - input.manometer_low_cm,
            orifice_diameter_m: constants.orifice_diameter_m,
        }
    }
}

/// 입력 순서대로 1부터 번호를 붙여 측정 기록 배치를 만든다.
pub fn capture_batch(inputs: &[ReadingInput], constants: &EngineConstants) -> Vec<Reading> {
    inputs
        .iter()
        .enumerate()
        .map(|(i, input)| Reading::capture(i + 1, input, constants))
        .collect()
}
