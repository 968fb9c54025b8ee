//! 측정값 1건을 시간당 열정산 결과 1행으로 변환하는 계산기.
//!
//! 모든 열량은 kJ/hr 기준이다. 계산 순서:
//! ```text
//! m_f   = V_fc / t                                 (연료 체적유량, m³/s)
//! Qin   = m_f · ρ_f · 3600 · Cv
//! ρ_a   = P_atm / (R · (273 + T_gas,in))
//! V_a   = √(2 · g · ρ_w · (h1 - h2)·10⁻² / ρ_a) · A_orifice
//! m_a   = V_a · ρ_a · 3600                         (kg/hr)
//! Qex   = (m_a + m_f · 3600) · cp_gas · ΔT_gas
//! BP    = V · I · 10⁻³ · 3600
//! Qcw   = (m_w / 30) · 3600 · cp_w · ΔT_w
//! Qun   = Qin - Qex - BP - Qcw
//! ```

use tracing::{debug, info};

use super::constants::EngineConstants;
use super::error::HeatBalanceError;
use super::reading::{capture_batch, Reading, ReadingInput};
use super::validator::validate_batch;

/// 중력가속도 [m/s²]
const GRAVITY_M_PER_S2: f64 = 9.81;
/// 냉각수 질량을 받는 시간 [s]
const WATER_COLLECTION_INTERVAL_S: f64 = 30.0;
/// 배기/공기 밀도 계산에 쓰는 절대온도 오프셋
const CELSIUS_OFFSET_K: f64 = 273.0;
const SECONDS_PER_HOUR: f64 = 3600.0;

/// 중간 유량 계산값. 반올림하지 않는다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowDetail {
    /// 연료 체적유량 [m³/s]. 배기 질량유량 합산 시에는 그대로 kg/s처럼 취급한다.
    pub fuel_flow: f64,
    /// 입열량 [kJ/hr]
    pub heat_input_kj_per_h: f64,
    /// 흡입 공기 밀도 [kg/m³]
    pub air_density_kg_per_m3: f64,
    /// 오리피스 공기 체적유량 [m³/s]
    pub air_volume_flow_m3_per_s: f64,
    /// 공기 질량유량 [kg/hr]
    pub air_mass_flow_kg_per_h: f64,
}

/// 열정산 결과 1행. 값은 소수 둘째 자리로 반올림되어 있다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedResult {
    /// 원본 측정값 순번
    pub index: usize,
    /// 제동 출력 [kW] (= V·I·10⁻³)
    pub brake_power_kw: f64,
    pub heat_input_kj_per_h: f64,
    pub brake_power_kj_per_h: f64,
    pub brake_power_pct: f64,
    pub brake_power_cum_pct: f64,
    pub cooling_water_kj_per_h: f64,
    pub cooling_water_pct: f64,
    pub cooling_water_cum_pct: f64,
    pub exhaust_kj_per_h: f64,
    pub exhaust_pct: f64,
    pub exhaust_cum_pct: f64,
    pub unaccounted_kj_per_h: f64,
    pub unaccounted_pct: f64,
    pub unaccounted_cum_pct: f64,
}

/// 소수 둘째 자리 반올림. 정확히 중간인 값은 짝수 쪽으로 보낸다 (0.125 -> 0.12).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// 연료/공기 유량과 입열량을 계산한다.
pub fn flow_detail(reading: &Reading, constants: &EngineConstants) -> FlowDetail {
    let fuel_flow = constants.fuel_sample_volume_m3 / reading.fuel_time_s;
    let heat_input_kj_per_h = fuel_flow
        * constants.fuel_density_kg_per_m3
        * SECONDS_PER_HOUR
        * constants.calorific_value_kj_per_kg;

    // 밀도 기준 온도는 배기가스 입구 온도로 고정한다.
    let air_density_kg_per_m3 = constants.atmospheric_pressure_pa
        / (constants.gas_constant_j_per_kgk * (CELSIUS_OFFSET_K + reading.gas_inlet_c));
    let head_m = reading.manometer_diff_cm * 1e-2;
    let air_volume_flow_m3_per_s = (2.0
        * GRAVITY_M_PER_S2
        * constants.water_density_kg_per_m3
        * head_m
        / air_density_kg_per_m3)
        .sqrt()
        * constants.orifice_area_m2();
    let air_mass_flow_kg_per_h = air_volume_flow_m3_per_s * air_density_kg_per_m3 * SECONDS_PER_HOUR;

    FlowDetail {
        fuel_flow,
        heat_input_kj_per_h,
        air_density_kg_per_m3,
        air_volume_flow_m3_per_s,
        air_mass_flow_kg_per_h,
    }
}

/// 측정값 1건의 열정산을 계산한다.
///
/// 검증은 하지 않는다. 연료 시간이 0이거나 입열량이 0이면 IEEE 연산 결과
/// (inf/NaN)가 그대로 전달된다. 음수 차압은 공기 유량을 NaN으로 만든다.
pub fn calculate(reading: &Reading, constants: &EngineConstants) -> DerivedResult {
    let flow = flow_detail(reading, constants);
    let qin = flow.heat_input_kj_per_h;

    let qex = (flow.air_mass_flow_kg_per_h + flow.fuel_flow * SECONDS_PER_HOUR)
        * constants.exhaust_specific_heat_kj_per_kgk
        * reading.gas_rise_c;
    let bp_kw = reading.voltage_v * reading.load_current_a * 1e-3;
    let bp = bp_kw * SECONDS_PER_HOUR;
    let qcw = (reading.water_mass_kg / WATER_COLLECTION_INTERVAL_S)
        * SECONDS_PER_HOUR
        * constants.water_specific_heat_kj_per_kgk
        * reading.water_rise_c;
    let unaccounted = qin - qex - bp - qcw;

    let bp_pct = round2(bp * 100.0 / qin);
    let qcw_pct = round2(qcw * 100.0 / qin);
    let qex_pct = round2(qex * 100.0 / qin);
    let unaccounted_pct = round2(unaccounted * 100.0 / qin);

    // 누적 백분율은 반올림된 성분의 합이다.
    let qcw_cum = round2(bp_pct + qcw_pct);
    let qex_cum = round2(bp_pct + qcw_pct + qex_pct);
    let unaccounted_cum = round2(bp_pct + qcw_pct + qex_pct + unaccounted_pct);

    DerivedResult {
        index: reading.index,
        brake_power_kw: round2(bp_kw),
        heat_input_kj_per_h: round2(qin),
        brake_power_kj_per_h: round2(bp),
        brake_power_pct: bp_pct,
        brake_power_cum_pct: bp_pct,
        cooling_water_kj_per_h: round2(qcw),
        cooling_water_pct: qcw_pct,
        cooling_water_cum_pct: qcw_cum,
        exhaust_kj_per_h: round2(qex),
        exhaust_pct: qex_pct,
        exhaust_cum_pct: qex_cum,
        unaccounted_kj_per_h: round2(unaccounted),
        unaccounted_pct,
        unaccounted_cum_pct: unaccounted_cum,
    }
}

/// 상수와 배치를 검증한 뒤 측정값 순서대로 결과를 만든다.
/// 하나라도 실패하면 결과를 전혀 만들지 않는다.
pub fn calculate_batch(
    readings: &[Reading],
    constants: &EngineConstants,
) -> Result<Vec<DerivedResult>, HeatBalanceError> {
    constants.validate()?;
    validate_batch(readings)?;
    info!(readings = readings.len(), "computing heat balance");
    let results = readings
        .iter()
        .map(|r| {
            let row = calculate(r, constants);
            debug!(
                index = row.index,
                qin = row.heat_input_kj_per_h,
                total_pct = row.unaccounted_cum_pct,
                "heat balance row"
            );
            row
        })
        .collect();
    Ok(results)
}

/// 한 번의 시험 실행 결과: 측정 기록과 그에 대응하는 결과 행.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceRun {
    pub readings: Vec<Reading>,
    pub results: Vec<DerivedResult>,
}

/// 사용자 입력으로부터 측정 기록을 만들고 열정산을 계산한다.
pub fn run_batch(
    inputs: &[ReadingInput],
    constants: &EngineConstants,
) -> Result<BalanceRun, HeatBalanceError> {
    let readings = capture_batch(inputs, constants);
    let results = calculate_batch(&readings, constants)?;
    Ok(BalanceRun { readings, results })
}
