use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;

use super::error::HeatBalanceError;

/// 시험 설비에 고정된 기관/유체 상수 모음.
///
/// 실행 중에는 바뀌지 않으며 계산기에 명시적으로 전달한다. 설정 파일이나
/// 시험 시트에서 일부 항목만 덮어쓸 수 있도록 누락된 필드는 기본값을 쓴다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConstants {
    /// 연료 발열량 Cv [kJ/kg]
    pub calorific_value_kj_per_kg: f64,
    /// 연료 밀도 [kg/m³]
    pub fuel_density_kg_per_m3: f64,
    /// 물 비열 [kJ/kg·K]
    pub water_specific_heat_kj_per_kgk: f64,
    /// 공기 유입 오리피스 직경 [m]
    pub orifice_diameter_m: f64,
    /// 물 밀도 [kg/m³]. 마노미터 액주 밀도로도 사용한다.
    pub water_density_kg_per_m3: f64,
    /// 발전기 공급 전압 [V]
    pub voltage_v: f64,
    /// 기관 회전수 [rpm]
    pub speed_rpm: f64,
    /// 연료 소비 측정 체적 [m³] (기본 25 cc)
    pub fuel_sample_volume_m3: f64,
    /// 대기압 [Pa]
    pub atmospheric_pressure_pa: f64,
    /// 공기 기체상수 R [J/kg·K]
    pub gas_constant_j_per_kgk: f64,
    /// 배기가스 비열 [kJ/kg·K]
    pub exhaust_specific_heat_kj_per_kgk: f64,
}

impl Default for EngineConstants {
    fn default() -> Self {
        Self {
            calorific_value_kj_per_kg: 42886.0,
            fuel_density_kg_per_m3: 832.0,
            water_specific_heat_kj_per_kgk: 4.186,
            orifice_diameter_m: 2.54e-2,
            water_density_kg_per_m3: 1000.0,
            voltage_v: 220.0,
            speed_rpm: 1500.0,
            fuel_sample_volume_m3: 25e-6,
            atmospheric_pressure_pa: 1.013e5,
            gas_constant_j_per_kgk: 287.0,
            exhaust_specific_heat_kj_per_kgk: 1.005,
        }
    }
}

impl EngineConstants {
    /// 오리피스 단면적 [m²] = π/4·d²
    pub fn orifice_area_m2(&self) -> f64 {
        FRAC_PI_4 * self.orifice_diameter_m.powi(2)
    }

    /// 연료 소비 측정 체적을 cm³로 반환한다.
    pub fn fuel_sample_volume_cc(&self) -> f64 {
        self.fuel_sample_volume_m3 * 1e6
    }

    /// 입열량이 항상 양수가 되도록 분모/계수로 쓰이는 상수를 검사한다.
    pub fn validate(&self) -> Result<(), HeatBalanceError> {
        let positive = [
            ("calorific_value_kj_per_kg", self.calorific_value_kj_per_kg),
            ("fuel_density_kg_per_m3", self.fuel_density_kg_per_m3),
            ("orifice_diameter_m", self.orifice_diameter_m),
            ("water_density_kg_per_m3", self.water_density_kg_per_m3),
            ("fuel_sample_volume_m3", self.fuel_sample_volume_m3),
            ("atmospheric_pressure_pa", self.atmospheric_pressure_pa),
            ("gas_constant_j_per_kgk", self.gas_constant_j_per_kgk),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(HeatBalanceError::InvalidConstants(name));
            }
        }
        let finite = [
            ("water_specific_heat_kj_per_kgk", self.water_specific_heat_kj_per_kgk),
            ("voltage_v", self.voltage_v),
            ("speed_rpm", self.speed_rpm),
            ("exhaust_specific_heat_kj_per_kgk", self.exhaust_specific_heat_kj_per_kgk),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(HeatBalanceError::InvalidConstants(name));
            }
        }
        Ok(())
    }
}
