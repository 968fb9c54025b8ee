//! 입력 데이터 요약표와 열정산 데이터 시트(시간당 기준)를 만든다.
//! 텍스트 표 출력과 CSV 내보내기를 함께 제공한다.

use std::io::Write;
use thiserror::Error;

use crate::engine::{DerivedResult, Reading};

/// 보고서 작성 중 발생 가능한 오류.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV 작성 오류: {0}")]
    Csv(#[from] csv::Error),
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
}

/// 입력 데이터 요약표 열 이름
pub const INPUT_COLUMNS: [&str; 16] = [
    "S.No",
    "I (Amp)",
    "V(Volts)",
    "Speed(RPM)",
    "Time for 25cc fuel (s)",
    "Input Water Temp (°C)",
    "Output Water Temp (°C)",
    "Rise in Water Temp (°C)",
    "Water collection in 30s (kg)",
    "Input Gas Temp (°C)",
    "Output Gas Temp (°C)",
    "Rise in Gas Temp (°C)",
    "h1(cm)",
    "h2(cm)",
    "Difference (h1-h2)",
    "Orifice Diameter (m)",
];

/// 열정산 데이터 시트 열 이름
pub const RESULT_COLUMNS: [&str; 15] = [
    "S.No",
    "BP (kW)",
    "Qin (KJ/hr)",
    "BP (KJ/hr)",
    "BP (%)",
    "BP (Cumulative %)",
    "Qcw (KJ/hr)",
    "Qcw (%)",
    "Qcw (Cumulative %)",
    "Qex (KJ/hr)",
    "Qex (%)",
    "Qex (Cumulative %)",
    "Unacc. Loss (KJ/hr)",
    "Unacc. Loss (%)",
    "Unacc. Loss (Cumulative %)",
];

/// f64를 불필요한 0 없이 표시한다 (1.0 -> "1", 0.0254 -> "0.0254").
pub fn fmt_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// 결과 값은 소수 둘째 자리까지 고정 표시한다.
fn fmt_2dp(value: f64) -> String {
    format!("{value:.2}")
}

/// 측정값 1건을 입력 요약표의 한 행으로 만든다.
pub fn input_row(reading: &Reading) -> Vec<String> {
    let mut row = vec![reading.index.to_string()];
    row.extend(
        [
            reading.load_current_a,
            reading.voltage_v,
            reading.speed_rpm,
            reading.fuel_time_s,
            reading.water_inlet_c,
            reading.water_outlet_c,
            reading.water_rise_c,
            reading.water_mass_kg,
            reading.gas_inlet_c,
            reading.gas_outlet_c,
            reading.gas_rise_c,
            reading.manometer_high_cm,
            reading.manometer_low_cm,
            reading.manometer_diff_cm,
            reading.orifice_diameter_m,
        ]
        .into_iter()
        .map(fmt_value),
    );
    row
}

/// 결과 1건을 데이터 시트의 한 행으로 만든다.
pub fn result_row(result: &DerivedResult) -> Vec<String> {
    let mut row = vec![result.index.to_string()];
    row.extend(
        [
            result.brake_power_kw,
            result.heat_input_kj_per_h,
            result.brake_power_kj_per_h,
            result.brake_power_pct,
            result.brake_power_cum_pct,
            result.cooling_water_kj_per_h,
            result.cooling_water_pct,
            result.cooling_water_cum_pct,
            result.exhaust_kj_per_h,
            result.exhaust_pct,
            result.exhaust_cum_pct,
            result.unaccounted_kj_per_h,
            result.unaccounted_pct,
            result.unaccounted_cum_pct,
        ]
        .into_iter()
        .map(fmt_2dp),
    );
    row
}

pub fn input_rows(readings: &[Reading]) -> Vec<Vec<String>> {
    readings.iter().map(input_row).collect()
}

pub fn result_rows(results: &[DerivedResult]) -> Vec<Vec<String>> {
    results.iter().map(result_row).collect()
}

fn format_line<'a>(widths: &[usize], cells: impl Iterator<Item = (usize, &'a str)>) -> String {
    let parts: Vec<String> = cells
        .map(|(i, c)| {
            let pad = widths[i].saturating_sub(c.chars().count());
            format!("{}{}", " ".repeat(pad), c)
        })
        .collect();
    format!("| {} |", parts.join(" | "))
}

/// 고정폭 텍스트 표를 만든다. 숫자 열은 오른쪽 정렬한다.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let separator = format!(
        "|{}|",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("|")
    );

    let mut out = String::new();
    out.push_str(&format_line(&widths, headers.iter().copied().enumerate()));
    out.push('\n');
    out.push_str(&separator);
    out.push('\n');
    for row in rows {
        let cells = row.iter().take(widths.len()).map(String::as_str).enumerate();
        out.push_str(&format_line(&widths, cells));
        out.push('\n');
    }
    out
}

fn write_csv<W: Write>(writer: W, headers: &[&str], rows: &[Vec<String>]) -> Result<(), ReportError> {
    let mut writer = csv::WriterBuilder::new().from_writer(writer);
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// 입력 요약표를 CSV로 기록한다.
pub fn write_inputs_csv<W: Write>(writer: W, readings: &[Reading]) -> Result<(), ReportError> {
    write_csv(writer, &INPUT_COLUMNS, &input_rows(readings))
}

/// 열정산 데이터 시트를 CSV로 기록한다.
pub fn write_results_csv<W: Write>(writer: W, results: &[DerivedResult]) -> Result<(), ReportError> {
    write_csv(writer, &RESULT_COLUMNS, &result_rows(results))
}
