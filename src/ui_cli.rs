use std::io::{self, Write};
use std::path::PathBuf;

use crate::app::AppError;
use crate::chart::{self, HeatBalanceChart};
use crate::config::Config;
use crate::engine::{BalanceRun, EngineConstants, ReadingInput};
use crate::export::ExportedFiles;
use crate::i18n::{keys, Translator};
use crate::report;
use crate::sheet::MAX_READINGS;

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    EnterReadings,
    LoadSheet,
    Constants,
    Settings,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    println!("{}", tr.t(keys::MAIN_MENU_TITLE));
    println!("{}", tr.t(keys::MAIN_MENU_ENTER_READINGS));
    println!("{}", tr.t(keys::MAIN_MENU_LOAD_SHEET));
    println!("{}", tr.t(keys::MAIN_MENU_CONSTANTS));
    println!("{}", tr.t(keys::MAIN_MENU_SETTINGS));
    println!("{}", tr.t(keys::MAIN_MENU_EXIT));
    loop {
        let sel = read_line(tr.t(keys::PROMPT_MENU_SELECT))?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::EnterReadings),
            "2" => return Ok(MenuChoice::LoadSheet),
            "3" => return Ok(MenuChoice::Constants),
            "4" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 측정 횟수와 측정값을 차례로 입력받는다.
/// 연료 소비 시간은 0보다 큰 값이 들어올 때까지 다시 묻는다.
pub fn read_reading_inputs(tr: &Translator) -> Result<Vec<ReadingInput>, AppError> {
    println!("\n-- {} --", tr.t(keys::READINGS_HEADING));
    let count = loop {
        let n = read_f64(tr, &format!("{} (1-{MAX_READINGS}): ", tr.t(keys::READING_COUNT)))?;
        if n.fract() == 0.0 && (1.0..=MAX_READINGS as f64).contains(&n) {
            break n as usize;
        }
        println!("{}", tr.t(keys::ERROR_READING_COUNT));
    };

    let field = |key: &str| format!("  {}: ", tr.t(key));
    let mut inputs = Vec::with_capacity(count);
    for i in 1..=count {
        println!("\n{} {i}", tr.t(keys::READING_LABEL));
        let load_current_a = read_f64(tr, &field(keys::FIELD_LOAD))?;
        let fuel_time_s = loop {
            let t = read_f64(tr, &field(keys::FIELD_FUEL_TIME))?;
            if t > 0.0 {
                break t;
            }
            println!("{}", tr.t(keys::ERROR_FUEL_TIME));
        };
        inputs.push(ReadingInput {
            load_current_a,
            fuel_time_s,
            water_inlet_c: read_f64(tr, &field(keys::FIELD_WATER_IN))?,
            water_outlet_c: read_f64(tr, &field(keys::FIELD_WATER_OUT))?,
            water_mass_kg: read_f64(tr, &field(keys::FIELD_WATER_MASS))?,
            gas_inlet_c: read_f64(tr, &field(keys::FIELD_GAS_IN))?,
            gas_outlet_c: read_f64(tr, &field(keys::FIELD_GAS_OUT))?,
            manometer_high_cm: read_f64(tr, &field(keys::FIELD_MANO_HIGH))?,
            manometer_low_cm: read_f64(tr, &field(keys::FIELD_MANO_LOW))?,
        });
    }
    Ok(inputs)
}

/// 시험 시트 경로를 입력받는다.
pub fn read_sheet_path(tr: &Translator) -> Result<PathBuf, AppError> {
    let s = read_line(tr.t(keys::PROMPT_SHEET_PATH))?;
    Ok(PathBuf::from(s.trim()))
}

/// 기관 상수를 출력한다.
pub fn print_constants(tr: &Translator, c: &EngineConstants) {
    println!("\n-- {} --", tr.t(keys::CONSTANTS_HEADING));
    for (label, value) in constant_lines(tr, c) {
        println!("{label}: {value}");
    }
}

/// 상수 표시용 (이름, 값+단위) 목록. GUI와 CLI가 함께 쓴다.
pub fn constant_lines(tr: &Translator, c: &EngineConstants) -> Vec<(String, String)> {
    vec![
        (tr.t(keys::CONST_CV).to_string(), format!("{} kJ/kg", c.calorific_value_kj_per_kg)),
        (tr.t(keys::CONST_FUEL_DENSITY).to_string(), format!("{} kg/m³", c.fuel_density_kg_per_m3)),
        (tr.t(keys::CONST_WATER_CP).to_string(), format!("{} kJ/kg·K", c.water_specific_heat_kj_per_kgk)),
        (tr.t(keys::CONST_ORIFICE_AREA).to_string(), format!("{:.6} m²", c.orifice_area_m2())),
        (tr.t(keys::CONST_ORIFICE_DIAMETER).to_string(), format!("{} m", c.orifice_diameter_m)),
        (tr.t(keys::CONST_WATER_DENSITY).to_string(), format!("{} kg/m³", c.water_density_kg_per_m3)),
        (tr.t(keys::CONST_VOLTAGE).to_string(), format!("{} V", c.voltage_v)),
        (tr.t(keys::CONST_SPEED).to_string(), format!("{} rpm", c.speed_rpm)),
        (tr.t(keys::CONST_FUEL_VOLUME).to_string(), format!("{} cm³", c.fuel_sample_volume_cc())),
        (tr.t(keys::CONST_ATM_PRESSURE).to_string(), format!("{} Pa", c.atmospheric_pressure_pa)),
        (tr.t(keys::CONST_GAS_CONSTANT).to_string(), format!("{} J/kg·K", c.gas_constant_j_per_kgk)),
        (tr.t(keys::CONST_GAS_CP).to_string(), format!("{} kJ/kg·K", c.exhaust_specific_heat_kj_per_kgk)),
    ]
}

/// 입력 요약표, 데이터 시트, 그래프 데이터를 출력한다.
pub fn print_report(tr: &Translator, run: &BalanceRun) {
    println!("\n== {} ==", tr.t(keys::INPUT_SUMMARY_HEADING));
    print!(
        "{}",
        report::render_table(&report::INPUT_COLUMNS, &report::input_rows(&run.readings))
    );
    println!("\n== {} ==", tr.t(keys::RESULTS_HEADING));
    print!(
        "{}",
        report::render_table(&report::RESULT_COLUMNS, &report::result_rows(&run.results))
    );

    let graph = HeatBalanceChart::from_results(&run.results);
    println!("\n== {} ==", tr.t(keys::CHART_HEADING));
    println!("{}", tr.t(keys::CHART_LEGEND));
    let mut headers = vec![chart::X_AXIS_LABEL];
    headers.extend(graph.series.iter().map(|s| s.label));
    let rows: Vec<Vec<String>> = graph
        .x_kw
        .iter()
        .enumerate()
        .map(|(i, x)| {
            let mut row = vec![format!("{x:.2}")];
            row.extend(graph.series.iter().map(|s| format!("{:.2}", s.values[i])));
            row
        })
        .collect();
    print!("{}", report::render_table(&headers, &rows));
}

/// 내보낸 파일 경로를 출력한다.
pub fn print_exported(tr: &Translator, files: &ExportedFiles) {
    println!("{}", tr.t(keys::EXPORT_DONE));
    for path in [&files.input_csv, &files.results_csv, &files.chart_png] {
        println!("  {}", path.display());
    }
}

/// 설정 메뉴를 처리한다. 언어가 바뀌었으면 true.
pub fn handle_settings(tr: &Translator, cfg: &mut Config) -> Result<bool, AppError> {
    println!("{}", tr.t(keys::SETTINGS_HEADING));
    println!("{} {}", tr.t(keys::SETTINGS_CURRENT_LANGUAGE), cfg.language);
    let lang = read_line(tr.t(keys::SETTINGS_PROMPT_LANGUAGE))?;
    let lang_changed = !lang.trim().is_empty() && lang.trim() != cfg.language;
    if lang_changed {
        cfg.language = lang.trim().to_string();
    }
    println!("{} {}", tr.t(keys::SETTINGS_CURRENT_OUTPUT_DIR), cfg.output_dir);
    let dir = read_line(tr.t(keys::SETTINGS_PROMPT_OUTPUT_DIR))?;
    if !dir.trim().is_empty() {
        cfg.output_dir = dir.trim().to_string();
    }
    Ok(lang_changed)
}

/// y/yes 이면 true.
pub fn confirm(prompt: &str) -> Result<bool, AppError> {
    let s = read_line(prompt)?;
    Ok(matches!(s.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    Ok(buf)
}

fn read_f64(tr: &Translator, prompt: &str) -> Result<f64, AppError> {
    loop {
        let s = read_line(prompt)?;
        match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => return Ok(v),
            _ => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}
