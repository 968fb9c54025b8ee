use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::chart::{self, ChartError, HeatBalanceChart};
use crate::engine::{DerivedResult, Reading};
use crate::report::{self, ReportError};

pub const INPUT_CSV_FILE: &str = "Heat_Balance_Input_Data.csv";
pub const RESULTS_CSV_FILE: &str = "Heat_Balance_Results.csv";
pub const CHART_PNG_FILE: &str = "heat_balance_graph.png";

/// 내보내기 중 발생 가능한 오류.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("출력 폴더 생성 오류 ({path}): {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("파일 생성 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Chart(#[from] ChartError),
}

/// 내보낸 파일 경로 모음.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub input_csv: PathBuf,
    pub results_csv: PathBuf,
    pub chart_png: PathBuf,
}

/// 입력 요약 CSV를 지정 경로에 저장한다.
pub fn save_inputs_csv(path: &Path, readings: &[Reading]) -> Result<(), ExportError> {
    let file = File::create(path)?;
    report::write_inputs_csv(BufWriter::new(file), readings)?;
    Ok(())
}

/// 결과 CSV를 지정 경로에 저장한다.
pub fn save_results_csv(path: &Path, results: &[DerivedResult]) -> Result<(), ExportError> {
    let file = File::create(path)?;
    report::write_results_csv(BufWriter::new(file), results)?;
    Ok(())
}

/// 입력 CSV, 결과 CSV, 그래프 PNG를 출력 폴더에 기록한다.
pub fn export_all(
    out_dir: &Path,
    readings: &[Reading],
    results: &[DerivedResult],
    chart_size: (u32, u32),
) -> Result<ExportedFiles, ExportError> {
    fs::create_dir_all(out_dir).map_err(|source| ExportError::CreateDir {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let files = ExportedFiles {
        input_csv: out_dir.join(INPUT_CSV_FILE),
        results_csv: out_dir.join(RESULTS_CSV_FILE),
        chart_png: out_dir.join(CHART_PNG_FILE),
    };
    save_inputs_csv(&files.input_csv, readings)?;
    save_results_csv(&files.results_csv, results)?;
    let graph = HeatBalanceChart::from_results(results);
    chart::save_png(&graph, &files.chart_png, chart_size.0, chart_size.1)?;
    info!(dir = %out_dir.display(), "exported heat balance sheet");
    Ok(files)
}
