use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::config::{Config, ConfigError};
use crate::engine::{run_batch, BalanceRun, EngineConstants, HeatBalanceError, ReadingInput};
use crate::export::{self, ExportError};
use crate::i18n::{self, keys, Translator};
use crate::sheet::{self, SheetError};
use crate::ui_cli::{self, MenuChoice};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 측정값/상수 검증 실패
    #[error(transparent)]
    HeatBalance(#[from] HeatBalanceError),
    /// 시험 시트 오류
    #[error(transparent)]
    Sheet(#[from] SheetError),
    /// CSV/PNG 내보내기 오류
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// 배치 실행 옵션 (`--input` 모드).
#[derive(Debug, Clone)]
pub struct SheetRunOptions {
    pub sheet_path: PathBuf,
    pub out_dir: PathBuf,
    pub export: bool,
}

/// CLI 애플리케이션의 메인 루프를 실행한다.
pub fn run(config: &mut Config, tr: &mut Translator) -> Result<(), AppError> {
    println!("{}", tr.t(keys::APP_TITLE));
    println!("{}", tr.t(keys::APP_SUBTITLE));
    loop {
        match ui_cli::main_menu(tr)? {
            MenuChoice::EnterReadings => {
                let inputs = ui_cli::read_reading_inputs(tr)?;
                let constants = config.constants;
                interactive_evaluate(config, tr, &inputs, &constants)?;
            }
            MenuChoice::LoadSheet => {
                let path = ui_cli::read_sheet_path(tr)?;
                match sheet::load_sheet(&path) {
                    Ok(sheet) => {
                        let constants = sheet.effective_constants(&config.constants);
                        interactive_evaluate(config, tr, &sheet.readings, &constants)?;
                    }
                    Err(e) => println!("{}: {e}", tr.t(keys::ERROR_PREFIX)),
                }
            }
            MenuChoice::Constants => ui_cli::print_constants(tr, &config.constants),
            MenuChoice::Settings => {
                if ui_cli::handle_settings(tr, config)? {
                    let code = i18n::resolve_language("auto", Some(config.language.as_str()));
                    *tr = Translator::new_with_pack(&code, config.language_pack_dir.as_deref());
                }
                config.save()?;
                println!("{}", tr.t(keys::SETTINGS_SAVED));
            }
            MenuChoice::Exit => {
                config.save()?;
                println!("{}", tr.t(keys::APP_EXIT));
                break;
            }
        }
    }
    Ok(())
}

/// 계산 후 표를 출력하고 내보낼지 묻는다. 측정값 오류는 메시지만 출력하고 메뉴로 돌아간다.
fn interactive_evaluate(
    config: &Config,
    tr: &Translator,
    inputs: &[ReadingInput],
    constants: &EngineConstants,
) -> Result<(), AppError> {
    let run = match run_batch(inputs, constants) {
        Ok(run) => run,
        Err(HeatBalanceError::InvalidReading { .. }) => {
            println!("{}: {}", tr.t(keys::ERROR_PREFIX), tr.t(keys::ERROR_FUEL_TIME));
            return Ok(());
        }
        Err(e) => {
            println!("{}: {e}", tr.t(keys::ERROR_PREFIX));
            return Ok(());
        }
    };
    ui_cli::print_report(tr, &run);
    if ui_cli::confirm(tr.t(keys::PROMPT_EXPORT))? {
        let out_dir = Path::new(&config.output_dir);
        match export::export_all(out_dir, &run.readings, &run.results, config.chart_size()) {
            Ok(files) => ui_cli::print_exported(tr, &files),
            Err(e) => println!("{} {e}", tr.t(keys::EXPORT_FAILED)),
        }
    }
    Ok(())
}

/// 시험 시트 파일 하나를 계산하고 출력/내보내기 한다. 잘못된 배치는 오류로 반환한다.
pub fn run_sheet(
    config: &Config,
    tr: &Translator,
    options: &SheetRunOptions,
) -> Result<BalanceRun, AppError> {
    let sheet = sheet::load_sheet(&options.sheet_path)?;
    let constants = sheet.effective_constants(&config.constants);
    info!(
        path = %options.sheet_path.display(),
        readings = sheet.readings.len(),
        "loaded test sheet"
    );
    let run = run_batch(&sheet.readings, &constants)?;
    ui_cli::print_report(tr, &run);
    if options.export {
        let files = export::export_all(
            &options.out_dir,
            &run.readings,
            &run.results,
            config.chart_size(),
        )?;
        ui_cli::print_exported(tr, &files);
    }
    Ok(run)
}
