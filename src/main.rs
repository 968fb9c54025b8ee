use clap::Parser;
use std::path::PathBuf;

use diesel_heat_balance::app::{self, SheetRunOptions};
use diesel_heat_balance::{config, i18n, logging};

/// 디젤 기관 열정산 시험 계산기 (CLI)
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 시험 시트(TOML)를 계산하고 종료한다. 없으면 대화형 메뉴를 실행한다.
    #[arg(long, short)]
    input: Option<PathBuf>,
    /// CSV/PNG 출력 폴더 (기본: config.toml의 output_dir)
    #[arg(long, short)]
    out_dir: Option<PathBuf>,
    /// 언어 (auto/ko/en-us)
    #[arg(long, short = 'L', default_value = "auto")]
    lang: String,
    /// 시트 모드에서 파일을 내보내지 않는다.
    #[arg(long, default_value_t = false)]
    no_export: bool,
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 CLI 애플리케이션을 실행한다.
fn main() {
    logging::init();
    if let Err(err) = try_run(Args::parse()) {
        eprintln!("오류: {err:#}");
        std::process::exit(1);
    }
}

fn try_run(args: Args) -> anyhow::Result<()> {
    let mut cfg = config::load_or_default()?;
    let lang = i18n::resolve_language(&args.lang, Some(cfg.language.as_str()));
    let mut tr = i18n::Translator::new_with_pack(&lang, cfg.language_pack_dir.as_deref());

    match args.input {
        Some(sheet_path) => {
            let options = SheetRunOptions {
                sheet_path,
                out_dir: args
                    .out_dir
                    .unwrap_or_else(|| PathBuf::from(&cfg.output_dir)),
                export: !args.no_export,
            };
            app::run_sheet(&cfg, &tr, &options)?;
        }
        None => {
            if let Some(dir) = args.out_dir {
                cfg.output_dir = dir.display().to_string();
            }
            app::run(&mut cfg, &mut tr)?;
        }
    }
    Ok(())
}
