use std::process::ExitCode;

use clap::Parser;
use log::{debug, warn};
use water_stability_toolbox::app::{self, AppError, Session};
use water_stability_toolbox::cli::{Cli, Commands};
use water_stability_toolbox::i18n::{self, keys, Translator};
use water_stability_toolbox::water::targets::Bounds;
use water_stability_toolbox::water::WaterReading;
use water_stability_toolbox::{config, logging, ui_cli};

/// 계산 가능한 지수가 없을 때의 종료 코드
const EXIT_NOTHING_COMPUTABLE: u8 = 2;

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 하위 명령 또는 대화형 메뉴를 실행한다.
fn main() -> ExitCode {
    let cli = Cli::parse();
    let cfg = match config::load_or_default(&cli.config) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("{}: {err}", Translator::new("ko").t(keys::ERROR_PREFIX));
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = logging::init(logging::level_from(cli.verbose, &cfg.log_level)) {
        eprintln!("{err}");
    }
    debug!("설정 로드: {}", cli.config.display());

    let lang = i18n::resolve_language(&cli.lang, cfg.language.as_deref());
    let tr = Translator::new_with_pack(&lang, cfg.language_pack_dir.as_deref());
    let prefix = tr.t(keys::ERROR_PREFIX).to_string();

    let session = match Session::new(cfg, tr) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{prefix}: {err}");
            return ExitCode::FAILURE;
        }
    };

    match try_run(&session, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_nothing_computable() => {
            warn!("{err}");
            eprintln!("{prefix}: {err}");
            ExitCode::from(EXIT_NOTHING_COMPUTABLE)
        }
        Err(err) => {
            eprintln!("{prefix}: {err}");
            ExitCode::FAILURE
        }
    }
}

fn try_run(session: &Session, command: Option<Commands>) -> Result<(), AppError> {
    match command {
        Some(Commands::Cooling(args)) => {
            let reading = args.to_reading(session.config.temperature_unit);
            emit(session, &reading, args.common.json)
        }
        Some(Commands::Boiler(args)) => emit(session, &args.to_reading(), args.common.json),
        Some(Commands::Compute { input, output }) => {
            app::compute_file(session, &input, output.as_deref())?;
            Ok(())
        }
        Some(Commands::Trend {
            param,
            values,
            min,
            max,
        }) => {
            let values: Vec<Option<f64>> = values.into_iter().map(Some).collect();
            let (analysis, last) = app::trend(&param, &values, Bounds::new(min, max));
            ui_cli::print_trend(&session.tr, analysis.as_ref(), last);
            Ok(())
        }
        Some(Commands::Formula { expr, vars }) => {
            let vars = vars
                .iter()
                .map(|v| app::parse_var(v))
                .collect::<Result<Vec<_>, _>>()?;
            let value = app::evaluate_formula(&expr, &vars)?;
            println!("{}: {value}", session.tr.t(keys::FORMULA_RESULT));
            Ok(())
        }
        Some(Commands::Interactive) | None => app::run(session),
    }
}

/// 측정 기록 1건을 계산해 보고서 또는 JSON으로 출력한다.
fn emit(session: &Session, reading: &WaterReading, json: bool) -> Result<(), AppError> {
    let result = if json {
        let result = session.calculate(reading)?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        result
    } else {
        app::report(session, reading)?
    };
    result.require_computable()?;
    Ok(())
}
