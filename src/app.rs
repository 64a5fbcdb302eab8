use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, info};
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::formula::{Formula, FormulaError};
use crate::i18n::{keys, Translator};
use crate::ui_cli::{self, MenuChoice};
use crate::water::targets::Bounds;
use crate::water::trend::{analyze_trend, trend_status, TrendAnalysis, TrendStatus};
use crate::water::{
    compute, CalculationError, CalculationRequest, CalculationResult, TargetRangeConfig,
    WaterReading,
};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 계산 엔진 오류
    #[error("계산 오류: {0}")]
    Calculation(#[from] CalculationError),
    /// 사용자 계산식 오류
    #[error("계산식 오류: {0}")]
    Formula(#[from] FormulaError),
    /// 요청/결과 JSON 오류
    #[error("JSON 오류: {0}")]
    Json(#[from] serde_json::Error),
    /// 잘못된 명령행 인자
    #[error("잘못된 인자: {0}")]
    InvalidArgument(String),
}

impl AppError {
    /// 계산 가능한 지수가 없어서 실패한 경우. CLI 종료 코드 구분에 쓴다.
    pub fn is_nothing_computable(&self) -> bool {
        matches!(
            self,
            AppError::Calculation(CalculationError::NothingComputable { .. })
        )
    }
}

/// 설정에서 얻은 실행 문맥. 목표 범위는 시작 시 한 번만 해석한다.
pub struct Session {
    pub config: Config,
    pub targets: TargetRangeConfig,
    pub tr: Translator,
}

impl Session {
    pub fn new(config: Config, tr: Translator) -> Result<Self, AppError> {
        let targets = config.resolved_targets()?;
        Ok(Self {
            config,
            targets,
            tr,
        })
    }

    /// 측정 기록 1건을 현재 설정으로 계산한다.
    pub fn calculate(&self, reading: &WaterReading) -> Result<CalculationResult, AppError> {
        let result = compute(reading, &self.targets, &self.config.policy)?;
        Ok(result)
    }
}

/// CLI 애플리케이션의 메인 루프를 실행한다.
pub fn run(session: &Session) -> Result<(), AppError> {
    let tr = &session.tr;
    loop {
        match ui_cli::main_menu(tr)? {
            MenuChoice::Cooling => {
                let reading = ui_cli::prompt_cooling_reading(tr, session.config.temperature_unit)?;
                report(session, &reading)?;
            }
            MenuChoice::Boiler => {
                let reading = ui_cli::prompt_boiler_reading(tr)?;
                report(session, &reading)?;
            }
            MenuChoice::Trend => {
                let (param, values, min, max) = ui_cli::prompt_trend(tr)?;
                let (analysis, last) = trend(&param, &values, Bounds::new(min, max));
                ui_cli::print_trend(tr, analysis.as_ref(), last);
            }
            MenuChoice::Formula => {
                println!("{}", tr.t(keys::FORMULA_HEADING));
                let source = ui_cli::read_line(tr.t(keys::FORMULA_PROMPT_EXPR))?;
                // 잘못된 식은 메뉴로 돌아가며 계속 진행한다.
                match Formula::parse(source.trim()) {
                    Ok(formula) => {
                        let vars = ui_cli::prompt_formula_variables(tr, formula.variables())?;
                        match formula.evaluate(&vars) {
                            Ok(v) => println!("{}: {v}", tr.t(keys::FORMULA_RESULT)),
                            Err(e) => println!("{}: {e}", tr.t(keys::ERROR_PREFIX)),
                        }
                    }
                    Err(e) => println!("{}: {e}", tr.t(keys::ERROR_PREFIX)),
                }
            }
            MenuChoice::Exit => {
                println!("{}", tr.t(keys::APP_EXIT));
                break;
            }
        }
    }
    Ok(())
}

/// 측정 기록을 계산해 보고서로 출력한다.
pub fn report(session: &Session, reading: &WaterReading) -> Result<CalculationResult, AppError> {
    let result = session.calculate(reading)?;
    ui_cli::print_report(&session.tr, &result);
    Ok(result)
}

/// JSON 요청 파일을 계산하고 결과 JSON을 쓴다.
///
/// 요청에 목표 범위나 권고 정책이 없으면 설정 파일의 값을 쓴다.
/// 결과는 항상 기록하고, 계산 가능한 지수가 없을 때만 그 뒤에 오류를 돌려준다.
pub fn compute_file(
    session: &Session,
    input: &Path,
    output: Option<&Path>,
) -> Result<CalculationResult, AppError> {
    let content = fs::read_to_string(input)?;
    let mut request: CalculationRequest = serde_json::from_str(&content)?;
    if request.targets.is_none() {
        debug!("요청에 목표 범위가 없어 설정 파일 값을 사용");
        request.targets = Some(session.config.targets.clone());
        let mut overrides = session.config.overrides.clone();
        overrides.append(&mut request.overrides);
        request.overrides = overrides;
    }
    if request.policy.is_none() {
        request.policy = Some(session.config.policy.clone());
    }

    let result = request.compute()?;
    let json = serde_json::to_string_pretty(&result)?;
    match output {
        Some(path) => {
            fs::write(path, json)?;
            info!("결과 저장: {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(result.require_computable()?)
}

/// 추세 분석과 마지막 측정값의 상태를 함께 돌려준다.
pub fn trend(
    param: &str,
    values: &[Option<f64>],
    bounds: Bounds,
) -> (Option<TrendAnalysis>, Option<TrendStatus>) {
    let analysis = analyze_trend(param, values, bounds);
    let last = values
        .iter()
        .rev()
        .flatten()
        .next()
        .map(|v| trend_status(param, *v));
    (analysis, last)
}

/// `name=value` 형태의 변수 목록으로 계산식을 평가한다.
pub fn evaluate_formula(source: &str, vars: &[(String, f64)]) -> Result<f64, AppError> {
    let formula = Formula::parse(source)?;
    let vars: HashMap<String, f64> = vars.iter().cloned().collect();
    Ok(formula.evaluate(&vars)?)
}

/// `name=value` 인자 하나를 해석한다.
pub fn parse_var(arg: &str) -> Result<(String, f64), AppError> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| AppError::InvalidArgument(format!("'{arg}' (name=value 형식 필요)")))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|_| AppError::InvalidArgument(format!("'{arg}' 값이 숫자가 아님")))?;
    Ok((name.trim().to_string(), value))
}
