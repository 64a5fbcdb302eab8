use std::collections::HashMap;
use std::io::{self, Write};

use crate::app::AppError;
use crate::i18n::{keys, Translator};
use crate::units::{to_celsius, TemperatureUnit};
use crate::water::trend::{TrendAnalysis, TrendStatus};
use crate::water::{CalculationResult, Parameter, WaterReading};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Cooling,
    Boiler,
    Trend,
    Formula,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    println!("{}", tr.t(keys::MAIN_MENU_TITLE));
    println!("{}", tr.t(keys::MAIN_MENU_COOLING));
    println!("{}", tr.t(keys::MAIN_MENU_BOILER));
    println!("{}", tr.t(keys::MAIN_MENU_TREND));
    println!("{}", tr.t(keys::MAIN_MENU_FORMULA));
    println!("{}", tr.t(keys::MAIN_MENU_EXIT));
    loop {
        let sel = read_line(tr.t(keys::PROMPT_MENU_SELECT))?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::Cooling),
            "2" => return Ok(MenuChoice::Boiler),
            "3" => return Ok(MenuChoice::Trend),
            "4" => return Ok(MenuChoice::Formula),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

fn prompt_for(parameter: Parameter, unit: &str) -> String {
    if unit.is_empty() {
        format!("{}: ", parameter.label())
    } else {
        format!("{} [{unit}]: ", parameter.label())
    }
}

/// 냉각수 측정값을 입력받는다. 선택 항목은 빈칸으로 건너뛴다.
pub fn prompt_cooling_reading(
    tr: &Translator,
    temperature_unit: TemperatureUnit,
) -> Result<WaterReading, AppError> {
    println!("{}", tr.t(keys::COOLING_HEADING));
    let ph = read_f64(tr, &prompt_for(Parameter::Ph, ""))?;
    let tds = read_f64(tr, &prompt_for(Parameter::Tds, "ppm"))?;
    let hardness = read_f64(tr, &prompt_for(Parameter::Hardness, "ppm"))?;
    println!("{}", tr.t(keys::PROMPT_OPTIONAL_HINT));

    let mut reading = WaterReading::cooling(ph, tds, hardness);
    let optional = |p: Parameter| read_optional_f64(tr, &prompt_for(p, p.unit()));
    let temperature = |p: Parameter| -> Result<Option<f64>, AppError> {
        let value = read_optional_f64(tr, &prompt_for(p, temperature_unit.symbol()))?;
        Ok(value.map(|v| to_celsius(v, temperature_unit)))
    };

    let c = &mut reading.cooling;
    c.total_alkalinity = optional(Parameter::TotalAlkalinity)?;
    c.chloride = optional(Parameter::Chloride)?;
    c.sulphate = optional(Parameter::Sulphate)?;
    c.temperature = temperature(Parameter::Temperature)?;
    c.basin_temperature = temperature(Parameter::BasinTemperature)?;
    c.cycle = optional(Parameter::Cycle)?;
    c.iron = optional(Parameter::Iron)?;
    c.phosphate = optional(Parameter::Phosphate)?;
    Ok(reading)
}

/// 보일러수 측정값을 입력받는다.
pub fn prompt_boiler_reading(tr: &Translator) -> Result<WaterReading, AppError> {
    println!("{}", tr.t(keys::BOILER_HEADING));
    let ph = read_f64(tr, &prompt_for(Parameter::Ph, ""))?;
    let tds = read_f64(tr, &prompt_for(Parameter::Tds, "ppm"))?;
    let hardness = read_f64(tr, &prompt_for(Parameter::Hardness, "ppm"))?;
    println!("{}", tr.t(keys::PROMPT_OPTIONAL_HINT));

    let mut reading = WaterReading::boiler(ph, tds, hardness);
    let optional = |p: Parameter| read_optional_f64(tr, &prompt_for(p, p.unit()));
    let b = &mut reading.boiler;
    b.m_alkalinity = optional(Parameter::MAlkalinity)?;
    b.p_alkalinity = optional(Parameter::PAlkalinity)?;
    b.oh_alkalinity = optional(Parameter::OhAlkalinity)?;
    b.sulphite = optional(Parameter::Sulphite)?;
    b.sodium_chloride = optional(Parameter::SodiumChloride)?;
    b.dissolved_oxygen = optional(Parameter::DissolvedOxygen)?;
    b.phosphate = optional(Parameter::Phosphate)?;
    Ok(reading)
}

/// 추세 분석 입력: (파라미터 이름, 측정값, 하한, 상한)
pub fn prompt_trend(
    tr: &Translator,
) -> Result<(String, Vec<Option<f64>>, Option<f64>, Option<f64>), AppError> {
    println!("{}", tr.t(keys::TREND_HEADING));
    let param = read_line(tr.t(keys::TREND_PROMPT_PARAM))?.trim().to_string();
    let raw = read_line(tr.t(keys::TREND_PROMPT_VALUES))?;
    let values = raw
        .split(',')
        .map(|s| s.trim().parse::<f64>().ok())
        .collect();
    let hint = tr.t(keys::PROMPT_OPTIONAL_HINT);
    let min = read_optional_f64(tr, &format!("{}{hint}: ", tr.t(keys::TREND_PROMPT_MIN)))?;
    let max = read_optional_f64(tr, &format!("{}{hint}: ", tr.t(keys::TREND_PROMPT_MAX)))?;
    Ok((param, values, min, max))
}

/// 계산식과 변수 값을 입력받는다. 변수는 수식에서 찾아 차례로 묻는다.
pub fn prompt_formula_variables(
    tr: &Translator,
    names: impl IntoIterator<Item = String>,
) -> Result<HashMap<String, f64>, AppError> {
    let mut vars = HashMap::new();
    for name in names {
        let value = read_f64(tr, &format!("{} {name}: ", tr.t(keys::FORMULA_PROMPT_VAR)))?;
        vars.insert(name, value);
    }
    Ok(vars)
}

fn fmt_opt(tr: &Translator, value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}"),
        None => tr.t(keys::REPORT_NOT_COMPUTED).to_string(),
    }
}

fn fmt_status<S: ToString>(status: Option<S>) -> String {
    status.map(|s| format!(" ({})", s.to_string())).unwrap_or_default()
}

/// 계산 결과를 사람이 읽을 수 있는 보고서로 출력한다.
pub fn print_report(tr: &Translator, result: &CalculationResult) {
    println!("{} [{}]", tr.t(keys::REPORT_HEADING), result.analysis_type);

    if result.analysis_type == crate::water::AnalysisType::Cooling {
        println!("{}:", tr.t(keys::REPORT_INDICES));
        println!("  pHs = {}", fmt_opt(tr, result.phs, 3));
        println!("  LSI = {}{}", fmt_opt(tr, result.lsi, 2), fmt_status(result.lsi_status));
        println!("  RSI = {}{}", fmt_opt(tr, result.rsi, 2), fmt_status(result.rsi_status));
        println!("  PSI = {}{}", fmt_opt(tr, result.psi, 2), fmt_status(result.psi_status));
        println!("  LR  = {}{}", fmt_opt(tr, result.lr, 2), fmt_status(result.lr_status));
    }

    match (result.stability_score, result.overall_status) {
        (Some(score), Some(overall)) => {
            println!("{}: {score:.1} / 100", tr.t(keys::REPORT_SCORE));
            println!("{}: {overall}", tr.t(keys::REPORT_OVERALL));
        }
        _ => println!("{}", tr.t(keys::REPORT_NOTHING_COMPUTABLE)),
    }

    if !result.deductions.is_empty() {
        println!("{}:", tr.t(keys::REPORT_DEDUCTIONS));
        for d in &result.deductions {
            println!("  - {} {}: -{:.1}", d.parameter, d.value, d.points);
        }
    }

    if !result.compliance.is_empty() {
        println!("{}:", tr.t(keys::REPORT_COMPLIANCE));
        for c in &result.compliance {
            let mark = if c.within { "OK" } else { "!!" };
            println!(
                "  [{mark}] {} = {} (target {}) {}",
                c.parameter, c.value, c.bounds, c.action
            );
        }
    }

    if !result.issues.is_empty() {
        println!("{}:", tr.t(keys::REPORT_ISSUES));
        for issue in &result.issues {
            println!("  - {issue}");
        }
    }

    println!("{}:", tr.t(keys::REPORT_RECOMMENDATIONS));
    for r in &result.recommendations {
        println!("  [{}/{}] {}", r.priority, r.kind, r.title);
        println!("      {}", r.description);
    }
}

/// 추세 분석 결과를 출력한다.
pub fn print_trend(tr: &Translator, analysis: Option<&TrendAnalysis>, last: Option<TrendStatus>) {
    let Some(analysis) = analysis else {
        println!("{}", tr.t(keys::TREND_NO_VALUES));
        return;
    };
    println!("{}", analysis.description);
    if let Some(interpretation) = &analysis.interpretation {
        println!("{interpretation}");
    }
    if let Some(recommendation) = &analysis.recommendation {
        println!("-> {recommendation}");
    }
    if let Some(status) = last {
        println!("{}: {status}", tr.t(keys::TREND_LAST_STATUS));
    }
}

pub fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    Ok(buf)
}

fn read_f64(tr: &Translator, prompt: &str) -> Result<f64, AppError> {
    loop {
        let s = read_line(prompt)?;
        match s.trim().parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

/// 빈 입력은 `None`(미측정)으로 돌려준다.
fn read_optional_f64(tr: &Translator, prompt: &str) -> Result<Option<f64>, AppError> {
    loop {
        let s = read_line(prompt)?;
        let s = s.trim();
        if s.is_empty() {
            return Ok(None);
        }
        match s.parse::<f64>() {
            Ok(v) => return Ok(Some(v)),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}
