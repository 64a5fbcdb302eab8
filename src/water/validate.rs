//! 입력 검증. 어떤 지수를 계산할 수 있는지 결정하고, 계산할 수 없는 이유를 기록한다.

use log::debug;

use crate::water::error::InputIssue;
use crate::water::indices::{RatioInputs, SaturationInputs};
use crate::water::reading::{AnalysisType, Gated, Parameter, WaterReading};
use crate::water::targets::TargetRangeConfig;

/// 로그를 취할 값: 존재하고 유한하며 0보다 커야 한다.
fn positive(parameter: Parameter, value: Option<f64>) -> Result<f64, InputIssue> {
    match value {
        None => Err(InputIssue::missing(parameter)),
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(v) => Err(InputIssue::domain(parameter, v)),
    }
}

/// pH는 0~14 범위의 유한한 값이어야 한다.
pub fn valid_ph(ph: f64) -> Result<f64, InputIssue> {
    if ph.is_finite() && (0.0..=14.0).contains(&ph) {
        Ok(ph)
    } else {
        Err(InputIssue::domain(Parameter::Ph, ph))
    }
}

fn push_unique(issues: &mut Vec<InputIssue>, issue: InputIssue) {
    if !issues.contains(&issue) {
        issues.push(issue);
    }
}

/// 냉각수 분석 입력을 검증한 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct CoolingInputs {
    /// pH가 유효하지 않으면 `None`이며 모든 지수가 빠진다.
    pub ph: Option<f64>,
    /// LSI/RSI/PSI 공통 입력. 하나라도 문제가 있으면 `None`.
    pub saturation: Option<SaturationInputs>,
    /// LR 입력. 계산 조건이 맞지 않으면 `None`.
    pub ratio: Option<RatioInputs>,
    pub lsi_enabled: bool,
    pub rsi_enabled: bool,
    pub chloride: Gated,
    pub cycle: Gated,
    pub iron: Gated,
    pub phosphate: Gated,
    pub issues: Vec<InputIssue>,
}

impl CoolingInputs {
    /// 계산 가능한 지수가 하나라도 있는지.
    pub fn any_computable(&self) -> bool {
        self.saturation.is_some() || self.ratio.is_some()
    }
}

/// 냉각수 측정값과 목표 설정으로 지수별 계산 가능 여부를 정한다.
pub fn validate_cooling(reading: &WaterReading, targets: &TargetRangeConfig) -> CoolingInputs {
    let c = &reading.cooling;
    let gate = |parameter, value| targets.gate(AnalysisType::Cooling, parameter, value);
    let mut issues = Vec::new();

    let ph = match valid_ph(reading.ph) {
        Ok(ph) => Some(ph),
        Err(issue) => {
            issues.push(issue);
            None
        }
    };

    let tds = positive(Parameter::Tds, Some(reading.tds));
    let hardness = positive(Parameter::Hardness, Some(reading.hardness));
    let alkalinity = positive(Parameter::TotalAlkalinity, c.total_alkalinity);
    let temperature = positive(Parameter::Temperature, c.temperature);

    let saturation = match (ph, &tds, &hardness, &alkalinity, &temperature) {
        (Some(_), Ok(tds), Ok(hardness), Ok(alk), Ok(temp)) => Some(SaturationInputs {
            tds: *tds,
            hardness: *hardness,
            total_alkalinity: *alk,
            temperature_c: *temp,
        }),
        _ => {
            for result in [&tds, &hardness, &alkalinity, &temperature] {
                if let Err(issue) = result {
                    push_unique(&mut issues, issue.clone());
                }
            }
            None
        }
    };

    let chloride = gate(Parameter::Chloride, c.chloride);
    let sulphate = c.sulphate.filter(|v| v.is_finite());
    if let Some(v) = c.sulphate.filter(|v| !v.is_finite()) {
        push_unique(&mut issues, InputIssue::domain(Parameter::Sulphate, v));
    }
    let chloride_value = chloride.value().filter(|v| v.is_finite());
    if let Some(v) = chloride.value().filter(|v| !v.is_finite()) {
        push_unique(&mut issues, InputIssue::domain(Parameter::Chloride, v));
    }

    let ratio = match (ph, &alkalinity) {
        (Some(ph), Ok(alk)) if chloride_value.is_some() || sulphate.is_some() => {
            let temperature_c = c.temperature.filter(|t| t.is_finite());
            Some(RatioInputs {
                ph,
                total_alkalinity: *alk,
                chloride: match chloride {
                    Gated::Enabled(_) => Gated::Enabled(chloride_value),
                    Gated::Disabled => Gated::Disabled,
                },
                sulphate,
                temperature_c,
            })
        }
        (Some(_), Ok(_)) => {
            // 염화물(활성)과 황산염이 모두 없으면 LR을 만들 수 없다
            push_unique(&mut issues, InputIssue::missing(Parameter::Sulphate));
            None
        }
        (_, Err(issue)) => {
            push_unique(&mut issues, issue.clone());
            None
        }
        _ => None,
    };

    let lsi_enabled = gate(Parameter::Lsi, None).is_enabled();
    let rsi_enabled = gate(Parameter::Rsi, None).is_enabled();

    debug!(
        "냉각수 입력 검증: 포화지수 {} / LR {} / 문제 {}건",
        saturation.is_some(),
        ratio.is_some(),
        issues.len()
    );

    CoolingInputs {
        ph,
        saturation,
        ratio,
        lsi_enabled,
        rsi_enabled,
        chloride,
        cycle: gate(Parameter::Cycle, c.cycle),
        iron: gate(Parameter::Iron, c.iron),
        phosphate: gate(Parameter::Phosphate, c.phosphate),
        issues,
    }
}

/// 보일러수 분석 입력을 검증한 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct BoilerInputs {
    pub ph: f64,
    pub tds: f64,
    pub hardness: f64,
    /// 없으면 M-알칼리도 감점을 하지 않는다.
    pub m_alkalinity: Option<f64>,
    pub issues: Vec<InputIssue>,
}

/// 보일러수 측정값을 검증한다. pH/TDS/경도 중 하나라도 유효하지 않으면 문제 목록을 돌려준다.
pub fn validate_boiler(reading: &WaterReading) -> Result<BoilerInputs, Vec<InputIssue>> {
    let mut issues = Vec::new();

    let ph = valid_ph(reading.ph).map_err(|i| issues.push(i)).ok();
    let tds = finite_non_negative(Parameter::Tds, reading.tds)
        .map_err(|i| issues.push(i))
        .ok();
    let hardness = finite_non_negative(Parameter::Hardness, reading.hardness)
        .map_err(|i| issues.push(i))
        .ok();

    let m_alkalinity = match reading.boiler.m_alkalinity {
        None => {
            issues.push(InputIssue::missing(Parameter::MAlkalinity));
            None
        }
        Some(v) => finite_non_negative(Parameter::MAlkalinity, v)
            .map_err(|i| issues.push(i))
            .ok(),
    };

    match (ph, tds, hardness) {
        (Some(ph), Some(tds), Some(hardness)) => Ok(BoilerInputs {
            ph,
            tds,
            hardness,
            m_alkalinity,
            issues,
        }),
        _ => Err(issues),
    }
}

/// 보일러 점수는 로그를 쓰지 않으므로 0도 허용한다.
fn finite_non_negative(parameter: Parameter, value: f64) -> Result<f64, InputIssue> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(InputIssue::domain(parameter, value))
    }
}
