//! 보일러수 감점식 안정성 점수.
//!
//! 100점에서 시작해 pH, TDS, 경도, M-알칼리도가 목표 범위를 벗어난 정도만큼 뺀다.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::water::reading::{AnalysisType, Parameter};
use crate::water::status::OverallStatus;
use crate::water::targets::TargetRangeConfig;
use crate::water::validate::BoilerInputs;

/// pH 0.1 단위당 감점
const PH_POINTS_PER_TENTH: f64 = 5.0;
const PH_MAX_DEDUCTION: f64 = 30.0;
const TDS_DEDUCTION: f64 = 10.0;
const TDS_SEVERE_DEDUCTION: f64 = 20.0;
/// 상한 대비 이 비율을 넘으면 TDS 감점이 두 배
const TDS_SEVERE_FACTOR: f64 = 1.15;
const HARDNESS_DEDUCTION: f64 = 10.0;
const HARDNESS_SEVERE_DEDUCTION: f64 = 20.0;
const HARDNESS_SEVERE_FACTOR: f64 = 2.5;
/// M-알칼리도 50 ppm 단위당 감점
const M_ALK_POINTS_PER_STEP: f64 = 2.0;
const M_ALK_STEP_PPM: f64 = 50.0;

/// 파라미터 하나에 대한 감점 내역.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Deduction {
    pub parameter: Parameter,
    pub value: f64,
    pub points: f64,
}

/// 보일러수 평가 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoilerAssessment {
    pub score: f64,
    pub overall: OverallStatus,
    pub deductions: Vec<Deduction>,
}

/// 보일러 점수 → 4단계 판정.
pub fn boiler_status(score: f64) -> OverallStatus {
    if score >= 80.0 {
        OverallStatus::Stable
    } else if score >= 60.0 {
        OverallStatus::SlightlyUnstable
    } else if score >= 40.0 {
        OverallStatus::Unstable
    } else {
        OverallStatus::HighlyUnstable
    }
}

fn ph_deduction(ph: f64, targets: &TargetRangeConfig) -> f64 {
    let deviation = targets.bounds(AnalysisType::Boiler, Parameter::Ph).deviation(ph);
    (deviation / 0.1 * PH_POINTS_PER_TENTH).min(PH_MAX_DEDUCTION)
}

fn tds_deduction(tds: f64, targets: &TargetRangeConfig) -> f64 {
    let bounds = targets.bounds(AnalysisType::Boiler, Parameter::Tds);
    if bounds.contains(tds) {
        return 0.0;
    }
    match bounds.max {
        Some(max) if tds > max * TDS_SEVERE_FACTOR => TDS_SEVERE_DEDUCTION,
        _ => TDS_DEDUCTION,
    }
}

fn hardness_deduction(hardness: f64, targets: &TargetRangeConfig) -> f64 {
    match targets.bounds(AnalysisType::Boiler, Parameter::Hardness).max {
        Some(max) if hardness > max * HARDNESS_SEVERE_FACTOR => HARDNESS_SEVERE_DEDUCTION,
        Some(max) if hardness > max => HARDNESS_DEDUCTION,
        _ => 0.0,
    }
}

fn m_alkalinity_deduction(m_alk: f64, targets: &TargetRangeConfig) -> f64 {
    let deviation = targets
        .bounds(AnalysisType::Boiler, Parameter::MAlkalinity)
        .deviation(m_alk);
    deviation / M_ALK_STEP_PPM * M_ALK_POINTS_PER_STEP
}

/// 검증된 보일러수 입력을 점수화한다. 목표 범위는 호출자가 해석한 설정(없으면 기본값)을 쓴다.
pub fn assess_boiler(input: &BoilerInputs, targets: &TargetRangeConfig) -> BoilerAssessment {
    let candidates = [
        (Parameter::Ph, Some(input.ph), ph_deduction as fn(f64, &TargetRangeConfig) -> f64),
        (Parameter::Tds, Some(input.tds), tds_deduction),
        (Parameter::Hardness, Some(input.hardness), hardness_deduction),
        (Parameter::MAlkalinity, input.m_alkalinity, m_alkalinity_deduction),
    ];

    let deductions: Vec<Deduction> = candidates
        .into_iter()
        .filter_map(|(parameter, value, rule)| {
            let value = value?;
            let points = rule(value, targets);
            (points > 0.0).then_some(Deduction {
                parameter,
                value,
                points,
            })
        })
        .collect();

    let total: f64 = deductions.iter().map(|d| d.points).sum();
    let score = (100.0 - total).clamp(0.0, 100.0);
    let overall = boiler_status(score);
    debug!("보일러 점수 {score:.1} ({overall}), 감점 {}건", deductions.len());

    BoilerAssessment {
        score,
        overall,
        deductions,
    }
}
