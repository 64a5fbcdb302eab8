//! 계산 엔진 진입점. 측정 기록 1건과 설정 스냅샷 1개로 결과 1개를 만든다.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::water::boiler::{assess_boiler, Deduction};
use crate::water::compliance::{check_compliance, ComplianceCheck};
use crate::water::error::{CalculationError, InputIssue};
use crate::water::indices::{compute_cooling_indices, CoolingIndices};
use crate::water::reading::{AnalysisType, Parameter, WaterReading};
use crate::water::recommend::{
    boiler_recommendations, cooling_recommendations, CoolingFindings, Recommendation,
    RecommendationPolicy,
};
use crate::water::score::{assess_cooling, IndexStatuses};
use crate::water::status::{LrStatus, LsiStatus, OverallStatus, PsiStatus, RsiStatus};
use crate::water::targets::{TargetOverride, TargetRangeConfig};
use crate::water::validate::{validate_boiler, validate_cooling};

/// JSON 경계에서 받는 계산 요청.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub reading: WaterReading,
    /// 플랜트 목표 범위. 없으면 기본값.
    #[serde(default)]
    pub targets: Option<TargetRangeConfig>,
    /// 수계 단위 덮어쓰기
    #[serde(default)]
    pub overrides: Vec<TargetOverride>,
    /// 권고 정책. 없으면 호출자가 정한 기본값.
    #[serde(default)]
    pub policy: Option<RecommendationPolicy>,
}

impl CalculationRequest {
    pub fn new(reading: WaterReading) -> Self {
        Self {
            reading,
            targets: None,
            overrides: Vec::new(),
            policy: None,
        }
    }

    /// 플랜트 설정과 수계 덮어쓰기를 합친 뒤 계산한다.
    pub fn compute(&self) -> Result<CalculationResult, CalculationError> {
        let targets = TargetRangeConfig::resolve(self.targets.as_ref(), &self.overrides)?;
        let policy = self.policy.clone().unwrap_or_default();
        compute(&self.reading, &targets, &policy)
    }
}

/// 계산 결과. 엔진은 이 값을 저장하지 않는다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub analysis_type: AnalysisType,
    pub phs: Option<f64>,
    pub lsi: Option<f64>,
    pub rsi: Option<f64>,
    pub psi: Option<f64>,
    /// [0, 5.0]
    pub lr: Option<f64>,
    pub lsi_status: Option<LsiStatus>,
    pub rsi_status: Option<RsiStatus>,
    pub psi_status: Option<PsiStatus>,
    pub lr_status: Option<LrStatus>,
    /// [0, 100]. 계산 가능한 지수가 없으면 `None`.
    pub stability_score: Option<f64>,
    pub overall_status: Option<OverallStatus>,
    /// 보일러 감점 내역
    pub deductions: Vec<Deduction>,
    pub compliance: Vec<ComplianceCheck>,
    pub recommendations: Vec<Recommendation>,
    pub issues: Vec<InputIssue>,
}

impl CalculationResult {
    fn empty(analysis_type: AnalysisType) -> Self {
        Self {
            analysis_type,
            phs: None,
            lsi: None,
            rsi: None,
            psi: None,
            lr: None,
            lsi_status: None,
            rsi_status: None,
            psi_status: None,
            lr_status: None,
            stability_score: None,
            overall_status: None,
            deductions: Vec::new(),
            compliance: Vec::new(),
            recommendations: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn is_computable(&self) -> bool {
        self.stability_score.is_some()
    }

    /// 서비스 경계용: 계산 가능한 지수가 없으면 오류로 바꾼다.
    pub fn require_computable(self) -> Result<Self, CalculationError> {
        if self.is_computable() {
            Ok(self)
        } else {
            Err(CalculationError::NothingComputable {
                analysis: self.analysis_type,
                issues: self.issues,
            })
        }
    }
}

const COOLING_COMPLIANCE: [Parameter; 8] = [
    Parameter::Ph,
    Parameter::Tds,
    Parameter::Hardness,
    Parameter::TotalAlkalinity,
    Parameter::Chloride,
    Parameter::Cycle,
    Parameter::Iron,
    Parameter::Phosphate,
];

const BOILER_COMPLIANCE: [Parameter; 10] = [
    Parameter::Ph,
    Parameter::Tds,
    Parameter::Hardness,
    Parameter::MAlkalinity,
    Parameter::PAlkalinity,
    Parameter::OhAlkalinity,
    Parameter::Sulphite,
    Parameter::SodiumChloride,
    Parameter::DissolvedOxygen,
    Parameter::Phosphate,
];

/// 측정 기록 1건을 계산한다.
///
/// 데이터 문제(누락, 정의역 위반)는 오류가 아니라 `issues`와 빈 지수로 표현된다.
/// 설정이 잘못된 경우에만 `Err`를 돌려준다.
pub fn compute(
    reading: &WaterReading,
    targets: &TargetRangeConfig,
    policy: &RecommendationPolicy,
) -> Result<CalculationResult, CalculationError> {
    targets.validate()?;
    debug!(
        "{} 분석 계산 시작 ({})",
        reading.analysis_type,
        reading.analysis_name.as_deref().unwrap_or("-")
    );

    let result = match reading.analysis_type {
        AnalysisType::Cooling => compute_cooling(reading, targets, policy),
        AnalysisType::Boiler => compute_boiler(reading, targets),
    };

    if result.is_computable() {
        debug!(
            "계산 완료: 점수 {:?}, 판정 {:?}, 권고 {}건",
            result.stability_score,
            result.overall_status,
            result.recommendations.len()
        );
    } else {
        info!(
            "{} 분석에서 계산 가능한 지수 없음 (문제 {}건)",
            result.analysis_type,
            result.issues.len()
        );
    }
    Ok(result)
}

/// 기본 목표 범위와 기본 권고 임계값으로 계산한다.
pub fn compute_with_defaults(reading: &WaterReading) -> Result<CalculationResult, CalculationError> {
    compute(
        reading,
        &TargetRangeConfig::default(),
        &RecommendationPolicy::default(),
    )
}

fn compute_cooling(
    reading: &WaterReading,
    targets: &TargetRangeConfig,
    policy: &RecommendationPolicy,
) -> CalculationResult {
    let inputs = validate_cooling(reading, targets);
    let indices = match inputs.ph {
        Some(ph) => compute_cooling_indices(
            ph,
            inputs.saturation.as_ref(),
            inputs.ratio.as_ref(),
            inputs.lsi_enabled,
            inputs.rsi_enabled,
        ),
        None => CoolingIndices::default(),
    };
    let statuses = IndexStatuses::classify(&indices);
    let assessment = assess_cooling(&statuses);

    let mut values: Vec<(Parameter, Option<f64>)> = COOLING_COMPLIANCE
        .iter()
        .map(|p| (*p, reading.value(*p).filter(|v| v.is_finite())))
        .collect();
    values.push((Parameter::Lsi, indices.lsi));
    values.push((Parameter::Rsi, indices.rsi));
    let compliance = check_compliance(AnalysisType::Cooling, &values, targets);

    let overall = assessment.map(|a| a.overall);
    let findings = CoolingFindings {
        reading,
        inputs: &inputs,
        indices: &indices,
        statuses: &statuses,
        overall,
    };
    let recommendations = cooling_recommendations(&findings, &compliance, policy);

    CalculationResult {
        phs: indices.phs,
        lsi: indices.lsi,
        rsi: indices.rsi,
        psi: indices.psi,
        lr: indices.lr,
        lsi_status: statuses.lsi,
        rsi_status: statuses.rsi,
        psi_status: statuses.psi,
        lr_status: statuses.lr,
        stability_score: assessment.map(|a| a.score),
        overall_status: overall,
        compliance,
        recommendations,
        issues: inputs.issues,
        ..CalculationResult::empty(AnalysisType::Cooling)
    }
}

fn compute_boiler(reading: &WaterReading, targets: &TargetRangeConfig) -> CalculationResult {
    let values: Vec<(Parameter, Option<f64>)> = BOILER_COMPLIANCE
        .iter()
        .map(|p| (*p, reading.value(*p).filter(|v| v.is_finite())))
        .collect();
    let compliance = check_compliance(AnalysisType::Boiler, &values, targets);
    let recommendations = boiler_recommendations(&compliance);

    match validate_boiler(reading) {
        Ok(inputs) => {
            let assessment = assess_boiler(&inputs, targets);
            CalculationResult {
                stability_score: Some(assessment.score),
                overall_status: Some(assessment.overall),
                deductions: assessment.deductions,
                compliance,
                recommendations,
                issues: inputs.issues,
                ..CalculationResult::empty(AnalysisType::Boiler)
            }
        }
        Err(issues) => CalculationResult {
            compliance,
            recommendations,
            issues,
            ..CalculationResult::empty(AnalysisType::Boiler)
        },
    }
}
