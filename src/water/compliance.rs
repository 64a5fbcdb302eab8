//! 파라미터별 목표 범위 준수 여부와 조치 문구.

use serde::{Deserialize, Serialize};

use crate::water::reading::{AnalysisType, Parameter};
use crate::water::targets::{Bounds, TargetRangeConfig};

pub const WITHIN_TARGET: &str = "Within target range";
const PH_ACTION: &str = "Adjust chemical dosing & blowdown to bring the pH into range.";
const HIGH_TDS_ACTION: &str = "High TDS. Increase blowdown to reduce concentration.";

/// 측정값 1개의 준수 판정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceCheck {
    pub parameter: Parameter,
    pub value: f64,
    pub bounds: Bounds,
    pub within: bool,
    pub action: String,
}

/// 경계 위치에 따른 권장 조치 문구를 만든다.
pub fn suggested_action(parameter: Parameter, value: f64, bounds: Bounds) -> String {
    if bounds.contains(value) {
        return WITHIN_TARGET.to_string();
    }
    match (bounds.min, bounds.max) {
        (Some(_), Some(_)) if parameter == Parameter::Ph => PH_ACTION.to_string(),
        (Some(min), Some(max)) if value < min => {
            format!("Value below target range. Increase to {min:.2}-{max:.2} range.")
        }
        (_, Some(_)) if parameter == Parameter::Tds => HIGH_TDS_ACTION.to_string(),
        (Some(min), Some(max)) => {
            format!("Value above target range. Decrease to {min:.2}-{max:.2} range.")
        }
        (None, Some(max)) => {
            format!("Value exceeds maximum ({max:.2}). Reduce to acceptable level.")
        }
        (Some(min), None) => {
            format!("Value below minimum ({min:.2}). Increase to acceptable level.")
        }
        // 경계가 없으면 contains가 항상 참이다
        (None, None) => WITHIN_TARGET.to_string(),
    }
}

pub fn check_parameter(parameter: Parameter, value: f64, bounds: Bounds) -> ComplianceCheck {
    ComplianceCheck {
        parameter,
        value,
        bounds,
        within: bounds.contains(value),
        action: suggested_action(parameter, value, bounds),
    }
}

/// 값이 있고, 활성화되어 있고, 경계가 설정된 파라미터만 검사한다.
pub fn check_compliance(
    analysis: AnalysisType,
    values: &[(Parameter, Option<f64>)],
    targets: &TargetRangeConfig,
) -> Vec<ComplianceCheck> {
    values
        .iter()
        .filter_map(|&(parameter, value)| {
            let value = targets.gate(analysis, parameter, value).value()?;
            let bounds = targets.bounds(analysis, parameter);
            (!bounds.is_unbounded()).then(|| check_parameter(parameter, value, bounds))
        })
        .collect()
}
