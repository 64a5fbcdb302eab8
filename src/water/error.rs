use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::water::reading::{AnalysisType, Parameter};

/// 엔진이 호출자에게 돌려주는 하드 오류.
///
/// 데이터 누락이나 로그 정의역 위반은 오류가 아니라 [`InputIssue`]로 기록되고,
/// 해당 지수만 계산 불가로 표시된다.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculationError {
    /// 알 수 없는 분석 종류 문자열
    #[error("알 수 없는 분석 종류: {0}")]
    UnknownAnalysisType(String),
    /// 목표 범위 설정이 잘못됨 (비유한 경계, min > max 등)
    #[error("목표 범위 설정 오류 ({parameter}): {reason}")]
    InvalidConfig {
        parameter: String,
        reason: &'static str,
    },
    /// 요청한 분석 종류에 대해 계산 가능한 지수가 하나도 없음
    #[error("{analysis} 분석에서 계산 가능한 지수가 없습니다 (문제 {} 건)", .issues.len())]
    NothingComputable {
        analysis: AnalysisType,
        issues: Vec<InputIssue>,
    },
}

/// 입력 문제의 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// 필요한 값이 없음
    Missing,
    /// 로그 계산에 필요한 양수 조건 위반 또는 비유한 값
    Domain,
}

/// 특정 파라미터 때문에 지수 계산이 억제되었음을 설명한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{parameter}: {}", issue_text(.kind, .value))]
pub struct InputIssue {
    pub parameter: Parameter,
    pub kind: IssueKind,
    /// 정의역 위반일 때 실제 입력값
    pub value: Option<f64>,
}

impl InputIssue {
    pub fn missing(parameter: Parameter) -> Self {
        Self {
            parameter,
            kind: IssueKind::Missing,
            value: None,
        }
    }

    pub fn domain(parameter: Parameter, value: f64) -> Self {
        Self {
            parameter,
            kind: IssueKind::Domain,
            value: Some(value),
        }
    }
}

fn issue_text(kind: &IssueKind, value: &Option<f64>) -> String {
    match (kind, value) {
        (IssueKind::Missing, _) => "값이 없어 관련 지수를 계산하지 않음".to_string(),
        (IssueKind::Domain, Some(v)) => format!("허용되지 않는 값 {v}"),
        (IssueKind::Domain, None) => "허용되지 않는 값".to_string(),
    }
}
