//! 냉각수 지수 상태 → 0~100 안정성 점수와 종합 판정.

use serde::{Deserialize, Serialize};

use crate::water::indices::CoolingIndices;
use crate::water::status::{LrStatus, LsiStatus, OverallStatus, PsiStatus, RsiStatus, Tier};

const BASE_SCORE: f64 = 50.0;

/// 지수별 분류 결과. 계산되지 않은 지수는 `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexStatuses {
    pub lsi: Option<LsiStatus>,
    pub rsi: Option<RsiStatus>,
    pub psi: Option<PsiStatus>,
    pub lr: Option<LrStatus>,
}

impl IndexStatuses {
    pub fn classify(indices: &CoolingIndices) -> Self {
        Self {
            lsi: indices.lsi.map(LsiStatus::classify),
            rsi: indices.rsi.map(RsiStatus::classify),
            psi: indices.psi.map(PsiStatus::classify),
            lr: indices.lr.map(LrStatus::classify),
        }
    }

    /// 분류된 지수별 (등급, 가감점). 없는 지수는 빠진다.
    fn contributions(&self) -> Vec<(Tier, f64)> {
        // 좋음 / 보통 / 나쁨
        const LSI: [f64; 3] = [15.0, -8.0, -15.0];
        const RSI: [f64; 3] = [15.0, -8.0, -15.0];
        const PSI: [f64; 3] = [12.0, -6.0, -12.0];
        const LR: [f64; 3] = [10.0, 0.0, -10.0];

        [
            self.lsi.map(|s| (s.tier(), LSI)),
            self.rsi.map(|s| (s.tier(), RSI)),
            self.psi.map(|s| (s.tier(), PSI)),
            self.lr.map(|s| (s.tier(), LR)),
        ]
        .into_iter()
        .flatten()
        .map(|(tier, table)| (tier, points(tier, table)))
        .collect()
    }
}

fn points(tier: Tier, [good, moderate, bad]: [f64; 3]) -> f64 {
    match tier {
        Tier::Good => good,
        Tier::Moderate => moderate,
        Tier::Bad => bad,
    }
}

/// 냉각수 안정성 평가.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StabilityAssessment {
    pub score: f64,
    pub overall: OverallStatus,
    /// 좋음 등급인 지수 개수
    pub good_count: usize,
}

/// 지수 상태를 점수와 판정으로 집계한다. 분류된 지수가 없으면 `None`.
pub fn assess_cooling(statuses: &IndexStatuses) -> Option<StabilityAssessment> {
    let contributions = statuses.contributions();
    if contributions.is_empty() {
        return None;
    }

    let good_count = contributions
        .iter()
        .filter(|(tier, _)| *tier == Tier::Good)
        .count();
    let score = contributions
        .iter()
        .fold(BASE_SCORE, |acc, (_, delta)| acc + delta)
        .clamp(0.0, 100.0);
    let overall = match good_count {
        n if n >= 3 => OverallStatus::Stable,
        2 => OverallStatus::Moderate,
        _ => OverallStatus::Unstable,
    };

    Some(StabilityAssessment {
        score,
        overall,
        good_count,
    })
}
