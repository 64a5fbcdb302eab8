//! 지수 값 → 상태 분류표. 표시 문자열은 보고서에 그대로 쓰인다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 점수 집계에서 쓰는 상태 등급.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Good,
    Moderate,
    Bad,
}

/// 상태 enum의 표시 문자열과 `Display`를 한 번에 정의한다.
macro_rules! status_text {
    ($ty:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// LSI 5단계 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LsiStatus {
    #[serde(rename = "Severe to Moderate Corrosion")]
    SevereCorrosion,
    #[serde(rename = "Mild Corrosion")]
    MildCorrosion,
    #[serde(rename = "Near Balance")]
    NearBalance,
    #[serde(rename = "Moderate Scale Forming")]
    ModerateScale,
    #[serde(rename = "Severe Scale Forming")]
    SevereScale,
}

status_text!(LsiStatus {
    SevereCorrosion => "Severe to Moderate Corrosion",
    MildCorrosion => "Mild Corrosion",
    NearBalance => "Near Balance",
    ModerateScale => "Moderate Scale Forming",
    SevereScale => "Severe Scale Forming",
});

impl LsiStatus {
    pub fn classify(lsi: f64) -> Self {
        if lsi <= -2.0 {
            LsiStatus::SevereCorrosion
        } else if lsi <= -1.0 {
            LsiStatus::MildCorrosion
        } else if lsi <= 0.5 {
            LsiStatus::NearBalance
        } else if lsi <= 1.0 {
            LsiStatus::ModerateScale
        } else {
            LsiStatus::SevereScale
        }
    }

    pub fn tier(&self) -> Tier {
        match self {
            LsiStatus::NearBalance => Tier::Good,
            LsiStatus::MildCorrosion | LsiStatus::ModerateScale => Tier::Moderate,
            LsiStatus::SevereCorrosion | LsiStatus::SevereScale => Tier::Bad,
        }
    }

    /// 스케일 형성 쪽 상태인지.
    pub fn is_scale_forming(&self) -> bool {
        matches!(self, LsiStatus::ModerateScale | LsiStatus::SevereScale)
    }
}

/// RSI 6단계 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RsiStatus {
    #[serde(rename = "Heavy scale")]
    HeavyScale,
    #[serde(rename = "Light scale")]
    LightScale,
    #[serde(rename = "Little scale or corrosion")]
    Balanced,
    #[serde(rename = "Corrosion significant")]
    SignificantCorrosion,
    #[serde(rename = "Heavy corrosion")]
    HeavyCorrosion,
    #[serde(rename = "Intolerable corrosion")]
    IntolerableCorrosion,
}

status_text!(RsiStatus {
    HeavyScale => "Heavy scale",
    LightScale => "Light scale",
    Balanced => "Little scale or corrosion",
    SignificantCorrosion => "Corrosion significant",
    HeavyCorrosion => "Heavy corrosion",
    IntolerableCorrosion => "Intolerable corrosion",
});

impl RsiStatus {
    pub fn classify(rsi: f64) -> Self {
        if rsi < 5.0 {
            RsiStatus::HeavyScale
        } else if rsi < 6.0 {
            RsiStatus::LightScale
        } else if rsi < 7.0 {
            RsiStatus::Balanced
        } else if rsi < 7.5 {
            RsiStatus::SignificantCorrosion
        } else if rsi < 9.0 {
            RsiStatus::HeavyCorrosion
        } else {
            RsiStatus::IntolerableCorrosion
        }
    }

    pub fn tier(&self) -> Tier {
        match self {
            RsiStatus::Balanced => Tier::Good,
            RsiStatus::LightScale | RsiStatus::SignificantCorrosion => Tier::Moderate,
            RsiStatus::HeavyScale | RsiStatus::HeavyCorrosion | RsiStatus::IntolerableCorrosion => {
                Tier::Bad
            }
        }
    }
}

/// PSI 3단계 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PsiStatus {
    #[serde(rename = "Water has a tendency to scale")]
    Scale,
    #[serde(rename = "Water is in optimal range with no corrosion or scaling")]
    Optimal,
    #[serde(rename = "Water has a tendency to corrode")]
    Corrode,
}

status_text!(PsiStatus {
    Scale => "Water has a tendency to scale",
    Optimal => "Water is in optimal range with no corrosion or scaling",
    Corrode => "Water has a tendency to corrode",
});

impl PsiStatus {
    /// 4.5와 6.5는 최적 범위에 포함된다.
    pub fn classify(psi: f64) -> Self {
        if psi < 4.5 {
            PsiStatus::Scale
        } else if psi <= 6.5 {
            PsiStatus::Optimal
        } else {
            PsiStatus::Corrode
        }
    }

    pub fn tier(&self) -> Tier {
        match self {
            PsiStatus::Optimal => Tier::Good,
            PsiStatus::Scale => Tier::Moderate,
            PsiStatus::Corrode => Tier::Bad,
        }
    }
}

/// Langelier Ratio 3단계 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LrStatus {
    #[serde(rename = "Chlorides and sulfate probably will not interfere with natural film formation")]
    WillNotInterfere,
    #[serde(
        rename = "Chlorides and sulfates may interfere with natural film formation. Higher than desired corrosion rates might be anticipated."
    )]
    MayInterfere,
    #[serde(
        rename = "The tendency towards high corrosion rates of a local type should be expected as the index increases"
    )]
    HighLocalized,
}

status_text!(LrStatus {
    WillNotInterfere => "Chlorides and sulfate probably will not interfere with natural film formation",
    MayInterfere => "Chlorides and sulfates may interfere with natural film formation. Higher than desired corrosion rates might be anticipated.",
    HighLocalized => "The tendency towards high corrosion rates of a local type should be expected as the index increases",
});

impl LrStatus {
    /// 0.8과 1.2는 중간 구간에 포함된다.
    pub fn classify(lr: f64) -> Self {
        if lr < 0.8 {
            LrStatus::WillNotInterfere
        } else if lr <= 1.2 {
            LrStatus::MayInterfere
        } else {
            LrStatus::HighLocalized
        }
    }

    pub fn tier(&self) -> Tier {
        match self {
            LrStatus::WillNotInterfere => Tier::Good,
            LrStatus::MayInterfere => Tier::Moderate,
            LrStatus::HighLocalized => Tier::Bad,
        }
    }
}

/// 종합 판정. 냉각수는 Stable/Moderate/Unstable,
/// 보일러수는 Stable/Slightly Unstable/Unstable/Highly Unstable만 쓴다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverallStatus {
    Stable,
    Moderate,
    #[serde(rename = "Slightly Unstable")]
    SlightlyUnstable,
    Unstable,
    #[serde(rename = "Highly Unstable")]
    HighlyUnstable,
}

status_text!(OverallStatus {
    Stable => "Stable",
    Moderate => "Moderate",
    SlightlyUnstable => "Slightly Unstable",
    Unstable => "Unstable",
    HighlyUnstable => "Highly Unstable",
});
