//! 측정값 추세 상태와 여러 회차 측정값의 추세 해석.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::water::targets::Bounds;

/// 단일 추세 값의 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStatus {
    Optimal,
    Low,
    High,
    Stable,
    Scaling,
    Corrosion,
    Acceptable,
    Moderate,
    Normal,
}

impl fmt::Display for TrendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrendStatus::Optimal => "optimal",
            TrendStatus::Low => "low",
            TrendStatus::High => "high",
            TrendStatus::Stable => "stable",
            TrendStatus::Scaling => "scaling",
            TrendStatus::Corrosion => "corrosion",
            TrendStatus::Acceptable => "acceptable",
            TrendStatus::Moderate => "moderate",
            TrendStatus::Normal => "normal",
        };
        f.write_str(s)
    }
}

/// 파라미터 키(`ph`, `lsi`, `rsi`, `lr`)에 따라 추세 값 하나를 분류한다.
/// 그 밖의 파라미터는 `Normal`.
pub fn trend_status(parameter: &str, value: f64) -> TrendStatus {
    match parameter.to_ascii_lowercase().as_str() {
        "ph" => {
            if (6.5..=8.0).contains(&value) {
                TrendStatus::Optimal
            } else if value < 6.5 {
                TrendStatus::Low
            } else {
                TrendStatus::High
            }
        }
        "lsi" => {
            if (-0.5..=0.5).contains(&value) {
                TrendStatus::Stable
            } else if value > 0.5 {
                TrendStatus::Scaling
            } else {
                TrendStatus::Corrosion
            }
        }
        "rsi" => {
            if (6.0..=7.0).contains(&value) {
                TrendStatus::Stable
            } else if value < 6.0 {
                TrendStatus::Scaling
            } else {
                TrendStatus::Corrosion
            }
        }
        "lr" | "ls" => {
            if value < 0.2 {
                TrendStatus::Acceptable
            } else if value < 0.8 {
                TrendStatus::Moderate
            } else {
                TrendStatus::Corrosion
            }
        }
        _ => TrendStatus::Normal,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub direction: TrendDirection,
    pub description: String,
    pub interpretation: Option<String>,
    pub recommendation: Option<String>,
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// 앞쪽 절반과 뒤쪽 절반의 평균을 비교한다 (±5%).
fn direction(values: &[f64]) -> TrendDirection {
    if values.len() < 2 {
        return TrendDirection::Stable;
    }
    let (first, second) = values.split_at(values.len() / 2);
    let (avg_first, avg_second) = (mean(first), mean(second));
    if avg_second > avg_first * 1.05 {
        TrendDirection::Increasing
    } else if avg_second < avg_first * 0.95 {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

/// 측정값 목록의 추세를 해석한다. 유효한 값이 없으면 `None`.
///
/// `name`은 표시 이름(pH, TDS, LSI, RSI 등)이며 일부 문구가 이름에 따라 달라진다.
pub fn analyze_trend(name: &str, values: &[Option<f64>], bounds: Bounds) -> Option<TrendAnalysis> {
    let valid: Vec<f64> = values.iter().flatten().copied().collect();
    let first = *valid.first()?;

    let direction = direction(&valid);
    let low = valid.iter().copied().fold(f64::INFINITY, f64::min);
    let high = valid.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let description = match valid.len() {
        1 => format!("Value: {first:.2}"),
        2 => format!("Values range from {low:.2} to {high:.2}"),
        _ => format!("Values range from {low:.2} to {high:.2}, with {direction} trend"),
    };

    let key = name.to_ascii_lowercase();
    let (interpretation, recommendation) = match (bounds.min, bounds.max) {
        (Some(min), Some(max)) => interpret_band(&key, &valid, min, max),
        (None, Some(max)) => {
            if valid.iter().any(|v| *v > max) {
                let rec = if key == "tds" {
                    "High TDS. Increase blowdown to reduce concentration.".to_string()
                } else {
                    format!("Reduce {key} to acceptable levels below {max:.2}.")
                };
                (format!("Some values exceed the maximum limit ({max:.2})."), rec)
            } else {
                (
                    format!("All values are below the maximum limit ({max:.2})."),
                    MAINTAIN.to_string(),
                )
            }
        }
        (Some(min), None) => {
            if valid.iter().any(|v| *v < min) {
                (
                    format!("Some values are below the minimum requirement ({min:.2})."),
                    format!("Increase {key} to acceptable levels above {min:.2}."),
                )
            } else {
                (
                    format!("All values meet the minimum requirement ({min:.2})."),
                    MAINTAIN.to_string(),
                )
            }
        }
        (None, None) => match key.as_str() {
            "lsi" => (
                "LSI values indicate scaling tendency when positive (>0.5).".to_string(),
                LSI_ADVICE.to_string(),
            ),
            "rsi" => (
                "Optimal range is 6-8. Values >8 indicate increased corrosion risk.".to_string(),
                RSI_ADVICE.to_string(),
            ),
            _ => {
                return Some(TrendAnalysis {
                    direction,
                    description,
                    interpretation: None,
                    recommendation: None,
                })
            }
        },
    };

    Some(TrendAnalysis {
        direction,
        description,
        interpretation: Some(interpretation),
        recommendation: Some(recommendation),
    })
}

const MAINTAIN: &str = "Maintain current treatment practices.";
const PH_ADVICE: &str = "Adjust chemical dosing & blowdown to stabilize pH within the recommended range.";
const LSI_ADVICE: &str = "Maintain LSI closer to zero to minimize scaling risk.";
const RSI_ADVICE: &str = "Improve corrosion inhibitor program and water chemistry balance.";

/// 범위 밖 값의 비율(0, 30% 이하, 그 이상)에 따라 해석한다.
fn interpret_band(key: &str, values: &[f64], min: f64, max: f64) -> (String, String) {
    let out_of_band = values.iter().filter(|v| !(min..=max).contains(*v)).count();
    let range = format!("{min:.2}-{max:.2}");

    if out_of_band == 0 {
        return (
            format!("All values are within the optimal range ({range})."),
            MAINTAIN.to_string(),
        );
    }

    if out_of_band as f64 <= values.len() as f64 * 0.3 {
        let rec = match key {
            "ph" => PH_ADVICE.to_string(),
            "tds" => "Improve blowdown control to reduce TDS concentration.".to_string(),
            _ => format!("Adjust treatment to bring values consistently within {range} range."),
        };
        return (
            format!("Most values are within range ({range}), with some exceptions."),
            rec,
        );
    }

    let mut interpretation = format!("Values frequently exceed the optimal range ({range}).");
    let rec = match key {
        "ph" => {
            interpretation.push_str(" This indicates potential for scaling and reduced corrosion protection.");
            PH_ADVICE.to_string()
        }
        "tds" => {
            interpretation.push_str(
                " High TDS can lead to scaling, fouling, and reduced heat transfer efficiency.",
            );
            "Improve blowdown control and water softening.".to_string()
        }
        "lsi" => {
            interpretation.push_str(" Positive LSI suggests scaling tendency.");
            LSI_ADVICE.to_string()
        }
        "rsi" => {
            interpretation.push_str(" Values >8 indicate increased corrosion risk.");
            RSI_ADVICE.to_string()
        }
        _ => format!("Increase blowdown frequency or adjust chemical dosing to reduce {key}."),
    };
    (interpretation, rec)
}
