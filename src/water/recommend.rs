//! 권고사항 생성 규칙.
//!
//! 규칙은 서로 독립적으로 평가되며 여러 개가 동시에 발생할 수 있다.
//! 결과는 매번 새로 만든 전체 목록이고, high 우선순위가 먼저, 나머지는 생성 순서를 따른다.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::water::compliance::ComplianceCheck;
use crate::water::indices::CoolingIndices;
use crate::water::reading::{Gated, Parameter, WaterReading};
use crate::water::score::IndexStatuses;
use crate::water::status::{LrStatus, OverallStatus, PsiStatus};
use crate::water::validate::CoolingInputs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationType {
    Scaling,
    Corrosion,
    Treatment,
    Monitoring,
    Maintenance,
    Optimization,
    Documentation,
}

impl RecommendationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationType::Scaling => "scaling",
            RecommendationType::Corrosion => "corrosion",
            RecommendationType::Treatment => "treatment",
            RecommendationType::Monitoring => "monitoring",
            RecommendationType::Maintenance => "maintenance",
            RecommendationType::Optimization => "optimization",
            RecommendationType::Documentation => "documentation",
        }
    }
}

impl fmt::Display for RecommendationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 권고사항 1건.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub is_implemented: bool,
    /// 생성 순서. 같은 우선순위 그룹 안의 정렬 기준.
    pub sequence: usize,
}

/// 권고 규칙의 임계값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationPolicy {
    pub ph_high: f64,
    pub ph_low: f64,
    /// |LSI|가 이 값을 넘으면 스케일/부식 권고
    pub lsi_band: f64,
    pub rsi_low: f64,
    pub rsi_high: f64,
    /// °C
    pub temperature_alert_c: f64,
    /// ppm
    pub tds_alert_ppm: f64,
    /// ppm
    pub sulphate_alert_ppm: f64,
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self {
            ph_high: 8.0,
            ph_low: 6.5,
            lsi_band: 0.5,
            rsi_low: 6.0,
            rsi_high: 7.0,
            temperature_alert_c: 30.0,
            tds_alert_ppm: 500.0,
            sulphate_alert_ppm: 250.0,
        }
    }
}

/// 생성 순서를 매기며 권고사항을 모으는 목록.
#[derive(Debug, Default)]
struct RecommendationList {
    items: Vec<Recommendation>,
}

impl RecommendationList {
    fn push(
        &mut self,
        kind: RecommendationType,
        priority: Priority,
        title: impl Into<String>,
        description: impl Into<String>,
    ) {
        let sequence = self.items.len();
        self.items.push(Recommendation {
            kind,
            title: title.into(),
            description: description.into(),
            priority,
            is_implemented: false,
            sequence,
        });
    }

    fn finish(self) -> Vec<Recommendation> {
        sort_recommendations(self.items)
    }
}

/// high를 앞으로 모으고, 그 안과 나머지는 생성 순서를 유지한다.
pub fn sort_recommendations(mut items: Vec<Recommendation>) -> Vec<Recommendation> {
    items.sort_by_key(|r| (r.priority != Priority::High, r.sequence));
    items
}

/// 냉각수 권고 규칙에 필요한 계산 결과 묶음.
#[derive(Debug, Clone, Copy)]
pub struct CoolingFindings<'a> {
    pub reading: &'a WaterReading,
    pub inputs: &'a CoolingInputs,
    pub indices: &'a CoolingIndices,
    pub statuses: &'a IndexStatuses,
    pub overall: Option<OverallStatus>,
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// 냉각수 권고사항을 만든다.
pub fn cooling_recommendations(
    findings: &CoolingFindings<'_>,
    out_of_band: &[ComplianceCheck],
    policy: &RecommendationPolicy,
) -> Vec<Recommendation> {
    use Priority::*;
    use RecommendationType as T;

    let mut list = RecommendationList::default();
    let reading = findings.reading;
    let indices = findings.indices;

    if let Some(ph) = findings.inputs.ph {
        if ph > policy.ph_high {
            list.push(
                T::Treatment,
                High,
                "High pH Level Detected",
                format!("pH level of {ph} is above optimal range. Consider pH reduction treatment."),
            );
        } else if ph < policy.ph_low {
            list.push(
                T::Treatment,
                High,
                "Low pH Level Detected",
                format!("pH level of {ph} is below optimal range. Consider pH increase treatment."),
            );
        }
    }

    if let Some(lsi) = indices.lsi {
        if lsi > policy.lsi_band {
            list.push(
                T::Scaling,
                High,
                "Scaling Risk Detected",
                format!(
                    "LSI value of {lsi:.2} indicates scaling potential. Review chemical dosing and consider anti-scaling treatment."
                ),
            );
            list.push(
                T::Treatment,
                Medium,
                "Increase blowdown rate",
                "Higher blowdown rate can help reduce scaling potential.",
            );
        } else if lsi < -policy.lsi_band {
            list.push(
                T::Corrosion,
                High,
                "Corrosion Risk Detected",
                format!(
                    "LSI value of {lsi:.2} indicates corrosion potential. Consider corrosion inhibitor treatment."
                ),
            );
        }
    }

    if let Some(rsi) = indices.rsi {
        if rsi < policy.rsi_low {
            list.push(
                T::Maintenance,
                Medium,
                "RSI Scaling Warning",
                format!("RSI value of {rsi:.2} indicates scaling tendency. Schedule maintenance."),
            );
        } else if rsi > policy.rsi_high {
            list.push(
                T::Monitoring,
                Medium,
                "RSI Corrosion Warning",
                format!("RSI value of {rsi:.2} indicates corrosion tendency. Monitor system integrity."),
            );
        }
    }

    match (findings.statuses.psi, indices.psi) {
        (Some(PsiStatus::Scale), Some(psi)) => list.push(
            T::Scaling,
            High,
            "Address scaling tendency",
            format!("PSI value of {psi:.2} indicates scaling potential. Review treatment program."),
        ),
        (Some(PsiStatus::Corrode), Some(psi)) => list.push(
            T::Corrosion,
            High,
            "Address corrosion tendency",
            format!("PSI value of {psi:.2} indicates corrosion potential. Add corrosion inhibitors."),
        ),
        _ => {}
    }

    if let (Some(LrStatus::HighLocalized), Some(lr)) = (findings.statuses.lr, indices.lr) {
        list.push(
            T::Corrosion,
            High,
            "Address chloride and sulfate corrosion",
            format!(
                "Langelier Ratio of {lr:.2} indicates chloride/sulfate localized corrosion potential."
            ),
        );
    }

    if let Some(temp) = finite(reading.cooling.temperature) {
        if temp > policy.temperature_alert_c {
            list.push(
                T::Optimization,
                Medium,
                "High Temperature Alert",
                format!(
                    "Temperature of {temp}°C is above optimal range. Consider cooling system adjustment."
                ),
            );
        }
    }

    if let Some(tds) = finite(Some(reading.tds)) {
        if tds > policy.tds_alert_ppm {
            list.push(
                T::Treatment,
                Medium,
                "High TDS Levels",
                format!("TDS of {tds} ppm is elevated. Consider water treatment or filtration."),
            );
        }
    }

    if let Some(sulphate) = finite(reading.cooling.sulphate) {
        if sulphate > policy.sulphate_alert_ppm {
            list.push(
                T::Treatment,
                Medium,
                "Elevated Sulphate Levels",
                format!(
                    "Sulphate of {sulphate} ppm is elevated. Review makeup water quality and cycles of concentration."
                ),
            );
        }
    }

    if findings.overall == Some(OverallStatus::Unstable) {
        list.push(
            T::Monitoring,
            High,
            "Increase monitoring frequency",
            "Overall unstable conditions require more frequent monitoring.",
        );
    }

    let optional = [
        (Parameter::Chloride, findings.inputs.chloride, T::Corrosion),
        (Parameter::Cycle, findings.inputs.cycle, T::Optimization),
        (Parameter::Iron, findings.inputs.iron, T::Corrosion),
        (Parameter::Phosphate, findings.inputs.phosphate, T::Treatment),
    ];
    for (parameter, gated, kind) in optional {
        let Gated::Enabled(Some(_)) = gated else {
            continue;
        };
        if let Some(check) = out_of_band
            .iter()
            .find(|c| c.parameter == parameter && !c.within)
        {
            let unit = parameter.unit();
            list.push(
                kind,
                Medium,
                format!("{} Out of Range", parameter.label()),
                format!(
                    "{} of {}{}{} is outside the target range ({}). {}",
                    parameter.label(),
                    check.value,
                    if unit.is_empty() { "" } else { " " },
                    unit,
                    check.bounds,
                    check.action
                ),
            );
        }
    }

    push_baseline(&mut list);
    list.finish()
}

/// 항상 붙는 기본 권고사항.
fn push_baseline(list: &mut RecommendationList) {
    use Priority::*;
    use RecommendationType as T;

    list.push(
        T::Monitoring,
        Medium,
        "Regular Water Testing",
        "Continue regular water analysis to track system chemistry over time.",
    );
    list.push(
        T::Maintenance,
        Low,
        "Equipment Maintenance",
        "Inspect heat exchangers, pumps and distribution lines on the scheduled interval.",
    );
    list.push(
        T::Documentation,
        Low,
        "Record Keeping",
        "Document each analysis, treatment change and corrective action taken.",
    );
    list.push(
        T::Monitoring,
        Low,
        "Chloride and Sulphate Monitoring",
        "Track chloride and sulphate levels to anticipate localized corrosion risk.",
    );
    list.push(
        T::Monitoring,
        Low,
        "Temperature Monitoring",
        "Monitor hot-side and basin temperatures to detect cooling performance changes.",
    );
}

/// 보일러 파라미터별 (유형, 범위 밖일 때 우선순위, 낮을 때 조치, 높을 때 조치).
fn boiler_rule(parameter: Parameter) -> (RecommendationType, Priority, &'static str, &'static str) {
    use Priority::*;
    use RecommendationType as T;

    match parameter {
        Parameter::Ph => (
            T::Treatment,
            High,
            "Increase alkali dosing to raise boiler water pH.",
            "Reduce alkali dosing and increase blowdown to lower boiler water pH.",
        ),
        Parameter::Tds => (
            T::Treatment,
            Medium,
            "Reduce blowdown to bring TDS back into range.",
            "Increase blowdown to reduce TDS concentration.",
        ),
        Parameter::Hardness => (
            T::Treatment,
            High,
            "No action needed for low hardness.",
            "Check softener regeneration and feedwater quality; increase internal treatment dosing.",
        ),
        Parameter::MAlkalinity => (
            T::Treatment,
            Medium,
            "Increase alkalinity builder dosing.",
            "Increase blowdown to reduce M-alkalinity.",
        ),
        Parameter::PAlkalinity | Parameter::OhAlkalinity => (
            T::Treatment,
            Medium,
            "Increase caustic dosing.",
            "Reduce caustic dosing and increase blowdown.",
        ),
        Parameter::Sulphite => (
            T::Corrosion,
            Medium,
            "Increase oxygen scavenger (sulphite) dosing.",
            "Reduce oxygen scavenger dosing to avoid excess TDS.",
        ),
        Parameter::DissolvedOxygen => (
            T::Corrosion,
            Medium,
            "No action needed for low dissolved oxygen.",
            "Check deaerator operation and increase oxygen scavenger dosing.",
        ),
        Parameter::SodiumChloride => (
            T::Monitoring,
            Medium,
            "Verify sodium chloride measurement.",
            "Check for condenser or feedwater contamination and increase blowdown.",
        ),
        _ => (
            T::Treatment,
            Medium,
            "Increase phosphate dosing.",
            "Reduce phosphate dosing.",
        ),
    }
}

/// 보일러 권고사항. 준수 검사 결과 1건당 1개의 고정 권고를 만든다.
pub fn boiler_recommendations(checks: &[ComplianceCheck]) -> Vec<Recommendation> {
    let mut list = RecommendationList::default();

    for check in checks {
        let parameter = check.parameter;
        let label = parameter.label();
        let unit = parameter.unit();
        let value = if unit.is_empty() {
            format!("{}", check.value)
        } else {
            format!("{} {unit}", check.value)
        };
        let (kind, priority, raise, lower) = boiler_rule(parameter);

        if check.within {
            list.push(
                kind,
                Priority::Low,
                format!("{label} Control"),
                format!("{label} ({value}) is within optimal range."),
            );
            continue;
        }

        let below = check.bounds.min.is_some_and(|min| check.value < min);
        let (side, action) = if below { ("below", raise) } else { ("above", lower) };
        list.push(
            kind,
            priority,
            format!("{label} Control"),
            format!(
                "{label} ({value}) is {side} the target range ({}). {action}",
                check.bounds
            ),
        );
    }

    list.finish()
}
