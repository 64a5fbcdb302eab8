//! 플랜트/수계별 목표 범위와 선택 파라미터 활성화 설정.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::water::error::CalculationError;
use crate::water::reading::{AnalysisType, Gated, Parameter};

/// 선택적 하한/상한.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Bounds {
    pub const fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub const fn between(min: f64, max: f64) -> Self {
        Self::new(Some(min), Some(max))
    }

    pub const fn at_most(max: f64) -> Self {
        Self::new(None, Some(max))
    }

    pub const fn unbounded() -> Self {
        Self::new(None, None)
    }

    /// 경계가 하나도 없으면 참.
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }

    /// 가장 가까운 경계로부터 벗어난 양. 범위 안이면 0.
    pub fn deviation(&self, value: f64) -> f64 {
        match (self.min, self.max) {
            (Some(min), _) if value < min => min - value,
            (_, Some(max)) if value > max => value - max,
            _ => 0.0,
        }
    }

    /// `other`에 있는 경계가 우선한다.
    pub fn overlay(self, other: Bounds) -> Bounds {
        Bounds {
            min: other.min.or(self.min),
            max: other.max.or(self.max),
        }
    }

    fn validate(&self, label: &str) -> Result<(), CalculationError> {
        let invalid = |reason| CalculationError::InvalidConfig {
            parameter: label.to_string(),
            reason,
        };
        if self.min.is_some_and(|v| !v.is_finite()) || self.max.is_some_and(|v| !v.is_finite()) {
            return Err(invalid("경계값이 유한한 숫자가 아닙니다"));
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(invalid("하한이 상한보다 큽니다"));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(f, "{min:.2}-{max:.2}"),
            (None, Some(max)) => write!(f, "≤ {max:.2}"),
            (Some(min), None) => write!(f, "≥ {min:.2}"),
            (None, None) => f.write_str("-"),
        }
    }
}

fn enabled_by_default() -> bool {
    true
}

/// 파라미터 1개의 목표 범위와 활성화 플래그.
///
/// 필수 파라미터(pH, TDS, 경도 등)의 `enabled`는 무시된다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterTarget {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl ParameterTarget {
    pub const fn range(min: f64, max: f64) -> Self {
        Self {
            enabled: true,
            min: Some(min),
            max: Some(max),
        }
    }

    pub const fn at_most(max: f64) -> Self {
        Self {
            enabled: true,
            min: None,
            max: Some(max),
        }
    }

    pub const fn unbounded() -> Self {
        Self {
            enabled: true,
            min: None,
            max: None,
        }
    }

    pub const fn disabled(self) -> Self {
        Self {
            enabled: false,
            ..self
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.min, self.max)
    }
}

/// 냉각수 목표 범위. 기본값은 플랜트 기본 설정을 따른다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoolingTargets {
    pub ph: ParameterTarget,
    pub tds: ParameterTarget,
    pub hardness: ParameterTarget,
    pub total_alkalinity: ParameterTarget,
    pub chloride: ParameterTarget,
    pub cycle: ParameterTarget,
    pub iron: ParameterTarget,
    pub phosphate: ParameterTarget,
    pub lsi: ParameterTarget,
    pub rsi: ParameterTarget,
}

impl Default for CoolingTargets {
    fn default() -> Self {
        Self {
            ph: ParameterTarget::range(6.5, 7.8),
            tds: ParameterTarget::range(500.0, 800.0),
            hardness: ParameterTarget::at_most(300.0),
            total_alkalinity: ParameterTarget::at_most(300.0),
            chloride: ParameterTarget::at_most(250.0),
            cycle: ParameterTarget::range(5.0, 8.0),
            iron: ParameterTarget::at_most(3.0),
            phosphate: ParameterTarget::at_most(10.0).disabled(),
            lsi: ParameterTarget::range(-0.5, 0.5),
            rsi: ParameterTarget::range(6.0, 7.0),
        }
    }
}

/// 보일러수 목표 범위.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoilerTargets {
    pub ph: ParameterTarget,
    pub tds: ParameterTarget,
    pub hardness: ParameterTarget,
    pub m_alkalinity: ParameterTarget,
    pub p_alkalinity: ParameterTarget,
    pub oh_alkalinity: ParameterTarget,
    pub sulphite: ParameterTarget,
    pub sodium_chloride: ParameterTarget,
    pub dissolved_oxygen: ParameterTarget,
    pub phosphate: ParameterTarget,
}

impl Default for BoilerTargets {
    fn default() -> Self {
        Self {
            ph: ParameterTarget::range(10.5, 11.5),
            tds: ParameterTarget::range(2500.0, 3500.0),
            hardness: ParameterTarget::at_most(2.0),
            m_alkalinity: ParameterTarget::range(250.0, 600.0),
            p_alkalinity: ParameterTarget::unbounded(),
            oh_alkalinity: ParameterTarget::unbounded(),
            sulphite: ParameterTarget::range(20.0, 40.0).disabled(),
            sodium_chloride: ParameterTarget::unbounded().disabled(),
            dissolved_oxygen: ParameterTarget::range(0.0, 0.05).disabled(),
            phosphate: ParameterTarget::range(2.0, 10.0).disabled(),
        }
    }
}

/// 엔진에 전달되는 목표 범위 설정 스냅샷.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetRangeConfig {
    pub cooling: CoolingTargets,
    pub boiler: BoilerTargets,
}

/// 수계(water system) 단위로 플랜트 설정을 덮어쓰는 항목.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetOverride {
    pub analysis: AnalysisType,
    pub parameter: Parameter,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl TargetRangeConfig {
    /// 분석 종류와 파라미터에 해당하는 목표 설정. 해당 분석에 없는 파라미터는 `None`.
    pub fn target(&self, analysis: AnalysisType, parameter: Parameter) -> Option<&ParameterTarget> {
        let c = &self.cooling;
        let b = &self.boiler;
        match (analysis, parameter) {
            (AnalysisType::Cooling, Parameter::Ph) => Some(&c.ph),
            (AnalysisType::Cooling, Parameter::Tds) => Some(&c.tds),
            (AnalysisType::Cooling, Parameter::Hardness) => Some(&c.hardness),
            (AnalysisType::Cooling, Parameter::TotalAlkalinity) => Some(&c.total_alkalinity),
            (AnalysisType::Cooling, Parameter::Chloride) => Some(&c.chloride),
            (AnalysisType::Cooling, Parameter::Cycle) => Some(&c.cycle),
            (AnalysisType::Cooling, Parameter::Iron) => Some(&c.iron),
            (AnalysisType::Cooling, Parameter::Phosphate) => Some(&c.phosphate),
            (AnalysisType::Cooling, Parameter::Lsi) => Some(&c.lsi),
            (AnalysisType::Cooling, Parameter::Rsi) => Some(&c.rsi),
            (AnalysisType::Boiler, Parameter::Ph) => Some(&b.ph),
            (AnalysisType::Boiler, Parameter::Tds) => Some(&b.tds),
            (AnalysisType::Boiler, Parameter::Hardness) => Some(&b.hardness),
            (AnalysisType::Boiler, Parameter::MAlkalinity) => Some(&b.m_alkalinity),
            (AnalysisType::Boiler, Parameter::PAlkalinity) => Some(&b.p_alkalinity),
            (AnalysisType::Boiler, Parameter::OhAlkalinity) => Some(&b.oh_alkalinity),
            (AnalysisType::Boiler, Parameter::Sulphite) => Some(&b.sulphite),
            (AnalysisType::Boiler, Parameter::SodiumChloride) => Some(&b.sodium_chloride),
            (AnalysisType::Boiler, Parameter::DissolvedOxygen) => Some(&b.dissolved_oxygen),
            (AnalysisType::Boiler, Parameter::Phosphate) => Some(&b.phosphate),
            _ => None,
        }
    }

    fn target_mut(
        &mut self,
        analysis: AnalysisType,
        parameter: Parameter,
    ) -> Option<&mut ParameterTarget> {
        let c = &mut self.cooling;
        let b = &mut self.boiler;
        match (analysis, parameter) {
            (AnalysisType::Cooling, Parameter::Ph) => Some(&mut c.ph),
            (AnalysisType::Cooling, Parameter::Tds) => Some(&mut c.tds),
            (AnalysisType::Cooling, Parameter::Hardness) => Some(&mut c.hardness),
            (AnalysisType::Cooling, Parameter::TotalAlkalinity) => Some(&mut c.total_alkalinity),
            (AnalysisType::Cooling, Parameter::Chloride) => Some(&mut c.chloride),
            (AnalysisType::Cooling, Parameter::Cycle) => Some(&mut c.cycle),
            (AnalysisType::Cooling, Parameter::Iron) => Some(&mut c.iron),
            (AnalysisType::Cooling, Parameter::Phosphate) => Some(&mut c.phosphate),
            (AnalysisType::Cooling, Parameter::Lsi) => Some(&mut c.lsi),
            (AnalysisType::Cooling, Parameter::Rsi) => Some(&mut c.rsi),
            (AnalysisType::Boiler, Parameter::Ph) => Some(&mut b.ph),
            (AnalysisType::Boiler, Parameter::Tds) => Some(&mut b.tds),
            (AnalysisType::Boiler, Parameter::Hardness) => Some(&mut b.hardness),
            (AnalysisType::Boiler, Parameter::MAlkalinity) => Some(&mut b.m_alkalinity),
            (AnalysisType::Boiler, Parameter::PAlkalinity) => Some(&mut b.p_alkalinity),
            (AnalysisType::Boiler, Parameter::OhAlkalinity) => Some(&mut b.oh_alkalinity),
            (AnalysisType::Boiler, Parameter::Sulphite) => Some(&mut b.sulphite),
            (AnalysisType::Boiler, Parameter::SodiumChloride) => Some(&mut b.sodium_chloride),
            (AnalysisType::Boiler, Parameter::DissolvedOxygen) => Some(&mut b.dissolved_oxygen),
            (AnalysisType::Boiler, Parameter::Phosphate) => Some(&mut b.phosphate),
            _ => None,
        }
    }

    /// 설정된 경계. 설정이 없는 파라미터는 무한 범위.
    pub fn bounds(&self, analysis: AnalysisType, parameter: Parameter) -> Bounds {
        self.target(analysis, parameter)
            .map(ParameterTarget::bounds)
            .unwrap_or_default()
    }

    /// 활성화 플래그를 적용한 선택 파라미터 값을 만든다.
    /// 플래그가 없는 파라미터는 항상 활성 상태로 본다.
    pub fn gate(&self, analysis: AnalysisType, parameter: Parameter, value: Option<f64>) -> Gated {
        let enabled = self
            .target(analysis, parameter)
            .map_or(true, |target| target.enabled);
        Gated::new(enabled, value)
    }

    /// 수계 설정 덮어쓰기를 적용한다. 경계는 항목별로, 플래그는 지정된 경우에만 바뀐다.
    pub fn apply(&mut self, overrides: &[TargetOverride]) -> Result<(), CalculationError> {
        for o in overrides {
            let target = self.target_mut(o.analysis, o.parameter).ok_or_else(|| {
                CalculationError::InvalidConfig {
                    parameter: format!("{}.{}", o.analysis, o.parameter.key()),
                    reason: "해당 분석 종류에서 설정할 수 없는 파라미터입니다",
                }
            })?;
            let merged = target.bounds().overlay(Bounds::new(o.min, o.max));
            target.min = merged.min;
            target.max = merged.max;
            if let Some(enabled) = o.enabled {
                target.enabled = enabled;
            }
        }
        self.validate()
    }

    /// 플랜트 설정(없으면 기본값)에 수계 덮어쓰기를 적용한 최종 설정을 만든다.
    pub fn resolve(
        plant: Option<&TargetRangeConfig>,
        overrides: &[TargetOverride],
    ) -> Result<TargetRangeConfig, CalculationError> {
        let mut resolved = plant.cloned().unwrap_or_default();
        resolved.apply(overrides)?;
        Ok(resolved)
    }

    /// 모든 경계가 유한하고 하한 ≤ 상한인지 확인한다.
    pub fn validate(&self) -> Result<(), CalculationError> {
        const COOLING: [Parameter; 10] = [
            Parameter::Ph,
            Parameter::Tds,
            Parameter::Hardness,
            Parameter::TotalAlkalinity,
            Parameter::Chloride,
            Parameter::Cycle,
            Parameter::Iron,
            Parameter::Phosphate,
            Parameter::Lsi,
            Parameter::Rsi,
        ];
        const BOILER: [Parameter; 10] = [
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
        let all = COOLING
            .iter()
            .map(|p| (AnalysisType::Cooling, *p))
            .chain(BOILER.iter().map(|p| (AnalysisType::Boiler, *p)));
        for (analysis, parameter) in all {
            self.bounds(analysis, parameter)
                .validate(&format!("{analysis}.{}", parameter.key()))?;
        }
        Ok(())
    }
}
