use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::water::error::CalculationError;

/// 분석 대상 수계 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    /// 냉각수 (LSI/RSI/PSI/LR)
    Cooling,
    /// 보일러수 (감점식 안정성 점수)
    Boiler,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Cooling => "cooling",
            AnalysisType::Boiler => "boiler",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisType {
    type Err = CalculationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cooling" => Ok(AnalysisType::Cooling),
            "boiler" => Ok(AnalysisType::Boiler),
            other => Err(CalculationError::UnknownAnalysisType(other.to_string())),
        }
    }
}

/// 수질 파라미터 식별자. 설정 키, 입력 문제, 권고사항 등에서 공통으로 쓴다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Ph,
    Tds,
    Hardness,
    TotalAlkalinity,
    Chloride,
    Sulphate,
    Temperature,
    BasinTemperature,
    Cycle,
    Iron,
    Phosphate,
    MAlkalinity,
    PAlkalinity,
    OhAlkalinity,
    Sulphite,
    SodiumChloride,
    DissolvedOxygen,
    Lsi,
    Rsi,
}

impl Parameter {
    /// 보고서/권고사항에 표시되는 이름.
    pub fn label(&self) -> &'static str {
        match self {
            Parameter::Ph => "pH",
            Parameter::Tds => "TDS",
            Parameter::Hardness => "Hardness",
            Parameter::TotalAlkalinity => "Total Alkalinity",
            Parameter::Chloride => "Chloride",
            Parameter::Sulphate => "Sulphate",
            Parameter::Temperature => "Hot Side Temperature",
            Parameter::BasinTemperature => "Basin Temperature",
            Parameter::Cycle => "Cycle of Concentration",
            Parameter::Iron => "Iron",
            Parameter::Phosphate => "Phosphate",
            Parameter::MAlkalinity => "M-Alkalinity",
            Parameter::PAlkalinity => "P-Alkalinity",
            Parameter::OhAlkalinity => "OH-Alkalinity",
            Parameter::Sulphite => "Sulphite",
            Parameter::SodiumChloride => "Sodium Chloride",
            Parameter::DissolvedOxygen => "Dissolved Oxygen",
            Parameter::Lsi => "LSI",
            Parameter::Rsi => "RSI",
        }
    }

    /// 표시 단위. 무차원 값은 빈 문자열.
    pub fn unit(&self) -> &'static str {
        match self {
            Parameter::Ph | Parameter::Cycle | Parameter::Lsi | Parameter::Rsi => "",
            Parameter::Temperature | Parameter::BasinTemperature => "°C",
            _ => "ppm",
        }
    }

    /// 설정 파일에서 쓰는 snake_case 키.
    pub fn key(&self) -> &'static str {
        match self {
            Parameter::Ph => "ph",
            Parameter::Tds => "tds",
            Parameter::Hardness => "hardness",
            Parameter::TotalAlkalinity => "total_alkalinity",
            Parameter::Chloride => "chloride",
            Parameter::Sulphate => "sulphate",
            Parameter::Temperature => "temperature",
            Parameter::BasinTemperature => "basin_temperature",
            Parameter::Cycle => "cycle",
            Parameter::Iron => "iron",
            Parameter::Phosphate => "phosphate",
            Parameter::MAlkalinity => "m_alkalinity",
            Parameter::PAlkalinity => "p_alkalinity",
            Parameter::OhAlkalinity => "oh_alkalinity",
            Parameter::Sulphite => "sulphite",
            Parameter::SodiumChloride => "sodium_chloride",
            Parameter::DissolvedOxygen => "dissolved_oxygen",
            Parameter::Lsi => "lsi",
            Parameter::Rsi => "rsi",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 활성화 플래그가 있는 선택 파라미터 값.
///
/// 비활성 파라미터는 값이 있어도 `Disabled`로만 표현되므로
/// 어떤 계산식이나 권고 규칙에도 값이 흘러들어가지 않는다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gated {
    Disabled,
    Enabled(Option<f64>),
}

impl Gated {
    pub fn new(enabled: bool, value: Option<f64>) -> Self {
        if enabled {
            Gated::Enabled(value)
        } else {
            Gated::Disabled
        }
    }

    /// 활성 상태이고 값이 있을 때만 값을 돌려준다.
    pub fn value(self) -> Option<f64> {
        match self {
            Gated::Enabled(v) => v,
            Gated::Disabled => None,
        }
    }

    pub fn is_enabled(self) -> bool {
        matches!(self, Gated::Enabled(_))
    }
}

/// 냉각수 전용 측정값. 모두 선택 항목.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoolingParameters {
    /// 총 알칼리도 as CaCO₃ (ppm)
    pub total_alkalinity: Option<f64>,
    /// 염화물 (ppm)
    pub chloride: Option<f64>,
    /// 황산염 (ppm)
    pub sulphate: Option<f64>,
    /// 고온측 온도 (°C)
    pub temperature: Option<f64>,
    /// 수조 온도 (°C)
    pub basin_temperature: Option<f64>,
    /// 농축 배수
    pub cycle: Option<f64>,
    /// 철 (ppm)
    pub iron: Option<f64>,
    /// 인산염 (ppm)
    pub phosphate: Option<f64>,
}

/// 보일러수 전용 측정값. 모두 선택 항목.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoilerParameters {
    /// M-알칼리도 as CaCO₃ (ppm)
    pub m_alkalinity: Option<f64>,
    pub p_alkalinity: Option<f64>,
    pub oh_alkalinity: Option<f64>,
    /// 아황산염 (ppm)
    pub sulphite: Option<f64>,
    /// 염화나트륨 (ppm)
    pub sodium_chloride: Option<f64>,
    /// 용존 산소 (ppm)
    pub dissolved_oxygen: Option<f64>,
    /// 인산염 (ppm)
    pub phosphate: Option<f64>,
}

/// 분석 1건의 측정 기록. 엔진은 이 값을 읽기만 한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterReading {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub plant: Option<String>,
    #[serde(default)]
    pub water_system: Option<String>,
    pub analysis_type: AnalysisType,
    #[serde(default)]
    pub analysis_date: Option<NaiveDate>,
    #[serde(default)]
    pub analysis_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,

    /// pH (0~14)
    pub ph: f64,
    /// 총 용존 고형물 (ppm)
    pub tds: f64,
    /// 경도 as CaCO₃ (ppm)
    pub hardness: f64,

    #[serde(default)]
    pub cooling: CoolingParameters,
    #[serde(default)]
    pub boiler: BoilerParameters,
}

impl WaterReading {
    fn with_type(analysis_type: AnalysisType, ph: f64, tds: f64, hardness: f64) -> Self {
        Self {
            user: None,
            plant: None,
            water_system: None,
            analysis_type,
            analysis_date: None,
            analysis_name: None,
            notes: None,
            ph,
            tds,
            hardness,
            cooling: CoolingParameters::default(),
            boiler: BoilerParameters::default(),
        }
    }

    /// 공통 필수값만 채운 냉각수 측정 기록을 만든다.
    pub fn cooling(ph: f64, tds: f64, hardness: f64) -> Self {
        Self::with_type(AnalysisType::Cooling, ph, tds, hardness)
    }

    /// 공통 필수값만 채운 보일러수 측정 기록을 만든다.
    pub fn boiler(ph: f64, tds: f64, hardness: f64) -> Self {
        Self::with_type(AnalysisType::Boiler, ph, tds, hardness)
    }

    /// 파라미터 식별자로 측정값을 조회한다. 해당 분석 종류에 없는 값은 `None`.
    pub fn value(&self, parameter: Parameter) -> Option<f64> {
        let c = &self.cooling;
        let b = &self.boiler;
        match (self.analysis_type, parameter) {
            (_, Parameter::Ph) => Some(self.ph),
            (_, Parameter::Tds) => Some(self.tds),
            (_, Parameter::Hardness) => Some(self.hardness),
            (AnalysisType::Cooling, Parameter::TotalAlkalinity) => c.total_alkalinity,
            (AnalysisType::Cooling, Parameter::Chloride) => c.chloride,
            (AnalysisType::Cooling, Parameter::Sulphate) => c.sulphate,
            (AnalysisType::Cooling, Parameter::Temperature) => c.temperature,
            (AnalysisType::Cooling, Parameter::BasinTemperature) => c.basin_temperature,
            (AnalysisType::Cooling, Parameter::Cycle) => c.cycle,
            (AnalysisType::Cooling, Parameter::Iron) => c.iron,
            (AnalysisType::Cooling, Parameter::Phosphate) => c.phosphate,
            (AnalysisType::Boiler, Parameter::MAlkalinity) => b.m_alkalinity,
            (AnalysisType::Boiler, Parameter::PAlkalinity) => b.p_alkalinity,
            (AnalysisType::Boiler, Parameter::OhAlkalinity) => b.oh_alkalinity,
            (AnalysisType::Boiler, Parameter::Sulphite) => b.sulphite,
            (AnalysisType::Boiler, Parameter::SodiumChloride) => b.sodium_chloride,
            (AnalysisType::Boiler, Parameter::DissolvedOxygen) => b.dissolved_oxygen,
            (AnalysisType::Boiler, Parameter::Phosphate) => b.phosphate,
            _ => None,
        }
    }
}
