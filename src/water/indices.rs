//! 냉각수 안정성 지수 계산 (LSI, RSI, PSI, Langelier Ratio).
//!
//! 모든 로그는 상용로그(log10)이다. 입력값의 양수 조건은 [`crate::water::validate`]에서
//! 이미 확인되었다고 가정한다.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::water::reading::Gated;

/// LR 표시 상한. 이 값은 고부식 위험을 뜻한다.
pub const LR_CEILING: f64 = 5.0;
/// 원시 LR이 이 값을 넘으면 수치 폭주로 보고 상한값으로 대체한다.
pub const LR_RUNAWAY: f64 = 100.0;
/// 탄산종 합이 사실상 0일 때 쓰는 LR 대체값.
pub const LR_NO_CARBONATE: f64 = 2.0;

const UNDERFLOW: f64 = 1e-20;
const CARBONATE_FLOOR: f64 = 1e-10;
/// 온도가 없을 때 LR 평형상수 계산에 쓰는 기준 온도 (°C)
const REFERENCE_TEMP_C: f64 = 25.0;

/// 포화 pH 계산에 필요한 값. 모두 0보다 커야 한다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationInputs {
    pub tds: f64,
    pub hardness: f64,
    pub total_alkalinity: f64,
    /// 고온측 온도 (°C)
    pub temperature_c: f64,
}

/// pHs = 9.3 + A + B - C - D 의 각 항.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SaturationFactors {
    /// TDS 항
    pub a: f64,
    /// 온도 항
    pub b: f64,
    /// 칼슘 경도 항
    pub c: f64,
    /// 알칼리도 항
    pub d: f64,
}

impl SaturationFactors {
    pub fn from_inputs(input: &SaturationInputs) -> Self {
        Self {
            a: (input.tds.log10() - 1.0) / 10.0,
            b: -13.12 * (input.temperature_c + 273.0).log10() + 34.55,
            c: input.hardness.log10() - 0.4,
            d: input.total_alkalinity.log10(),
        }
    }

    pub fn saturation_ph(&self) -> f64 {
        9.3 + self.a + self.b - self.c - self.d
    }
}

/// 탄산칼슘 포화 pH(pHs)를 계산한다.
pub fn saturation_ph(input: &SaturationInputs) -> f64 {
    SaturationFactors::from_inputs(input).saturation_ph()
}

/// LSI = pH - pHs
pub fn langelier_index(ph: f64, phs: f64) -> f64 {
    ph - phs
}

/// RSI = 2·pHs - pH
pub fn ryznar_index(ph: f64, phs: f64) -> f64 {
    2.0 * phs - ph
}

/// 평형 pH: pHe = 1.465 + log10(총 알칼리도) + 4.54
pub fn equilibrium_ph(total_alkalinity: f64) -> f64 {
    1.465 + total_alkalinity.log10() + 4.54
}

/// PSI = 2·pHs - pHe
pub fn puckorius_index(phs: f64, total_alkalinity: f64) -> f64 {
    2.0 * phs - equilibrium_ph(total_alkalinity)
}

/// Langelier Ratio 계산 입력.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioInputs {
    pub ph: f64,
    /// 0보다 커야 한다.
    pub total_alkalinity: f64,
    /// 비활성이거나 값이 없으면 0으로 취급
    pub chloride: Gated,
    /// 값이 없으면 0으로 취급
    pub sulphate: Option<f64>,
    /// 없으면 25°C 기준
    pub temperature_c: Option<f64>,
}

/// 탄산종 분율을 어떤 방식으로 얻었는지.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeciationSource {
    /// 온도 의존 평형상수로 계산
    Equilibrium,
    /// 수치 불안정으로 pH 구간별 고정 분율 사용
    PhBand,
}

/// 총 알칼리도 중 HCO₃⁻ / CO₃²⁻ 분율.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Speciation {
    pub hco3: f64,
    pub co3: f64,
    pub source: SpeciationSource,
}

impl Speciation {
    fn banded(ph: f64) -> Self {
        let (hco3, co3) = if ph < 6.5 {
            (0.95, 0.05)
        } else if ph > 8.5 {
            (0.30, 0.70)
        } else {
            (0.80, 0.20)
        };
        Self {
            hco3,
            co3,
            source: SpeciationSource::PhBand,
        }
    }
}

/// 탄산의 1차/2차 해리상수 (K1, K2). `t_k`는 켈빈 온도.
pub fn carbonate_constants(t_k: f64) -> (f64, f64) {
    let pk1 = 3404.71 / t_k + 0.032786 * t_k - 14.8435;
    let pk2 = 2902.39 / t_k + 0.02379 * t_k - 6.498;
    (10_f64.powf(-pk1), 10_f64.powf(-pk2))
}

/// pH와 온도로 탄산종 분율을 계산한다. 평형상수나 분모가 언더플로하면 pH 구간값으로 대체한다.
pub fn carbonate_speciation(ph: f64, temperature_c: f64) -> Speciation {
    let t_k = temperature_c + 273.15;
    let (k1, k2) = carbonate_constants(t_k);
    if !(k1 >= UNDERFLOW && k2 >= UNDERFLOW) {
        warn!("탄산 평형상수 언더플로 (K1={k1:e}, K2={k2:e}); pH 구간 분율 사용");
        return Speciation::banded(ph);
    }
    let h = 10_f64.powf(-ph);
    let denominator = h * h + h * k1 + k1 * k2;
    if !(denominator >= UNDERFLOW) {
        warn!("탄산종 분모 언더플로 ({denominator:e}); pH 구간 분율 사용");
        return Speciation::banded(ph);
    }
    Speciation {
        hco3: h * k1 / denominator,
        co3: k1 * k2 / denominator,
        source: SpeciationSource::Equilibrium,
    }
}

/// LR 값이 고정 대체값으로 결정된 이유.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioSentinel {
    /// 탄산종 당량이 사실상 0
    NoCarbonate,
    /// 원시 값이 폭주하거나 유한하지 않음
    Runaway,
}

/// Langelier Ratio 계산 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LangelierRatio {
    /// [0, 5.0]으로 제한된 보고값
    pub value: f64,
    /// 제한 전 값 (대체값이 쓰인 경우 그 대체값)
    pub raw: f64,
    pub speciation: Speciation,
    pub sentinel: Option<RatioSentinel>,
}

/// 염화물·황산염 당량과 탄산종 당량의 비(LR)를 계산한다.
pub fn langelier_ratio(input: &RatioInputs) -> LangelierRatio {
    let temperature_c = input.temperature_c.unwrap_or(REFERENCE_TEMP_C);
    let speciation = carbonate_speciation(input.ph, temperature_c);

    let epm_cl = input.chloride.value().unwrap_or(0.0) / 35.5;
    let epm_so4 = input.sulphate.unwrap_or(0.0) / 96.0;
    let molar_alk = input.total_alkalinity / 100.0;
    let epm_hco3 = molar_alk * speciation.hco3;
    let epm_co3 = molar_alk * speciation.co3;
    let carbonate = epm_hco3 + epm_co3;

    if carbonate < CARBONATE_FLOOR {
        warn!("탄산종 당량 {carbonate:e} < {CARBONATE_FLOOR:e}; LR을 {LR_NO_CARBONATE}로 대체");
        return LangelierRatio {
            value: LR_NO_CARBONATE,
            raw: LR_NO_CARBONATE,
            speciation,
            sentinel: Some(RatioSentinel::NoCarbonate),
        };
    }

    let raw = (epm_cl + epm_so4) / carbonate;
    if !raw.is_finite() || raw > LR_RUNAWAY {
        debug!("원시 LR {raw:e}; 고위험 상한 {LR_CEILING}로 보고");
        return LangelierRatio {
            value: LR_CEILING,
            raw,
            speciation,
            sentinel: Some(RatioSentinel::Runaway),
        };
    }

    LangelierRatio {
        value: raw.clamp(0.0, LR_CEILING),
        raw,
        speciation,
        sentinel: None,
    }
}

/// 냉각수 지수 묶음. 계산할 수 없는 지수는 `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoolingIndices {
    pub phs: Option<f64>,
    pub lsi: Option<f64>,
    pub rsi: Option<f64>,
    pub psi: Option<f64>,
    pub lr: Option<f64>,
}

/// 검증된 입력으로 냉각수 지수를 계산한다.
///
/// `saturation`이 없으면 pHs를 공유하는 LSI/RSI/PSI가 모두 빠진다.
/// `lsi_enabled`/`rsi_enabled`가 꺼진 지수는 결과에서 제외된다.
pub fn compute_cooling_indices(
    ph: f64,
    saturation: Option<&SaturationInputs>,
    ratio: Option<&RatioInputs>,
    lsi_enabled: bool,
    rsi_enabled: bool,
) -> CoolingIndices {
    let phs = saturation.map(saturation_ph);
    let lsi = phs.filter(|_| lsi_enabled).map(|phs| langelier_index(ph, phs));
    let rsi = phs.filter(|_| rsi_enabled).map(|phs| ryznar_index(ph, phs));
    let psi = phs
        .zip(saturation)
        .map(|(phs, s)| puckorius_index(phs, s.total_alkalinity));
    let lr = ratio.map(|r| langelier_ratio(r).value);

    debug!("냉각수 지수: pHs={phs:?} LSI={lsi:?} RSI={rsi:?} PSI={psi:?} LR={lr:?}");
    CoolingIndices {
        phs,
        lsi,
        rsi,
        psi,
        lr,
    }
}
