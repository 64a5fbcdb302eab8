//! 명령행 인자 정의. 비대화형 계산은 하위 명령으로, 인자가 없으면 대화형 메뉴로 간다.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;
use crate::units::{to_celsius, TemperatureUnit};
use crate::water::WaterReading;

#[derive(Debug, Parser)]
#[command(
    name = "water_stability",
    author,
    version,
    about = "Cooling/boiler water stability calculator (LSI, RSI, PSI, LR)",
    long_about = None
)]
pub struct Cli {
    /// 설정 파일 경로 (없으면 기본값으로 생성)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// ko / en / auto
    #[arg(long, default_value = "auto")]
    pub lang: String,

    /// 로그 상세도 (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// 냉각수 측정값으로 지수와 안정성 점수를 계산
    Cooling(CoolingArgs),
    /// 보일러수 측정값으로 감점식 안정성 점수를 계산
    Boiler(BoilerArgs),
    /// JSON 계산 요청 파일을 처리
    Compute {
        /// 요청 JSON 경로
        #[arg(short, long)]
        input: PathBuf,
        /// 결과 JSON 경로. 없으면 표준출력
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// 측정값 목록의 추세 분석
    Trend {
        /// 파라미터 이름 (ph, tds, lsi, rsi, ...)
        #[arg(short, long)]
        param: String,
        /// 쉼표로 구분한 측정값
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        values: Vec<f64>,
        #[arg(long, allow_hyphen_values = true)]
        min: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        max: Option<f64>,
    },
    /// 사용자 계산식 평가
    Formula {
        #[arg(short, long)]
        expr: String,
        /// name=value, 여러 번 지정 가능
        #[arg(long = "var")]
        vars: Vec<String>,
    },
    /// 대화형 메뉴 (기본)
    Interactive,
}

/// 공통 필수 측정값.
#[derive(Debug, Args)]
pub struct CommonArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub ph: f64,
    /// ppm
    #[arg(long)]
    pub tds: f64,
    /// ppm as CaCO₃
    #[arg(long)]
    pub hardness: f64,
    /// 결과를 보고서 대신 JSON으로 출력
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct CoolingArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    #[arg(long)]
    pub alkalinity: Option<f64>,
    #[arg(long)]
    pub chloride: Option<f64>,
    #[arg(long)]
    pub sulphate: Option<f64>,
    /// 고온측 온도
    #[arg(long, allow_hyphen_values = true)]
    pub temperature: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    pub basin_temperature: Option<f64>,
    /// c / f / k. 없으면 설정 파일 값
    #[arg(long)]
    pub temp_unit: Option<TemperatureUnit>,
    #[arg(long)]
    pub cycle: Option<f64>,
    #[arg(long)]
    pub iron: Option<f64>,
    #[arg(long)]
    pub phosphate: Option<f64>,
}

impl CoolingArgs {
    pub fn to_reading(&self, default_unit: TemperatureUnit) -> WaterReading {
        let unit = self.temp_unit.unwrap_or(default_unit);
        let c = &self.common;
        let mut reading = WaterReading::cooling(c.ph, c.tds, c.hardness);
        let p = &mut reading.cooling;
        p.total_alkalinity = self.alkalinity;
        p.chloride = self.chloride;
        p.sulphate = self.sulphate;
        p.temperature = self.temperature.map(|t| to_celsius(t, unit));
        p.basin_temperature = self.basin_temperature.map(|t| to_celsius(t, unit));
        p.cycle = self.cycle;
        p.iron = self.iron;
        p.phosphate = self.phosphate;
        reading
    }
}

#[derive(Debug, Args)]
pub struct BoilerArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    #[arg(long)]
    pub m_alkalinity: Option<f64>,
    #[arg(long)]
    pub p_alkalinity: Option<f64>,
    #[arg(long)]
    pub oh_alkalinity: Option<f64>,
    #[arg(long)]
    pub sulphite: Option<f64>,
    #[arg(long)]
    pub sodium_chloride: Option<f64>,
    #[arg(long)]
    pub dissolved_oxygen: Option<f64>,
    #[arg(long)]
    pub phosphate: Option<f64>,
}

impl BoilerArgs {
    pub fn to_reading(&self) -> WaterReading {
        let c = &self.common;
        let mut reading = WaterReading::boiler(c.ph, c.tds, c.hardness);
        let p = &mut reading.boiler;
        p.m_alkalinity = self.m_alkalinity;
        p.p_alkalinity = self.p_alkalinity;
        p.oh_alkalinity = self.oh_alkalinity;
        p.sulphite = self.sulphite;
        p.sodium_chloride = self.sodium_chloride;
        p.dissolved_oxygen = self.dissolved_oxygen;
        p.phosphate = self.phosphate;
        reading
    }
}
