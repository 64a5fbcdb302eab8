//! 입력 단위 정의 및 변환.

pub mod temperature;

pub use temperature::{to_celsius, TemperatureUnit};
