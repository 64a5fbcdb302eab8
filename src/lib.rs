//! 수질 안정성 계산 로직을 라이브러리로 분리하여 CLI 뿐 아니라 다른 서비스에서도 재사용할 수 있게 한다.

pub mod app;
pub mod cli;
pub mod config;
pub mod formula;
pub mod i18n;
pub mod logging;
pub mod ui_cli;
pub mod units;
pub mod water;
