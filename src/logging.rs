//! `log` 퍼사드용 간단한 stderr 로거.

use chrono::{DateTime, Utc};
use log::{LevelFilter, Metadata, Record, SetLoggerError};

pub struct StderrLogger;
pub static LOGGER: StderrLogger = StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now: DateTime<Utc> = Utc::now();
            eprintln!(
                "[{}] {} - {}",
                now.to_rfc3339(),
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

/// `-v` 횟수가 있으면 그것을, 없으면 설정 파일의 레벨 문자열을 쓴다.
pub fn level_from(verbosity: u8, configured: &str) -> LevelFilter {
    match verbosity {
        0 => configured.parse().unwrap_or(LevelFilter::Warn),
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// 전역 로거를 설치한다. 두 번째 호출은 오류를 돌려준다.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
