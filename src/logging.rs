use std::str::FromStr;

use log::{LevelFilter, Log, Metadata, Record};

/// Log levels accepted on the command line and in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Nothing,
    Error,
    Warning,
    Info,
    Debug,
    All,
}

impl LogLevel {
    /// Matching filter for the `log` facade
    pub fn to_filter(self) -> LevelFilter {
        match self {
            LogLevel::Nothing => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::All => LevelFilter::Trace,
        }
    }

    fn from_record_level(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warning,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug => LogLevel::Debug,
            log::Level::Trace => LogLevel::All,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nothing" | "off" | "none" => Ok(LogLevel::Nothing),
            "error" => Ok(LogLevel::Error),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "all" | "trace" => Ok(LogLevel::All),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

/// Writes `[Level] message` lines to stderr
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "[{:?}] {}",
                LogLevel::from_record_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Install the stderr logger and set the maximum level.
///
/// Returns `false` if another logger was installed first; the level is
/// applied either way.
pub fn init(level: LogLevel) -> bool {
    let installed = log::set_logger(&LOGGER).is_ok();
    log::set_max_level(level.to_filter());
    installed
}
