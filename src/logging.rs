use std::str::FromStr;

use log::LevelFilter;

/// environment variable holding the minimum severity to emit
pub const LEVEL_VAR: &str = "DEBUG_LEVEL";

/// the severities understood by `DEBUG_LEVEL`, most verbose first
///
/// `Log` sits between debug and info, so the whole scale is shifted down a step
/// onto the `log` levels: `Debug` is `trace!`, `Log` is `debug!`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    Debug,
    Log,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "LOG" => Ok(Self::Log),
            "INFO" => Ok(Self::Info),
            "WARN" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            "OFF" => Ok(Self::Off),
            other => Err(format!("unknown severity `{other}`")),
        }
    }
}

impl From<Severity> for LevelFilter {
    fn from(value: Severity) -> Self {
        match value {
            Severity::Debug => LevelFilter::Trace,
            Severity::Log => LevelFilter::Debug,
            Severity::Info => LevelFilter::Info,
            Severity::Warn => LevelFilter::Warn,
            Severity::Error => LevelFilter::Error,
            Severity::Off => LevelFilter::Off,
        }
    }
}

impl Severity {
    /// read the severity from `DEBUG_LEVEL`, anything unset or unknown is `Info`
    pub fn from_env() -> Self {
        match std::env::var(LEVEL_VAR) {
            Ok(value) => value.parse().unwrap_or_else(|err| {
                eprintln!("Ignoring {LEVEL_VAR}: {err}");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }
}

/// set up the process logger, called once before anything else runs
pub fn init(severity: Severity) {
    env_logger::Builder::new()
        .filter_level(severity.into())
        .format_timestamp(None)
        .format_target(false)
        .init();
    log::trace!("Creating logger with level {severity:?}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_severity() {
        assert_eq!("DEBUG".parse::<Severity>().unwrap(), Severity::Debug);
        assert_eq!("log".parse::<Severity>().unwrap(), Severity::Log);
        assert_eq!(" Warn ".parse::<Severity>().unwrap(), Severity::Warn);
        assert_eq!("OFF".parse::<Severity>().unwrap(), Severity::Off);
        assert!("VERBOSE".parse::<Severity>().is_err());
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(LevelFilter::from(Severity::Debug), LevelFilter::Trace);
        assert_eq!(LevelFilter::from(Severity::Log), LevelFilter::Debug);
        assert_eq!(LevelFilter::from(Severity::default()), LevelFilter::Info);
        assert_eq!(LevelFilter::from(Severity::Off), LevelFilter::Off);
    }
}
