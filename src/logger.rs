//! Tracing subscriber setup for the binary.
//!
//! Logs go to stderr, or to `<date>_<time>_log.txt` in the working
//! directory when file logging is enabled. Timestamps use the local
//! offset when it can be determined and UTC otherwise.

use std::fs::File;
use std::sync::Mutex;

use time::format_description::parse;
use time::{OffsetDateTime, UtcOffset};
use tracing::Level;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::FmtSubscriber;

use crate::config::SearchConfig;
use crate::error::{TtpError, TtpResult};

const TIME_FORMAT: &str = "[year]-[month]-[day] [hour]:[minute]:[second]";
const FILE_NAME_FORMAT: &str = "[year]-[month]-[day]_[hour]-[minute]-[second]_log.txt";

/// Installs the global subscriber.
///
/// Returns `Ok(false)` without changing anything if a global subscriber is
/// already installed.
pub fn init_logger(config: &SearchConfig) -> TtpResult<bool> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let format = parse(TIME_FORMAT)
        .map_err(|e| TtpError::InvalidConfig(format!("log time format: {e}")))?;
    let timer = OffsetTime::new(offset, format);

    let writer = if config.log_to_file {
        let now = OffsetDateTime::now_utc().to_offset(offset);
        let name = log_file_name(now)?;
        let file = File::create(&name).map_err(|e| TtpError::io(&name, e))?;
        BoxMakeWriter::new(Mutex::new(file))
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };
    let level = if config.verbose { Level::DEBUG } else { Level::INFO };

    let installed = FmtSubscriber::builder()
        .with_max_level(level)
        .with_ansi(!config.log_to_file)
        .with_timer(timer)
        .with_writer(writer)
        .try_init()
        .is_ok();
    Ok(installed)
}

/// Log file name for a start time.
pub fn log_file_name(now: OffsetDateTime) -> TtpResult<String> {
    let format = parse(FILE_NAME_FORMAT)
        .map_err(|e| TtpError::InvalidConfig(format!("log file name format: {e}")))?;
    now.format(&format)
        .map_err(|e| TtpError::InvalidConfig(format!("log file name: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name() {
        let name = log_file_name(OffsetDateTime::UNIX_EPOCH).unwrap();
        assert_eq!(name, "1970-01-01_00-00-00_log.txt");
    }

    #[test]
    fn test_second_init_is_a_no_op() {
        let config = SearchConfig::default();
        init_logger(&config).unwrap();
        assert!(!init_logger(&config).unwrap());
    }
}
