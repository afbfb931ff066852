//! Writes statistic lines of the form `{prefix} {name}={value}` to a configured writer.
//!
//! Nothing is written until [`configure_statistic_logging`] has been called; the first
//! configuration wins for the rest of the process.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::Write;
use std::sync::Mutex;
use std::sync::OnceLock;

use convert_case::Case;
use convert_case::Casing;

/// Where and how statistics are written.
pub struct StatisticOptions {
    /// Printed in front of every statistic line.
    prefix: String,
    /// A closing line printed after a block of statistics.
    after_statistics: Option<String>,
    /// The casing the statistic names are converted to.
    casing: Option<Case>,
    writer: Box<dyn Write + Send>,
}

impl Debug for StatisticOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticOptions")
            .field("prefix", &self.prefix)
            .field("after_statistics", &self.after_statistics)
            .field("casing", &self.casing)
            .field("writer", &"<Writer>")
            .finish()
    }
}

static STATISTIC_OPTIONS: OnceLock<Mutex<StatisticOptions>> = OnceLock::new();

/// Enables statistic logging. Without a writer the statistics go to stdout.
pub fn configure_statistic_logging(
    prefix: &str,
    after: Option<&str>,
    casing: Option<Case>,
    writer: Option<Box<dyn Write + Send>>,
) {
    let _ = STATISTIC_OPTIONS.get_or_init(|| {
        Mutex::new(StatisticOptions {
            prefix: prefix.to_owned(),
            after_statistics: after.map(str::to_owned),
            casing,
            writer: writer.unwrap_or_else(|| Box::new(std::io::stdout())),
        })
    });
}

fn with_options(action: impl FnOnce(&mut StatisticOptions)) {
    if let Some(options) = STATISTIC_OPTIONS.get() {
        if let Ok(mut options) = options.lock() {
            action(&mut options);
        }
    }
}

/// Logs the statistic `name` with the given value.
pub fn log_statistic(name: impl Display, value: impl Display) {
    with_options(|options| {
        let name = match options.casing {
            Some(casing) => name.to_string().to_case(casing),
            None => name.to_string(),
        };
        let _ = writeln!(options.writer, "{} {name}={value}", options.prefix);
    });
}

/// Writes the closing line of a block of statistics, if one is configured.
pub fn log_statistic_postfix() {
    with_options(|options| {
        if let Some(after) = &options.after_statistics {
            let _ = writeln!(options.writer, "{after}");
        }
    });
}

/// Whether [`configure_statistic_logging`] has been called.
pub fn should_log_statistics() -> bool {
    STATISTIC_OPTIONS.get().is_some()
}
