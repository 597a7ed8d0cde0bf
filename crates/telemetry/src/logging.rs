//! Logger initialization.

use chrono::Utc;
use logforth::append::Stderr;
use logforth::filter::EnvFilter;
use logforth::layout::Layout;
use std::fmt::Write;
use std::io::IsTerminal;
use std::str::FromStr;
use std::sync::Once;

static INIT: Once = Once::new();

/// Timestamped, leveled, UTC layout used for every log line.
#[derive(Debug)]
struct UtcLayout {
    color: bool,
}

impl Layout for UtcLayout {
    fn format(
        &self,
        record: &log::Record<'_>,
        _diagnostics: &[Box<dyn logforth::diagnostic::Diagnostic>],
    ) -> anyhow::Result<Vec<u8>> {
        let mut out = String::new();
        write!(out, "{} ", Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ"))?;

        let level = if self.color {
            match record.level() {
                log::Level::Error => format!("\x1b[31m{:>5}\x1b[0m", record.level()),
                log::Level::Warn => format!("\x1b[33m{:>5}\x1b[0m", record.level()),
                log::Level::Info => format!("\x1b[32m{:>5}\x1b[0m", record.level()),
                log::Level::Debug => format!("\x1b[34m{:>5}\x1b[0m", record.level()),
                log::Level::Trace => format!("\x1b[35m{:>5}\x1b[0m", record.level()),
            }
        } else {
            format!("{:>5}", record.level())
        };
        write!(out, "{level}  {}", record.args())?;
        Ok(out.into_bytes())
    }
}

/// Initialize the process-wide logger from a filter string such as `"info"`
/// or `"router=debug,search=debug"`. Idempotent: subsequent calls are no-ops.
pub fn init(log_filter: &str) {
    let log_filter = log_filter.to_owned();
    INIT.call_once(move || {
        logforth::builder()
            .dispatch(move |d| {
                let filter = EnvFilter::from_str(&log_filter)
                    .unwrap_or_else(|_| EnvFilter::from_str("info").expect("the default filter is always valid"));
                let layout = UtcLayout {
                    color: std::io::stderr().is_terminal(),
                };
                d.filter(filter).append(Stderr::default().with_layout(layout))
            })
            .apply();
    });
}
