use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::{Write, stderr};

static LOGGER: Logger = Logger;

/// Install the stderr logger at `level`.
///
/// Info records print bare and other records get a colored label. From debug
/// verbosity on every record also shows its target and source line, and only
/// records of this tool and `cri_usm` pass below info.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

struct Logger;

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
            && (metadata.level() <= Level::Info
                || metadata.target().starts_with(env!("CARGO_CRATE_NAME"))
                || metadata.target().starts_with("cri_usm"))
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let verbose = log::max_level() >= LevelFilter::Debug;
        let mut stderr = stderr().lock();

        // Nowhere left to report a failed write to stderr.
        let _ = match (record.level(), verbose) {
            (Level::Info, false) => writeln!(stderr, "{}", record.args()),
            (level, false) => writeln!(stderr, "{}: {}", label(level), record.args()),
            (level, true) => writeln!(
                stderr,
                "{}: {} {} {}",
                label(level),
                record.target().dimmed(),
                location(record),
                record.args()
            ),
        };
    }

    fn flush(&self) {
        let _ = stderr().flush();
    }
}

fn location(record: &Record) -> ColoredString {
    match (record.file(), record.line()) {
        (Some(file), Some(line)) => format!("[{}:{}]", file, line).dimmed(),
        _ => "[unk]".dimmed(),
    }
}

fn label(level: Level) -> ColoredString {
    match level {
        Level::Error => "error".bold().red(),
        Level::Warn => "warning".bold().yellow(),
        Level::Info => "info".bold().green(),
        Level::Debug => "debug".bold().blue(),
        Level::Trace => "trace".bold().purple(),
    }
}
