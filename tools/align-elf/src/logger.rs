//! Minimal stderr backend for the `log` facade.

use std::io::Write;
use std::str::FromStr;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Environment variable overriding the `-v` count, e.g. `ALIGN_ELF_LOG=debug`.
pub const LOG_ENV: &str = "ALIGN_ELF_LOG";

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let _ = writeln!(std::io::stderr().lock(), "{}", format_line(record));
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// `<letter> <module> <message>`, with the module cut to its last path
/// segment.
fn format_line(record: &Record) -> String {
    let letter = match record.level() {
        Level::Error => 'E',
        Level::Warn => 'W',
        Level::Info => 'I',
        Level::Debug => 'D',
        Level::Trace => 'T',
    };
    let path = record.module_path().unwrap_or(record.target());
    let module = path.rsplit("::").next().unwrap_or(path);
    format!("{letter} {module:<8} {}", record.args())
}

/// Pick the log level: `env` wins when it names a valid level, otherwise
/// each `-v` raises the default `warn` by one step.
pub fn level_from(verbose: u8, env: Option<&str>) -> LevelFilter {
    if let Some(level) = env.and_then(|v| LevelFilter::from_str(v.trim()).ok()) {
        return level;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the stderr logger at `level`.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_steps_up_from_warn() {
        assert_eq!(level_from(0, None), LevelFilter::Warn);
        assert_eq!(level_from(1, None), LevelFilter::Info);
        assert_eq!(level_from(2, None), LevelFilter::Debug);
        assert_eq!(level_from(9, None), LevelFilter::Trace);
    }

    #[test]
    fn line_carries_level_and_module() {
        let line = format_line(
            &Record::builder()
                .level(Level::Info)
                .target("elf_align::patch")
                .module_path(Some("elf_align::patch"))
                .args(format_args!("phdr 1: p_align 0x1000 -> 0x4000"))
                .build(),
        );
        assert_eq!(line, "I patch    phdr 1: p_align 0x1000 -> 0x4000");
    }

    #[test]
    fn target_stands_in_for_missing_module() {
        let line = format_line(
            &Record::builder()
                .level(Level::Warn)
                .target("align_elf")
                .args(format_args!("page size 3000 is not a power of two"))
                .build(),
        );
        assert_eq!(line, "W align_elf page size 3000 is not a power of two");
    }

    #[test]
    fn env_overrides_verbosity() {
        assert_eq!(level_from(3, Some("error")), LevelFilter::Error);
        assert_eq!(level_from(0, Some(" DEBUG ")), LevelFilter::Debug);
        assert_eq!(level_from(1, Some("loud")), LevelFilter::Info);
    }
}
