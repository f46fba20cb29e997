//! Console Logger
//!
//! A `log` backend for WASM front-ends. Records are written to the browser
//! console with the level-matching `console.*` method and a short
//! `[MODULE]` prefix derived from the record target.

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use wasm_bindgen::JsValue;

/// Logger writing to `console.error` / `warn` / `info` / `debug`.
pub struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Install the console logger. Safe to call more than once; later calls only
/// update the level filter.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    let result = log::set_logger(&LOGGER);
    log::set_max_level(level);
    result
}

/// Change the active level filter after installation.
pub fn set_level(level: LevelFilter) {
    log::set_max_level(level);
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format_record(record.target(), &record.args().to_string()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Format a console line: `[TAG] message`
pub fn format_record(target: &str, message: &str) -> String {
    format!("[{}] {}", target_tag(target), message)
}

/// Last path segment of a module target, upper-cased (`ragaspace_ui::wishlist::toggle` -> `TOGGLE`)
pub fn target_tag(target: &str) -> String {
    target
        .rsplit("::")
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or("APP")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_tag_uses_last_segment() {
        assert_eq!(target_tag("ragaspace_ui::wishlist::toggle"), "TOGGLE");
        assert_eq!(target_tag("booking"), "BOOKING");
        assert_eq!(target_tag(""), "APP");
    }

    #[test]
    fn test_format_record() {
        assert_eq!(
            format_record("ragaspace_ui::catalog", "Loaded 3 venues"),
            "[CATALOG] Loaded 3 venues"
        );
    }
}
