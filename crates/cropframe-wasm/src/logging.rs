//! `log` backend writing to the browser console.
//!
//! Core emits through the `log` facade; in the browser nothing would be
//! shown without a logger installed. [`init_logging`] installs one that
//! forwards each record to the matching `console` method.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;
use web_sys::console;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            Level::Info => console::info_1(&line),
            Level::Debug | Level::Trace => console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Parse a level name (`"off"`, `"error"`, ..., `"trace"`), falling back to
/// `info` for anything unrecognised.
pub(crate) fn parse_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::Info)
}

/// Install the console logger.
///
/// May be called again to change the level; the logger itself is only
/// installed once.
#[wasm_bindgen]
pub fn init_logging(level: &str) {
    // set_logger fails if a logger is already installed, which is fine.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(parse_level(level));
}
