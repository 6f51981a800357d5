//! Logging facility
//!
//! Routes `log` records to a `core::fmt::Write` sink supplied by the host
//! (a UART, a RAM ring buffer, ...). Log levels are configured based on
//! build configuration (debug/release).

use core::fmt::Write;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Mutex;

/// Destination for formatted log lines
pub type Sink = dyn Write + Send;

/// Global logger instance
pub static LOGGER: Logger = Logger::new();

/// Logger writing `"[LEVEL] message"` lines to an attached sink
pub struct Logger {
    sink: Mutex<Option<&'static mut Sink>>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Creates a logger with no sink attached. Records are dropped until
    /// [`attach`](Logger::attach) is called.
    pub const fn new() -> Logger {
        Logger {
            sink: Mutex::new(None),
        }
    }

    /// Replaces the sink, returning the previous one
    pub fn attach(&self, sink: &'static mut Sink) -> Option<&'static mut Sink> {
        self.sink.lock().replace(sink)
    }

    /// Detaches the sink
    pub fn detach(&self) -> Option<&'static mut Sink> {
        self.sink.lock().take()
    }
}

impl Log for Logger {
    /// Returns true if the message level is less than or equal to the maximum configured level
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    /// Formats messages as "[LEVEL] message"
    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Some(sink) = self.sink.lock().as_mut() {
                // Nowhere to report a failing sink
                let _ = writeln!(sink, "[{}] {}", record.level(), record.args());
            }
        }
    }

    /// Flush buffered logs (no-op in this implementation)
    fn flush(&self) {}
}

/// Initializes the logging system with `sink` as its output
///
/// # Notes
/// * Sets different log levels for debug/release builds:
///   - Debug builds: LevelFilter::Debug
///   - Release builds: LevelFilter::Info
/// * Fails if another logger has already been installed; the sink is still
///   attached to [`LOGGER`]
pub fn init(sink: &'static mut Sink) -> Result<(), SetLoggerError> {
    LOGGER.attach(sink);
    log::set_logger(&LOGGER).map(|()| {
        log::set_max_level(
            #[cfg(debug_assertions)]
            LevelFilter::Debug,
            #[cfg(not(debug_assertions))]
            LevelFilter::Info,
        )
    })
}
