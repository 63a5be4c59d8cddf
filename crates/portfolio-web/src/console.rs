#![forbid(unsafe_code)]

//! `tracing` output routed to the browser console.

use std::io;
use std::str::FromStr;

use tracing_subscriber::filter::LevelFilter;
use wasm_bindgen::JsValue;

/// Line writer that hands each formatted event to `console.log`.
///
/// The fmt layer writes one event per writer instance; the buffered line is
/// emitted on drop.
#[derive(Debug, Default)]
pub(crate) struct ConsoleWriter {
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&self.buf);
        web_sys::console::log_1(&JsValue::from_str(line.trim_end()));
        self.buf.clear();
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

/// Install the console subscriber and the panic hook.
///
/// Safe to call more than once: a second install (or a host that already set
/// a global subscriber) is silently kept as-is.
pub(crate) fn init(level: &str) {
    console_error_panic_hook::set_once();
    let level = LevelFilter::from_str(level).unwrap_or(LevelFilter::INFO);
    let _ = tracing_subscriber::fmt()
        .with_writer(ConsoleWriter::default)
        .with_max_level(level)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .try_init();
}
