//! Browser logging: `tracing` events formatted by `tracing-subscriber` and
//! written to the devtools console.

use anyhow::{Result, anyhow};
use gloo::console;
use std::io;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Buffers one formatted event and logs it when dropped.
#[derive(Default)]
struct ConsoleWriter {
    buffer: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buffer);
        let line = line.trim_end();
        if !line.is_empty() {
            console::log!(line.to_string());
        }
    }
}

/// Install the global subscriber at `level`.
///
/// # Errors
/// Returns an error if a subscriber was already installed.
pub(crate) fn init_logging(level: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .without_time()
                .with_writer(ConsoleWriter::default),
        )
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}
