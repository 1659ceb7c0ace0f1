use std::io::{self, Write};

use indicatif::ProgressBar;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use tracing_subscriber::fmt::MakeWriter;

/// Install a stderr subscriber. `verbose` lowers the level to DEBUG.
///
/// Log lines are written with `spinner` suspended so they do not tear the
/// spinner line.
pub fn init(
    verbose: bool,
    spinner: &ProgressBar,
) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let subscriber = FmtSubscriber::builder()
        .with_writer(SpinnerAwareStderr {
            spinner: spinner.clone(),
        })
        .with_target(false)
        .with_max_level(level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}

struct SpinnerAwareStderr {
    spinner: ProgressBar,
}

impl<'a> MakeWriter<'a> for SpinnerAwareStderr {
    type Writer = BufferedLine;

    fn make_writer(&'a self) -> Self::Writer {
        BufferedLine {
            spinner: self.spinner.clone(),
            buf: Vec::new(),
        }
    }
}

/// Collects one formatted event and flushes it to stderr on drop
struct BufferedLine {
    spinner: ProgressBar,
    buf: Vec<u8>,
}

impl Write for BufferedLine {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for BufferedLine {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let buf = std::mem::take(&mut self.buf);
        self.spinner.suspend(|| {
            let _ = io::stderr().write_all(&buf);
        });
    }
}
