//! Status lines on stdout, each prefixed with `[charts]`.

use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;

pub const LOG_PREFIX: &str = "[charts]";

/// Writes `[charts] <message>` with no timestamp, level or target.
pub struct ChartsFormat;

impl<S, N> FormatEvent<S, N> for ChartsFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "{} ", LOG_PREFIX)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Subscriber emitting `[charts]` lines at info level and above to `make_writer`.
pub fn subscriber<W>(make_writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(make_writer)
        .with_ansi(false)
        .event_format(ChartsFormat)
        .finish()
}

/// Install the stdout subscriber. Safe to call more than once.
pub fn init() {
    let _ = tracing::subscriber::set_global_default(subscriber(std::io::stdout));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn lines_carry_prefix_and_message_only() {
        let capture = Capture::default();
        let writer = capture.clone();

        tracing::subscriber::with_default(subscriber(move || writer.clone()), || {
            tracing::info!("Wrote {}", "charts/runs_per_day.png");
            tracing::warn!("Ignored {} node rows", 2);
            tracing::debug!("not shown");
        });

        let output = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert_eq!(
            output,
            "[charts] Wrote charts/runs_per_day.png\n[charts] Ignored 2 node rows\n"
        );
    }
}
