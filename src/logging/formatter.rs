use std::fmt;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::{format::Writer, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Wraps each field of a log line in brackets
/// Format: [TIMESTAMP] [LEVEL] [SPAN_OR_MODULE] [TARGET: FILE:LINE]: MESSAGE
#[derive(Debug, Clone, Copy)]
pub struct BracketedFormatter {
    timestamps: bool,
}

impl Default for BracketedFormatter {
    fn default() -> Self {
        Self { timestamps: true }
    }
}

impl BracketedFormatter {
    /// Drop the timestamp column, for deterministic output
    pub fn without_timestamps() -> Self {
        Self { timestamps: false }
    }
}

impl<S, N> FormatEvent<S, N> for BracketedFormatter
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
        let metadata = event.metadata();

        if self.timestamps {
            let now = chrono::Local::now();
            write!(writer, "[{}]  ", now.format("%Y-%m-%dT%H:%M:%S%.6f%:z"))?;
        }

        write!(writer, "[{:5}] ", metadata.level())?;

        // innermost span if any, else the last module path segment
        let scope = ctx
            .event_scope()
            .and_then(|scope| scope.from_root().last().map(|span| span.name()))
            .unwrap_or_else(|| metadata.target().rsplit("::").next().unwrap_or("unknown"));
        write!(writer, "[{}] ", scope)?;

        if let (Some(file), Some(line)) = (metadata.file(), metadata.line()) {
            write!(writer, "[{}: {}:{}]: ", metadata.target(), file, line)?;
        } else {
            write!(writer, "[{}]: ", metadata.target())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}
