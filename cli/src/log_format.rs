//! Plain-text event format for the `--log-file` writer.
//!
//! Each line is prefixed with the id of the enclosing `react` run span, so log lines
//! from one query can be grepped together even when a REPL session runs many.

use std::fmt;

use tracing_core::Subscriber;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

/// Name of the per-query span opened by the loop.
const RUN_SPAN: &str = "react";

/// Output: `TIMESTAMP [run=ID] LEVEL target: fields`. The `run=` part appears only
/// inside a run span.
#[derive(Default)]
pub struct RunTaggedText {
    timer: SystemTime,
}

impl RunTaggedText {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S, N> FormatEvent<S, N> for RunTaggedText
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing_core::Event<'_>,
    ) -> fmt::Result {
        self.timer.format_time(&mut writer)?;
        let run = ctx.event_scope().and_then(|scope| {
            scope
                .from_root()
                .find(|span| span.name() == RUN_SPAN)
                .map(|span| span.id().into_u64())
        });
        if let Some(id) = run {
            write!(writer, " run={}", id)?;
        }
        write!(
            writer,
            " {} {}: ",
            event.metadata().level(),
            event.metadata().target()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
