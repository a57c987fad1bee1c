//! `tracing` layer shared by the advisor workspace.
//!
//! The binary composes [`layer`] with an `EnvFilter`. Only events from
//! workspace crates are rendered, so chatty dependencies (hyper, h2, tonic)
//! stay quiet.

use std::io::{self, IsTerminal};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{Layer, filter, fmt};

/// Target prefixes of the crates whose events are rendered.
pub const WORKSPACE_TARGETS: &[&str] = &[
    "product_advisor",
    "advisor",
    "catalog_store",
    "ai_llm_service",
    "api",
];

/// RFC3339 UTC timer, e.g. `2025-09-12T10:20:30Z`.
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        w.write_str(&now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }
}

fn is_workspace_target(target: &str) -> bool {
    WORKSPACE_TARGETS.iter().any(|p| {
        target == *p
            || target
                .strip_prefix(p)
                .is_some_and(|rest| rest.starts_with("::"))
    })
}

/// Compact single-line formatting layer for workspace events.
///
/// RFC3339 timestamps, `file:line`, span close events (durations of
/// instrumented provider calls), ANSI only on a terminal.
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();
    let only_workspace = filter::filter_fn(|meta| is_workspace_target(meta.target()));

    let format = fmt::format()
        .compact()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    fmt::layer()
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(format)
        .with_filter(only_workspace)
}
