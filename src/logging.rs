//! Tracing setup for the `atomicfs` binary.
//!
//! One formatter is built per sink: stderr always, plus an optional log file.
//! Both share the timestamp style and the compact/JSON choice; only the file
//! sink has ANSI colours disabled. Verbosity comes from `LogLevel`, not RUST_LOG.

use anyhow::Result;
use atomicfs::output as out;
use atomicfs::platform::open_log_file_secure_append;
use atomicfs::{LogLevel, path_has_symlink_ancestor};
use chrono::Local;
use std::fmt as stdfmt;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::{self as tsfmt, MakeWriter, time::FormatTime};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry, registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// DD/MM/YY HH:MM:SS in local time.
struct LocalHumanTime;

impl FormatTime for LocalHumanTime {
    fn format_time(&self, w: &mut tsfmt::format::Writer<'_>) -> stdfmt::Result {
        write!(w, "{}", Local::now().format("%d/%m/%y %H:%M:%S"))
    }
}

fn directive(lvl: &LogLevel) -> &'static str {
    match lvl {
        LogLevel::Quiet => "error",
        LogLevel::Normal => "info",
        LogLevel::Info => "debug",
        LogLevel::Debug => "trace",
    }
}

fn sink<W>(writer: W, json: bool, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tsfmt::layer()
        .with_writer(writer)
        .with_timer(LocalHumanTime)
        .with_target(true)
        .with_thread_ids(true)
        .with_ansi(ansi);
    if json { layer.json().boxed() } else { layer.compact().boxed() }
}

/// File sink for `path`, or None (with a warning) if it is unsafe or cannot be opened.
fn file_sink(path: &Path, json: bool) -> Option<(BoxedLayer, WorkerGuard)> {
    let refusal = match path_has_symlink_ancestor(path) {
        Ok(false) => match open_log_file_secure_append(path) {
            Ok(file) => {
                let (writer, guard) = tracing_appender::non_blocking(file);
                return Some((sink(writer, json, false), guard));
            }
            Err(e) => format!("cannot open it: {e}"),
        },
        Ok(true) => "a parent directory is a symlink".to_string(),
        Err(e) => format!("cannot inspect its parent directories: {e}"),
    };
    out::print_warn(&format!(
        "Not logging to {}: {refusal}. Logs continue on stderr.",
        path.display()
    ));
    None
}

/// Install the global subscriber. The returned guard flushes the file sink when dropped.
pub fn init_tracing(lvl: &LogLevel, log_file: Option<&Path>, json: bool) -> Result<Option<WorkerGuard>> {
    let mut layers = vec![sink(io::stderr, json, true)];
    let mut guard = None;
    if let Some((layer, g)) = log_file.and_then(|p| file_sink(p, json)) {
        layers.push(layer);
        guard = Some(g);
    }

    registry()
        .with(layers)
        .with(EnvFilter::new(directive(lvl)))
        .try_init()?;
    Ok(guard)
}
