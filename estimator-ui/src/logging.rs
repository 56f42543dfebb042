use anyhow::Result;
use chrono::Local;
use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};
use tracing::{Event, Level, Subscriber, error, warn};
use tracing_subscriber::{
    EnvFilter,
    Layer,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

const DEFAULT_FILTER: &str = "info,estimator_ui=debug";

// --- Formatter ---

/// `<local timestamp> <LEVEL> <file:line> <fields>`, colored on a terminal.
struct LocalFmt;

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();

        let stamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
        if ansi {
            write!(writer, "\x1b[2m{stamp}\x1b[0m ")?;
        } else {
            write!(writer, "{stamp} ")?;
        }

        let color = match *meta.level() {
            Level::ERROR => "1;31",
            Level::WARN => "1;33",
            Level::INFO => "1;32",
            Level::DEBUG => "1;34",
            Level::TRACE => "1;35",
        };
        if ansi {
            write!(writer, "\x1b[{color}m{:>5}\x1b[0m ", meta.level())?;
        } else {
            write!(writer, "{:>5} ", meta.level())?;
        }

        let file = meta.file().map(|f| {
            f.strip_prefix("src/")
                .or_else(|| f.strip_prefix("src\\"))
                .unwrap_or(f)
        });
        if let (Some(file), Some(line)) = (file, meta.line()) {
            if ansi {
                write!(writer, "\x1b[36m{file}:{line}\x1b[0m ")?;
            } else {
                write!(writer, "{file}:{line} ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// --- Late-bound file writer ---

type SharedFile = Arc<Mutex<Option<File>>>;

/// A MakeWriter that can be pointed at a file after initialization.
/// While no file is set, all writes are silently discarded.
#[derive(Clone, Default)]
struct FileSlot(SharedFile);

impl FileSlot {
    fn lock(&self) -> MutexGuard<'_, Option<File>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct SlotWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for SlotWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        match &mut *self.0 {
            Some(f) => f.write(buf),
            None => Ok(buf.len()),
        }
    }
    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.0 {
            Some(f) => f.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for FileSlot {
    type Writer = SlotWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SlotWriter(self.lock())
    }
}

// --- Handles ---

type SetStrFn = Box<dyn Fn(&str) -> Result<()> + Send + Sync>;
type SetBoolFn = Box<dyn Fn(bool) -> Result<()> + Send + Sync>;

/// Everything the public API needs to reconfigure a running subscriber.
struct Handles {
    set_level: SetStrFn,
    set_stdout: SetBoolFn,
    file: FileSlot,
}

static APP_NAME: OnceLock<String> = OnceLock::new();
static HANDLES: OnceLock<Handles> = OnceLock::new();

fn handles() -> Result<&'static Handles> {
    HANDLES
        .get()
        .ok_or_else(|| anyhow::anyhow!("logging not yet initialized"))
}

fn make_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn level_setter<S>(handle: reload::Handle<EnvFilter, S>) -> SetStrFn
where
    S: Subscriber + Send + Sync + 'static,
{
    Box::new(move |level_str: &str| {
        let filter = EnvFilter::try_new(level_str)
            .map_err(|e| anyhow::anyhow!("invalid log level '{level_str}': {e}"))?;
        handle
            .reload(filter)
            .map_err(|e| anyhow::anyhow!("filter reload failed: {e}"))
    })
}

fn stdout_setter<S>(handle: reload::Handle<EnvFilter, S>) -> SetBoolFn
where
    S: Subscriber + Send + Sync + 'static,
{
    Box::new(move |enabled: bool| {
        // The global filter is still the ceiling.
        let filter = EnvFilter::new(if enabled { "trace" } else { "off" });
        handle
            .reload(filter)
            .map_err(|e| anyhow::anyhow!("stdout reload failed: {e}"))
    })
}

// --- Public API ---

/// Changes the active log filter at runtime.
/// Accepts a bare level ("error", "warn", "info", "debug", "trace")
/// or any full EnvFilter directive.
pub fn set_log_level(level: &str) -> Result<()> {
    (handles()?.set_level)(level)
}

/// Shows or hides stdout log output without affecting file logging.
pub fn set_stdout_enabled(enabled: bool) -> Result<()> {
    (handles()?.set_stdout)(enabled)
}

/// Mutes stdout logging until the returned guard is dropped.
///
/// The terminal UI holds one of these while it owns the screen.
pub fn mute_stdout() -> Result<StdoutMute> {
    set_stdout_enabled(false)?;
    Ok(StdoutMute(()))
}

pub struct StdoutMute(());

impl Drop for StdoutMute {
    fn drop(&mut self) {
        if let Err(e) = set_stdout_enabled(true) {
            warn!(error = %e, "could not re-enable stdout logging");
        }
    }
}

/// Starts writing log output to `path`. Safe to call after initialization.
/// If a file is already open it is replaced.
/// The directory must already exist.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let slot = &handles()?.file;
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow::anyhow!("cannot open log file '{}': {e}", path.display()))?;

    *slot.lock() = Some(file);
    Ok(())
}

/// Closes the current log file. Subsequent records go to stdout only
/// (if stdout is enabled).
pub fn disable_file_logging() {
    if let Ok(handles) = handles() {
        *handles.file.lock() = None;
    }
}

/// Returns the process name derived from the executable path.
/// Falls back to "junk-estimator" if the path cannot be determined.
pub fn app_name() -> &'static str {
    APP_NAME.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "junk-estimator".to_string())
    })
}

/// Initializes logging. Call once at startup; later calls are no-ops.
///
/// - Stdout: colored when attached to a terminal, plain when piped.
/// - File: inactive until `enable_file_logging()` is called.
/// - Level: `info,estimator_ui=debug` by default, or `RUST_LOG`.
pub fn init_default_logging() {
    let _ = app_name();

    let file_slot = FileSlot::default();

    // Per-stdout on/off gate; starts open.
    let (stdout_gate, stdout_handle) = reload::Layer::new(EnvFilter::new("trace"));
    // Global level filter; controls both layers.
    let (level_filter, level_handle) = reload::Layer::new(make_filter());

    let stdout_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(io::stdout().is_terminal())
        .with_filter(stdout_gate);

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(false)
        .with_writer(file_slot.clone());

    if tracing_subscriber::registry()
        .with(level_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
    {
        let _ = HANDLES.set(Handles {
            set_level: level_setter(level_handle),
            set_stdout: stdout_setter(stdout_handle),
            file: file_slot,
        });
    }
}

/// Logs a task failure with context.
pub fn log_task_error(
    task_name: &'static str,
    result: Result<()>,
) {
    if let Err(error) = result {
        error!(task = task_name, ?error, "task failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_discards_writes() {
        let slot = FileSlot::default();
        let mut writer = slot.make_writer();

        assert_eq!(writer.write(b"dropped").unwrap(), 7);
        writer.flush().unwrap();
    }

    #[test]
    fn filled_slot_writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("estimator.log");
        let slot = FileSlot::default();
        *slot.lock() = Some(File::create(&path).unwrap());

        {
            let mut writer = slot.make_writer();
            writer.write_all(b"hello\n").unwrap();
            writer.flush().unwrap();
        }

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn app_name_is_stable() {
        assert_eq!(app_name(), app_name());
        assert!(!app_name().is_empty());
    }
}
